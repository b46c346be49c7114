use crate::domain::Credential;
use secrecy::Secret;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::collections::HashMap;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub target: TargetSettings,
    pub credentials: CredentialSettings,
    pub suite: SuiteSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct TargetSettings {
    pub base_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
    #[serde(default)]
    pub extra_headers: HashMap<String, String>,
}

impl TargetSettings {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct CredentialSettings {
    pub api_key: Secret<String>,
    #[serde(default)]
    pub bearer_token: Option<Secret<String>>,
}

impl CredentialSettings {
    /// Every configured credential, API key first.
    pub fn credentials(&self) -> Vec<Credential> {
        let mut credentials = vec![Credential::ApiKey(self.api_key.clone())];
        if let Some(token) = &self.bearer_token {
            credentials.push(Credential::Authorization(token.clone()));
        }
        credentials
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct SuiteSettings {
    pub inventory_path: String,
    pub error_signal_header: String,
    pub error_signal_value: String,
    pub accepted_error_statuses: Vec<u16>,
    pub unauthorized_statuses: Vec<u16>,
    /// Whether the target rejects requests without credentials.
    #[serde(default)]
    pub enforce_credentials: bool,
}

impl Default for SuiteSettings {
    fn default() -> Self {
        Self {
            inventory_path: "/store/inventory".into(),
            error_signal_header: "X-Force-Error".into(),
            error_signal_value: "true".into(),
            accepted_error_statuses: vec![500, 501, 502, 503],
            unauthorized_statuses: vec![401, 403],
            enforce_credentials: false,
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| config::ConfigError::Foreign(e.into()))?;
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment.
    // Default to `public` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "public".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_TARGET__BASE_URL=http://127.0.0.1:8080/api/v3` would set `Settings.target.base_url`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

/// The service the suite is pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// A pet-store container running on this machine.
    Local,
    /// The hosted demo at petstore3.swagger.io.
    Public,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Public => "public",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "public" => Ok(Self::Public),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `public`.",
                other
            )),
        }
    }
}
