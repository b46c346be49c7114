use secrecy::{ExposeSecret, Secret};

/// An opaque token the target service authenticates requests with.
///
/// The value is forwarded verbatim in the header matching its kind and is
/// never parsed. `Debug` output stays redacted.
#[derive(Clone, Debug)]
pub enum Credential {
    /// Sent in the `api_key` header.
    ApiKey(Secret<String>),
    /// Sent in the `Authorization` header, scheme included (`Bearer ...`).
    Authorization(Secret<String>),
}

pub const API_KEY_HEADER: &str = "api_key";
pub const AUTHORIZATION_HEADER: &str = "Authorization";

impl Credential {
    pub fn api_key(value: impl Into<String>) -> Self {
        Self::ApiKey(Secret::new(value.into()))
    }

    pub fn authorization(value: impl Into<String>) -> Self {
        Self::Authorization(Secret::new(value.into()))
    }

    pub fn header_name(&self) -> &'static str {
        match self {
            Credential::ApiKey(_) => API_KEY_HEADER,
            Credential::Authorization(_) => AUTHORIZATION_HEADER,
        }
    }

    pub fn header_value(&self) -> &str {
        match self {
            Credential::ApiKey(secret) | Credential::Authorization(secret) => {
                secret.expose_secret()
            }
        }
    }
}
