use crate::configuration::{Settings, SuiteSettings};
use crate::contract::{ContractCase, ContractError, CredentialPolicy, SignalHeader, TransportError};
use crate::domain::{Credential, ExpectedOutcome};
use crate::petstore_client::{ContractRequest, PetstoreClient};
use std::collections::HashMap;
use std::time::Duration;
use tracing::Instrument;

/// Contract checks for `GET /store/inventory`.
#[derive(Debug, Clone)]
pub struct ContractTestSuite {
    settings: SuiteSettings,
    http_client: reqwest::Client,
    extra_headers: HashMap<String, String>,
}

/// What a passing case observed.
#[derive(Debug, Clone)]
pub struct CaseReport {
    pub name: String,
    pub status: u16,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug)]
pub struct CaseOutcome {
    pub name: String,
    pub result: Result<CaseReport, ContractError>,
}

/// One outcome per case, in the order the cases were declared.
#[derive(Debug)]
pub struct SuiteReport {
    pub outcomes: Vec<CaseOutcome>,
}

impl SuiteReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.result.is_ok())
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ContractError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.name.as_str(), e)))
    }
}

impl ContractTestSuite {
    /// Builds the HTTP client every case of the suite shares.
    pub fn new(settings: SuiteSettings, timeout: Duration) -> Result<Self, TransportError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::Client)?;
        Ok(Self {
            settings,
            http_client,
            extra_headers: HashMap::new(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, TransportError> {
        Ok(
            Self::new(settings.suite.clone(), settings.target.timeout())?
                .with_extra_headers(settings.target.extra_headers.clone()),
        )
    }

    pub fn with_extra_headers(mut self, extra_headers: HashMap<String, String>) -> Self {
        self.extra_headers = extra_headers;
        self
    }

    pub fn success_case(&self) -> ContractCase {
        ContractCase::get(
            format!("GET {} -> 200", self.settings.inventory_path),
            &self.settings.inventory_path,
            ExpectedOutcome::success(),
        )
    }

    pub fn error_case(&self) -> ContractCase {
        ContractCase::get(
            format!("GET {} -> forced error", self.settings.inventory_path),
            &self.settings.inventory_path,
            ExpectedOutcome::server_error(self.settings.accepted_error_statuses.clone()),
        )
        .with_signal(SignalHeader {
            name: self.settings.error_signal_header.clone(),
            value: self.settings.error_signal_value.clone(),
        })
    }

    pub fn unauthorized_case(&self) -> ContractCase {
        ContractCase::get(
            format!("GET {} without credentials", self.settings.inventory_path),
            &self.settings.inventory_path,
            ExpectedOutcome::client_error(self.settings.unauthorized_statuses.clone()),
        )
        .with_credentials(CredentialPolicy::Withheld)
    }

    pub fn rejected_credential_case(&self, credential: Credential) -> ContractCase {
        ContractCase::get(
            format!("GET {} with a rejected credential", self.settings.inventory_path),
            &self.settings.inventory_path,
            ExpectedOutcome::client_error(self.settings.unauthorized_statuses.clone()),
        )
        .with_credentials(CredentialPolicy::Substituted(credential))
    }

    /// The cases `run_all` executes.
    pub fn cases(&self) -> Vec<ContractCase> {
        let mut cases = vec![self.success_case(), self.error_case()];
        if self.settings.enforce_credentials {
            cases.push(self.unauthorized_case());
        }
        cases
    }

    pub async fn run_success_case(
        &self,
        base_url: &str,
        credentials: &[Credential],
    ) -> Result<CaseReport, ContractError> {
        self.run_case(base_url, credentials, &self.success_case())
            .await
    }

    pub async fn run_error_case(
        &self,
        base_url: &str,
        credentials: &[Credential],
    ) -> Result<CaseReport, ContractError> {
        self.run_case(base_url, credentials, &self.error_case()).await
    }

    pub async fn run_unauthorized_case(&self, base_url: &str) -> Result<CaseReport, ContractError> {
        self.run_case(base_url, &[], &self.unauthorized_case())
            .await
    }

    #[tracing::instrument(
        name = "Running contract case",
        skip(self, credentials, case),
        fields(case = %case.name, base_url = %base_url),
        err(Debug)
    )]
    pub async fn run_case(
        &self,
        base_url: &str,
        credentials: &[Credential],
        case: &ContractCase,
    ) -> Result<CaseReport, ContractError> {
        let client = PetstoreClient::with_http_client(
            self.http_client.clone(),
            base_url.to_owned(),
            case.credentials.select(credentials),
            case.credentials.extra_headers(&self.extra_headers),
        );
        let mut request = ContractRequest {
            method: case.method.clone(),
            path: &case.path,
            accept: case.accept,
            headers: Vec::new(),
            body: case.body.clone(),
        };
        if let Some(signal) = &case.signal {
            request = request.header(signal.name.as_str(), signal.value.as_str());
        }

        let response = client.execute(&request).await?;
        let logged_body = match response.json() {
            Ok(decoded) => decoded.to_string(),
            Err(_) => String::from_utf8_lossy(&response.body).into_owned(),
        };
        tracing::info!(
            status = response.status,
            content_type = response.content_type.as_deref().unwrap_or(""),
            body = %logged_body,
            "{} {} {}",
            response.status,
            case.method,
            case.path
        );

        let body = case
            .expected
            .evaluate(response.status, &response.body)
            .inspect_err(|failure| {
                tracing::warn!(
                    status = response.status,
                    body = %logged_body,
                    "Response did not match the contract: {}",
                    failure
                );
            })?;

        Ok(CaseReport {
            name: case.name.clone(),
            status: response.status,
            body,
        })
    }

    /// Runs the declared cases concurrently; a failing case does not affect the others.
    pub async fn run_all(&self, base_url: &str, credentials: &[Credential]) -> SuiteReport {
        self.run_cases(base_url, credentials, self.cases()).await
    }

    pub async fn run_cases(
        &self,
        base_url: &str,
        credentials: &[Credential],
        cases: Vec<ContractCase>,
    ) -> SuiteReport {
        let handles: Vec<_> = cases
            .into_iter()
            .map(|case| {
                let suite = self.clone();
                let base_url = base_url.to_owned();
                let credentials = credentials.to_vec();
                let name = case.name.clone();
                let handle = tokio::spawn(
                    async move { suite.run_case(&base_url, &credentials, &case).await }
                        .in_current_span(),
                );
                (name, handle)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            let result = handle.await.unwrap_or_else(|e| Err(ContractError::Aborted(e)));
            outcomes.push(CaseOutcome { name, result });
        }
        SuiteReport { outcomes }
    }
}
