use crate::domain::{
    API_KEY_HEADER, AUTHORIZATION_HEADER, Credential, EncodedBody, ExpectedOutcome, MediaType,
};
use reqwest::Method;
use std::collections::HashMap;

/// Which credentials a case sends.
#[derive(Debug, Clone)]
pub enum CredentialPolicy {
    /// Whatever the caller handed to the suite.
    Supplied,
    /// None at all.
    Withheld,
    /// This credential instead of the caller's, e.g. a key the service must reject.
    Substituted(Credential),
}

impl CredentialPolicy {
    pub fn select(&self, supplied: &[Credential]) -> Vec<Credential> {
        match self {
            CredentialPolicy::Supplied => supplied.to_vec(),
            CredentialPolicy::Withheld => Vec::new(),
            CredentialPolicy::Substituted(credential) => vec![credential.clone()],
        }
    }

    /// Configured extra headers this policy lets through.
    ///
    /// Unless the caller's credentials are supplied, extra headers that
    /// would carry a credential (`api_key`, `Authorization`) are dropped.
    pub fn extra_headers(&self, configured: &HashMap<String, String>) -> HashMap<String, String> {
        match self {
            CredentialPolicy::Supplied => configured.clone(),
            CredentialPolicy::Withheld | CredentialPolicy::Substituted(_) => configured
                .iter()
                .filter(|(name, _)| {
                    !name.eq_ignore_ascii_case(API_KEY_HEADER)
                        && !name.eq_ignore_ascii_case(AUTHORIZATION_HEADER)
                })
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        }
    }
}

/// A header asking the service to fail on purpose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalHeader {
    pub name: String,
    pub value: String,
}

/// One declared check of a resource/verb pair.
#[derive(Debug, Clone)]
pub struct ContractCase {
    pub name: String,
    pub method: Method,
    pub path: String,
    pub accept: MediaType,
    pub signal: Option<SignalHeader>,
    pub credentials: CredentialPolicy,
    pub body: Option<EncodedBody>,
    pub expected: ExpectedOutcome,
}

impl ContractCase {
    pub fn get(name: impl Into<String>, path: impl Into<String>, expected: ExpectedOutcome) -> Self {
        Self {
            name: name.into(),
            method: Method::GET,
            path: path.into(),
            accept: MediaType::Json,
            signal: None,
            credentials: CredentialPolicy::Supplied,
            body: None,
            expected,
        }
    }

    pub fn with_signal(mut self, signal: SignalHeader) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn with_credentials(mut self, credentials: CredentialPolicy) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn accepting(mut self, accept: MediaType) -> Self {
        self.accept = accept;
        self
    }

    pub fn with_body(mut self, method: Method, body: EncodedBody) -> Self {
        self.method = method;
        self.body = Some(body);
        self
    }
}
