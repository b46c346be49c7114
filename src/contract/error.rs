/// The response arrived but did not match the expected outcome.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AssertionFailure {
    #[error("expected status in {expected:?}, got {actual}")]
    UnexpectedStatus { expected: Vec<u16>, actual: u16 },
    #[error("response body is not valid JSON: {0}")]
    UndecodableBody(String),
    #[error("expected a JSON object body, got {0}")]
    NotAnObject(&'static str),
    #[error("response body has no `{0}` property")]
    MissingField(String),
}

/// No usable response came back.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("request to {url} timed out")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to connect to {url}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to build the HTTP client")]
    Client(#[source] reqwest::Error),
    #[error("header `{name}` is not a valid HTTP header")]
    InvalidHeader { name: String },
}

impl TransportError {
    pub fn classify(url: &str, source: reqwest::Error) -> Self {
        let url = url.to_owned();
        if source.is_timeout() {
            Self::Timeout { url, source }
        } else if source.is_connect() {
            Self::Connect { url, source }
        } else {
            Self::Request { url, source }
        }
    }
}

#[derive(thiserror::Error)]
pub enum ContractError {
    #[error("assertion failed")]
    Assertion(#[from] AssertionFailure),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("contract case did not run to completion")]
    Aborted(#[source] tokio::task::JoinError),
}

impl ContractError {
    pub fn is_assertion(&self) -> bool {
        matches!(self, ContractError::Assertion(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ContractError::Transport(TransportError::Timeout { .. }))
    }
}

impl std::fmt::Debug for ContractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
