use crate::contract::TransportError;
use crate::domain::{Credential, EncodedBody, MediaType};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct PetstoreClient {
    base_url: String,
    http_client: Client,
    credentials: Vec<Credential>,
    extra_headers: HashMap<String, String>,
}

/// One request against the pet-store API.
#[derive(Debug, Clone)]
pub struct ContractRequest<'a> {
    pub method: Method,
    pub path: &'a str,
    pub accept: MediaType,
    pub headers: Vec<(String, String)>,
    pub body: Option<EncodedBody>,
}

impl<'a> ContractRequest<'a> {
    pub fn get(path: &'a str, accept: MediaType) -> Self {
        Self {
            method: Method::GET,
            path,
            accept,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Status, content type and raw body of a response.
#[derive(Debug, Clone)]
pub struct RecordedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedResponse {
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

impl PetstoreClient {
    pub fn new(
        base_url: String,
        credentials: Vec<Credential>,
        extra_headers: HashMap<String, String>,
        timeout: std::time::Duration,
    ) -> Result<Self, TransportError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::Client)?;
        Ok(Self::with_http_client(
            http_client,
            base_url,
            credentials,
            extra_headers,
        ))
    }

    /// Reuses an existing `reqwest::Client` and its connection pool.
    pub fn with_http_client(
        http_client: Client,
        base_url: String,
        credentials: Vec<Credential>,
        extra_headers: HashMap<String, String>,
    ) -> Self {
        Self {
            base_url,
            http_client,
            credentials,
            extra_headers,
        }
    }

    /// Headers for `request`, later sources replacing earlier ones:
    /// extra headers, `Accept`, credentials, then the request's own headers.
    pub fn headers(&self, request: &ContractRequest<'_>) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.extra_headers {
            headers.insert(header_name(name)?, header_value(name, value)?);
        }
        headers.insert(ACCEPT, HeaderValue::from_static(request.accept.as_str()));
        for credential in &self.credentials {
            let name = credential.header_name();
            let mut value = header_value(name, credential.header_value())?;
            value.set_sensitive(true);
            headers.insert(header_name(name)?, value);
        }
        for (name, value) in &request.headers {
            headers.insert(header_name(name)?, header_value(name, value)?);
        }
        if let Some(body) = &request.body {
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static(body.content_type.as_str()),
            );
        }
        Ok(headers)
    }

    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    #[tracing::instrument(
        name = "Sending contract request",
        skip(self, request),
        fields(method = %request.method, path = request.path, accept = %request.accept)
    )]
    pub async fn execute(
        &self,
        request: &ContractRequest<'_>,
    ) -> Result<RecordedResponse, TransportError> {
        let url = self.url(request.path);
        let mut builder = self
            .http_client
            .request(request.method.clone(), &url)
            .headers(self.headers(request)?);
        if let Some(body) = &request.body {
            builder = builder.body(body.bytes.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::classify(&url, e))?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::classify(&url, e))?
            .to_vec();
        tracing::debug!(status, body_len = body.len(), "Received response");

        Ok(RecordedResponse {
            status,
            content_type,
            body,
        })
    }
}

fn header_name(name: &str) -> Result<HeaderName, TransportError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|_| TransportError::InvalidHeader {
        name: name.to_owned(),
    })
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, TransportError> {
    HeaderValue::from_str(value).map_err(|_| TransportError::InvalidHeader {
        name: name.to_owned(),
    })
}
