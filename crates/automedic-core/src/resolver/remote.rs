//! Remote diagnosis client.
//!
//! Sends the request as JSON to `{endpoint}/api/diagnose` and deserializes the
//! response body into a [`DiagnosisResult`]. No retry, no caching.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::DiagnosisResolver;
use crate::domain::{DiagnosisError, DiagnosisRequest, DiagnosisResult, Result};

/// Path of the diagnosis endpoint, relative to the service base URL.
pub const DIAGNOSE_PATH: &str = "/api/diagnose";

/// Path of the service health endpoint.
pub const HEALTH_PATH: &str = "/api/health";

/// Client for a remote diagnosis service.
#[derive(Debug, Clone)]
pub struct RemoteResolver {
    http_client: reqwest::Client,
    base_url: String,
}

impl RemoteResolver {
    /// Create a client for the service at `base_url`.
    ///
    /// `timeout` of `None` waits for the service indefinitely.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("automedic/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the diagnosis endpoint.
    pub fn diagnose_url(&self) -> String {
        format!("{}{}", self.base_url, DIAGNOSE_PATH)
    }

    /// Probe the service health endpoint and return its JSON body.
    pub async fn health(&self) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, HEALTH_PATH);
        let response = self.http_client.get(&url).send().await?;
        let response = check_status(response)?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl DiagnosisResolver for RemoteResolver {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn resolve(&self, request: &DiagnosisRequest) -> Result<DiagnosisResult> {
        let url = self.diagnose_url();
        debug!(url = %url, "posting diagnosis request");

        // `.json()` sets `Content-Type: application/json`.
        let response = self.http_client.post(&url).json(request).send().await?;
        let response = check_status(response)?;

        let body = response.bytes().await?;
        let result: DiagnosisResult = serde_json::from_slice(&body)?;
        Ok(result)
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let status_text = status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string());
    warn!(status = status.as_u16(), "diagnosis endpoint returned {}", status_text);
    Err(DiagnosisError::Status {
        status: status.as_u16(),
        status_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnose_url_joins_path() {
        let resolver = RemoteResolver::new("http://localhost:8000/", None).unwrap();
        assert_eq!(resolver.base_url(), "http://localhost:8000");
        assert_eq!(resolver.diagnose_url(), "http://localhost:8000/api/diagnose");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Grab a free port, then release it so nothing is listening there.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let resolver = RemoteResolver::new(
            &format!("http://127.0.0.1:{port}"),
            Some(Duration::from_secs(2)),
        )
        .unwrap();
        let request = DiagnosisRequest::new("Honda", "Civic", Some(2015), 0, "brake");
        let err = resolver.resolve(&request).await.unwrap_err();
        assert!(matches!(err, DiagnosisError::Transport(_)), "{err:?}");
    }
}
