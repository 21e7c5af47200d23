//! Request dispatch to the analysis service.
//!
//! [`AnalysisTransport`] is the seam between the controller and the network;
//! [`HttpTransport`] is the `reqwest` implementation that posts the request
//! body as JSON and maps failures into [`TransportError`].

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::{ConfigError, TransportError};
use crate::types::AnalysisRequest;

/// Message used when a failure body carries no `error` field.
pub const GENERIC_FAILURE: &str = "Analysis failed";

/// Sends one analysis request and returns the decoded body.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<Value, TransportError>;
}

/// HTTP transport posting to `{base_url}{analyze_path}`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: String,
    timeout_secs: Option<u64>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| ConfigError::Invalid {
            message: format!("Failed to build HTTP client: {e}"),
        })?;
        Ok(Self {
            client,
            url: config.analyze_url(),
            timeout_secs: config.request_timeout_secs,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Map a non-success status and its body to a server error.
    fn map_http_error(status: reqwest::StatusCode, body: &str) -> TransportError {
        let parsed = serde_json::from_str::<Value>(body).ok();
        let field = |key: &str| {
            parsed
                .as_ref()
                .and_then(|v| v.get(key))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let message = field("error").unwrap_or_else(|| GENERIC_FAILURE.to_string());
        let details = field("details")
            .or_else(|| field("help"))
            .or_else(|| field("message"));
        debug!(status = %status, body = %body, "Analysis service returned an error status");
        TransportError::Server {
            status: status.as_u16(),
            message,
            details,
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> TransportError {
        match self.timeout_secs {
            Some(timeout_secs) if e.is_timeout() => TransportError::Timeout { timeout_secs },
            _ => TransportError::Network {
                message: e.to_string(),
            },
        }
    }
}

#[async_trait]
impl AnalysisTransport for HttpTransport {
    #[instrument(skip_all, fields(url = %self.url, methods = ?request.methods, use_ai = request.use_ai))]
    async fn analyze(&self, request: &AnalysisRequest) -> Result<Value, TransportError> {
        debug!(text_len = request.text.len(), "Sending analysis request");

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            return Err(Self::map_http_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| TransportError::Parse {
            message: e.to_string(),
        })
    }
}
