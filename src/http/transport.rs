//! HTTP transport seam.
//!
//! The gateway talks to the network only through [`HttpTransport`], so tests
//! can script upstream behaviour without sockets.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::GraphApiConfig;
use crate::http::request::{GraphRequest, HttpMethod, ACCESS_TOKEN_PARAM};
use crate::http::response::RawResponse;

/// Transport-level failures (no HTTP response was obtained).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Executes a single request and reads the whole body.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: GraphRequest) -> Result<RawResponse, TransportError>;
}

/// Production transport backed by `reqwest`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(config: &GraphApiConfig) -> Result<Self, TransportError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    fn map_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else {
            TransportError::Connect(err.to_string())
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: GraphRequest) -> Result<RawResponse, TransportError> {
        let builder = match request.method {
            HttpMethod::Get => self.client.get(request.url.clone()),
            HttpMethod::Post => self.client.post(request.url.clone()),
        };

        let resp = builder
            .query(&[(ACCESS_TOKEN_PARAM, request.access_token.as_str())])
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(RawResponse { status, body })
    }
}
