//! Retrying gateway to the graph API.
//!
//! # Responsibilities
//! - Build authenticated requests under the configured base URL
//! - Bound every attempt with a deadline
//! - Turn status codes and embedded `error` objects into [`ApiFailure`]s
//! - Retry transient read failures through [`retry_transient`]
//!
//! # Design Decisions
//! - `get` retries, `post_once` never does
//! - Some endpoints report errors inside 200 responses; both paths check for them
//! - Transport failures are permanent and are not retried

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::config::ConnectorConfig;
use crate::error::ApiFailure;
use crate::http::request::{GraphRequest, HttpMethod};
use crate::http::response::RawResponse;
use crate::http::transport::HttpTransport;
use crate::observability::metrics;
use crate::resilience::classifier::{classify_error, classify_response, embedded_error, upstream_message};
use crate::resilience::retries::{retry_transient, RetryPolicy};
use crate::resilience::timeouts::with_deadline;

/// Authenticated access to the graph API.
#[derive(Clone)]
pub struct GraphGateway {
    transport: Arc<dyn HttpTransport>,
    base_url: Url,
    retry: RetryPolicy,
    request_timeout: Duration,
}

impl GraphGateway {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        base_url: Url,
        retry: RetryPolicy,
        request_timeout: Duration,
    ) -> Self {
        Self {
            transport,
            base_url,
            retry,
            request_timeout,
        }
    }

    /// Build a gateway from a (validated) configuration.
    pub fn from_config(
        transport: Arc<dyn HttpTransport>,
        config: &ConnectorConfig,
    ) -> Result<Self, url::ParseError> {
        Ok(Self::new(
            transport,
            Url::parse(&config.graph.base_url)?,
            RetryPolicy::from(&config.retries),
            Duration::from_secs(config.graph.timeout_secs),
        ))
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// GET with classification and transient retry.
    pub async fn get(
        &self,
        operation: &'static str,
        token: &str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Value, ApiFailure> {
        let request = GraphRequest::build(HttpMethod::Get, &self.base_url, path, token, params)?;
        let request = &request;

        let result = retry_transient(&self.retry, operation, move |attempt| {
            self.attempt_classified(operation, request, attempt)
        })
        .await;

        metrics::record_request(operation, if result.is_ok() { "success" } else { "failure" });
        result
    }

    /// Single POST; errors carry the upstream message verbatim.
    pub async fn post_once(
        &self,
        operation: &'static str,
        token: &str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Value, ApiFailure> {
        let request = GraphRequest::build(HttpMethod::Post, &self.base_url, path, token, params)?;

        let result = match self.send(operation, &request, 1).await {
            Ok(resp) if resp.is_success() => match serde_json::from_str::<Value>(&resp.body) {
                Ok(body) => match embedded_error(&body) {
                    Some(error) => Err(ApiFailure::permanent(
                        error.message.unwrap_or_else(|| resp.body.trim().to_string()),
                    )),
                    None => Ok(body),
                },
                Err(e) => Err(ApiFailure::permanent(format!("invalid JSON in response: {}", e))),
            },
            Ok(resp) => Err(ApiFailure::permanent(upstream_message(resp.status, &resp.body))),
            Err(failure) => Err(failure),
        };

        metrics::record_request(operation, if result.is_ok() { "success" } else { "failure" });
        result
    }

    async fn attempt_classified(
        &self,
        operation: &'static str,
        request: &GraphRequest,
        attempt: u32,
    ) -> Result<Value, ApiFailure> {
        let resp = self.send(operation, request, attempt).await?;

        if !resp.is_success() {
            let failure = classify_response(resp.status, &resp.body);
            tracing::debug!(
                operation = operation,
                status = resp.status,
                kind = ?failure.kind,
                "Upstream returned an error status"
            );
            return Err(failure);
        }

        let body: Value = serde_json::from_str(&resp.body)
            .map_err(|e| ApiFailure::permanent(format!("invalid JSON in response: {}", e)))?;

        if let Some(error) = embedded_error(&body) {
            let failure = classify_error(&error);
            tracing::debug!(
                operation = operation,
                kind = ?failure.kind,
                "Upstream embedded an error in a success response"
            );
            return Err(failure);
        }

        Ok(body)
    }

    async fn send(
        &self,
        operation: &'static str,
        request: &GraphRequest,
        attempt: u32,
    ) -> Result<RawResponse, ApiFailure> {
        tracing::debug!(
            operation = operation,
            method = %request.method,
            url = %request.url,
            attempt = attempt,
            "Calling graph API"
        );

        match with_deadline(self.request_timeout, self.transport.execute(request.clone())).await {
            Ok(Ok(resp)) => {
                tracing::debug!(operation = operation, status = resp.status, "Graph API responded");
                Ok(resp)
            }
            Ok(Err(e)) => {
                tracing::warn!(operation = operation, error = %e, "Graph API transport error");
                Err(ApiFailure::permanent(e.to_string()))
            }
            Err(elapsed) => {
                tracing::warn!(operation = operation, timeout = ?elapsed.0, "Graph API request timed out");
                Err(ApiFailure::permanent(format!(
                    "request timed out after {}s",
                    elapsed.0.as_secs_f64()
                )))
            }
        }
    }
}
