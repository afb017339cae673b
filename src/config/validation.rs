//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and URLs.
//! Validation is a pure function that reports every problem, not just the first.

use std::fmt;

use url::Url;

use crate::config::schema::ConnectorConfig;

/// Upper bound on attempts per call site.
pub const MAX_RETRY_ATTEMPTS: u32 = 10;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ConnectorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.graph.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "graph.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "graph.base_url",
            format!("invalid URL '{}': {}", config.graph.base_url, e),
        )),
    }

    if config.graph.provider.trim().is_empty() {
        errors.push(ValidationError::new("graph.provider", "must not be empty"));
    }
    if config.graph.timeout_secs == 0 {
        errors.push(ValidationError::new("graph.timeout_secs", "must be greater than 0"));
    }

    let retries = &config.retries;
    if retries.max_attempts == 0 || retries.max_attempts > MAX_RETRY_ATTEMPTS {
        errors.push(ValidationError::new(
            "retries.max_attempts",
            format!("must be between 1 and {}", MAX_RETRY_ATTEMPTS),
        ));
    }
    if retries.max_delay_ms < retries.delay_ms {
        errors.push(ValidationError::new(
            "retries.max_delay_ms",
            "must not be smaller than retries.delay_ms",
        ));
    }

    let insights = &config.insights;
    if insights.max_window_days == 0 {
        errors.push(ValidationError::new("insights.max_window_days", "must be greater than 0"));
    }
    if insights.default_window_days == 0 || insights.default_window_days > insights.max_window_days {
        errors.push(ValidationError::new(
            "insights.default_window_days",
            "must be between 1 and insights.max_window_days",
        ));
    }

    let media = &config.media;
    if media.max_page_size == 0 {
        errors.push(ValidationError::new("media.max_page_size", "must be greater than 0"));
    }
    if media.default_page_size == 0 || media.default_page_size > media.max_page_size {
        errors.push(ValidationError::new(
            "media.default_page_size",
            "must be between 1 and media.max_page_size",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
