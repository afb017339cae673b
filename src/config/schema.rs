//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the connector.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the graph connector.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Upstream API settings.
    pub graph: GraphApiConfig,

    /// Retry policy for read operations.
    pub retries: RetryConfig,

    /// Account insights defaults.
    pub insights: InsightsConfig,

    /// Media listing defaults.
    pub media: MediaConfig,

    /// Local credential source (CLI only).
    pub credentials: CredentialSourceConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Upstream Graph-style API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GraphApiConfig {
    /// Versioned API root (e.g., "https://graph.facebook.com/v19.0").
    pub base_url: String,

    /// Provider key used when looking up stored credentials.
    pub provider: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// User-Agent sent with every request.
    pub user_agent: String,
}

impl Default for GraphApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://graph.facebook.com/v19.0".to_string(),
            provider: "instagram".to_string(),
            timeout_secs: 15,
            user_agent: concat!("social-graph/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Delay strategy between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffStrategy {
    /// Same delay before every retry.
    Fixed,
    /// Delay doubles per retry, capped by `max_delay_ms`, with jitter.
    Exponential,
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per call site, including the first.
    pub max_attempts: u32,

    /// Delay between attempts in milliseconds.
    pub delay_ms: u64,

    /// Backoff strategy.
    pub strategy: BackoffStrategy,

    /// Upper bound for exponential delays in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            delay_ms: 1500,
            strategy: BackoffStrategy::Fixed,
            max_delay_ms: 10_000,
        }
    }
}

/// Account insights configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InsightsConfig {
    /// Trailing window used when the caller does not supply one.
    pub default_window_days: u32,

    /// Largest window a caller may request.
    pub max_window_days: u32,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            default_window_days: 7,
            max_window_days: 90,
        }
    }
}

/// Media listing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MediaConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            default_page_size: 25,
            max_page_size: 100,
        }
    }
}

/// Where the CLI reads encrypted credentials from.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CredentialSourceConfig {
    /// JSON file of `{ "<org>": { "<provider>": "<blob>" } }`.
    pub file: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
