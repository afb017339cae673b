//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ConnectorConfig (validated, immutable)
//!     → consumed once when the GraphClient is built
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Retry budget and delay are configuration, not constants

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    BackoffStrategy, ConnectorConfig, CredentialSourceConfig, GraphApiConfig, InsightsConfig,
    MediaConfig, ObservabilityConfig, RetryConfig,
};
