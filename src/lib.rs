//! Social Graph Connector Library
//!
//! Per-organisation client for a Graph-style social media API: encrypted
//! credential resolution, transient-error retry, cursor pagination, insights
//! aggregation and two-phase media publishing.

pub mod config;
pub mod credentials;
pub mod error;
pub mod graph;
pub mod http;
pub mod observability;
pub mod resilience;

pub use config::ConnectorConfig;
pub use credentials::{CredentialResolver, OrgId};
pub use error::{Failure, FailureReason, OperationError, OperationResult};
pub use graph::GraphClient;
