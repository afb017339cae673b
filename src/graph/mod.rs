//! Graph platform operations.
//!
//! # Data Flow
//! ```text
//! GraphClient::<operation>(org_id, ...)
//!     → credentials (resolve + select token, or NoCredentials)
//!     → http::GraphGateway (GET with retry / POST once)
//!     → insights.rs | media.rs | publish.rs (shape the response)
//!     → typed value or OperationError
//! ```
//!
//! # Design Decisions
//! - Reads go through the retrying `get`; publishing never retries
//! - Listing returns one page and a cursor; callers drive pagination
//! - Unknown metric names are ignored rather than rejected

pub mod client;
pub mod insights;
pub mod media;
pub mod publish;
pub mod types;

pub use client::{ClientBuildError, GraphClient};
pub use insights::{InsightWindow, ACCOUNT_METRICS, DEFAULT_MEDIA_METRICS};
pub use publish::{PublishPhase, PublishState, PublishWorkflow};
pub use types::{
    AccountInfo, AccountInsights, InsightMetrics, MediaItem, MediaKind, MediaPage, MediaQuery,
    PublishRequest, PublishedMedia,
};
