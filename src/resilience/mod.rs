//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Read call to the graph API:
//!     → timeouts.rs (deadline per attempt)
//!     → classifier.rs (transient / credential / permanent)
//!     → retries.rs (retry transient failures within the budget)
//!     → backoff.rs (fixed or exponential delay)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Retries only for reads; publish is never retried
//! - One classifier for every call site

pub mod backoff;
pub mod classifier;
pub mod retries;
pub mod timeouts;

pub use classifier::{classify_error, classify_response, embedded_error, GraphError};
pub use retries::{retry_transient, RetryPolicy};
