//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every graph operation produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters)
//!     → spans.rs (one span per operation with a correlation ID)
//!
//! Consumers:
//!     → Log aggregation (stdout, JSON)
//!     → Whatever metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Operation ID flows through every event of a call
//! - The library never installs a metrics exporter

pub mod logging;
pub mod metrics;
pub mod spans;
