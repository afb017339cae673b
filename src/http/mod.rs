//! Outbound HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! graph operation
//!     → request.rs (path + params, token kept aside)
//!     → gateway.rs (deadline, classification, retry)
//!     → transport.rs (HttpTransport::execute, reqwest in production)
//!     → response.rs (status + body, read once)
//! ```

pub mod gateway;
pub mod request;
pub mod response;
pub mod transport;

pub use gateway::GraphGateway;
pub use request::{GraphRequest, HttpMethod, ACCESS_TOKEN_PARAM};
pub use response::RawResponse;
pub use transport::{HttpTransport, ReqwestTransport, TransportError};
