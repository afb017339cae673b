//! Operation result types.
//!
//! Every public operation returns `Result<T, OperationError>`. Expected
//! failure modes (missing credentials, upstream errors) are values, never
//! panics.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for public graph operations.
pub type OperationResult<T> = Result<T, OperationError>;

/// Machine-readable failure reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    NoCredentials,
    ApiError,
}

/// How an upstream failure was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Expected to clear shortly; eligible for automatic retry.
    Transient,
    /// Token invalid or expired; the account must be reconnected.
    CredentialExpired,
    /// Anything else.
    Permanent,
}

/// A classified upstream failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub details: String,
    pub kind: FailureKind,
}

impl ApiFailure {
    pub fn transient(details: impl Into<String>) -> Self {
        Self {
            details: details.into(),
            kind: FailureKind::Transient,
        }
    }

    pub fn credential_expired(details: impl Into<String>) -> Self {
        Self {
            details: details.into(),
            kind: FailureKind::CredentialExpired,
        }
    }

    pub fn permanent(details: impl Into<String>) -> Self {
        Self {
            details: details.into(),
            kind: FailureKind::Permanent,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind == FailureKind::Transient
    }
}

/// User-facing failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserFacingKind {
    /// "Integration not connected."
    NotConnected,
    /// "Temporary, try again shortly."
    RetryLater,
    /// "Reconnect your account."
    ReconnectRequired,
    /// Raw upstream message, for diagnostics.
    Upstream,
}

/// Errors returned by public graph operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    /// No usable credential is stored for the organisation.
    #[error("integration not connected")]
    NoCredentials,

    /// The upstream API reported an error.
    #[error("upstream API error: {}", .0.details)]
    Api(ApiFailure),
}

impl OperationError {
    pub fn reason(&self) -> FailureReason {
        match self {
            OperationError::NoCredentials => FailureReason::NoCredentials,
            OperationError::Api(_) => FailureReason::ApiError,
        }
    }

    /// Only ever true for a transient `api_error`.
    pub fn is_transient(&self) -> bool {
        match self {
            OperationError::NoCredentials => false,
            OperationError::Api(failure) => failure.is_transient(),
        }
    }

    pub fn details(&self) -> Option<&str> {
        match self {
            OperationError::NoCredentials => None,
            OperationError::Api(failure) => Some(&failure.details),
        }
    }

    pub fn kind(&self) -> UserFacingKind {
        match self {
            OperationError::NoCredentials => UserFacingKind::NotConnected,
            OperationError::Api(failure) => match failure.kind {
                FailureKind::Transient => UserFacingKind::RetryLater,
                FailureKind::CredentialExpired => UserFacingKind::ReconnectRequired,
                FailureKind::Permanent => UserFacingKind::Upstream,
            },
        }
    }

    /// Wire form of this failure.
    pub fn to_failure(&self) -> Failure {
        match self {
            OperationError::NoCredentials => Failure {
                reason: FailureReason::NoCredentials,
                details: None,
                is_transient: None,
            },
            OperationError::Api(failure) => Failure {
                reason: FailureReason::ApiError,
                details: Some(failure.details.clone()),
                is_transient: Some(failure.is_transient()),
            },
        }
    }
}

impl From<ApiFailure> for OperationError {
    fn from(failure: ApiFailure) -> Self {
        OperationError::Api(failure)
    }
}

/// Serializable failure descriptor handed to the rest of the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    pub reason: FailureReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_transient: Option<bool>,
}
