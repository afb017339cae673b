//! Upstream error classification.
//!
//! Single source of truth for retry eligibility. Pure: no I/O, no logging.
//!
//! # Rules (first match wins)
//! ```text
//! error.code == 2 or error.is_transient == true   → Transient, generic message
//! message ~ /token|expired/i or error.code == 190  → CredentialExpired, reconnect message
//! any other error object                           → Permanent, upstream message
//! unparseable body                                 → Permanent, raw body
//! ```

use serde_json::Value;

use crate::error::ApiFailure;

/// Platform code for "temporary issue, retry later".
pub const TRANSIENT_ERROR_CODE: i64 = 2;

/// Platform code for an invalid or expired OAuth token.
pub const INVALID_TOKEN_CODE: i64 = 190;

pub const TRANSIENT_MESSAGE: &str = "temporary upstream error, retry later";
pub const RECONNECT_MESSAGE: &str = "credential expired; reconnect required";

/// The `error` object embedded in a response body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphError {
    pub message: Option<String>,
    pub code: Option<i64>,
    pub is_transient: Option<bool>,
}

impl GraphError {
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let code = obj.get("code").and_then(|c| {
            c.as_i64()
                .or_else(|| c.as_str().and_then(|s| s.trim().parse().ok()))
        });
        Some(Self {
            message: obj.get("message").and_then(Value::as_str).map(str::to_string),
            code,
            is_transient: obj.get("is_transient").and_then(Value::as_bool),
        })
    }
}

/// Extract an embedded `error` object from a parsed body.
pub fn embedded_error(body: &Value) -> Option<GraphError> {
    body.get("error").and_then(GraphError::from_value)
}

/// Classify a structured upstream error.
pub fn classify_error(error: &GraphError) -> ApiFailure {
    if error.code == Some(TRANSIENT_ERROR_CODE) || error.is_transient == Some(true) {
        return ApiFailure::transient(TRANSIENT_MESSAGE);
    }

    let message = error.message.as_deref().unwrap_or_default();
    let lowered = message.to_lowercase();
    if lowered.contains("token") || lowered.contains("expired") || error.code == Some(INVALID_TOKEN_CODE) {
        return ApiFailure::credential_expired(RECONNECT_MESSAGE);
    }

    if message.is_empty() {
        match error.code {
            Some(code) => ApiFailure::permanent(format!("upstream error code {}", code)),
            None => ApiFailure::permanent("upstream error"),
        }
    } else {
        ApiFailure::permanent(message)
    }
}

/// Classify a failed response from its status and raw body.
pub fn classify_response(status: u16, body: &str) -> ApiFailure {
    match serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(embedded_error)
    {
        Some(error) => classify_error(&error),
        None => ApiFailure::permanent(raw_details(status, body)),
    }
}

/// Upstream message without classification, for side-effecting calls.
pub fn upstream_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(embedded_error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| raw_details(status, body))
}

fn raw_details(status: u16, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    #[test]
    fn test_transient_code() {
        let failure = classify_response(
            500,
            r#"{"error":{"message":"An unexpected error has occurred. Please retry your request later.","code":2}}"#,
        );
        assert_eq!(failure.kind, FailureKind::Transient);
        assert_eq!(failure.details, TRANSIENT_MESSAGE);
    }

    #[test]
    fn test_transient_flag() {
        let failure = classify_response(
            400,
            r#"{"error":{"message":"Application request limit reached","code":4,"is_transient":true}}"#,
        );
        assert!(failure.is_transient());
        assert_eq!(failure.details, TRANSIENT_MESSAGE);
    }

    #[test]
    fn test_transient_wins_over_token_wording() {
        let failure = classify_response(
            500,
            r#"{"error":{"message":"token service busy","code":2}}"#,
        );
        assert_eq!(failure.kind, FailureKind::Transient);
    }

    #[test]
    fn test_expired_token_by_message() {
        let failure = classify_response(
            400,
            r#"{"error":{"message":"Error validating access token: Session has EXPIRED","code":100}}"#,
        );
        assert_eq!(failure.kind, FailureKind::CredentialExpired);
        assert_eq!(failure.details, RECONNECT_MESSAGE);
    }

    #[test]
    fn test_invalid_token_by_code() {
        let failure = classify_response(401, r#"{"error":{"message":"Malformed","code":190}}"#);
        assert_eq!(failure.kind, FailureKind::CredentialExpired);
        assert_eq!(failure.details, RECONNECT_MESSAGE);
    }

    #[test]
    fn test_string_code() {
        let error = GraphError::from_value(&serde_json::json!({ "code": "190" })).unwrap();
        assert_eq!(error.code, Some(190));
    }

    #[test]
    fn test_generic_structured_error() {
        let failure = classify_response(
            400,
            r#"{"error":{"message":"(#100) Invalid parameter","code":100,"is_transient":false}}"#,
        );
        assert_eq!(failure.kind, FailureKind::Permanent);
        assert_eq!(failure.details, "(#100) Invalid parameter");
    }

    #[test]
    fn test_unparseable_body() {
        let failure = classify_response(502, "<html>Bad Gateway</html>");
        assert_eq!(failure.kind, FailureKind::Permanent);
        assert_eq!(failure.details, "<html>Bad Gateway</html>");

        let failure = classify_response(503, "   ");
        assert_eq!(failure.details, "HTTP 503");
    }

    #[test]
    fn test_json_without_error_object() {
        let failure = classify_response(404, r#"{"status":"missing"}"#);
        assert_eq!(failure.kind, FailureKind::Permanent);
        assert_eq!(failure.details, r#"{"status":"missing"}"#);
    }

    #[test]
    fn test_upstream_message_is_verbatim() {
        assert_eq!(
            upstream_message(400, r#"{"error":{"message":"Media ID is not available","code":9007}}"#),
            "Media ID is not available"
        );
        assert_eq!(upstream_message(500, ""), "HTTP 500");
    }
}
