//! Per-operation spans.

use tracing::Span;
use uuid::Uuid;

use crate::credentials::OrgId;

/// Open a span for one public operation, tagged with a fresh operation ID.
pub fn operation_span(operation: &'static str, org_id: &OrgId) -> Span {
    let operation_id = Uuid::new_v4();
    tracing::info_span!(
        "graph_operation",
        operation = operation,
        org_id = %org_id,
        operation_id = %operation_id
    )
}
