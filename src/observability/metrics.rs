//! Metrics collection.
//!
//! # Metrics
//! - `graph_requests_total` (counter): upstream calls by operation, outcome
//! - `graph_retries_total` (counter): retries by operation
//! - `graph_publish_orphaned_containers_total` (counter): created but never published
//! - `graph_credentials_unavailable_total` (counter): resolver misses by cause
//!
//! Without an installed recorder these are no-ops.

use metrics::counter;

pub fn record_request(operation: &'static str, outcome: &'static str) {
    counter!("graph_requests_total", "operation" => operation, "outcome" => outcome).increment(1);
}

pub fn record_retry(operation: &'static str) {
    counter!("graph_retries_total", "operation" => operation).increment(1);
}

pub fn record_orphaned_container() {
    counter!("graph_publish_orphaned_containers_total").increment(1);
}

pub fn record_credentials_unavailable(cause: &'static str) {
    counter!("graph_credentials_unavailable_total", "cause" => cause).increment(1);
}
