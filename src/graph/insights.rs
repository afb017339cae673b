//! Insights aggregation.
//!
//! Each metric resolves to one integer: the pre-aggregated `total_value` if the
//! API sent one, otherwise the sum of its per-period `values`. An empty series
//! sums to 0.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Deserialize;
use serde_json::Value;

use crate::graph::types::InsightMetrics;

/// Account metrics requested by `account_insights`.
pub const ACCOUNT_METRICS: &[&str] = &["reach", "accounts_engaged", "impressions"];

/// Default per-media metrics.
pub const DEFAULT_MEDIA_METRICS: &[&str] = &["reach", "impressions", "engagement"];

const SECONDS_PER_DAY: u64 = 86_400;

#[derive(Debug, Deserialize)]
pub(crate) struct InsightsResponse {
    #[serde(default)]
    pub data: Vec<InsightEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InsightEntry {
    pub name: String,
    #[serde(default)]
    pub values: Vec<InsightValue>,
    #[serde(default)]
    pub total_value: Option<InsightValue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InsightValue {
    #[serde(default)]
    pub value: Value,
}

/// Numeric view of a metric value; non-numeric values count as 0.
fn numeric(value: &Value) -> i64 {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f.round() as i64))
        .unwrap_or(0)
}

impl InsightEntry {
    pub fn aggregate(&self) -> i64 {
        match &self.total_value {
            Some(total) => numeric(&total.value),
            None => self.values.iter().map(|v| numeric(&v.value)).sum(),
        }
    }
}

/// Aggregate every entry whose name is in `wanted`; others are ignored.
pub(crate) fn aggregate_metrics(response: &InsightsResponse, wanted: &[&str]) -> InsightMetrics {
    let mut metrics = InsightMetrics::new();
    for entry in &response.data {
        if wanted.contains(&entry.name.as_str()) {
            metrics.insert(entry.name.clone(), entry.aggregate());
        } else {
            tracing::debug!(metric = %entry.name, "Ignoring unrequested insight metric");
        }
    }
    metrics
}

/// A `since`/`until` pair in Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsightWindow {
    pub since: u64,
    pub until: u64,
}

impl InsightWindow {
    /// Window of `days` ending at `now`.
    pub fn trailing_days(days: u32, now: u64) -> Self {
        Self {
            since: now.saturating_sub(u64::from(days) * SECONDS_PER_DAY),
            until: now,
        }
    }

    /// Window of `days` ending at the current time.
    pub fn trailing_days_from_now(days: u32) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self::trailing_days(days, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> InsightsResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_total_value_wins() {
        let resp = response(json!({ "data": [
            { "name": "reach", "total_value": { "value": 500 }, "values": [{ "value": 1 }, { "value": 2 }] }
        ]}));
        assert_eq!(aggregate_metrics(&resp, ACCOUNT_METRICS).get("reach"), Some(500));
    }

    #[test]
    fn test_series_is_summed() {
        let resp = response(json!({ "data": [
            { "name": "impressions", "period": "day", "values": [
                { "value": 10, "end_time": "2024-05-01T07:00:00+0000" },
                { "value": 15, "end_time": "2024-05-02T07:00:00+0000" },
                { "value": 5 }
            ]}
        ]}));
        assert_eq!(aggregate_metrics(&resp, ACCOUNT_METRICS).get("impressions"), Some(30));
    }

    #[test]
    fn test_empty_series_is_zero() {
        let resp = response(json!({ "data": [{ "name": "accounts_engaged", "values": [] }] }));
        assert_eq!(aggregate_metrics(&resp, ACCOUNT_METRICS).get("accounts_engaged"), Some(0));
    }

    #[test]
    fn test_unknown_metrics_ignored() {
        let resp = response(json!({ "data": [
            { "name": "reach", "values": [{ "value": 3 }] },
            { "name": "follower_demographics", "values": [{ "value": { "US": 4 } }] }
        ]}));
        let metrics = aggregate_metrics(&resp, ACCOUNT_METRICS);
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics.get("follower_demographics"), None);
    }

    #[test]
    fn test_partial_media_metrics() {
        let resp = response(json!({ "data": [{ "name": "reach", "values": [{ "value": 42 }] }] }));
        let metrics = aggregate_metrics(&resp, DEFAULT_MEDIA_METRICS);
        assert_eq!(metrics.get("reach"), Some(42));
        assert_eq!(metrics.get("impressions"), None);
    }

    #[test]
    fn test_trailing_window() {
        let window = InsightWindow::trailing_days(7, 1_700_000_000);
        assert_eq!(window.until, 1_700_000_000);
        assert_eq!(window.since, 1_700_000_000 - 7 * 86_400);
    }
}
