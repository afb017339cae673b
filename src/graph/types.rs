//! Graph API domain types.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiFailure;

/// Profile summary for the connected account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub media_count: u64,
}

impl AccountInfo {
    /// Display name, falling back to the username and then the id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.username.as_deref())
            .unwrap_or(&self.id)
    }
}

/// Kind of a published media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaKind {
    Image,
    Video,
    CarouselAlbum,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::CarouselAlbum => "carousel_album",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// A media item as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    #[serde(rename = "media_type", default)]
    pub kind: MediaKind,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    /// ISO-8601 creation time, as sent upstream.
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub like_count: u64,
    #[serde(rename = "comments_count", default)]
    pub comment_count: u64,
}

/// One page of a media listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaPage {
    pub items: Vec<MediaItem>,
    /// Cursor for the next page; `None` means the listing is exhausted.
    pub next_cursor: Option<String>,
}

/// Parameters of a single listing call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaQuery {
    pub limit: Option<u32>,
    pub after: Option<String>,
}

impl MediaQuery {
    pub fn first_page(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            after: None,
        }
    }

    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }
}

/// Sparse metric name → value mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InsightMetrics(BTreeMap<String, i64>);

impl InsightMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: i64) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Account-level insights over a trailing window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountInsights {
    pub metrics: InsightMetrics,
    /// Window start, Unix seconds.
    pub since: u64,
    /// Window end, Unix seconds.
    pub until: u64,
}

impl AccountInsights {
    pub fn reach(&self) -> Option<i64> {
        self.metrics.get("reach")
    }

    pub fn accounts_engaged(&self) -> Option<i64> {
        self.metrics.get("accounts_engaged")
    }

    pub fn impressions(&self) -> Option<i64> {
        self.metrics.get("impressions")
    }
}

/// Input to the publish workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRequest {
    pub image_url: String,
    #[serde(default)]
    pub caption: Option<String>,
}

impl PublishRequest {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// Result of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedMedia {
    pub media_id: String,
}

/// Decode a response body into a typed value.
pub(crate) fn decode<T: DeserializeOwned>(body: Value) -> Result<T, ApiFailure> {
    serde_json::from_value(body)
        .map_err(|e| ApiFailure::permanent(format!("unexpected response shape: {}", e)))
}

/// Extract the `id` field every create-style endpoint returns.
pub(crate) fn response_id(body: &Value) -> Option<String> {
    match body.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_media_item_decoding() {
        let item: MediaItem = decode(json!({
            "id": "179",
            "media_type": "CAROUSEL_ALBUM",
            "permalink": "https://instagram.com/p/abc",
            "like_count": 12,
            "comments_count": 3
        }))
        .unwrap();

        assert_eq!(item.kind, MediaKind::CarouselAlbum);
        assert_eq!(item.comment_count, 3);
        assert_eq!(item.media_url, None);
    }

    #[test]
    fn test_unknown_media_kind() {
        let item: MediaItem = decode(json!({ "id": "1", "media_type": "REELS" })).unwrap();
        assert_eq!(item.kind, MediaKind::Unknown);

        let item: MediaItem = decode(json!({ "id": "2" })).unwrap();
        assert_eq!(item.kind, MediaKind::Unknown);
        assert_eq!(item.like_count, 0);
    }

    #[test]
    fn test_display_name_fallback() {
        let mut info: AccountInfo = decode(json!({ "id": "1", "username": "acme" })).unwrap();
        assert_eq!(info.display_name(), "acme");
        info.name = Some("Acme Ltd".into());
        assert_eq!(info.display_name(), "Acme Ltd");
    }

    #[test]
    fn test_decode_shape_error() {
        let err = decode::<AccountInfo>(json!({ "username": "no id" })).unwrap_err();
        assert!(err.details.starts_with("unexpected response shape"));
    }

    #[test]
    fn test_response_id() {
        assert_eq!(response_id(&json!({ "id": "C1" })).as_deref(), Some("C1"));
        assert_eq!(response_id(&json!({ "id": 42 })).as_deref(), Some("42"));
        assert_eq!(response_id(&json!({ "id": "" })), None);
        assert_eq!(response_id(&json!({})), None);
    }

    #[test]
    fn test_metrics_serialize_flat() {
        let mut metrics = InsightMetrics::new();
        metrics.insert("reach", 10);
        assert_eq!(serde_json::to_value(&metrics).unwrap(), json!({ "reach": 10 }));
    }
}
