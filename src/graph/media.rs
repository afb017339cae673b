//! Media listing: field selection, page size and cursor extraction.

use serde::Deserialize;

use crate::config::MediaConfig;
use crate::graph::types::{MediaItem, MediaPage};

/// Fields requested for every media item.
pub const MEDIA_FIELDS: &str =
    "id,media_type,media_url,permalink,caption,timestamp,like_count,comments_count";

#[derive(Debug, Deserialize)]
pub(crate) struct MediaListResponse {
    #[serde(default)]
    pub data: Vec<MediaItem>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Paging {
    #[serde(default)]
    pub cursors: Option<Cursors>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Cursors {
    #[serde(default)]
    pub after: Option<String>,
}

impl MediaListResponse {
    /// The `after` cursor, but only while upstream still links a next page.
    ///
    /// The final page carries cursors too; `paging.next` is what marks more data.
    fn next_cursor(&self) -> Option<String> {
        let paging = self.paging.as_ref()?;
        paging.next.as_ref()?;
        paging
            .cursors
            .as_ref()?
            .after
            .clone()
            .filter(|c| !c.is_empty())
    }

    pub fn into_page(self) -> MediaPage {
        let next_cursor = self.next_cursor();
        MediaPage {
            items: self.data,
            next_cursor,
        }
    }
}

/// Effective page size: the caller's limit, or the default, clamped to the maximum.
pub fn page_size(requested: Option<u32>, config: &MediaConfig) -> u32 {
    requested
        .unwrap_or(config.default_page_size)
        .clamp(1, config.max_page_size.max(1))
}
