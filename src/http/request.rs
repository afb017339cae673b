//! Outbound request description.
//!
//! # Design Decisions
//! - The bearer token travels as the `access_token` query parameter, added by
//!   the transport, so `url` is always safe to log
//! - Path segments are percent-encoded individually

use std::fmt;

use url::Url;

use crate::error::ApiFailure;

/// Query parameter carrying the bearer token.
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
        }
    }
}

/// One authenticated call against the graph API.
#[derive(Clone, PartialEq, Eq)]
pub struct GraphRequest {
    pub method: HttpMethod,
    /// Endpoint with every parameter except the token.
    pub url: Url,
    pub access_token: String,
}

impl GraphRequest {
    /// Build a request for `path` (e.g. `"17841/media"`) under `base`.
    pub fn build(
        method: HttpMethod,
        base: &Url,
        path: &str,
        access_token: &str,
        params: &[(&str, String)],
    ) -> Result<Self, ApiFailure> {
        let mut url = base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiFailure::permanent(format!("base URL '{}' cannot hold a path", base)))?;
            segments.pop_if_empty();
            for segment in path.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
        }
        if !params.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }

        Ok(Self {
            method,
            url,
            access_token: access_token.to_string(),
        })
    }

    /// Value of a query parameter, if set.
    pub fn param(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

impl fmt::Debug for GraphRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("access_token", &"<redacted>")
            .finish()
    }
}
