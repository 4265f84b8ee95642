//! An in-memory source fetcher.
//!
//! Used by tests and by embedders that ship the remote program alongside the
//! host binary instead of serving it over HTTP.

use async_trait::async_trait;

use crate::application::ports::{FetchError, SourceFetcher};

/// Serves a fixed source text regardless of the requested URL.
#[derive(Debug, Clone)]
pub struct StaticSource {
    source: String,
}

impl StaticSource {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

#[async_trait]
impl SourceFetcher for StaticSource {
    async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
        Ok(self.source.clone())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
