//! HTTP source fetching.
//!
//! Boot-time retrieval of the remote program's source text over plain HTTP.
//! The fetch happens exactly once per session, so a blocking client moved to
//! a blocking thread is a better fit than pulling a full async HTTP stack
//! into the dependency tree.

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::{FetchError, SourceFetcher};

/// Fetches program source with a blocking HTTP client on a blocking thread.
#[derive(Debug, Clone, Default)]
pub struct HttpSource;

impl HttpSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SourceFetcher for HttpSource {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!(url = %url, "fetching program source");
        let url = url.to_string();
        let join = tokio::task::spawn_blocking(move || fetch_blocking(&url));
        match join.await {
            Ok(result) => result,
            Err(e) => Err(FetchError::Io(format!("fetch task failed: {e}"))),
        }
    }
}

fn fetch_blocking(url: &str) -> Result<String, FetchError> {
    let response = ureq::get(url).call().map_err(|e| match e {
        ureq::Error::Status(code, _) => FetchError::Status {
            code,
            url: url.to_string(),
        },
        ureq::Error::Transport(t) => FetchError::Http(t.to_string()),
    })?;
    response
        .into_string()
        .map_err(|e| FetchError::Io(e.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
