//! Tennessee General Assembly legislator directory.
//!
//! The directory is scraped fresh on every lookup; nothing is cached.
//!
//! # Architecture
//!
//! - [`DirectorySource`] - Trait for fetching a chamber's raw HTML page
//! - [`HttpDirectorySource`] - Real HTTP implementation using reqwest
//! - [`DirectoryParser`] - Turns a page into [`LegislatorRecord`]s
//! - [`LegislatorDirectory`] - Fetches both chambers concurrently
//!
//! A chamber whose page cannot be fetched contributes an empty list; the
//! other chamber's records are still returned.

mod parse;
mod types;

pub use parse::DirectoryParser;
pub use types::{ContactInfo, LegislatorRecord, Party};

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tn_districts::Chamber;

use crate::error::NetworkError;
use crate::http::{get_checked, relay_url};

/// Errors from fetching or parsing a directory page.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The page could not be fetched
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// A card selector failed to compile
    #[error("invalid selector {0}")]
    Selector(String),
}

impl From<reqwest::Error> for DirectoryError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(NetworkError::Request(err))
    }
}

/// Source of raw directory HTML.
#[async_trait]
pub trait DirectorySource: Send + Sync {
    /// Fetch the HTML page listing every member of `chamber`.
    async fn fetch_page(&self, chamber: Chamber) -> Result<String, DirectoryError>;
}

/// Fetches directory pages over HTTP, optionally through a CORS relay.
pub struct HttpDirectorySource {
    client: reqwest::Client,
    senate_url: String,
    house_url: String,
    relay: Option<String>,
}

impl HttpDirectorySource {
    pub fn new(
        client: reqwest::Client,
        senate_url: impl Into<String>,
        house_url: impl Into<String>,
        relay: Option<String>,
    ) -> Self {
        Self {
            client,
            senate_url: senate_url.into(),
            house_url: house_url.into(),
            relay,
        }
    }
}

#[async_trait]
impl DirectorySource for HttpDirectorySource {
    async fn fetch_page(&self, chamber: Chamber) -> Result<String, DirectoryError> {
        let target = match chamber {
            Chamber::Senate => &self.senate_url,
            Chamber::House => &self.house_url,
        };
        let url = relay_url(self.relay.as_deref(), target);
        let response = get_checked(&self.client, &url).await?;
        Ok(response.text().await?)
    }
}

/// Both chambers of the directory.
pub struct LegislatorDirectory {
    source: Arc<dyn DirectorySource>,
    senate: DirectoryParser,
    house: DirectoryParser,
}

impl LegislatorDirectory {
    /// Create a directory over `source`.
    ///
    /// # Errors
    /// Returns [`DirectoryError::Selector`] if a card selector fails to compile.
    pub fn new(
        source: Arc<dyn DirectorySource>,
        site_base_url: &str,
    ) -> Result<Self, DirectoryError> {
        Ok(Self {
            source,
            senate: DirectoryParser::new(Chamber::Senate, site_base_url)?,
            house: DirectoryParser::new(Chamber::House, site_base_url)?,
        })
    }

    /// Fetch and parse one chamber. Fetch failures yield an empty list.
    pub async fn fetch_chamber(&self, chamber: Chamber) -> Vec<LegislatorRecord> {
        let parser = match chamber {
            Chamber::Senate => &self.senate,
            Chamber::House => &self.house,
        };
        match self.source.fetch_page(chamber).await {
            Ok(html) => {
                let records = parser.parse_page(&html);
                tracing::debug!(%chamber, count = records.len(), "parsed directory page");
                records
            }
            Err(e) => {
                tracing::warn!(
                    %chamber,
                    error = %e,
                    "directory fetch failed, continuing without this chamber"
                );
                Vec::new()
            }
        }
    }

    /// Fetch both chambers concurrently, senators first.
    pub async fn fetch_all(&self) -> Vec<LegislatorRecord> {
        let (senators, representatives) = tokio::join!(
            self.fetch_chamber(Chamber::Senate),
            self.fetch_chamber(Chamber::House)
        );
        tracing::info!(
            senators = senators.len(),
            representatives = representatives.len(),
            "legislator directory loaded"
        );
        senators.into_iter().chain(representatives).collect()
    }

    /// Look up a single legislator by record id (e.g. `"house-12"`).
    pub async fn find_by_id(&self, id: &str) -> Option<LegislatorRecord> {
        self.fetch_all().await.into_iter().find(|record| record.id == id)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::missing_const_for_fn,
    clippy::must_use_candidate
)]
pub mod mock {
    //! Mock implementation for unit testing.

    use super::{Chamber, DirectoryError, DirectorySource, NetworkError};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves preset HTML per chamber. A chamber with no page set fails
    /// with a 503, like an unreachable upstream.
    pub struct StaticDirectorySource {
        pages: Mutex<HashMap<Chamber, String>>,
        calls: Mutex<Vec<Chamber>>,
    }

    impl StaticDirectorySource {
        pub fn new() -> Self {
            Self {
                pages: Mutex::new(HashMap::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Serve `html` for `chamber`.
        pub fn with_page(self, chamber: Chamber, html: impl Into<String>) -> Self {
            self.pages.lock().unwrap().insert(chamber, html.into());
            self
        }

        /// Chambers requested so far.
        pub fn calls(&self) -> Vec<Chamber> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Default for StaticDirectorySource {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl DirectorySource for StaticDirectorySource {
        async fn fetch_page(&self, chamber: Chamber) -> Result<String, DirectoryError> {
            self.calls.lock().unwrap().push(chamber);
            self.pages.lock().unwrap().get(&chamber).cloned().ok_or_else(|| {
                DirectoryError::Network(NetworkError::Status {
                    status: 503,
                    message: "unavailable".into(),
                })
            })
        }
    }
}
