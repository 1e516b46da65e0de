//! Page fetcher trait.
//!
//! Everything that touches the network (auction listings and marketplace
//! searches) goes through a [`PageFetcher`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::error::CrawlResult;

/// Raw HTML for one fetched URL.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested
    pub url: String,

    /// URL after redirects
    pub final_url: String,

    /// HTTP status code
    pub status: u16,

    /// Response body
    pub html: String,

    /// When the page was fetched
    pub fetched_at: DateTime<Utc>,
}

impl FetchedPage {
    /// Create a successful page with no redirect.
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            final_url: url.clone(),
            url,
            status: 200,
            html: html.into(),
            fetched_at: Utc::now(),
        }
    }

    /// Set the status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Set the URL reached after redirects.
    pub fn with_final_url(mut self, final_url: impl Into<String>) -> Self {
        self.final_url = final_url.into();
        self
    }
}

/// Fetches a single page.
///
/// Implementations return an error for transport failures and for
/// non-success statuses, so callers can treat every `Ok` as usable HTML.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one URL.
    async fn fetch(&self, url: &str) -> CrawlResult<FetchedPage>;

    /// Name for logging.
    fn name(&self) -> &str {
        "fetcher"
    }
}

#[async_trait]
impl<F: PageFetcher + ?Sized> PageFetcher for Arc<F> {
    async fn fetch(&self, url: &str) -> CrawlResult<FetchedPage> {
        (**self).fetch(url).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
