//! HTTP-based page fetcher.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{CrawlError, CrawlResult};
use crate::traits::fetcher::{FetchedPage, PageFetcher};

/// Default browser-like user agent; several auction sites reject bot agents.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Fetcher backed by a `reqwest` client.
///
/// # Example
///
/// ```rust,ignore
/// use lot_scout::fetchers::HttpFetcher;
///
/// let fetcher = HttpFetcher::builder().timeout_secs(10).build()?;
/// let page = fetcher.fetch("https://www.hibid.com/catalog/123").await?;
/// ```
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with default settings.
    pub fn new() -> CrawlResult<Self> {
        HttpFetcherBuilder::default().build()
    }

    /// Start building a fetcher.
    pub fn builder() -> HttpFetcherBuilder {
        HttpFetcherBuilder::default()
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> CrawlResult<FetchedPage> {
        debug!(url = %url, "HTTP fetch starting");
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "HTTP request failed");
            if e.is_timeout() {
                CrawlError::Timeout {
                    url: url.to_string(),
                }
            } else {
                CrawlError::Http(Box::new(e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Capture final URL after redirects
        let final_url = response.url().to_string();

        let html = response
            .text()
            .await
            .map_err(|e| CrawlError::Http(Box::new(e)))?;

        debug!(url = %url, bytes = html.len(), "HTTP fetch complete");

        Ok(FetchedPage::new(url, html)
            .with_final_url(final_url)
            .with_status(status.as_u16()))
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Builder for [`HttpFetcher`].
pub struct HttpFetcherBuilder {
    user_agent: String,
    timeout: Duration,
    max_redirects: usize,
}

impl Default for HttpFetcherBuilder {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            max_redirects: 5,
        }
    }
}

impl HttpFetcherBuilder {
    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the per-request timeout. Zero is raised to one second.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs.max(1));
        self
    }

    /// Set how many redirects are followed.
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Build the fetcher.
    pub fn build(self) -> CrawlResult<HttpFetcher> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US,en;q=0.5"),
        );

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(self.max_redirects))
            .build()
            .map_err(|e| CrawlError::Http(Box::new(e)))?;

        Ok(HttpFetcher { client })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_builds() {
        let fetcher = HttpFetcher::builder()
            .user_agent("lot-scout-test")
            .timeout_secs(5)
            .max_redirects(2)
            .build();
        assert!(fetcher.is_ok());
        assert_eq!(fetcher.unwrap().name(), "http");
    }

    #[test]
    fn test_zero_timeout_is_raised() {
        let builder = HttpFetcher::builder().timeout_secs(0);
        assert_eq!(builder.timeout, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_invalid_url_is_an_error() {
        let fetcher = HttpFetcher::new().unwrap();
        let result = fetcher.fetch("not a url").await;
        assert!(result.is_err());
    }
}
