//! Rate-limited fetcher wrapper.
//!
//! Wraps any PageFetcher with a per-host rate limit using the governor crate,
//! so paginating one auction site never bursts it.

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::trace;

use crate::error::CrawlResult;
use crate::traits::fetcher::{FetchedPage, PageFetcher};

type HostRateLimiter = RateLimiter<
    String,
    governor::state::keyed::DefaultKeyedStateStore<String>,
    governor::clock::DefaultClock,
>;

/// A fetcher wrapper that enforces a request rate per host.
pub struct RateLimitedFetcher<F: PageFetcher> {
    inner: F,
    limiter: Arc<HostRateLimiter>,
}

impl<F: PageFetcher> RateLimitedFetcher<F> {
    /// Create a new rate-limited fetcher.
    ///
    /// A rate of 0 is treated as 1 request per second.
    pub fn new(fetcher: F, requests_per_second: u32) -> Self {
        let rate = NonZeroU32::new(requests_per_second).unwrap_or(nonzero!(1u32));
        Self::with_quota(fetcher, Quota::per_second(rate))
    }

    /// Create with a custom quota.
    pub fn with_quota(fetcher: F, quota: Quota) -> Self {
        Self {
            inner: fetcher,
            limiter: Arc::new(RateLimiter::keyed(quota)),
        }
    }

    /// Wait for the host's rate limiter before proceeding.
    async fn wait_for_permit(&self, url: &str) {
        let host = host_key(url);
        trace!(host = %host, "Waiting for rate limit permit");
        self.limiter.until_key_ready(&host).await;
    }
}

/// Rate-limit key for a URL: its host, or the raw string when unparseable.
fn host_key(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
        .unwrap_or_else(|| url.to_string())
}

#[async_trait]
impl<F: PageFetcher> PageFetcher for RateLimitedFetcher<F> {
    async fn fetch(&self, url: &str) -> CrawlResult<FetchedPage> {
        self.wait_for_permit(url).await;
        self.inner.fetch(url).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Extension trait for easy rate limiting.
pub trait FetcherExt: PageFetcher + Sized {
    /// Wrap this fetcher with a per-host rate limit.
    fn rate_limited(self, requests_per_second: u32) -> RateLimitedFetcher<Self> {
        RateLimitedFetcher::new(self, requests_per_second)
    }
}

impl<F: PageFetcher + Sized> FetcherExt for F {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFetcher;
    use std::time::Instant;

    #[tokio::test]
    async fn test_rate_limiting_same_host() {
        let mock = MockFetcher::new()
            .with_html("https://example.com/1", "Page 1")
            .with_html("https://example.com/2", "Page 2")
            .with_html("https://example.com/3", "Page 3");

        // 2 requests per second
        let fetcher = mock.clone().rate_limited(2);

        let start = Instant::now();
        for url in ["https://example.com/1", "https://example.com/2", "https://example.com/3"] {
            fetcher.fetch(url).await.unwrap();
        }
        let elapsed = start.elapsed();

        assert_eq!(mock.fetch_count(), 3);
        // Burst of two, then the third waits for a ~500ms replenish
        assert!(elapsed.as_millis() >= 400, "Rate limiting not working: {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_hosts_are_limited_independently() {
        let mock = MockFetcher::new()
            .with_html("https://a.example.com/", "A")
            .with_html("https://b.example.com/", "B");

        let fetcher = mock.rate_limited(1);

        let start = Instant::now();
        fetcher.fetch("https://a.example.com/").await.unwrap();
        fetcher.fetch("https://b.example.com/").await.unwrap();

        assert!(start.elapsed().as_millis() < 500);
    }

    #[test]
    fn test_host_key() {
        assert_eq!(host_key("https://WWW.HiBid.com/catalog?page=2"), "www.hibid.com");
        assert_eq!(host_key("garbage"), "garbage");
    }

    #[tokio::test]
    async fn test_zero_rate_falls_back_to_one() {
        let fetcher = MockFetcher::new()
            .with_html("https://example.com/", "ok")
            .rate_limited(0);
        assert!(fetcher.fetch("https://example.com/").await.is_ok());
    }
}
