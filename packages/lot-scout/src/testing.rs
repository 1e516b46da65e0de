//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the lot scout library
//! without touching auction sites or the marketplace.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::error::{CompsError, CompsResult, CrawlError, CrawlResult};
use crate::traits::comps::ComparablePrices;
use crate::traits::fetcher::{FetchedPage, PageFetcher};
use crate::types::outcome::CompsOutcome;

#[derive(Debug, Clone)]
enum MockResponse {
    Html(String),
    Status(u16),
    Fail,
}

/// A mock page fetcher for testing.
///
/// Clones share state, so a test can keep one handle for assertions while
/// the code under test owns another.
#[derive(Clone, Default)]
pub struct MockFetcher {
    /// Responses by exact URL
    responses: Arc<RwLock<HashMap<String, MockResponse>>>,

    /// Body served for URLs with no explicit response
    default_html: Arc<RwLock<Option<String>>>,

    /// URLs fetched, in order
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    /// Create a mock that answers 404 for every URL.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`.
    pub fn with_html(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), MockResponse::Html(html.into()));
        self
    }

    /// Answer `url` with a non-success status.
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), MockResponse::Status(status));
        self
    }

    /// Fail `url` with a transport error.
    pub fn fail_url(self, url: impl Into<String>) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), MockResponse::Fail);
        self
    }

    /// Serve `html` for every URL without an explicit response.
    pub fn with_default_html(self, html: impl Into<String>) -> Self {
        *self.default_html.write().unwrap() = Some(html.into());
        self
    }

    /// All URLs fetched so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> CrawlResult<FetchedPage> {
        self.calls.write().unwrap().push(url.to_string());

        let response = self.responses.read().unwrap().get(url).cloned();
        let response = response.or_else(|| {
            self.default_html
                .read()
                .unwrap()
                .clone()
                .map(MockResponse::Html)
        });

        match response {
            Some(MockResponse::Html(html)) => Ok(FetchedPage::new(url, html)),
            Some(MockResponse::Status(status)) => Err(CrawlError::Status {
                url: url.to_string(),
                status,
            }),
            Some(MockResponse::Fail) => Err(CrawlError::Http("connection reset".into())),
            None => Err(CrawlError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A mock comparable-price source for testing.
///
/// Unknown queries return an empty outcome.
#[derive(Clone, Default)]
pub struct MockComps {
    /// Sold prices by search phrase
    prices: Arc<RwLock<HashMap<String, Vec<f64>>>>,

    /// Queries that return an error
    failing: Arc<RwLock<HashSet<String>>>,

    /// Queries that panic
    panicking: Arc<RwLock<HashSet<String>>>,

    /// Queries received, in order
    calls: Arc<RwLock<Vec<MockCompsCall>>>,
}

/// Record of a lookup made against the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct MockCompsCall {
    pub query: String,
    pub count: usize,
}

impl MockComps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with these prices.
    pub fn with_prices(self, query: impl Into<String>, prices: Vec<f64>) -> Self {
        self.prices.write().unwrap().insert(query.into(), prices);
        self
    }

    /// Return an error for `query`.
    pub fn failing(self, query: impl Into<String>) -> Self {
        self.failing.write().unwrap().insert(query.into());
        self
    }

    /// Panic when `query` is looked up.
    pub fn panicking(self, query: impl Into<String>) -> Self {
        self.panicking.write().unwrap().insert(query.into());
        self
    }

    /// All lookups made so far.
    pub fn calls(&self) -> Vec<MockCompsCall> {
        self.calls.read().unwrap().clone()
    }

    /// Search phrases looked up so far.
    pub fn queries(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.query).collect()
    }
}

#[async_trait]
impl ComparablePrices for MockComps {
    async fn sold_prices(&self, query: &str, count: usize) -> CompsResult<CompsOutcome> {
        self.calls.write().unwrap().push(MockCompsCall {
            query: query.to_string(),
            count,
        });

        if self.panicking.read().unwrap().contains(query) {
            panic!("mock comps panic for {}", query);
        }

        if self.failing.read().unwrap().contains(query) {
            return Err(CompsError::Fetch(CrawlError::Timeout {
                url: format!("mock://comps/{}", query),
            }));
        }

        let mut samples = self
            .prices
            .read()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default();
        samples.truncate(count);

        Ok(CompsOutcome::scraped(samples))
    }
}
