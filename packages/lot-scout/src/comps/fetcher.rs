//! Sold-listing price lookup against the marketplace search page.

use std::sync::Arc;

use async_trait::async_trait;
use lazy_static::lazy_static;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use crate::comps::pacing::JitterPacer;
use crate::currency::parse_currency;
use crate::error::{CompsError, CompsResult};
use crate::security::SecretString;
use crate::title::sold_search_url;
use crate::traits::comps::ComparablePrices;
use crate::traits::fetcher::PageFetcher;
use crate::traits::pacer::RequestPacer;
use crate::types::outcome::{CompsOutcome, CompsSource};

/// Results per search page requested from the marketplace.
pub const RESULTS_PER_PAGE: &str = "50";

lazy_static! {
    /// Price element selectors, current layout first.
    static ref PRICE_SELECTORS: Vec<Selector> = [".s-item__price", ".s-card__price"]
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect();
}

/// Fetches recently sold prices for a search phrase.
///
/// Failures never propagate: a lookup that cannot complete returns an empty
/// outcome with a `Failed` status.
pub struct ComparablePriceFetcher {
    fetcher: Arc<dyn PageFetcher>,
    pacer: Arc<dyn RequestPacer>,
    credentials: Option<SecretString>,
}

impl ComparablePriceFetcher {
    /// Create a fetcher that paces requests with the default jitter.
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            pacer: Arc::new(JitterPacer::default()),
            credentials: None,
        }
    }

    /// Replace the request pacer.
    pub fn with_pacer(mut self, pacer: Arc<dyn RequestPacer>) -> Self {
        self.pacer = pacer;
        self
    }

    /// Marketplace API credentials. Blank values are ignored.
    pub fn with_credentials(mut self, credentials: Option<SecretString>) -> Self {
        self.credentials = credentials.filter(|c| !c.is_empty());
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Sold prices via the marketplace API.
    async fn fetch_via_api(
        &self,
        query: &str,
        _credentials: &SecretString,
    ) -> CompsResult<Vec<f64>> {
        debug!(query = %query, "Marketplace API lookup requested");
        Err(CompsError::ApiUnavailable)
    }

    async fn fetch_via_scrape(&self, query: &str, count: usize) -> CompsResult<Vec<f64>> {
        let url = sold_search_url(query, &[("_ipg", RESULTS_PER_PAGE)]);
        let page = self.fetcher.fetch(&url).await?;
        Ok(parse_sold_prices(&page.html, count))
    }
}

#[async_trait]
impl ComparablePrices for ComparablePriceFetcher {
    async fn sold_prices(&self, query: &str, count: usize) -> CompsResult<CompsOutcome> {
        if count == 0 {
            return Ok(CompsOutcome::scraped(Vec::new()));
        }

        self.pacer.pause().await;

        if let Some(credentials) = &self.credentials {
            match self.fetch_via_api(query, credentials).await {
                Ok(mut samples) => {
                    samples.truncate(count);
                    return Ok(CompsOutcome {
                        source: CompsSource::Api,
                        ..CompsOutcome::scraped(samples)
                    });
                }
                Err(e) => {
                    warn!(query = %query, error = %e, "API lookup failed, falling back to scraping");
                }
            }
        }

        match self.fetch_via_scrape(query, count).await {
            Ok(samples) => {
                info!(query = %query, samples = samples.len(), "Fetched sold prices");
                Ok(CompsOutcome::scraped(samples))
            }
            Err(e) => {
                warn!(query = %query, error = %e, "Sold price lookup failed");
                Ok(CompsOutcome::failed(CompsSource::Scrape, e.to_string()))
            }
        }
    }
}

/// Up to `count` positive prices from a sold-listings results page.
///
/// Elements whose text does not parse to a positive amount are skipped and do
/// not count towards `count`.
pub fn parse_sold_prices(html: &str, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }

    let document = Html::parse_document(html);
    let Some(elements) = PRICE_SELECTORS
        .iter()
        .map(|selector| document.select(selector).collect::<Vec<_>>())
        .find(|found| !found.is_empty())
    else {
        return Vec::new();
    };

    elements
        .into_iter()
        .filter_map(|element| parse_currency(&element.text().collect::<String>()))
        .filter(|price| *price > 0.0)
        .take(count)
        .collect()
}
