//! Auction analysis pipeline.
//!
//! The pipeline ties the pieces together:
//!
//! 1. **Route** - validate the listing URL and pick the site adapter
//! 2. **Scrape** - read every lot from the listing
//! 3. **Value** - look up sold comparables per lot and compute a bid ceiling
//!
//! # Usage
//!
//! ```rust,ignore
//! use lot_scout::{AnalyzeOptions, Pipeline, ScoutConfig};
//!
//! let pipeline = Pipeline::from_config(&ScoutConfig::default())?;
//! let analysis = pipeline
//!     .analyze_auction("https://www.hibid.com/catalog/123", &AnalyzeOptions::default())
//!     .await?;
//!
//! for row in analysis.rows.iter().filter(|r| r.undervalued) {
//!     println!("{} {} max {:?}", row.lot_number, row.item_title, row.my_max_bid);
//! }
//! ```

pub mod analyze;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::comps::{ComparablePriceFetcher, JitterPacer};
use crate::error::Result;
use crate::fetchers::{FetcherExt, HttpFetcher};
use crate::security::{SecretString, UrlValidator};
use crate::sites::{AuctionSite, LotScraper, SourceRouter};
use crate::traits::fetcher::PageFetcher;
use crate::types::config::{AnalyzeOptions, ScoutConfig};
use crate::types::lot::{AnalysisRow, ComparableResult};
use crate::types::outcome::{ScrapeOutcome, ScrapeStatus};

pub use analyze::Analyzer;

/// Rows for one analyzed auction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionAnalysis {
    pub site: AuctionSite,
    pub rows: Vec<AnalysisRow>,
    pub pages_fetched: usize,
    pub scrape_status: ScrapeStatus,
}

/// Routes, scrapes and values auction listings.
pub struct Pipeline {
    router: SourceRouter,
    analyzer: Analyzer,
}

impl Pipeline {
    pub fn new(router: SourceRouter, analyzer: Analyzer) -> Self {
        Self { router, analyzer }
    }

    /// Build the production pipeline.
    ///
    /// Listing pages go through a per-host rate limiter; marketplace searches
    /// share the same HTTP client but are paced with random jitter instead.
    pub fn from_config(config: &ScoutConfig) -> Result<Self> {
        let http = Arc::new(
            HttpFetcher::builder()
                .user_agent(config.user_agent.clone())
                .timeout_secs(config.request_timeout_secs)
                .build()?,
        );

        let listing_fetcher: Arc<dyn PageFetcher> =
            Arc::new(http.clone().rate_limited(config.listing_requests_per_second));
        let scraper = LotScraper::new(listing_fetcher).with_max_pages(config.effective_max_pages());

        let comps = ComparablePriceFetcher::new(http)
            .with_pacer(Arc::new(JitterPacer::from_millis(
                config.comps_delay_min_ms,
                config.comps_delay_max_ms,
            )))
            .with_credentials(config.ebay_app_id.clone().map(SecretString::from));

        info!(
            max_pages = scraper.max_pages(),
            max_concurrent_lots = config.max_concurrent_lots,
            api_credentials = comps.has_credentials(),
            "Pipeline configured"
        );

        let analyzer = Analyzer::new(Arc::new(comps)).with_max_concurrent(config.max_concurrent_lots);
        Ok(Self::new(
            SourceRouter::new(scraper, UrlValidator::new()),
            analyzer,
        ))
    }

    /// Scrape a listing and value every lot on it.
    ///
    /// Fails only when the URL is invalid, blocked or unsupported. Fetch
    /// failures shorten the row list and are reported in `scrape_status`.
    pub async fn analyze_auction(
        &self,
        listing_url: &str,
        options: &AnalyzeOptions,
    ) -> Result<AuctionAnalysis> {
        let scrape = self.router.scrape(listing_url).await?;
        if scrape.failed_before_any_lot() {
            warn!(site = %scrape.site, status = ?scrape.status, "No lots scraped");
        }

        let ScrapeOutcome {
            site,
            lots,
            pages_fetched,
            status,
        } = scrape;

        let rows = self.analyzer.analyze_lots(lots, options).await;
        let valued = rows.iter().filter(|r| r.is_valued()).count();
        let undervalued = rows.iter().filter(|r| r.undervalued).count();
        info!(site = %site, rows = rows.len(), valued, undervalued, "Auction analyzed");

        Ok(AuctionAnalysis {
            site,
            rows,
            pages_fetched,
            scrape_status: status,
        })
    }

    /// Scrape a listing without valuing it.
    pub async fn scrape_auction(&self, listing_url: &str) -> Result<ScrapeOutcome> {
        self.router.scrape(listing_url).await
    }

    /// Sold comparables for free-standing titles.
    pub async fn lookup_comparables(
        &self,
        titles: Vec<String>,
        options: &AnalyzeOptions,
    ) -> Vec<ComparableResult> {
        self.analyzer.lookup_comparables(titles, options).await
    }
}
