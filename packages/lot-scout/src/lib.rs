//! Auction Lot Scout
//!
//! Scrapes lot listings from online auction sites, looks up recently sold
//! comparables on the marketplace for each lot, and recommends a maximum bid.
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
//! let csv = lot_scout::rows_to_csv(&analysis.rows);
//! ```
//!
//! # Modules
//!
//! - [`sites`] - Site adapters, listing strategies and URL routing
//! - [`comps`] - Sold comparable lookup and request pacing
//! - [`valuation`] - Trimmed-median value and bid ceiling
//! - [`pipeline`] - End-to-end auction analysis
//! - [`fetchers`] - HTTP and rate-limited page fetchers
//! - [`security`] - Credential handling and SSRF protection
//! - [`testing`] - Mock implementations for testing

pub mod comps;
pub mod currency;
pub mod error;
pub mod export;
pub mod fetchers;
pub mod pipeline;
pub mod security;
pub mod sites;
pub mod testing;
pub mod title;
pub mod traits;
pub mod types;
pub mod valuation;

// Re-export core types at crate root
pub use error::{CompsError, CrawlError, Result, ScoutError, SecurityError};
pub use traits::{comps::ComparablePrices, fetcher::PageFetcher, pacer::RequestPacer};
pub use types::{
    config::{AnalyzeOptions, ScoutConfig, MAX_LISTING_PAGES},
    lot::{AnalysisRow, ComparableResult, Lot},
    outcome::{CompsOutcome, CompsSource, CompsStatus, ScrapeOutcome, ScrapeStatus},
};

// Re-export pipeline components
pub use pipeline::{Analyzer, AuctionAnalysis, Pipeline};

pub use comps::{ComparablePriceFetcher, JitterPacer, NoDelay};
pub use currency::parse_currency;
pub use export::rows_to_csv;
pub use fetchers::{FetchedPage, FetcherExt, HttpFetcher, RateLimitedFetcher};
pub use security::{SecretString, UrlValidator};
pub use sites::{AuctionSite, LotScraper, PageStrategy, SourceRouter};
pub use title::{clean_title, ebay_sold_link, search_title};
pub use valuation::{bid_ceiling, estimate_value, is_undervalued, Valuation};

// Re-export testing utilities
pub use testing::{MockComps, MockFetcher};
