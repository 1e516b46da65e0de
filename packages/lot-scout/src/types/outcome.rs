//! Recoverable outcomes of scraping and comparable lookups.
//!
//! Adapters and the comparable fetcher never fail outright. These types let
//! callers (and tests) tell an empty result caused by missing markup apart
//! from one caused by a failed fetch.

use serde::{Deserialize, Serialize};

use crate::sites::AuctionSite;
use crate::types::lot::Lot;

/// Why a scrape stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ScrapeStatus {
    /// Single page read and it contained lot markup
    Complete,

    /// A page contained no lot markup. For paginated sites this is the
    /// normal end of the listing.
    NoMatches { page: usize },

    /// A fetch failed or returned a non-success status; earlier lots are kept
    FetchFailed { page: usize, error: String },

    /// Pagination hit the page cap
    PageLimit { pages: usize },
}

/// Lots gathered from one auction listing plus how the scrape ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeOutcome {
    pub site: AuctionSite,
    pub lots: Vec<Lot>,
    pub pages_fetched: usize,
    pub status: ScrapeStatus,
}

impl ScrapeOutcome {
    /// Whether the scrape ended on a failed fetch.
    pub fn is_failure(&self) -> bool {
        matches!(self.status, ScrapeStatus::FetchFailed { .. })
    }

    /// Whether the first page already failed, leaving nothing.
    pub fn failed_before_any_lot(&self) -> bool {
        self.is_failure() && self.lots.is_empty()
    }
}

/// Which path produced comparable prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompsSource {
    Api,
    Scrape,
}

/// How a comparable lookup ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CompsStatus {
    Found,
    NoMatches,
    Failed { error: String },
}

/// Sold prices for one search phrase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompsOutcome {
    pub samples: Vec<f64>,
    pub source: CompsSource,
    pub status: CompsStatus,
}

impl CompsOutcome {
    /// Outcome for samples read from a results page.
    pub fn scraped(samples: Vec<f64>) -> Self {
        let status = if samples.is_empty() {
            CompsStatus::NoMatches
        } else {
            CompsStatus::Found
        };
        Self {
            samples,
            source: CompsSource::Scrape,
            status,
        }
    }

    /// Empty outcome recording a failure.
    pub fn failed(source: CompsSource, error: impl Into<String>) -> Self {
        Self {
            samples: Vec::new(),
            source,
            status: CompsStatus::Failed {
                error: error.into(),
            },
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, CompsStatus::Failed { .. })
    }
}
