//! Lot records and the rows derived from them.

use serde::{Deserialize, Serialize};

/// One item up for bid, as scraped from an auction listing page.
///
/// Adapters only construct a `Lot` when both the lot number and the title
/// are non-empty; markup fragments missing either are not lots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    /// Lot identifier as shown by the auction site
    pub lot_number: String,

    /// Display title, whitespace collapsed
    pub title: String,

    /// Current high bid (0 when the page shows none)
    pub current_bid: f64,

    /// Absolute URL of the lot page
    pub lot_url: String,
}

impl Lot {
    /// Build a lot from raw extracted fields.
    ///
    /// Returns `None` when the lot number or title is blank after trimming.
    pub fn from_parts(
        lot_number: impl AsRef<str>,
        title: impl AsRef<str>,
        current_bid: f64,
        lot_url: impl Into<String>,
    ) -> Option<Self> {
        let lot_number = lot_number.as_ref().trim();
        let title = title.as_ref().trim();
        if lot_number.is_empty() || title.is_empty() {
            return None;
        }

        Some(Self {
            lot_number: lot_number.to_string(),
            title: title.to_string(),
            current_bid: current_bid.max(0.0),
            lot_url: lot_url.into(),
        })
    }
}

/// One output row of an auction analysis.
///
/// `ebay_value` and `my_max_bid` are either both present or both absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRow {
    pub lot_number: String,

    /// The lot's raw title, before normalization
    pub item_title: String,

    /// Estimated resale value from sold comparables
    pub ebay_value: Option<i64>,

    /// Sold-listings search link built from the normalized title
    pub ebay_value_link: String,

    /// Recommended bid ceiling
    pub my_max_bid: Option<i64>,

    /// Link to the lot itself
    pub my_max_bid_link: String,

    pub current_bid: f64,

    pub undervalued: bool,
}

impl AnalysisRow {
    /// Row for a lot whose valuation could not be computed.
    pub fn degraded(lot: &Lot, ebay_value_link: String) -> Self {
        Self {
            lot_number: lot.lot_number.clone(),
            item_title: lot.title.clone(),
            ebay_value: None,
            ebay_value_link,
            my_max_bid: None,
            my_max_bid_link: lot.lot_url.clone(),
            current_bid: lot.current_bid,
            undervalued: false,
        }
    }

    /// Whether the valuation succeeded for this row.
    pub fn is_valued(&self) -> bool {
        self.ebay_value.is_some() && self.my_max_bid.is_some()
    }
}

/// Result of a comparable-prices lookup for one title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparableResult {
    /// The title as supplied by the caller
    pub title: String,

    /// Sold prices in page order
    pub sold_samples: Vec<f64>,

    pub ebay_value: Option<i64>,
}
