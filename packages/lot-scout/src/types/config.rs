//! Configuration types for scraping, comparables and analysis.

use serde::{Deserialize, Serialize};

/// Hard ceiling on pages fetched for one paginated listing.
pub const MAX_LISTING_PAGES: usize = 50;

/// Configuration for building a [`Pipeline`](crate::pipeline::Pipeline).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutConfig {
    /// Maximum pages fetched per paginated listing.
    ///
    /// Values above [`MAX_LISTING_PAGES`] are clamped. Default: 50.
    pub max_pages: usize,

    /// Lots valued at once.
    ///
    /// 1 keeps lot processing strictly sequential, which is the polite
    /// default towards the marketplace. Output order never changes.
    /// Default: 1.
    pub max_concurrent_lots: usize,

    /// Per-host request rate for auction listing pages. Default: 2.
    pub listing_requests_per_second: u32,

    /// Lower bound of the random pause before a marketplace search (ms).
    ///
    /// Default: 200.
    pub comps_delay_min_ms: u64,

    /// Upper bound of the random pause before a marketplace search (ms).
    ///
    /// Default: 500.
    pub comps_delay_max_ms: u64,

    /// Per-request HTTP timeout in seconds. Default: 30.
    pub request_timeout_secs: u64,

    /// User agent sent with every request.
    pub user_agent: String,

    /// Marketplace API application id.
    ///
    /// When set the comparable fetcher tries the API path first.
    #[serde(skip_serializing)]
    pub ebay_app_id: Option<String>,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            max_pages: MAX_LISTING_PAGES,
            max_concurrent_lots: 1,
            listing_requests_per_second: 2,
            comps_delay_min_ms: 200,
            comps_delay_max_ms: 500,
            request_timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            ebay_app_id: None,
        }
    }
}

impl ScoutConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page cap for paginated listings.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set how many lots are valued at once.
    pub fn with_max_concurrent_lots(mut self, max: usize) -> Self {
        self.max_concurrent_lots = max;
        self
    }

    /// Set the per-host listing request rate.
    pub fn with_listing_rate(mut self, requests_per_second: u32) -> Self {
        self.listing_requests_per_second = requests_per_second;
        self
    }

    /// Set the marketplace search delay window.
    pub fn with_comps_delay(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.comps_delay_min_ms = min_ms;
        self.comps_delay_max_ms = max_ms;
        self
    }

    /// Set the HTTP timeout.
    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Set the marketplace API application id.
    pub fn with_ebay_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.ebay_app_id = Some(app_id.into());
        self
    }

    /// Page cap after clamping to the hard limit.
    pub fn effective_max_pages(&self) -> usize {
        self.max_pages.clamp(1, MAX_LISTING_PAGES)
    }
}

/// Per-request analysis options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOptions {
    /// Sold comparables requested per lot. Default: 5.
    #[serde(default = "default_recent_count")]
    pub recent_count: usize,

    /// Strip "Lot #N:" prefixes before searching. Default: true.
    #[serde(default = "default_strip_lot_prefix")]
    pub strip_lot_prefix: bool,
}

fn default_recent_count() -> usize {
    5
}

fn default_strip_lot_prefix() -> bool {
    true
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            recent_count: default_recent_count(),
            strip_lot_prefix: default_strip_lot_prefix(),
        }
    }
}

impl AnalyzeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recent_count(mut self, count: usize) -> Self {
        self.recent_count = count;
        self
    }

    pub fn with_strip_lot_prefix(mut self, strip: bool) -> Self {
        self.strip_lot_prefix = strip;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScoutConfig::default();
        assert_eq!(config.max_pages, 50);
        assert_eq!(config.max_concurrent_lots, 1);
        assert_eq!(config.comps_delay_min_ms, 200);
        assert_eq!(config.comps_delay_max_ms, 500);
        assert!(config.ebay_app_id.is_none());

        let options = AnalyzeOptions::default();
        assert_eq!(options.recent_count, 5);
        assert!(options.strip_lot_prefix);
    }

    #[test]
    fn test_page_cap_is_clamped() {
        assert_eq!(ScoutConfig::new().with_max_pages(500).effective_max_pages(), 50);
        assert_eq!(ScoutConfig::new().with_max_pages(0).effective_max_pages(), 1);
        assert_eq!(ScoutConfig::new().with_max_pages(3).effective_max_pages(), 3);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: AnalyzeOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, AnalyzeOptions::default());

        let options: AnalyzeOptions =
            serde_json::from_str(r#"{"recentCount": 9, "stripLotPrefix": false}"#).unwrap();
        assert_eq!(options.recent_count, 9);
        assert!(!options.strip_lot_prefix);
    }

    #[test]
    fn test_app_id_is_not_serialized() {
        let config = ScoutConfig::new().with_ebay_app_id("secret-id");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret-id"));
    }
}
