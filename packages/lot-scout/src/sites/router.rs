//! Routing listing URLs to site adapters.

use tracing::debug;
use url::Url;

use crate::error::{Result, ScoutError};
use crate::security::UrlValidator;
use crate::sites::scraper::LotScraper;
use crate::sites::AuctionSite;
use crate::types::outcome::ScrapeOutcome;

/// Validates a listing URL, picks its site and scrapes it.
pub struct SourceRouter {
    scraper: LotScraper,
    validator: UrlValidator,
}

impl SourceRouter {
    pub fn new(scraper: LotScraper, validator: UrlValidator) -> Self {
        Self { scraper, validator }
    }

    /// Parse and validate a listing URL and find the site serving it.
    ///
    /// Host matching is by substring, so this alone does not prove the host
    /// is safe to fetch. [`scrape`](Self::scrape) also resolves it.
    pub fn resolve(&self, listing_url: &str) -> Result<(AuctionSite, Url)> {
        let trimmed = listing_url.trim();
        let url = Url::parse(trimmed).map_err(|_| ScoutError::InvalidUrl {
            url: trimmed.to_string(),
        })?;

        self.validator.validate_url(&url)?;

        let host = url.host_str().unwrap_or_default().to_lowercase();
        let site = AuctionSite::for_host(&host).ok_or(ScoutError::UnsupportedSource { host })?;

        debug!(site = %site, url = %url, "Routed listing URL");
        Ok((site, url))
    }

    /// Scrape a listing URL with the adapter for its host.
    pub async fn scrape(&self, listing_url: &str) -> Result<ScrapeOutcome> {
        let (site, url) = self.resolve(listing_url)?;
        self.validator.validate_with_dns(&url).await?;
        Ok(self.scraper.scrape(site, &url).await)
    }
}
