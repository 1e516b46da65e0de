//! Page strategies for reading a whole auction listing.

use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use crate::sites::extract::{extract_lots, PageExtraction};
use crate::sites::{AuctionSite, PageStrategy};
use crate::traits::fetcher::{FetchedPage, PageFetcher};
use crate::types::config::MAX_LISTING_PAGES;
use crate::types::lot::Lot;
use crate::types::outcome::{ScrapeOutcome, ScrapeStatus};

/// Runs a site's page strategy against a listing URL.
///
/// Never fails: fetch errors end the scrape and are reported in the
/// outcome's status, keeping any lots already read.
pub struct LotScraper {
    fetcher: Arc<dyn PageFetcher>,
    max_pages: usize,
}

impl LotScraper {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            max_pages: MAX_LISTING_PAGES,
        }
    }

    /// Lower the page cap for paginated listings. Clamped to `1..=50`.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.clamp(1, MAX_LISTING_PAGES);
        self
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Scrape every lot of a listing.
    pub async fn scrape(&self, site: AuctionSite, listing_url: &Url) -> ScrapeOutcome {
        info!(site = %site, url = %listing_url, fetcher = self.fetcher.name(), "Scraping auction listing");

        let outcome = match site.strategy() {
            PageStrategy::SinglePage => self.scrape_single_page(site, listing_url).await,
            PageStrategy::Paginated => self.scrape_paginated(site, listing_url).await,
        };

        info!(
            site = %site,
            lots = outcome.lots.len(),
            pages = outcome.pages_fetched,
            status = ?outcome.status,
            "Scrape finished"
        );

        outcome
    }

    async fn scrape_single_page(&self, site: AuctionSite, listing_url: &Url) -> ScrapeOutcome {
        let (lots, status) = match self.fetcher.fetch(listing_url.as_str()).await {
            Ok(page) => {
                let extraction = extract_page(site, &page, listing_url);
                let status = if extraction.matched_elements == 0 {
                    ScrapeStatus::NoMatches { page: 1 }
                } else {
                    ScrapeStatus::Complete
                };
                (extraction.lots, status)
            }
            Err(e) => {
                warn!(site = %site, url = %listing_url, error = %e, "Failed to fetch listing");
                (
                    Vec::new(),
                    ScrapeStatus::FetchFailed {
                        page: 1,
                        error: e.to_string(),
                    },
                )
            }
        };

        ScrapeOutcome {
            site,
            lots,
            pages_fetched: 1,
            status,
        }
    }

    async fn scrape_paginated(&self, site: AuctionSite, listing_url: &Url) -> ScrapeOutcome {
        let mut lots: Vec<Lot> = Vec::new();

        for page in 1..=self.max_pages {
            let url = page_url(listing_url, page);

            let fetched = match self.fetcher.fetch(url.as_str()).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    warn!(site = %site, url = %url, page, error = %e, "Failed to fetch listing page");
                    return ScrapeOutcome {
                        site,
                        lots,
                        pages_fetched: page,
                        status: ScrapeStatus::FetchFailed {
                            page,
                            error: e.to_string(),
                        },
                    };
                }
            };

            let extraction = extract_page(site, &fetched, &url);
            if extraction.matched_elements == 0 {
                debug!(site = %site, page, "No lot markup, end of listing");
                return ScrapeOutcome {
                    site,
                    lots,
                    pages_fetched: page,
                    status: ScrapeStatus::NoMatches { page },
                };
            }

            debug!(site = %site, page, lots = extraction.lots.len(), "Read listing page");
            lots.extend(extraction.lots);
        }

        warn!(site = %site, pages = self.max_pages, "Stopped at page cap");
        ScrapeOutcome {
            site,
            lots,
            pages_fetched: self.max_pages,
            status: ScrapeStatus::PageLimit {
                pages: self.max_pages,
            },
        }
    }
}

/// Extract lots, resolving links against the post-redirect URL when known.
fn extract_page(site: AuctionSite, page: &FetchedPage, requested: &Url) -> PageExtraction {
    let base = Url::parse(&page.final_url).unwrap_or_else(|_| requested.clone());
    extract_lots(site.profile(), &page.html, &base)
}

/// The listing URL for one page number.
///
/// Any existing `page` parameter is replaced. Other parameters are kept
/// byte for byte, in their original order.
pub fn page_url(base: &Url, page: usize) -> Url {
    let page_pair = format!("page={}", page);
    let mut pairs: Vec<&str> = base
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty() && pair.split('=').next() != Some("page"))
        .collect();
    pairs.push(&page_pair);

    let mut url = base.clone();
    url.set_query(Some(&pairs.join("&")));
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFetcher;

    const HIBID_PAGE: &str = r#"
        <div class="lot"><span class="lot-number">1</span><div class="lot-desc">Clock</div></div>
        <div class="lot"><span class="lot-number">2</span><div class="lot-desc">Lamp</div></div>"#;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_page_url() {
        let base = url("https://hibid.com/catalog/5");
        assert_eq!(page_url(&base, 1).as_str(), "https://hibid.com/catalog/5?page=1");

        let base = url("https://hibid.com/catalog/5?sort=asc&page=9");
        assert_eq!(
            page_url(&base, 2).as_str(),
            "https://hibid.com/catalog/5?sort=asc&page=2"
        );
    }

    #[test]
    fn test_page_url_keeps_query_encoding() {
        let base = url("https://hibid.com/catalog/5?q=oak%20chair&page=9&cat=a+b");
        assert_eq!(
            page_url(&base, 3).as_str(),
            "https://hibid.com/catalog/5?q=oak%20chair&cat=a+b&page=3"
        );

        let base = url("https://hibid.com/catalog/5?page&sort=asc");
        assert_eq!(
            page_url(&base, 1).as_str(),
            "https://hibid.com/catalog/5?sort=asc&page=1"
        );
    }

    #[tokio::test]
    async fn test_single_page_complete() {
        let fetcher = MockFetcher::new().with_html(
            "https://www.ebth.com/sales/1",
            r#"<div class="lot-item" data-lot-id="8"><h2>Desk</h2></div>"#,
        );
        let scraper = LotScraper::new(Arc::new(fetcher));

        let outcome = scraper
            .scrape(AuctionSite::Ebth, &url("https://www.ebth.com/sales/1"))
            .await;

        assert_eq!(outcome.status, ScrapeStatus::Complete);
        assert_eq!(outcome.lots.len(), 1);
        assert_eq!(outcome.pages_fetched, 1);
    }

    #[tokio::test]
    async fn test_single_page_fetch_failure() {
        let fetcher = MockFetcher::new().with_status("https://www.ebth.com/sales/1", 503);
        let scraper = LotScraper::new(Arc::new(fetcher));

        let outcome = scraper
            .scrape(AuctionSite::Ebth, &url("https://www.ebth.com/sales/1"))
            .await;

        assert!(outcome.failed_before_any_lot());
    }

    #[tokio::test]
    async fn test_paginated_stops_on_empty_page() {
        let fetcher = MockFetcher::new()
            .with_html("https://hibid.com/catalog/5?page=1", HIBID_PAGE)
            .with_html("https://hibid.com/catalog/5?page=2", HIBID_PAGE)
            .with_html("https://hibid.com/catalog/5?page=3", "<p>No more lots</p>");
        let scraper = LotScraper::new(Arc::new(fetcher.clone()));

        let outcome = scraper
            .scrape(AuctionSite::HiBid, &url("https://hibid.com/catalog/5"))
            .await;

        assert_eq!(outcome.lots.len(), 4);
        assert_eq!(outcome.status, ScrapeStatus::NoMatches { page: 3 });
        assert_eq!(fetcher.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_paginated_keeps_lots_before_failure() {
        let fetcher = MockFetcher::new()
            .with_html("https://hibid.com/catalog/5?page=1", HIBID_PAGE)
            .fail_url("https://hibid.com/catalog/5?page=2");
        let scraper = LotScraper::new(Arc::new(fetcher));

        let outcome = scraper
            .scrape(AuctionSite::HiBid, &url("https://hibid.com/catalog/5"))
            .await;

        assert_eq!(outcome.lots.len(), 2);
        assert!(matches!(outcome.status, ScrapeStatus::FetchFailed { page: 2, .. }));
    }

    #[tokio::test]
    async fn test_paginated_page_cap() {
        let fetcher = MockFetcher::new().with_default_html(HIBID_PAGE);
        let scraper = LotScraper::new(Arc::new(fetcher.clone())).with_max_pages(3);

        let outcome = scraper
            .scrape(AuctionSite::HiBid, &url("https://hibid.com/catalog/5"))
            .await;

        assert_eq!(outcome.status, ScrapeStatus::PageLimit { pages: 3 });
        assert_eq!(outcome.lots.len(), 6);
        assert_eq!(fetcher.fetch_count(), 3);
    }

    #[test]
    fn test_max_pages_clamped() {
        let scraper = LotScraper::new(Arc::new(MockFetcher::new())).with_max_pages(500);
        assert_eq!(scraper.max_pages(), MAX_LISTING_PAGES);
    }
}
