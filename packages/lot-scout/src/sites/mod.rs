//! Auction site adapters.
//!
//! Each supported site is one [`AuctionSite`] variant with a selector
//! profile and a page strategy. The [`SourceRouter`] picks the variant from
//! the listing URL's host and the [`LotScraper`] runs its strategy.
//!
//! Adding a site means adding a variant, its host patterns and a profile.
//! Dispatch does not change.

pub mod extract;
pub mod profiles;
pub mod router;
pub mod scraper;

use serde::{Deserialize, Serialize};

pub use extract::{extract_lots, PageExtraction};
pub use profiles::SiteProfile;
pub use router::SourceRouter;
pub use scraper::{page_url, LotScraper};

/// How a site's listing is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStrategy {
    /// All lots are on the first page
    SinglePage,
    /// Lots are spread over `?page=N` pages
    Paginated,
}

/// Supported auction sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuctionSite {
    EquipBid,
    HiBid,
    Midwest,
    Ebth,
    Invaluable,
}

impl AuctionSite {
    /// Every site, in routing priority order.
    pub const ALL: [AuctionSite; 5] = [
        AuctionSite::EquipBid,
        AuctionSite::HiBid,
        AuctionSite::Midwest,
        AuctionSite::Ebth,
        AuctionSite::Invaluable,
    ];

    /// Identifier reported to API callers.
    pub fn id(&self) -> &'static str {
        match self {
            AuctionSite::EquipBid => "equip-bid.com",
            AuctionSite::HiBid => "hibid.com",
            AuctionSite::Midwest => "midwest.auction",
            AuctionSite::Ebth => "ebth.com",
            AuctionSite::Invaluable => "invaluable.com",
        }
    }

    /// Host substrings that select this site.
    pub fn host_patterns(&self) -> &'static [&'static str] {
        match self {
            AuctionSite::EquipBid => &["equip-bid.com"],
            AuctionSite::HiBid => &["hibid.com"],
            AuctionSite::Midwest => &["midwest.auction"],
            AuctionSite::Ebth => &["ebth.com", "etbh.com"],
            AuctionSite::Invaluable => &["invaluable.com"],
        }
    }

    pub fn strategy(&self) -> PageStrategy {
        match self {
            AuctionSite::EquipBid | AuctionSite::HiBid => PageStrategy::Paginated,
            AuctionSite::Midwest | AuctionSite::Ebth | AuctionSite::Invaluable => {
                PageStrategy::SinglePage
            }
        }
    }

    /// Selector profile used to read lots from this site's markup.
    pub fn profile(&self) -> &'static SiteProfile {
        match self {
            AuctionSite::EquipBid => &profiles::EQUIP_BID,
            AuctionSite::HiBid => &profiles::HIBID,
            AuctionSite::Midwest => &profiles::MIDWEST,
            AuctionSite::Ebth => &profiles::EBTH,
            AuctionSite::Invaluable => &profiles::INVALUABLE,
        }
    }

    /// Site whose patterns match a host, compared case-insensitively.
    pub fn for_host(host: &str) -> Option<AuctionSite> {
        let host = host.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|site| site.host_patterns().iter().any(|p| host.contains(p)))
    }
}

impl std::fmt::Display for AuctionSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_host() {
        assert_eq!(AuctionSite::for_host("www.equip-bid.com"), Some(AuctionSite::EquipBid));
        assert_eq!(AuctionSite::for_host("WWW.HIBID.COM"), Some(AuctionSite::HiBid));
        assert_eq!(AuctionSite::for_host("bid.midwest.auction"), Some(AuctionSite::Midwest));
        assert_eq!(AuctionSite::for_host("www.ebth.com"), Some(AuctionSite::Ebth));
        assert_eq!(AuctionSite::for_host("etbh.com"), Some(AuctionSite::Ebth));
        assert_eq!(AuctionSite::for_host("invaluable.com"), Some(AuctionSite::Invaluable));
        assert_eq!(AuctionSite::for_host("ebay.com"), None);
    }

    #[test]
    fn test_strategies() {
        let paginated: Vec<_> = AuctionSite::ALL
            .into_iter()
            .filter(|s| s.strategy() == PageStrategy::Paginated)
            .collect();
        assert_eq!(paginated, vec![AuctionSite::EquipBid, AuctionSite::HiBid]);
    }

    #[test]
    fn test_display_is_id() {
        assert_eq!(AuctionSite::Ebth.to_string(), "ebth.com");
    }
}
