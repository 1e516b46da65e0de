//! Per-site selector profiles.
//!
//! Every list is tried in order and the first non-empty match wins. The
//! selectors are markup heuristics; tune them per site as markup drifts.

/// Where to find lot fields in one site's markup.
#[derive(Debug)]
pub struct SiteProfile {
    /// Lot container selectors. The first selector with any match is used.
    pub containers: &'static [&'static str],

    /// Dedicated lot number fields inside a container.
    pub lot_number_fields: &'static [&'static str],

    /// Keep only the digits of a dedicated lot number field.
    pub lot_number_digits_only: bool,

    /// Container attributes holding the lot number.
    pub lot_number_attrs: &'static [&'static str],

    /// Generic field whose first digit run is the lot number of last resort.
    pub generic_lot_field: Option<&'static str>,

    pub title_fields: &'static [&'static str],

    pub bid_fields: &'static [&'static str],
}

pub static EQUIP_BID: SiteProfile = SiteProfile {
    containers: &[".lot-item", ".auction-lot", "[data-lot-number]"],
    lot_number_fields: &[".lot-number"],
    lot_number_digits_only: false,
    lot_number_attrs: &["data-lot-number"],
    generic_lot_field: Some("[class*=\"lot\"]"),
    title_fields: &[".lot-title", ".title", "h3", "h4"],
    bid_fields: &[".current-bid", ".bid-amount", "[class*=\"bid\"]"],
};

pub static HIBID: SiteProfile = SiteProfile {
    containers: &[".lot", ".lot-item", "[data-lot]"],
    lot_number_fields: &[".lot-num", ".lot-number"],
    lot_number_digits_only: true,
    lot_number_attrs: &["data-lot"],
    generic_lot_field: None,
    title_fields: &[".lot-desc", ".description", ".title"],
    bid_fields: &[".current-bid", ".high-bid"],
};

pub static MIDWEST: SiteProfile = SiteProfile {
    containers: &[".lot-card", ".auction-item", ".lot"],
    lot_number_fields: &[".lot-number", "[class*=\"lot-num\"]"],
    lot_number_digits_only: true,
    lot_number_attrs: &["data-lot-number"],
    generic_lot_field: None,
    title_fields: &[".lot-title", ".item-title", "h3", "h4"],
    bid_fields: &[".current-bid", ".high-bid", "[class*=\"bid\"]"],
};

pub static EBTH: SiteProfile = SiteProfile {
    containers: &[".lot-item", ".auction-lot", "[data-lot-id]"],
    lot_number_fields: &[".lot-number"],
    lot_number_digits_only: true,
    lot_number_attrs: &["data-lot-id"],
    generic_lot_field: None,
    title_fields: &[".lot-title", ".item-name", "h2", "h3"],
    bid_fields: &[".current-price", ".high-bid"],
};

pub static INVALUABLE: SiteProfile = SiteProfile {
    containers: &[".lot", ".lot-item", "[data-lot-number]"],
    lot_number_fields: &[".lot-number", ".lot-num"],
    lot_number_digits_only: true,
    lot_number_attrs: &["data-lot-number"],
    generic_lot_field: None,
    title_fields: &[".lot-title", ".title", ".description"],
    bid_fields: &[".current-bid", ".estimate", ".price"],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::AuctionSite;
    use scraper::Selector;

    #[test]
    fn test_every_selector_parses() {
        for site in AuctionSite::ALL {
            let profile = site.profile();
            let all = profile
                .containers
                .iter()
                .chain(profile.lot_number_fields)
                .chain(profile.title_fields)
                .chain(profile.bid_fields)
                .chain(profile.generic_lot_field.iter());

            for selector in all {
                assert!(
                    Selector::parse(selector).is_ok(),
                    "{} has invalid selector {}",
                    site,
                    selector
                );
            }
        }
    }

    #[test]
    fn test_every_profile_has_required_fields() {
        for site in AuctionSite::ALL {
            let profile = site.profile();
            assert!(!profile.containers.is_empty());
            assert!(!profile.title_fields.is_empty());
            assert!(!profile.lot_number_fields.is_empty() || !profile.lot_number_attrs.is_empty());
        }
    }
}
