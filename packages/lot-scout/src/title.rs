//! Lot title cleanup and marketplace search links.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

/// Marketplace search endpoint used for sold-listing lookups and links.
pub const EBAY_SEARCH_URL: &str = "https://www.ebay.com/sch/i.html";

lazy_static! {
    static ref LOT_PREFIX_REGEX: Regex = Regex::new(r"(?i)^lot\s*#?\s*\d+\s*[:-]?\s*").unwrap();
}

/// Strip leading "Lot #12:" style prefixes and collapse whitespace.
///
/// Prefixes are stripped repeatedly so the result is stable when applied
/// twice.
pub fn clean_title(raw: &str) -> String {
    let mut title = raw.trim();
    while let Some(found) = LOT_PREFIX_REGEX.find(title) {
        if found.as_str().is_empty() {
            break;
        }
        title = title[found.end()..].trim_start();
    }

    title.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The phrase used to search for comparables.
pub fn search_title(raw: &str, strip_lot_prefix: bool) -> String {
    if strip_lot_prefix {
        clean_title(raw)
    } else {
        raw.trim().to_string()
    }
}

/// Sold/completed listings search link for a normalized title.
pub fn ebay_sold_link(title: &str) -> String {
    sold_search_url(title, &[])
}

/// Search URL scoped to sold and completed listings, with extra parameters.
pub(crate) fn sold_search_url(title: &str, extra: &[(&str, &str)]) -> String {
    let mut params: Vec<(&str, &str)> =
        vec![("_nkw", title), ("LH_Sold", "1"), ("LH_Complete", "1")];
    params.extend_from_slice(extra);

    match Url::parse_with_params(EBAY_SEARCH_URL, &params) {
        Ok(url) => url.to_string(),
        Err(_) => EBAY_SEARCH_URL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strips_lot_prefixes() {
        assert_eq!(clean_title("Lot 12: Antique Clock"), "Antique Clock");
        assert_eq!(clean_title("LOT #7 - Brass Lamp"), "Brass Lamp");
        assert_eq!(clean_title("lot#3:Oak Chair"), "Oak Chair");
        assert_eq!(clean_title("Lot 45 Vintage Radio"), "Vintage Radio");
    }

    #[test]
    fn test_leaves_other_titles_alone() {
        assert_eq!(clean_title("Lots of Marbles"), "Lots of Marbles");
        assert_eq!(clean_title("Antique Clock Lot 12"), "Antique Clock Lot 12");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(clean_title("  Lot 1:  Big \n\t Red   Barn "), "Big Red Barn");
    }

    #[test]
    fn test_repeated_prefix() {
        assert_eq!(clean_title("Lot 1: Lot 2: Mirror"), "Mirror");
    }

    #[test]
    fn test_search_title_without_stripping() {
        assert_eq!(search_title("  Lot 3: Vase ", false), "Lot 3: Vase");
        assert_eq!(search_title("Lot 3: Vase", true), "Vase");
    }

    #[test]
    fn test_sold_link() {
        let link = ebay_sold_link("Antique Clock");
        assert!(link.starts_with("https://www.ebay.com/sch/i.html?"));
        assert!(link.contains("_nkw=Antique+Clock"));
        assert!(link.contains("LH_Sold=1"));
        assert!(link.contains("LH_Complete=1"));
        assert_eq!(link, ebay_sold_link("Antique Clock"));
    }

    #[test]
    fn test_sold_link_encodes_specials() {
        let link = ebay_sold_link("Tom & Jerry 50%");
        assert!(link.contains("_nkw=Tom+%26+Jerry+50%25"));
    }

    proptest! {
        #[test]
        fn prop_clean_title_is_idempotent(raw in ".{0,60}") {
            let once = clean_title(&raw);
            prop_assert_eq!(clean_title(&once), once.clone());
        }

        #[test]
        fn prop_prefix_removed(n in 0u32..10_000, sep in prop::sample::select(vec!["", ":", " -", " :"]), body in "[A-Za-z][A-Za-z ]{0,30}") {
            let raw = format!("Lot #{}{} {}", n, sep, body);
            let expected = body.split_whitespace().collect::<Vec<_>>().join(" ");
            prop_assert_eq!(clean_title(&raw), expected);
        }
    }
}
