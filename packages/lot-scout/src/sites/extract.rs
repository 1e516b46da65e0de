//! Reading lots out of listing markup.
//!
//! Parsing is synchronous: `scraper::Html` is not `Send`, so a parsed
//! document must never live across an `.await`.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::currency::parse_currency;
use crate::sites::profiles::SiteProfile;
use crate::types::lot::Lot;

lazy_static! {
    static ref DIGITS: Regex = Regex::new(r"\d+").unwrap();
    static ref ANCHOR: Selector = Selector::parse("a[href]").unwrap();
}

/// Lots read from one page.
#[derive(Debug, Clone, Default)]
pub struct PageExtraction {
    pub lots: Vec<Lot>,

    /// Container elements found, including ones that yielded no lot.
    /// Zero means the page carried no lot markup at all.
    pub matched_elements: usize,

    /// Containers skipped for missing a lot number or title
    pub dropped: usize,
}

/// Read every lot on a page using a site profile.
///
/// Links are resolved against `page_url`. A lot without a link gets the page
/// URL itself.
pub fn extract_lots(profile: &SiteProfile, html: &str, page_url: &Url) -> PageExtraction {
    let document = Html::parse_document(html);
    let fields = CompiledProfile::compile(profile);
    let containers = select_containers(&document, &fields.containers);

    let mut extraction = PageExtraction {
        matched_elements: containers.len(),
        ..Default::default()
    };

    for container in containers {
        match read_lot(container, profile, &fields, page_url) {
            Some(lot) => extraction.lots.push(lot),
            None => extraction.dropped += 1,
        }
    }

    if extraction.dropped > 0 {
        debug!(
            url = %page_url,
            dropped = extraction.dropped,
            "Skipped lot elements without number or title"
        );
    }

    extraction
}

struct CompiledProfile {
    containers: Vec<Selector>,
    lot_number_fields: Vec<Selector>,
    generic_lot_field: Option<Selector>,
    title_fields: Vec<Selector>,
    bid_fields: Vec<Selector>,
}

impl CompiledProfile {
    fn compile(profile: &SiteProfile) -> Self {
        Self {
            containers: compile_all(profile.containers),
            lot_number_fields: compile_all(profile.lot_number_fields),
            generic_lot_field: profile.generic_lot_field.and_then(compile),
            title_fields: compile_all(profile.title_fields),
            bid_fields: compile_all(profile.bid_fields),
        }
    }
}

fn compile(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(selector = %selector, error = ?e, "Invalid selector");
            None
        }
    }
}

fn compile_all(selectors: &[&str]) -> Vec<Selector> {
    selectors.iter().filter_map(|s| compile(s)).collect()
}

/// Elements for the first container selector with any match.
fn select_containers<'a>(document: &'a Html, selectors: &[Selector]) -> Vec<ElementRef<'a>> {
    selectors
        .iter()
        .map(|selector| document.select(selector).collect::<Vec<_>>())
        .find(|found| !found.is_empty())
        .unwrap_or_default()
}

fn read_lot(
    container: ElementRef<'_>,
    profile: &SiteProfile,
    fields: &CompiledProfile,
    page_url: &Url,
) -> Option<Lot> {
    let lot_number = lot_number(container, profile, fields)?;
    let title = first_text(container, &fields.title_fields, " ")?;
    let current_bid = current_bid(container, &fields.bid_fields);
    let lot_url = lot_link(container, page_url);

    Lot::from_parts(lot_number, title, current_bid, lot_url)
}

fn lot_number(
    container: ElementRef<'_>,
    profile: &SiteProfile,
    fields: &CompiledProfile,
) -> Option<String> {
    for selector in &fields.lot_number_fields {
        for found in container.select(selector) {
            let text = element_text(found, "");
            let value = if profile.lot_number_digits_only {
                text.chars().filter(char::is_ascii_digit).collect()
            } else {
                text
            };
            if !value.is_empty() {
                return Some(value);
            }
        }
    }

    for attr in profile.lot_number_attrs {
        if let Some(value) = container.value().attr(attr) {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }

    let generic = fields.generic_lot_field.as_ref()?;
    container.select(generic).find_map(|found| {
        DIGITS
            .find(&element_text(found, " "))
            .map(|m| m.as_str().to_string())
    })
}

/// First candidate bid that parses as an amount, else zero.
fn current_bid(container: ElementRef<'_>, selectors: &[Selector]) -> f64 {
    selectors
        .iter()
        .flat_map(|selector| container.select(selector))
        .find_map(|found| parse_currency(&element_text(found, "")))
        .unwrap_or(0.0)
}

fn lot_link(container: ElementRef<'_>, page_url: &Url) -> String {
    let own_href = if container.value().name() == "a" {
        container.value().attr("href")
    } else {
        None
    };

    own_href
        .into_iter()
        .chain(
            container
                .select(&ANCHOR)
                .filter_map(|a| a.value().attr("href")),
        )
        .map(str::trim)
        .filter(|href| !href.is_empty() && !href.starts_with('#') && !href.starts_with("javascript:"))
        .find_map(|href| page_url.join(href).ok())
        .unwrap_or_else(|| page_url.clone())
        .to_string()
}

fn first_text(container: ElementRef<'_>, selectors: &[Selector], sep: &str) -> Option<String> {
    selectors
        .iter()
        .flat_map(|selector| container.select(selector))
        .map(|found| element_text(found, sep))
        .find(|text| !text.is_empty())
}

/// Text content with whitespace runs collapsed to single spaces.
fn element_text(element: ElementRef<'_>, sep: &str) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(sep)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
