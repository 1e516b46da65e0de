//! Price text parsing.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Optional currency symbol, then digits with optional group separators
    // and an optional fractional part.
    static ref AMOUNT_REGEX: Regex =
        Regex::new(r"[$£€]?\s*(\d[\d,]*(?:\.\d+)?)").unwrap();
}

/// Parse the first amount embedded in free-form price text.
///
/// `"Current bid: $1,250.50"` → `Some(1250.5)`. Text without digits yields
/// `None`.
pub fn parse_currency(text: &str) -> Option<f64> {
    let captures = AMOUNT_REGEX.captures(text)?;
    let digits: String = captures
        .get(1)?
        .as_str()
        .chars()
        .filter(|c| *c != ',')
        .collect();

    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}
