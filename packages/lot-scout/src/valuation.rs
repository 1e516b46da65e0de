//! Valuation statistics: trimmed median, bid ceiling, undervaluation.
//!
//! Pure functions with no I/O. Sold-listing prices are noisy (shill bids,
//! mis-categorized listings), so the point estimate is a median after
//! trimming 10% from each end, with a floor of one element per side once
//! there are at least three samples.

use serde::{Deserialize, Serialize};

/// Fraction trimmed from each end of the sorted samples.
const TRIM_FRACTION: f64 = 0.10;

/// Smallest sample size that gets trimmed.
const MIN_TRIM_SAMPLES: usize = 3;

/// Fee/premium divisor, applied before and after the margin divisor.
const FEE_DIVISOR: f64 = 1.15;

/// Required resale margin.
const MARGIN_DIVISOR: f64 = 3.0;

/// Elements trimmed from each end for a sample of size `n`.
pub fn trim_count(n: usize) -> usize {
    if n < MIN_TRIM_SAMPLES {
        return 0;
    }
    ((n as f64 * TRIM_FRACTION).floor() as usize).max(1)
}

/// Estimated value from sold prices: rounded trimmed median.
///
/// Empty input yields `None`.
pub fn estimate_value(samples: &[f64]) -> Option<i64> {
    if samples.is_empty() {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let cut = trim_count(sorted.len());
    let trimmed = if cut > 0 && sorted.len() > cut * 2 {
        &sorted[cut..sorted.len() - cut]
    } else {
        &sorted[..]
    };

    Some(median(trimmed).round() as i64)
}

/// Median of an already sorted, non-empty slice.
fn median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Maximum recommended bid for an estimated value.
///
/// `round(((value / 1.15) / 3) / 1.15)`, rounded once at the end.
pub fn bid_ceiling(value: Option<i64>) -> Option<i64> {
    let value = value? as f64;
    Some((((value / FEE_DIVISOR) / MARGIN_DIVISOR) / FEE_DIVISOR).round() as i64)
}

/// Whether the current bid is at or below the ceiling.
pub fn is_undervalued(current_bid: Option<f64>, ceiling: Option<i64>) -> bool {
    match (current_bid, ceiling) {
        (Some(bid), Some(ceiling)) => bid <= ceiling as f64,
        _ => false,
    }
}

/// All valuation figures for one lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Valuation {
    pub ebay_value: Option<i64>,
    pub my_max_bid: Option<i64>,
    pub undervalued: bool,
}

impl Valuation {
    /// Value a lot from its sold comparables and current bid.
    pub fn from_samples(samples: &[f64], current_bid: f64) -> Self {
        let ebay_value = estimate_value(samples);
        let my_max_bid = bid_ceiling(ebay_value);
        Self {
            ebay_value,
            my_max_bid,
            undervalued: is_undervalued(Some(current_bid), my_max_bid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_is_absent() {
        assert_eq!(estimate_value(&[]), None);
    }

    #[test]
    fn test_single_sample() {
        assert_eq!(estimate_value(&[100.0]), Some(100));
    }

    #[test]
    fn test_two_samples_use_plain_median() {
        assert_eq!(estimate_value(&[10.0, 20.0]), Some(15));
        assert_eq!(estimate_value(&[1.0, 2.0]), Some(2));
    }

    #[test]
    fn test_trims_outliers() {
        // n=5 trims one from each end: [20, 30, 40]
        assert_eq!(estimate_value(&[10.0, 20.0, 30.0, 40.0, 100.0]), Some(30));
        assert_eq!(estimate_value(&[100.0, 10.0, 40.0, 30.0, 20.0]), Some(30));
    }

    #[test]
    fn test_three_samples() {
        assert_eq!(estimate_value(&[200.0, 210.0, 190.0]), Some(200));
    }

    #[test]
    fn test_even_trimmed_median() {
        // n=4 trims one each end: [20, 30] -> 25
        assert_eq!(estimate_value(&[10.0, 20.0, 30.0, 1000.0]), Some(25));
    }

    #[test]
    fn test_trim_count() {
        assert_eq!(trim_count(0), 0);
        assert_eq!(trim_count(2), 0);
        assert_eq!(trim_count(3), 1);
        assert_eq!(trim_count(19), 1);
        assert_eq!(trim_count(20), 2);
        assert_eq!(trim_count(50), 5);
    }

    #[test]
    fn test_bid_ceiling() {
        assert_eq!(bid_ceiling(None), None);
        assert_eq!(bid_ceiling(Some(1000)), Some(252));
        assert_eq!(bid_ceiling(Some(200)), Some(50));
        assert_eq!(bid_ceiling(Some(0)), Some(0));
    }

    #[test]
    fn test_is_undervalued() {
        assert!(!is_undervalued(None, Some(10)));
        assert!(!is_undervalued(Some(5.0), None));
        assert!(!is_undervalued(None, None));
        assert!(is_undervalued(Some(50.0), Some(50)));
        assert!(is_undervalued(Some(49.99), Some(50)));
        assert!(!is_undervalued(Some(150.0), Some(50)));
    }

    #[test]
    fn test_valuation_from_samples() {
        let valuation = Valuation::from_samples(&[200.0, 210.0, 190.0], 150.0);
        assert_eq!(valuation.ebay_value, Some(200));
        assert_eq!(valuation.my_max_bid, Some(50));
        assert!(!valuation.undervalued);

        let empty = Valuation::from_samples(&[], 0.0);
        assert_eq!(empty.ebay_value, None);
        assert_eq!(empty.my_max_bid, None);
        assert!(!empty.undervalued);
    }

    proptest! {
        #[test]
        fn prop_small_samples_use_plain_median(samples in prop::collection::vec(1u32..100_000, 1..3)) {
            let samples: Vec<f64> = samples.into_iter().map(f64::from).collect();
            let mut sorted = samples.clone();
            sorted.sort_by(f64::total_cmp);
            prop_assert_eq!(estimate_value(&samples), Some(median(&sorted).round() as i64));
        }

        #[test]
        fn prop_trimmed_median_stays_within_trimmed_range(samples in prop::collection::vec(1u32..100_000, 3..60)) {
            let samples: Vec<f64> = samples.into_iter().map(f64::from).collect();
            let mut sorted = samples.clone();
            sorted.sort_by(f64::total_cmp);

            let cut = trim_count(sorted.len());
            prop_assert!(cut >= 1);
            prop_assert!(cut <= ((sorted.len() as f64 * 0.1).floor() as usize).max(1));

            let value = estimate_value(&samples).unwrap() as f64;
            let low = sorted[cut].round();
            let high = sorted[sorted.len() - 1 - cut].round();
            prop_assert!(value >= low && value <= high);
        }

        #[test]
        fn prop_ceiling_absent_iff_value_absent(value in prop::option::of(0i64..1_000_000)) {
            prop_assert_eq!(bid_ceiling(value).is_some(), value.is_some());
        }
    }
}
