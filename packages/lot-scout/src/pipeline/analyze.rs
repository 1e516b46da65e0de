//! Per-lot valuation with failure isolation.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::{FutureExt, StreamExt};
use tracing::{debug, error, warn};

use crate::error::{CompsError, CompsResult};
use crate::title::{clean_title, ebay_sold_link, search_title};
use crate::traits::comps::ComparablePrices;
use crate::types::config::AnalyzeOptions;
use crate::types::lot::{AnalysisRow, ComparableResult, Lot};
use crate::valuation::{estimate_value, Valuation};

/// Values lots against sold comparables.
///
/// A failing or panicking lookup only degrades its own row. Output order
/// always matches input order, whatever the concurrency.
pub struct Analyzer {
    comps: Arc<dyn ComparablePrices>,
    max_concurrent: usize,
}

impl Analyzer {
    /// Create an analyzer that values one lot at a time.
    pub fn new(comps: Arc<dyn ComparablePrices>) -> Self {
        Self {
            comps,
            max_concurrent: 1,
        }
    }

    /// Allow up to `max` lookups in flight. 0 is treated as 1.
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max.max(1);
        self
    }

    /// One row per lot, in lot order.
    pub async fn analyze_lots(&self, lots: Vec<Lot>, options: &AnalyzeOptions) -> Vec<AnalysisRow> {
        futures::stream::iter(lots)
            .map(|lot| async move { self.analyze_lot(&lot, options).await })
            .buffered(self.max_concurrent)
            .collect()
            .await
    }

    /// Value a single lot, degrading the row on any failure.
    pub async fn analyze_lot(&self, lot: &Lot, options: &AnalyzeOptions) -> AnalysisRow {
        let query = search_title(&lot.title, options.strip_lot_prefix);
        let ebay_value_link = ebay_sold_link(&clean_title(&lot.title));

        let valued = guarded(async {
            let outcome = self.comps.sold_prices(&query, options.recent_count).await?;
            Ok(Valuation::from_samples(&outcome.samples, lot.current_bid))
        })
        .await;

        match valued {
            Ok(valuation) => {
                debug!(
                    lot = %lot.lot_number,
                    query = %query,
                    value = ?valuation.ebay_value,
                    undervalued = valuation.undervalued,
                    "Valued lot"
                );
                AnalysisRow {
                    lot_number: lot.lot_number.clone(),
                    item_title: lot.title.clone(),
                    ebay_value: valuation.ebay_value,
                    ebay_value_link,
                    my_max_bid: valuation.my_max_bid,
                    my_max_bid_link: lot.lot_url.clone(),
                    current_bid: lot.current_bid,
                    undervalued: valuation.undervalued,
                }
            }
            Err(e) => {
                log_lookup_failure(&lot.lot_number, &query, &e);
                AnalysisRow::degraded(lot, ebay_value_link)
            }
        }
    }

    /// Sold samples and value for each title, in input order.
    ///
    /// A failed lookup yields empty samples and no value; no title is dropped.
    pub async fn lookup_comparables(
        &self,
        titles: Vec<String>,
        options: &AnalyzeOptions,
    ) -> Vec<ComparableResult> {
        futures::stream::iter(titles)
            .map(|title| async move {
                let query = search_title(&title, options.strip_lot_prefix);
                let samples = match guarded(self.comps.sold_prices(&query, options.recent_count))
                    .await
                {
                    Ok(outcome) => outcome.samples,
                    Err(e) => {
                        log_lookup_failure(&title, &query, &e);
                        Vec::new()
                    }
                };

                ComparableResult {
                    ebay_value: estimate_value(&samples),
                    sold_samples: samples,
                    title,
                }
            })
            .buffered(self.max_concurrent)
            .collect()
            .await
    }
}

/// Run a lookup, turning a panic into [`CompsError::Panicked`].
async fn guarded<T, F>(lookup: F) -> CompsResult<T>
where
    F: Future<Output = CompsResult<T>>,
{
    match AssertUnwindSafe(lookup).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(CompsError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn log_lookup_failure(item: &str, query: &str, e: &CompsError) {
    match e {
        CompsError::Panicked(_) => {
            error!(item = %item, query = %query, error = %e, "Comparable lookup panicked")
        }
        _ => warn!(item = %item, query = %query, error = %e, "Comparable lookup failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockComps;

    fn lot(number: &str, title: &str, bid: f64) -> Lot {
        Lot::from_parts(number, title, bid, format!("https://hibid.com/lot/{}", number)).unwrap()
    }

    #[tokio::test]
    async fn test_values_lot() {
        let comps = MockComps::new().with_prices("Antique Clock", vec![200.0, 210.0, 190.0]);
        let analyzer = Analyzer::new(Arc::new(comps.clone()));

        let row = analyzer
            .analyze_lot(&lot("12", "Lot 12: Antique Clock", 150.0), &AnalyzeOptions::default())
            .await;

        assert_eq!(row.item_title, "Lot 12: Antique Clock");
        assert_eq!(row.ebay_value, Some(200));
        assert_eq!(row.my_max_bid, Some(50));
        assert!(!row.undervalued);
        assert_eq!(row.my_max_bid_link, "https://hibid.com/lot/12");
        assert!(row.ebay_value_link.contains("_nkw=Antique+Clock"));
        assert_eq!(comps.calls()[0].count, 5);
    }

    #[tokio::test]
    async fn test_raw_title_when_prefix_kept() {
        let comps = MockComps::new();
        let analyzer = Analyzer::new(Arc::new(comps.clone()));
        let options = AnalyzeOptions::new().with_strip_lot_prefix(false);

        let row = analyzer.analyze_lot(&lot("3", "Lot 3: Lamp", 5.0), &options).await;

        assert_eq!(comps.queries(), vec!["Lot 3: Lamp"]);
        // The link is always built from the cleaned title
        assert!(row.ebay_value_link.contains("_nkw=Lamp"));
    }

    #[tokio::test]
    async fn test_failure_degrades_only_that_row() {
        let comps = MockComps::new()
            .failing("Broken")
            .panicking("Explodes")
            .with_prices("Clock", vec![1000.0]);
        let analyzer = Analyzer::new(Arc::new(comps));

        let lots = vec![
            lot("1", "Broken", 10.0),
            lot("2", "Explodes", 10.0),
            lot("3", "Clock", 10.0),
        ];
        let rows = analyzer.analyze_lots(lots, &AnalyzeOptions::default()).await;

        assert_eq!(rows.len(), 3);
        assert!(!rows[0].is_valued());
        assert!(!rows[0].undervalued);
        assert!(!rows[1].is_valued());
        assert_eq!(rows[2].ebay_value, Some(1000));
        assert_eq!(rows[2].my_max_bid, Some(252));
        assert!(rows[2].undervalued);
    }

    #[tokio::test]
    async fn test_concurrent_keeps_order() {
        let comps = MockComps::new()
            .with_prices("A", vec![10.0])
            .with_prices("B", vec![20.0])
            .with_prices("C", vec![30.0]);
        let analyzer = Analyzer::new(Arc::new(comps)).with_max_concurrent(3);

        let lots = vec![lot("1", "A", 0.0), lot("2", "B", 0.0), lot("3", "C", 0.0)];
        let rows = analyzer.analyze_lots(lots, &AnalyzeOptions::default()).await;

        let numbers: Vec<_> = rows.iter().map(|r| r.lot_number.as_str()).collect();
        assert_eq!(numbers, vec!["1", "2", "3"]);
        assert_eq!(rows[2].ebay_value, Some(30));
    }

    #[tokio::test]
    async fn test_lookup_comparables_keeps_every_title() {
        let comps = MockComps::new()
            .with_prices("Clock", vec![100.0, 120.0])
            .failing("Lamp");
        let analyzer = Analyzer::new(Arc::new(comps));

        let results = analyzer
            .lookup_comparables(
                vec!["Lot 1: Clock".to_string(), "Lamp".to_string()],
                &AnalyzeOptions::default(),
            )
            .await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Lot 1: Clock");
        assert_eq!(results[0].sold_samples, vec![100.0, 120.0]);
        assert_eq!(results[0].ebay_value, Some(110));
        assert_eq!(results[1].title, "Lamp");
        assert!(results[1].sold_samples.is_empty());
        assert_eq!(results[1].ebay_value, None);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
    }
}
