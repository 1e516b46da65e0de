//! Comparable price source trait.

use async_trait::async_trait;

use crate::error::CompsResult;
use crate::types::outcome::CompsOutcome;

/// Source of recently sold prices for a search phrase.
///
/// The production implementation ([`ComparablePriceFetcher`]) never returns
/// an error: failures come back as an empty [`CompsOutcome`]. The `Result`
/// exists so the pipeline can isolate sources that do fail.
///
/// [`ComparablePriceFetcher`]: crate::comps::ComparablePriceFetcher
#[async_trait]
pub trait ComparablePrices: Send + Sync {
    /// Up to `count` sold prices for `query`, in page order.
    async fn sold_prices(&self, query: &str, count: usize) -> CompsResult<CompsOutcome>;
}
