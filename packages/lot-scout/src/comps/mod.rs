//! Comparable sold prices.
//!
//! - `ComparablePriceFetcher` - Sold-listing search with an optional API path
//! - `JitterPacer` / `NoDelay` - Request pacing policies

pub mod fetcher;
pub mod pacing;

pub use fetcher::{parse_sold_prices, ComparablePriceFetcher};
pub use pacing::{JitterPacer, NoDelay};

// Re-export from traits for convenience
pub use crate::traits::comps::ComparablePrices;
pub use crate::traits::pacer::RequestPacer;
