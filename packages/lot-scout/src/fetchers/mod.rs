//! Page fetcher implementations.
//!
//! - `HttpFetcher` - Direct HTTP fetching with a browser-like client
//! - `RateLimitedFetcher` - Wrapper that adds a per-host rate limit

pub mod http;
pub mod rate_limited;

pub use http::{HttpFetcher, HttpFetcherBuilder};
pub use rate_limited::{FetcherExt, RateLimitedFetcher};

// Re-export from traits for convenience
pub use crate::traits::fetcher::{FetchedPage, PageFetcher};
