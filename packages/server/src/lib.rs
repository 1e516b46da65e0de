// Auction Lot Scout - API Core
//
// HTTP front end for the lot-scout library: analyze an auction listing,
// look up sold comparables, scrape raw lots and export rows as CSV.

pub mod config;
pub mod server;

pub use config::*;
