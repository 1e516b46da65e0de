// HTTP routes
pub mod analyze;
pub mod comps;
pub mod export;
pub mod health;
pub mod scrape;

pub use analyze::*;
pub use comps::*;
pub use export::*;
pub use health::*;
pub use scrape::*;
