//! Typed errors for the lot scout library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Most failures in this crate are recoverable and never reach the caller as
//! an error: page fetches degrade to partial results and comparable lookups
//! degrade to empty samples. Only a malformed or unsupported auction
//! reference is terminal.

use thiserror::Error;

/// Errors surfaced to callers of the scout pipeline.
#[derive(Debug, Error)]
pub enum ScoutError {
    /// The auction reference could not be parsed as a URL
    #[error("invalid auction URL: {url}")]
    InvalidUrl { url: String },

    /// The auction reference points somewhere we refuse to fetch
    #[error("blocked auction URL: {0}")]
    BlockedUrl(#[from] SecurityError),

    /// No adapter matches the host
    #[error("unsupported auction site: {host}")]
    UnsupportedSource { host: String },

    /// Crawl operation failed
    #[error("crawl failed: {0}")]
    Crawl(#[from] CrawlError),
}

impl ScoutError {
    /// Whether the caller sent a request we can never serve.
    ///
    /// These map to client errors at the HTTP boundary.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ScoutError::InvalidUrl { .. }
                | ScoutError::BlockedUrl(_)
                | ScoutError::UnsupportedSource { .. }
        )
    }
}

/// Errors that can occur while fetching a page.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// Connection timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },
}

/// Errors from the comparable-sales lookup.
#[derive(Debug, Error)]
pub enum CompsError {
    /// The marketplace API path is not available
    #[error("marketplace API unavailable")]
    ApiUnavailable,

    /// Fetching the search results failed
    #[error("fetch failed: {0}")]
    Fetch(#[from] CrawlError),

    /// The lookup panicked
    #[error("lookup panicked: {0}")]
    Panicked(String),
}

/// Security-related errors, primarily for SSRF protection.
#[derive(Debug, Error)]
pub enum SecurityError {
    /// URL scheme not allowed (e.g., file://, ftp://)
    #[error("disallowed URL scheme: {0}")]
    DisallowedScheme(String),

    /// Host is blocked (e.g., localhost, internal IPs)
    #[error("blocked host: {0}")]
    BlockedHost(String),

    /// IP in blocked CIDR range (e.g., 10.0.0.0/8)
    #[error("blocked IP range: {0}")]
    BlockedCidr(String),

    /// URL has no host
    #[error("URL has no host")]
    NoHost,

    /// The host name could not be resolved
    #[error("DNS resolution failed: {0}")]
    DnsResolution(String),
}

/// Result type alias for scout operations.
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for crawl operations.
pub type CrawlResult<T> = std::result::Result<T, CrawlError>;

/// Result type alias for comparable lookups.
pub type CompsResult<T> = std::result::Result<T, CompsError>;

/// Result type alias for security operations.
pub type SecurityResult<T> = std::result::Result<T, SecurityError>;
