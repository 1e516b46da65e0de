//! Request pacing.
//!
//! Marketplace searches are preceded by a short pause to stay under remote
//! rate limits. The policy is injected so tests can run without delays.

use async_trait::async_trait;

/// Decides how long to wait before an outbound request.
#[async_trait]
pub trait RequestPacer: Send + Sync {
    /// Wait until the next request may be sent.
    async fn pause(&self);
}
