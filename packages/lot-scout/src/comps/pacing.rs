//! Request pacer implementations.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::trace;

use crate::traits::pacer::RequestPacer;

/// Sleeps a uniformly random duration between two bounds.
#[derive(Debug, Clone, Copy)]
pub struct JitterPacer {
    min: Duration,
    max: Duration,
}

impl JitterPacer {
    /// Bounds are swapped when given out of order.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self::new(Duration::from_millis(min_ms), Duration::from_millis(max_ms))
    }

    /// Draw the next delay.
    pub fn next_delay(&self) -> Duration {
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

impl Default for JitterPacer {
    fn default() -> Self {
        Self::from_millis(200, 500)
    }
}

#[async_trait]
impl RequestPacer for JitterPacer {
    async fn pause(&self) {
        // ThreadRng is not Send; draw before awaiting.
        let delay = self.next_delay();
        trace!(delay_ms = delay.as_millis() as u64, "Pacing request");
        tokio::time::sleep(delay).await;
    }
}

/// Never waits. For tests and offline runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl RequestPacer for NoDelay {
    async fn pause(&self) {}
}
