//! Fixed-delay rate limiting between requests
//!
//! The crawl is sequential, so rate limiting is just the coordinator
//! suspending before its next request: a base delay after every detail page
//! and twice that before the next listing page.

use std::time::Duration;

/// Suspends the crawl between requests
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    item_delay: Duration,
}

impl RateLimiter {
    /// Creates a limiter whose per-item delay is `item_delay`
    pub fn new(item_delay: Duration) -> Self {
        Self { item_delay }
    }

    pub fn from_millis(item_delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(item_delay_ms))
    }

    /// Delay applied after each detail page
    pub fn item_delay(&self) -> Duration {
        self.item_delay
    }

    /// Delay applied before each listing page after the first
    pub fn listing_delay(&self) -> Duration {
        self.item_delay.saturating_mul(2)
    }

    /// Suspends for `duration`; a zero duration returns immediately
    pub async fn delay(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        tracing::trace!("Rate limiting: sleeping {:?}", duration);
        tokio::time::sleep(duration).await;
    }

    pub async fn pause_after_item(&self) {
        self.delay(self.item_delay()).await;
    }

    pub async fn pause_between_listings(&self) {
        self.delay(self.listing_delay()).await;
    }
}
