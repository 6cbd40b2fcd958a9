//! Shared request throttle.
//!
//! Every search request goes through one `RateLimiter`, so the minimum gap
//! between a finished request and the next one holds across all workers.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};

/// Enforces a fixed minimum interval between outbound requests.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// Wait for the next free slot and reserve it.
    ///
    /// The lock is held while sleeping so waiters are released one at a time.
    pub async fn acquire(&self) {
        let mut next = self.next_slot.lock().await;
        if let Some(at) = *next {
            sleep_until(at).await;
        }
        *next = Some(Instant::now() + self.interval);
    }

    /// Record that a request finished; the next slot opens one interval later.
    ///
    /// Called after every request, successful or not.
    pub async fn complete(&self) {
        let mut next = self.next_slot.lock().await;
        let after_completion = Instant::now() + self.interval;
        *next = Some(match *next {
            Some(at) if at > after_completion => at,
            _ => after_completion,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_acquire_is_immediate() {
        let limiter = RateLimiter::from_millis(3000);
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn next_request_waits_one_interval_after_completion() {
        let limiter = RateLimiter::from_millis(3000);
        limiter.acquire().await;
        tokio::time::advance(Duration::from_millis(500)).await;
        limiter.complete().await;

        let completed_at = Instant::now();
        limiter.acquire().await;
        assert!(completed_at.elapsed() >= Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_never_waits() {
        let limiter = RateLimiter::from_millis(0);
        let start = Instant::now();
        for _ in 0..5 {
            limiter.acquire().await;
            limiter.complete().await;
        }
        assert!(start.elapsed() < Duration::from_millis(1));
    }
}
