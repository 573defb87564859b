//! Minimum-spacing rate limiter for outbound geocoding requests.

use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

/// Nominatim allows at most one request per second; leave some slack.
pub const DEFAULT_GEOCODE_INTERVAL: Duration = Duration::from_millis(1100);

/// Spaces calls at least `min_interval` apart across all threads sharing it.
///
/// Each caller reserves the next free slot while holding the lock and then
/// sleeps outside it, so two callers can never land in the same window.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_slot: Mutex<Option<Instant>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_GEOCODE_INTERVAL)
    }
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_slot: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Blocks the calling thread until its slot arrives.
    pub fn acquire(&self) {
        let wait = self.reserve(Instant::now());
        if !wait.is_zero() {
            debug!(wait_ms = wait.as_millis() as u64, "rate limited, waiting");
            thread::sleep(wait);
        }
    }

    /// Claims the next slot at or after `now` and returns how long to wait.
    fn reserve(&self, now: Instant) -> Duration {
        let mut last_slot = self.last_slot.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = match *last_slot {
            Some(previous) => (previous + self.min_interval).max(now),
            None => now,
        };
        *last_slot = Some(slot);
        slot.saturating_duration_since(now)
    }
}
