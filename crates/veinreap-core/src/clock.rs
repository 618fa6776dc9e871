//! Millisecond time source for hold-grace and batch-debounce decisions.
//!
//! The harvest core never reads the system clock directly; every
//! timestamp flows from a [`TimeSource`]. The canonical
//! [`MonotonicClock`] measures milliseconds since its own construction,
//! which is all the core needs -- hold grace and batch inactivity are
//! relative intervals, never calendar time. Tests use [`ManualClock`]
//! to step time deterministically.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// A source of monotonic millisecond timestamps.
///
/// Implementations must be cheap to query and safe to share across the
/// tick thread and event-delivery threads.
pub trait TimeSource: Send + Sync {
    /// Milliseconds elapsed since the source's epoch. Monotonically
    /// non-decreasing.
    fn now_ms(&self) -> u64;
}

/// The canonical time source: milliseconds since construction, backed by
/// [`Instant`].
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Create a clock whose epoch is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// A manually-stepped time source for tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Create a manual clock starting at the given millisecond timestamp.
    pub const fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    /// Advance the clock by `delta_ms` milliseconds.
    pub fn advance(&self, delta_ms: u64) {
        // fetch_update never fails with a closure that always returns Some.
        let _ = self
            .now
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |t| {
                Some(t.saturating_add(delta_ms))
            });
    }

    /// Set the clock to an absolute millisecond timestamp.
    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::Relaxed);
    }
}

impl TimeSource for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }
}
