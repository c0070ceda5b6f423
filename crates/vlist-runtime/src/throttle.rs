#![forbid(unsafe_code)]

//! Scroll-position throttling.
//!
//! Scroll sources fire far more often than the window needs recomputing.
//! [`ScrollThrottle`] applies at most one position per interval using a
//! "latest wins" strategy:
//!
//! - The first event after a quiet interval is applied immediately.
//! - Events inside the interval overwrite a single pending slot; the
//!   positions they replace are dropped, never queued.
//! - [`ScrollThrottle::flush`] applies the pending position once the
//!   interval has elapsed, so the final resting position is never lost.
//!
//! # Usage
//!
//! ```
//! use vlist_runtime::throttle::ScrollThrottle;
//! use web_time::{Duration, Instant};
//!
//! let mut throttle = ScrollThrottle::from_millis(50);
//! let t0 = Instant::now();
//!
//! assert_eq!(throttle.offer(10.0, t0), Some(10.0));
//! assert_eq!(throttle.offer(20.0, t0 + Duration::from_millis(10)), None);
//! assert_eq!(throttle.offer(30.0, t0 + Duration::from_millis(20)), None);
//!
//! // Only the latest position survives the window.
//! assert_eq!(throttle.flush(t0 + Duration::from_millis(60)), Some(30.0));
//! assert_eq!(throttle.dropped(), 1);
//! ```
//!
//! The throttle is not thread-safe; it lives with the scroll handler.

use web_time::{Duration, Instant};

/// Fixed-interval, latest-wins scroll throttle.
#[derive(Debug, Clone)]
pub struct ScrollThrottle {
    interval: Duration,
    last_applied: Option<Instant>,
    pending: Option<f64>,
    dropped: u64,
}

impl ScrollThrottle {
    /// Create a throttle with the given interval.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_applied: None,
            pending: None,
            dropped: 0,
        }
    }

    /// Create a throttle with an interval in milliseconds.
    #[must_use]
    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// The configured interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn ready(&self, now: Instant) -> bool {
        match self.last_applied {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    /// Offer a raw scroll position.
    ///
    /// Returns `Some(px)` if it should be applied now, or `None` if it was
    /// parked as the pending position.
    pub fn offer(&mut self, px: f64, now: Instant) -> Option<f64> {
        if self.ready(now) {
            if self.pending.take().is_some() {
                self.dropped += 1;
            }
            self.last_applied = Some(now);
            return Some(px);
        }
        if self.pending.replace(px).is_some() {
            self.dropped += 1;
        }
        None
    }

    /// Release the pending position if the interval has elapsed.
    pub fn flush(&mut self, now: Instant) -> Option<f64> {
        if self.pending.is_none() || !self.ready(now) {
            return None;
        }
        self.last_applied = Some(now);
        self.pending.take()
    }

    /// When the pending position becomes flushable, if there is one.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending?;
        Some(match self.last_applied {
            Some(last) => last + self.interval,
            None => return None,
        })
    }

    /// The parked position, if any.
    #[must_use]
    pub fn pending(&self) -> Option<f64> {
        self.pending
    }

    /// Positions discarded because a newer one replaced them.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
