//! Position notification throttling.

use std::time::Duration;

use tokio::time::Instant;

/// Minimum time between two intermediate position notifications.
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(10);

/// Rate limiter for position-change notifications.
///
/// Intermediate notifications pass at most once per interval; the final
/// notification of a command is forced through with [`EventThrottle::force`].
#[derive(Debug, Clone)]
pub struct EventThrottle {
    interval: Duration,
    last: Option<Instant>,
}

impl Default for EventThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE)
    }
}

impl EventThrottle {
    /// Create a throttle with the given minimum interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Check whether a notification may be emitted at `now`, recording it if so.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Record an emission that bypassed the interval check.
    pub fn force(&mut self, now: Instant) {
        self.last = Some(now);
    }
}
