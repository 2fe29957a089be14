use std::time::{Duration, Instant};

/// Fixed-period timer polled from the host's event loop.
#[derive(Debug, Clone)]
pub struct RepeatingTimer {
    period: Duration,
    next_due: Instant,
}

impl RepeatingTimer {
    pub fn new(startup_delay: Duration, period: Duration, now: Instant) -> Self {
        Self {
            period,
            next_due: now + startup_delay,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns `true` at most once per due time and re-arms one period out.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due = now + self.period;
        true
    }

    pub fn until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}
