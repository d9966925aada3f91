use std::time::{Duration, Instant};

/// Fixed-period tick source driven by the event loop.
pub struct Clock {
    period: Duration,
    last: Instant,
}

impl Clock {
    pub fn new(period: Duration, now: Instant) -> Self {
        assert!(!period.is_zero(), "tick period must be non-zero");
        Self { period, last: now }
    }

    /// Whole periods elapsed since the last accounted tick. The reference
    /// point advances by exactly that many periods, so the remainder
    /// carries into the next call.
    pub fn elapsed(&mut self, now: Instant) -> u32 {
        let since = now.saturating_duration_since(self.last);
        let ticks = (since.as_nanos() / self.period.as_nanos()) as u32;
        self.last += self.period * ticks;
        ticks
    }

    pub fn deadline(&self) -> Instant {
        self.last + self.period
    }

    pub fn reset(&mut self, now: Instant) {
        self.last = now;
    }
}
