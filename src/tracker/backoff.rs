use std::time::Duration;

/// Exponential backoff schedule: `initial * multiplier^n`, capped at `max`.
#[derive(Debug, Clone)]
pub struct Backoff {
    next: Duration,
    multiplier: u32,
    max: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, multiplier: u32, max: Duration) -> Self {
        Self { next: initial.min(max), multiplier: multiplier.max(1), max }
    }

    /// Delay to wait before the next attempt; advances the schedule.
    pub fn next_delay(&mut self) -> Duration {
        let current = self.next;
        self.next = current.saturating_mul(self.multiplier).min(self.max);
        current
    }

    /// Delay the next call to [`Backoff::next_delay`] will return.
    pub fn peek(&self) -> Duration {
        self.next
    }
}
