use std::time::{Duration, Instant};

/// Tick period used by the viewer: one animation step every 60 ms.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(60);

/// Fixed-interval tick source.
///
/// `FixedTicker` does not replay missed ticks. When the loop wakes up late the
/// tick fires once and the schedule is re-anchored to the wake-up time, so a
/// stalled window does not burst through a backlog of animation steps.
#[derive(Debug, Clone)]
pub struct FixedTicker {
    interval: Duration,
    next: Instant,
    ticks: u64,
}

impl FixedTicker {
    /// Creates a ticker whose first tick is due one `interval` from now.
    pub fn new(interval: Duration) -> Self {
        Self::starting_at(interval, Instant::now())
    }

    /// Creates a ticker anchored at `start`.
    pub fn starting_at(interval: Duration, start: Instant) -> Self {
        debug_assert!(!interval.is_zero());
        Self {
            interval,
            next: start + interval,
            ticks: 0,
        }
    }

    /// Instant at which the next tick becomes due.
    #[inline]
    pub fn deadline(&self) -> Instant {
        self.next
    }

    /// Number of ticks fired so far.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Resets the schedule so the next tick is one interval after `now`.
    pub fn reset(&mut self, now: Instant) {
        self.next = now + self.interval;
    }

    /// Returns `true` when a tick is due at `now` and advances the schedule.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }

        self.next += self.interval;
        if self.next <= now {
            // More than one period behind.
            self.next = now + self.interval;
        }

        self.ticks = self.ticks.wrapping_add(1);
        true
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn not_due_before_interval() {
        let t0 = Instant::now();
        let mut ticker = FixedTicker::starting_at(ms(60), t0);
        assert!(!ticker.poll(t0));
        assert!(!ticker.poll(t0 + ms(59)));
        assert_eq!(ticker.ticks(), 0);
    }

    #[test]
    fn fires_on_schedule() {
        let t0 = Instant::now();
        let mut ticker = FixedTicker::starting_at(ms(60), t0);
        assert!(ticker.poll(t0 + ms(60)));
        assert_eq!(ticker.deadline(), t0 + ms(120));
        assert!(!ticker.poll(t0 + ms(100)));
        assert!(ticker.poll(t0 + ms(125)));
        // Small lateness keeps the original cadence.
        assert_eq!(ticker.deadline(), t0 + ms(180));
        assert_eq!(ticker.ticks(), 2);
    }

    #[test]
    fn late_wakeup_fires_once_and_reanchors() {
        let t0 = Instant::now();
        let mut ticker = FixedTicker::starting_at(ms(60), t0);
        let late = t0 + ms(1000);
        assert!(ticker.poll(late));
        assert!(!ticker.poll(late));
        assert_eq!(ticker.deadline(), late + ms(60));
        assert_eq!(ticker.ticks(), 1);
    }

    #[test]
    fn reset_moves_deadline() {
        let t0 = Instant::now();
        let mut ticker = FixedTicker::starting_at(ms(60), t0);
        ticker.reset(t0 + ms(500));
        assert_eq!(ticker.deadline(), t0 + ms(560));
    }
}
