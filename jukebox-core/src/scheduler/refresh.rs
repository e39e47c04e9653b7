//! Fixed-cadence refresh timer
//!
//! Tracks the last fire time of one job. The job fires once `interval`
//! milliseconds (plus a phase `offset`) have elapsed since its previous
//! slot. The slot then advances by exactly one interval, so the cadence does
//! not drift and a late poll catches up one period at a time.

use crate::config::RefreshConfig;

/// Interval gate for one polled job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefreshTimer {
    interval_ms: u64,
    offset_ms: u64,
    last_ms: u64,
}

impl RefreshTimer {
    /// Create a timer whose first slot starts at time zero
    pub const fn new(interval_ms: u32, offset_ms: u32) -> Self {
        Self {
            interval_ms: interval_ms as u64,
            offset_ms: offset_ms as u64,
            last_ms: 0,
        }
    }

    /// Create a timer from a configuration section
    pub const fn from_config(config: &RefreshConfig) -> Self {
        Self::new(config.interval_ms, config.offset_ms)
    }

    /// Check whether the job is due at `now_ms`
    ///
    /// Returns `true` at most once per elapsed interval.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let elapsed = now_ms.saturating_sub(self.last_ms);
        if elapsed < self.offset_ms + self.interval_ms {
            return false;
        }
        self.last_ms += self.interval_ms;
        true
    }

    /// Start counting from `now_ms`
    pub fn reset(&mut self, now_ms: u64) {
        self.last_ms = now_ms;
    }

    /// Milliseconds until the next slot (zero if already due)
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        let due = self.last_ms + self.offset_ms + self.interval_ms;
        due.saturating_sub(now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fires_on_interval() {
        let mut timer = RefreshTimer::new(250, 0);
        assert!(!timer.poll(0));
        assert!(!timer.poll(249));
        assert!(timer.poll(250));
        assert!(!timer.poll(250));
        assert!(!timer.poll(499));
        assert!(timer.poll(500));
    }

    #[test]
    fn test_offset_shifts_phase() {
        let mut timer = RefreshTimer::new(100, 30);
        assert!(!timer.poll(100));
        assert!(!timer.poll(129));
        assert!(timer.poll(130));
        assert!(!timer.poll(229));
        assert!(timer.poll(230));
    }

    #[test]
    fn test_catches_up_one_period_per_poll() {
        let mut timer = RefreshTimer::new(100, 0);
        // Late by three periods
        assert!(timer.poll(350));
        assert!(timer.poll(350));
        assert!(timer.poll(350));
        assert!(!timer.poll(350));
        // Cadence is kept: next slot at 400
        assert!(timer.poll(400));
    }

    #[test]
    fn test_reset_rebases() {
        let mut timer = RefreshTimer::new(100, 0);
        timer.reset(1_000);
        assert!(!timer.poll(1_099));
        assert!(timer.poll(1_100));
        assert_eq!(timer.remaining_ms(1_150), 50);
    }

    #[test]
    fn test_clock_before_base_never_fires() {
        let mut timer = RefreshTimer::new(10, 0);
        timer.reset(500);
        assert!(!timer.poll(0));
        assert_eq!(timer.remaining_ms(0), 510);
    }

    proptest! {
        #[test]
        fn prop_fire_count_matches_elapsed_periods(
            interval in 1u32..=250,
            steps in proptest::collection::vec(0u64..400, 1..50),
        ) {
            let mut timer = RefreshTimer::new(interval, 0);
            let mut now = 0u64;
            let mut fired = 0u64;
            for step in steps {
                now += step;
                if timer.poll(now) {
                    fired += 1;
                }
            }
            // Never ahead of the clock
            prop_assert!(fired <= now / u64::from(interval));
        }
    }
}
