//! Free-tier generation quota.
//!
//! Free users get a fixed number of PDF generations per rolling 24-hour
//! window. The trait is the seam a cookie- or database-backed tracker
//! implements; [`FreeTierCounter`] keeps the window in process.

use chrono::{DateTime, Duration, Utc};

/// Length of the quota window.
pub const WINDOW_HOURS: i64 = 24;

/// Tracks how many documents were generated in the current window.
pub trait QuotaTracker {
    /// Generations consumed in the current window.
    fn current_count(&mut self) -> u32;

    /// Record one generation.
    fn increment(&mut self);

    /// The window's generation limit.
    fn limit(&self) -> u32;

    /// Generations left in the current window.
    fn remaining(&mut self) -> u32 {
        self.limit().saturating_sub(self.current_count())
    }

    /// Whether another generation is allowed.
    fn can_generate(&mut self) -> bool {
        self.current_count() < self.limit()
    }
}

/// In-process quota counter with a rolling 24-hour window.
#[derive(Debug, Clone)]
pub struct FreeTierCounter {
    limit: u32,
    count: u32,
    window_started: DateTime<Utc>,
}

impl FreeTierCounter {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            count: 0,
            window_started: Utc::now(),
        }
    }

    /// Reset the count once the window has elapsed.
    fn roll_window(&mut self) {
        let now = Utc::now();
        if now - self.window_started >= Duration::hours(WINDOW_HOURS) {
            self.count = 0;
            self.window_started = now;
        }
    }

    #[cfg(test)]
    fn backdate_window(&mut self, hours: i64) {
        self.window_started = self.window_started - Duration::hours(hours);
    }
}

impl QuotaTracker for FreeTierCounter {
    fn current_count(&mut self) -> u32 {
        self.roll_window();
        self.count
    }

    fn increment(&mut self) {
        self.roll_window();
        self.count += 1;
    }

    fn limit(&self) -> u32 {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_up_to_limit() {
        let mut counter = FreeTierCounter::new(3);
        assert!(counter.can_generate());
        assert_eq!(counter.remaining(), 3);

        counter.increment();
        counter.increment();
        assert_eq!(counter.current_count(), 2);
        assert_eq!(counter.remaining(), 1);
        assert!(counter.can_generate());

        counter.increment();
        assert!(!counter.can_generate());
        assert_eq!(counter.remaining(), 0);
    }

    #[test]
    fn test_remaining_never_underflows() {
        let mut counter = FreeTierCounter::new(1);
        counter.increment();
        counter.increment();
        assert_eq!(counter.remaining(), 0);
    }

    #[test]
    fn test_window_resets_after_24_hours() {
        let mut counter = FreeTierCounter::new(2);
        counter.increment();
        counter.increment();
        assert!(!counter.can_generate());

        counter.backdate_window(25);
        assert_eq!(counter.current_count(), 0);
        assert!(counter.can_generate());
    }

    #[test]
    fn test_window_holds_before_24_hours() {
        let mut counter = FreeTierCounter::new(1);
        counter.increment();
        counter.backdate_window(23);
        assert!(!counter.can_generate());
    }
}
