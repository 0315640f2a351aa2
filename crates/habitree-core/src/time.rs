//! Wall-clock access for the daily rollover
//!
//! - `TimeSource` - injectable source of "now" and today's weekday
//! - `SystemClock` - the real clock
//! - `ManualClock` - a settable clock for tests and demos

use chrono::{DateTime, Datelike, Duration, Local, Utc, Weekday};
use std::cell::Cell;

/// Source of the current time
pub trait TimeSource {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Weekday used to decide which habits are active today
    fn weekday(&self) -> Weekday {
        self.now().with_timezone(&Local).weekday()
    }
}

/// The system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to
///
/// The weekday is taken in UTC so tests do not depend on the host time zone.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Jump to an instant
    pub fn set(&self, instant: DateTime<Utc>) {
        self.now.set(instant);
    }

    /// Move forward by a duration
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Move forward by whole days
    pub fn advance_days(&self, days: i64) {
        self.advance(Duration::days(days));
    }

    /// Move forward by hours
    pub fn advance_hours(&self, hours: i64) {
        self.advance(Duration::hours(hours));
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn weekday(&self) -> Weekday {
        self.now.get().weekday()
    }
}

/// Whole days between two instants; partial days and negative spans count as zero
pub fn whole_days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> u32 {
    let days = (later - earlier).num_days();
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn monday_noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(monday_noon());
        assert_eq!(clock.weekday(), Weekday::Mon);

        clock.advance_days(2);
        assert_eq!(clock.weekday(), Weekday::Wed);

        clock.advance_hours(13);
        assert_eq!(clock.weekday(), Weekday::Thu);

        clock.set(monday_noon());
        assert_eq!(clock.now(), monday_noon());
        assert_eq!(clock.weekday(), Weekday::Mon);
    }

    #[test]
    fn test_whole_days_between() {
        let start = monday_noon();
        assert_eq!(whole_days_between(start, start), 0);
        assert_eq!(whole_days_between(start, start + Duration::hours(23)), 0);
        assert_eq!(whole_days_between(start, start + Duration::hours(24)), 1);
        assert_eq!(whole_days_between(start, start + Duration::hours(73)), 3);
        assert_eq!(whole_days_between(start, start - Duration::days(2)), 0);
    }
}
