//! Domain-specific newtypes for type safety.
//!
//! Day counts show up in window checks, CLI output and configuration; keeping
//! them in a dedicated type stops an inclusive count from being mixed up with
//! a raw calendar difference. Uses `derive_more` for the formatting
//! boilerplate while staying zero-cost.

use chrono::NaiveDate;
use derive_more::Display;

// ============================================================================
// DayCount
// ============================================================================

/// A number of calendar days.
///
/// Ranges count days inclusively: a range starting and ending on the same
/// date spans one day.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
)]
pub struct DayCount(pub i64);

impl DayCount {
    /// Create a new instance.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Inclusive number of calendar days from `start` through `end`.
    ///
    /// `end` before `start` gives zero or a negative count.
    #[must_use]
    pub fn inclusive(start: NaiveDate, end: NaiveDate) -> Self {
        Self((end - start).num_days() + 1)
    }

    /// Whether this count is strictly greater than `limit` days.
    #[must_use]
    pub fn exceeds(self, limit: u32) -> bool {
        self.0 > i64::from(limit)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn display() {
        assert_eq!(DayCount::new(30).to_string(), "30");
    }

    #[test]
    fn inclusive_counting() {
        assert_eq!(
            DayCount::inclusive(date(2024, 3, 15), date(2024, 3, 15)),
            DayCount::new(1)
        );
        assert_eq!(
            DayCount::inclusive(date(2024, 3, 9), date(2024, 3, 15)),
            DayCount::new(7)
        );
        // Crosses the leap day
        assert_eq!(
            DayCount::inclusive(date(2024, 2, 28), date(2024, 3, 1)),
            DayCount::new(3)
        );
        assert_eq!(
            DayCount::inclusive(date(2024, 3, 10), date(2024, 3, 5)),
            DayCount::new(-4)
        );
    }

    #[test]
    fn exceeds_is_strict() {
        assert!(!DayCount::new(7).exceeds(7));
        assert!(DayCount::new(8).exceeds(7));
        assert!(!DayCount::new(-3).exceeds(0));
    }
}
