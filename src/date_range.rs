//! Date range resolution.
//!
//! Turns a [`Preset`] (plus optional custom bounds) and an explicit `now`
//! into a concrete [`DateRange`] whose start is snapped to 00:00:00.000 and
//! whose end is snapped to 23:59:59.999 on their local calendar days.
//!
//! Everything here is generic over [`chrono::TimeZone`] so callers pass
//! `Local::now()` in production and a pinned `Utc`/`FixedOffset` instant in
//! tests. Nothing reads the system clock.

use std::fmt;

use chrono::{
    DateTime, Datelike, Days, Duration, LocalResult, NaiveDate, NaiveDateTime, Offset,
    SecondsFormat, TimeZone, Utc,
};

use crate::preset::Preset;
use crate::types::DayCount;

/// A resolved, day-aligned date range.
///
/// Both ends are inclusive at day granularity: `start` is the first
/// millisecond of its day and `end` is the last millisecond of its day.
#[derive(Debug, Clone)]
pub struct DateRange<Tz: TimeZone> {
    /// Day-start of the first day in the range
    pub start: DateTime<Tz>,
    /// Day-end of the last day in the range
    pub end: DateTime<Tz>,
}

impl<Tz: TimeZone> PartialEq for DateRange<Tz> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl<Tz: TimeZone> Eq for DateRange<Tz> {}

impl<Tz: TimeZone> DateRange<Tz> {
    /// Build a range covering `start` through `end` in `tz`.
    ///
    /// The dates are taken as given; an `end` before `start` produces an
    /// inverted range, which the validator reports.
    #[must_use]
    pub fn from_dates(start: NaiveDate, end: NaiveDate, tz: &Tz) -> Self {
        Self {
            start: day_start(start, tz),
            end: day_end(end, tz),
        }
    }

    /// Local calendar date of the start.
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Local calendar date of the end.
    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }

    /// Inclusive number of calendar days covered.
    #[must_use]
    pub fn inclusive_days(&self) -> DayCount {
        DayCount::inclusive(self.start_date(), self.end_date())
    }

    /// Whether the end lies before the start.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }

    /// The same range expressed in UTC.
    #[must_use]
    pub fn to_utc(&self) -> DateRange<Utc> {
        DateRange {
            start: self.start.with_timezone(&Utc),
            end: self.end.with_timezone(&Utc),
        }
    }
}

impl<Tz: TimeZone> DateRange<Tz>
where
    Tz::Offset: fmt::Display,
{
    /// Start as an ISO-8601 instant with millisecond precision.
    #[must_use]
    pub fn start_iso(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// End as an ISO-8601 instant with millisecond precision.
    #[must_use]
    pub fn end_iso(&self) -> String {
        self.end.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl<Tz: TimeZone> fmt::Display for DateRange<Tz> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.start_date();
        let end = self.end_date();
        if start == end {
            write!(f, "{}", start.format("%Y-%m-%d"))
        } else {
            write!(f, "{} → {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
        }
    }
}

/// Resolve a preset into a concrete range relative to `now`.
///
/// Returns `None` when the range is unresolved: a custom selection missing
/// either bound. Calendar arithmetic that would leave chrono's representable
/// range also yields `None` instead of panicking.
#[must_use]
pub fn resolve<Tz: TimeZone>(
    preset: Preset,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
    now: &DateTime<Tz>,
) -> Option<DateRange<Tz>> {
    let today = now.date_naive();

    let (start, end) = match preset {
        Preset::Today => (today, today),
        Preset::Yesterday => {
            let yesterday = today.pred_opt()?;
            (yesterday, yesterday)
        }
        Preset::Last7 => (today.checked_sub_days(Days::new(6))?, today),
        Preset::Last30 => (today.checked_sub_days(Days::new(29))?, today),
        Preset::ThisMonth => (first_of_month(today), today),
        Preset::LastMonth => {
            // The day before the 1st is the last day of the previous month,
            // including December of the previous year.
            let last = first_of_month(today).pred_opt()?;
            (first_of_month(last), last)
        }
        Preset::Custom => (custom_start?, custom_end?),
    };

    Some(DateRange::from_dates(start, end, &now.timezone()))
}

/// Snap a civil date to 00:00:00.000 local time.
#[must_use]
pub fn day_start<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Tz> {
    let midnight = date
        .and_hms_milli_opt(0, 0, 0, 0)
        .expect("00:00:00.000 is always valid");
    localize(tz, midnight)
}

/// Snap a civil date to 23:59:59.999 local time.
#[must_use]
pub fn day_end<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Tz> {
    let last_milli = date
        .and_hms_milli_opt(23, 59, 59, 999)
        .expect("23:59:59.999 is always valid");
    localize(tz, last_milli)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("day 1 is always valid")
}

/// Map a wall-clock time onto an instant in `tz`.
///
/// Ambiguous times (clocks rolled back) take the earlier instant. Times
/// skipped by a forward transition are read with the offset in effect before
/// the gap, which lands on the equivalent instant after it.
fn localize<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => {
            let probe = naive.checked_sub_signed(Duration::days(1)).unwrap_or(naive);
            let before = tz.offset_from_utc_datetime(&probe).fix();
            let utc = naive
                .checked_sub_signed(Duration::seconds(i64::from(before.local_minus_utc())))
                .unwrap_or(naive);
            tz.from_utc_datetime(&utc)
        }
    }
}
