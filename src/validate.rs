//! Policy checks for resolved ranges.
//!
//! Three independent constraints are evaluated and every failing one is
//! reported, so a caller can show all applicable messages at once:
//!
//! - [`Violation::Ordering`] - the end lies before the start
//! - [`Violation::Future`] - the end lies after `now` while future ranges are disallowed
//! - [`Violation::Window`] - the range spans more inclusive days than allowed

use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::date_range::DateRange;

/// Caller-supplied constraints on an acceptable range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Reject ranges whose end is after the current instant
    pub disallow_future: bool,

    /// Reject ranges covering more inclusive days than this.
    ///
    /// `Some(0)` is the same as `None`: no window limit.
    pub max_window_days: Option<u32>,
}

impl Policy {
    /// Effective window limit in days, if any.
    #[must_use]
    pub fn window_limit(&self) -> Option<u32> {
        self.max_window_days.filter(|&days| days > 0)
    }

    /// Latest civil date a date input should offer, if capped.
    ///
    /// Only an input affordance; [`validate`] is what actually rejects
    /// future ranges.
    #[must_use]
    pub fn max_input_date<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<NaiveDate> {
        self.disallow_future.then(|| now.date_naive())
    }
}

/// A reason a candidate range must not be emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Violation {
    /// End before start
    Ordering,
    /// End after now while future ranges are disallowed
    Future,
    /// Wider than the allowed window
    Window,
}

impl Violation {
    /// User-facing message for this violation.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Ordering => "End date must be on or after the start date.",
            Self::Future => "Dates in the future are not allowed.",
            Self::Window => "Selected range exceeds the allowed window.",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// The set of violations found for one range.
///
/// Violations are kept in declaration order without duplicates. An empty
/// outcome means the range is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    violations: Vec<Violation>,
}

impl ValidationOutcome {
    /// Outcome with no violations.
    #[must_use]
    pub const fn valid() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    fn push(&mut self, violation: Violation) {
        if !self.violations.contains(&violation) {
            self.violations.push(violation);
            self.violations.sort_unstable();
        }
    }

    /// True when no constraint failed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Whether a particular violation was found.
    #[must_use]
    pub fn contains(&self, violation: Violation) -> bool {
        self.violations.contains(&violation)
    }

    /// Violations found, in declaration order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// User-facing messages for every violation found.
    pub fn messages(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.violations.iter().copied().map(Violation::message)
    }
}

impl FromIterator<Violation> for ValidationOutcome {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        let mut outcome = Self::valid();
        for violation in iter {
            outcome.push(violation);
        }
        outcome
    }
}

/// Check a resolved range against `policy` at instant `now`.
///
/// The window check counts calendar days inclusively, while the future
/// check compares the raw end instant against `now`. A `today` range
/// therefore fails the future check for the whole day.
#[must_use]
pub fn validate<Tz: TimeZone>(
    range: &DateRange<Tz>,
    policy: &Policy,
    now: &DateTime<Tz>,
) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::valid();

    if range.is_inverted() {
        outcome.push(Violation::Ordering);
    }

    if policy.disallow_future && range.end > *now {
        outcome.push(Violation::Future);
    }

    if let Some(max_days) = policy.window_limit() {
        if range.inclusive_days().exceeds(max_days) {
            outcome.push(Violation::Window);
        }
    }

    outcome
}

/// Check an optional range; an unresolved range carries no violations.
#[must_use]
pub fn validate_resolved<Tz: TimeZone>(
    range: Option<&DateRange<Tz>>,
    policy: &Policy,
    now: &DateTime<Tz>,
) -> ValidationOutcome {
    range.map_or_else(ValidationOutcome::valid, |range| {
        validate(range, policy, now)
    })
}

/// Whether an "apply" may go ahead: the range is resolved and passed every check.
#[must_use]
pub fn can_emit<Tz: TimeZone>(range: Option<&DateRange<Tz>>, outcome: &ValidationOutcome) -> bool {
    range.is_some() && outcome.is_valid()
}
