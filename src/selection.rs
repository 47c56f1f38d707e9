//! The user's current selection and the values derived from it.

use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::date_range::{resolve, DateRange};
use crate::preset::Preset;
use crate::validate::{can_emit, validate_resolved, Policy, ValidationOutcome};

/// Date format of custom bounds in persisted records and CLI input.
pub const CIVIL_DATE_FORMAT: &str = "%Y-%m-%d";

/// What the user has picked: a preset and, for `custom`, explicit dates.
///
/// Custom bounds are kept for every preset so that switching away from
/// `custom` and back restores them. The resolver only reads them for
/// [`Preset::Custom`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub preset: Preset,
    pub custom_start: Option<NaiveDate>,
    pub custom_end: Option<NaiveDate>,
}

impl SelectionState {
    /// Selection for a preset with no custom bounds.
    #[must_use]
    pub const fn preset(preset: Preset) -> Self {
        Self {
            preset,
            custom_start: None,
            custom_end: None,
        }
    }

    /// Custom selection between two dates.
    #[must_use]
    pub const fn custom(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            preset: Preset::Custom,
            custom_start: start,
            custom_end: end,
        }
    }

    /// Convert to the persisted record shape.
    #[must_use]
    pub fn to_record(&self) -> SelectionRecord {
        SelectionRecord {
            preset: self.preset.as_str().to_string(),
            start: format_civil(self.custom_start),
            end: format_civil(self.custom_end),
        }
    }

    /// Rebuild a selection from a persisted record.
    ///
    /// Returns `None` for an unknown preset token or a date that is neither
    /// empty nor `YYYY-MM-DD`.
    #[must_use]
    pub fn from_record(record: &SelectionRecord) -> Option<Self> {
        Some(Self {
            preset: record.preset.parse().ok()?,
            custom_start: parse_civil(&record.start)?,
            custom_end: parse_civil(&record.end)?,
        })
    }

    /// Serialize as the opaque text stored in a persistence slot.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON encoding fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_record())
    }

    /// Parse the opaque text stored in a persistence slot.
    ///
    /// Any malformation (bad JSON, missing field, unknown preset, bad date)
    /// yields `None`.
    #[must_use]
    pub fn from_json(text: &str) -> Option<Self> {
        let record: SelectionRecord = serde_json::from_str(text).ok()?;
        Self::from_record(&record)
    }
}

/// Persisted form of a [`SelectionState`]: `{ preset, start, end }`.
///
/// `start`/`end` are the civil dates the user typed (`YYYY-MM-DD`), or an
/// empty string when unset. Computed instants are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRecord {
    pub preset: String,
    pub start: String,
    pub end: String,
}

fn format_civil(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(CIVIL_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// `""` is a valid "unset"; anything else must be a real date.
fn parse_civil(text: &str) -> Option<Option<NaiveDate>> {
    if text.is_empty() {
        return Some(None);
    }
    NaiveDate::parse_from_str(text, CIVIL_DATE_FORMAT)
        .ok()
        .map(Some)
}

/// Range and validation outcome computed from a selection at one instant.
#[derive(Debug, Clone)]
pub struct Derived<Tz: TimeZone> {
    /// `None` while a custom selection is missing a bound
    pub range: Option<DateRange<Tz>>,
    pub outcome: ValidationOutcome,
}

impl<Tz: TimeZone> Derived<Tz> {
    /// Whether the range is resolved and passed every check.
    #[must_use]
    pub fn can_apply(&self) -> bool {
        can_emit(self.range.as_ref(), &self.outcome)
    }

    /// Whether the range is still unresolved.
    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        self.range.is_none()
    }
}

/// Resolve and validate a selection at instant `now`.
#[must_use]
pub fn compute_derived<Tz: TimeZone>(
    selection: &SelectionState,
    policy: &Policy,
    now: &DateTime<Tz>,
) -> Derived<Tz> {
    let range = resolve(
        selection.preset,
        selection.custom_start,
        selection.custom_end,
        now,
    );
    let outcome = validate_resolved(range.as_ref(), policy, now);
    Derived { range, outcome }
}
