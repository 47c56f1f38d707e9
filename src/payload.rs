//! The object handed to the caller when a selection is applied.

use std::fmt;

use chrono::TimeZone;
use serde::Serialize;

use crate::date_range::DateRange;
use crate::preset::Preset;

/// Serialized as `{"dateRange": {"start": ..., "end": ..., "preset": ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyPayload {
    pub date_range: PayloadRange,
}

/// Applied range with ISO-8601 instants at millisecond precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadRange {
    pub start: String,
    pub end: String,
    pub preset: Preset,
}

impl ApplyPayload {
    /// Build a payload for `range`.
    ///
    /// With `utc` set the instants are rendered in UTC (`Z` suffix),
    /// otherwise with the range's own offset.
    #[must_use]
    pub fn new<Tz: TimeZone>(range: &DateRange<Tz>, preset: Preset, utc: bool) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        let (start, end) = if utc {
            let range = range.to_utc();
            (range.start_iso(), range.end_iso())
        } else {
            (range.start_iso(), range.end_iso())
        };

        Self {
            date_range: PayloadRange { start, end, preset },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};

    fn range() -> DateRange<FixedOffset> {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        DateRange::from_dates(
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            &tz,
        )
    }

    #[test]
    fn test_payload_json_shape() {
        let payload = ApplyPayload::new(&range(), Preset::Last7, false);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "dateRange": {
                    "start": "2024-03-09T00:00:00.000-05:00",
                    "end": "2024-03-15T23:59:59.999-05:00",
                    "preset": "last7"
                }
            })
        );
    }

    #[test]
    fn test_payload_in_utc() {
        let payload = ApplyPayload::new(&range(), Preset::Custom, true);
        assert_eq!(payload.date_range.start, "2024-03-09T05:00:00.000Z");
        assert_eq!(payload.date_range.end, "2024-03-16T04:59:59.999Z");
        assert_eq!(payload.date_range.preset, Preset::Custom);
    }
}
