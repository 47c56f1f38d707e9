//! Named date-range presets.
//!
//! A [`Preset`] is the shorthand a user picks from a dropdown ("Last 7 days",
//! "This month", ...). The wire token (`last7`, `thisMonth`, ...) is what gets
//! persisted and emitted; the display name is what a picker shows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The selectable date-range presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Preset {
    /// Today only
    Today,
    /// The day before today
    Yesterday,
    /// Seven calendar days ending today
    #[default]
    Last7,
    /// Thirty calendar days ending today
    Last30,
    /// First of the current month through today
    ThisMonth,
    /// The whole previous calendar month
    LastMonth,
    /// Explicit start and end dates chosen by the user
    Custom,
}

impl Preset {
    /// The token used in persisted records and emitted payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::Last7 => "last7",
            Self::Last30 => "last30",
            Self::ThisMonth => "thisMonth",
            Self::LastMonth => "lastMonth",
            Self::Custom => "custom",
        }
    }

    /// Get display name for the preset.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::Last7 => "Last 7 days",
            Self::Last30 => "Last 30 days",
            Self::ThisMonth => "This month",
            Self::LastMonth => "Last month",
            Self::Custom => "Custom…",
        }
    }

    /// Get all presets, in picker order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Today,
            Self::Yesterday,
            Self::Last7,
            Self::Last30,
            Self::ThisMonth,
            Self::LastMonth,
            Self::Custom,
        ]
    }

    /// Whether the resolver reads the custom bounds for this preset.
    #[must_use]
    pub const fn is_custom(self) -> bool {
        matches!(self, Self::Custom)
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|preset| preset.as_str() == s)
            .ok_or_else(|| Error::UnknownPreset(s.to_string()))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_parse_back() {
        for preset in Preset::all() {
            assert_eq!(preset.as_str().parse::<Preset>().unwrap(), *preset);
        }
    }

    #[test]
    fn test_unknown_token_rejected() {
        let err = "lastWeek".parse::<Preset>().unwrap_err();
        assert!(matches!(err, Error::UnknownPreset(ref t) if t == "lastWeek"));
        // Tokens are case-sensitive
        assert!("Last7".parse::<Preset>().is_err());
    }

    #[test]
    fn test_serde_uses_tokens() {
        assert_eq!(
            serde_json::to_string(&Preset::ThisMonth).unwrap(),
            "\"thisMonth\""
        );
        assert_eq!(
            serde_json::from_str::<Preset>("\"last30\"").unwrap(),
            Preset::Last30
        );
    }

    #[test]
    fn test_default_is_last7() {
        assert_eq!(Preset::default(), Preset::Last7);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Preset::Today.display_name(), "Today");
        assert_eq!(Preset::Last7.display_name(), "Last 7 days");
        assert_eq!(Preset::LastMonth.display_name(), "Last month");
        assert_eq!(Preset::Custom.display_name(), "Custom…");
    }

    #[test]
    fn test_all() {
        let all = Preset::all();
        assert_eq!(all.len(), 7);
        assert_eq!(all.iter().filter(|p| p.is_custom()).count(), 1);
    }
}
