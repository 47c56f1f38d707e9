//! # Date Range Picker
//!
//! Resolve date-range presets into concrete, day-aligned intervals.
//!
//! This crate provides:
//! - Preset resolution ("last 7 days", "last month", custom bounds) against an
//!   explicit `now`, with local day-start/day-end normalization
//! - Independent policy checks (ordering, no-future, maximum window) and an
//!   emission gate for the final "apply"
//! - A picker session that remembers the last selection in a key-value slot
//!
//! ## Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use date_range_picker::{resolve, validate, Policy, Preset};
//!
//! let now = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
//! let range = resolve(Preset::Last7, None, None, &now).unwrap();
//! assert_eq!(range.start_iso(), "2024-03-09T00:00:00.000Z");
//!
//! let policy = Policy { disallow_future: false, max_window_days: Some(7) };
//! assert!(validate(&range, &policy, &now).is_valid());
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod date_range;
pub mod display;
pub mod error;
pub mod payload;
pub mod preset;
pub mod selection;
pub mod session;
pub mod store;
pub mod types;
pub mod validate;

pub use config::Config;
pub use date_range::{resolve, DateRange};
pub use error::{Error, Result};
pub use payload::ApplyPayload;
pub use preset::Preset;
pub use selection::{compute_derived, Derived, SelectionState};
pub use session::PickerSession;
pub use store::{FileStore, KeyValueStore, MemoryStore, SelectionStore};
pub use validate::{validate, Policy, ValidationOutcome, Violation};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "date-range-picker";
