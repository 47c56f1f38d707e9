//! Picker session lifecycle.
//!
//! A session moves from `Uninitialized` to `Ready` once, in
//! [`PickerSession::start`], seeding its selection from the store (or the
//! default `last7` selection). Every edit afterwards re-enters `Ready`:
//! the range is re-resolved, re-validated and the selection is saved.
//!
//! `now` is passed into every call that needs it; the session never reads
//! the clock itself.

use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone};
use tracing::debug;

use crate::error::Result;
use crate::payload::ApplyPayload;
use crate::preset::Preset;
use crate::selection::{compute_derived, Derived, SelectionState};
use crate::store::{KeyValueStore, SelectionStore};
use crate::validate::Policy;

/// Where a session's initial selection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Loaded from the store
    Restored,
    /// Nothing usable was stored
    Default,
}

impl Origin {
    /// Short label for terminal output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Restored => "last session",
            Self::Default => "default",
        }
    }
}

/// A picker session in the `Ready` state.
pub struct PickerSession<S> {
    selection: SelectionState,
    policy: Policy,
    store: SelectionStore<S>,
    origin: Origin,
    utc_output: bool,
}

impl<S: KeyValueStore> PickerSession<S> {
    /// Start a session, restoring the last saved selection if there is one.
    pub fn start(store: SelectionStore<S>, policy: Policy) -> Self {
        let (selection, origin) = store.load().map_or_else(
            || (SelectionState::default(), Origin::Default),
            |selection| (selection, Origin::Restored),
        );

        debug!(
            preset = %selection.preset,
            restored = origin == Origin::Restored,
            "picker session ready"
        );

        Self {
            selection,
            policy,
            store,
            origin,
            utc_output: true,
        }
    }

    /// Choose between UTC (the default) and local-offset applied instants.
    #[must_use]
    pub fn with_utc_output(mut self, utc: bool) -> Self {
        self.utc_output = utc;
        self
    }

    /// Current selection.
    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Policy ranges are checked against.
    pub const fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Whether the initial selection was restored or defaulted.
    pub const fn origin(&self) -> Origin {
        self.origin
    }

    /// Range and validation outcome for the current selection at `now`.
    pub fn derived<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Derived<Tz> {
        compute_derived(&self.selection, &self.policy, now)
    }

    /// Latest date a date input should offer, if future dates are disallowed.
    pub fn max_input_date<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<NaiveDate> {
        self.policy.max_input_date(now)
    }

    /// Switch preset. Custom bounds are kept.
    pub fn set_preset<Tz: TimeZone>(&mut self, preset: Preset, now: &DateTime<Tz>) -> Derived<Tz> {
        self.edit(now, |s| s.preset = preset)
    }

    /// Change the custom start date. `None` clears it.
    pub fn set_custom_start<Tz: TimeZone>(
        &mut self,
        start: Option<NaiveDate>,
        now: &DateTime<Tz>,
    ) -> Derived<Tz> {
        self.edit(now, |s| s.custom_start = start)
    }

    /// Change the custom end date. `None` clears it.
    pub fn set_custom_end<Tz: TimeZone>(
        &mut self,
        end: Option<NaiveDate>,
        now: &DateTime<Tz>,
    ) -> Derived<Tz> {
        self.edit(now, |s| s.custom_end = end)
    }

    /// Select `custom` with both bounds in one edit.
    pub fn set_custom_range<Tz: TimeZone>(
        &mut self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        now: &DateTime<Tz>,
    ) -> Derived<Tz> {
        self.edit(now, |s| *s = SelectionState::custom(start, end))
    }

    /// Go back to the default selection.
    pub fn reset<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Derived<Tz> {
        self.edit(now, |s| *s = SelectionState::default())
    }

    /// Hand the payload to `on_apply` if the current range may be emitted.
    ///
    /// Returns whether `on_apply` was called. An unresolved or invalid
    /// range is never emitted and never corrected.
    pub fn apply<Tz, F>(&self, now: &DateTime<Tz>, on_apply: F) -> bool
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
        F: FnOnce(ApplyPayload),
    {
        let derived = self.derived(now);
        if !derived.can_apply() {
            debug!(
                unresolved = derived.is_unresolved(),
                violations = derived.outcome.violations().len(),
                "apply blocked"
            );
            return false;
        }

        let Some(range) = derived.range else {
            return false;
        };
        on_apply(ApplyPayload::new(
            &range,
            self.selection.preset,
            self.utc_output,
        ));
        true
    }

    /// Go back to the default selection and remove the saved one.
    ///
    /// Unlike [`reset`](Self::reset) nothing is written, so the next session
    /// starts from the default as if none had run before.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot remove the slot.
    pub fn forget(&mut self) -> Result<()> {
        self.selection = SelectionState::default();
        self.store.clear()?;
        debug!(key = %self.store.key(), "saved selection forgotten");
        Ok(())
    }

    /// End the session, returning the store.
    pub fn into_store(self) -> SelectionStore<S> {
        self.store
    }

    fn edit<Tz, F>(&mut self, now: &DateTime<Tz>, change: F) -> Derived<Tz>
    where
        Tz: TimeZone,
        F: FnOnce(&mut SelectionState),
    {
        change(&mut self.selection);
        let derived = self.derived(now);
        self.store.save(&self.selection);
        debug!(
            preset = %self.selection.preset,
            valid = derived.outcome.is_valid(),
            "selection changed"
        );
        derived
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, DEFAULT_SLOT_KEY};
    use crate::validate::Violation;
    use chrono::{FixedOffset, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap()
    }

    fn fresh(policy: Policy) -> PickerSession<MemoryStore> {
        PickerSession::start(SelectionStore::with_default_key(MemoryStore::new()), policy)
    }

    #[test]
    fn test_starts_with_default() {
        let session = fresh(Policy::default());
        assert_eq!(session.origin(), Origin::Default);
        assert_eq!(*session.selection(), SelectionState::default());
    }

    #[test]
    fn test_restores_previous_session() {
        let mut session = fresh(Policy::default());
        session.set_custom_range(Some(date(2024, 2, 1)), Some(date(2024, 2, 5)), &now());
        let store = session.into_store();

        let restored = PickerSession::start(store, Policy::default());
        assert_eq!(restored.origin(), Origin::Restored);
        assert_eq!(
            *restored.selection(),
            SelectionState::custom(Some(date(2024, 2, 1)), Some(date(2024, 2, 5)))
        );
    }

    #[test]
    fn test_corrupt_store_defaults_silently() {
        let mut backend = MemoryStore::new();
        backend.set(DEFAULT_SLOT_KEY, "garbage").unwrap();
        let session = PickerSession::start(
            SelectionStore::with_default_key(backend),
            Policy::default(),
        );
        assert_eq!(session.origin(), Origin::Default);
        assert_eq!(session.selection().preset, Preset::Last7);
    }

    #[test]
    fn test_every_edit_is_persisted() {
        let mut session = fresh(Policy::default());

        session.set_preset(Preset::Custom, &now());
        session.set_custom_start(Some(date(2024, 3, 1)), &now());
        let store = session.into_store();
        assert_eq!(
            store.load(),
            Some(SelectionState::custom(Some(date(2024, 3, 1)), None))
        );
    }

    #[test]
    fn test_preset_switch_keeps_custom_bounds() {
        let mut session = fresh(Policy::default());
        session.set_custom_range(Some(date(2024, 3, 1)), Some(date(2024, 3, 3)), &now());
        session.set_preset(Preset::Today, &now());
        let derived = session.set_preset(Preset::Custom, &now());

        let range = derived.range.unwrap();
        assert_eq!(range.start_date(), date(2024, 3, 1));
        assert_eq!(range.end_date(), date(2024, 3, 3));
    }

    #[test]
    fn test_edit_returns_fresh_derivation() {
        let policy = Policy {
            max_window_days: Some(7),
            ..Policy::default()
        };
        let mut session = fresh(policy);

        let derived = session.set_preset(Preset::Last30, &now());
        assert_eq!(derived.outcome.violations(), &[Violation::Window]);

        let derived = session.set_preset(Preset::Last7, &now());
        assert!(derived.outcome.is_valid());
    }

    #[test]
    fn test_apply_emits_payload() {
        let session = fresh(Policy::default());
        let mut emitted = None;
        assert!(session.apply(&now(), |payload| emitted = Some(payload)));

        let payload = emitted.unwrap();
        assert_eq!(payload.date_range.start, "2024-03-09T00:00:00.000Z");
        assert_eq!(payload.date_range.end, "2024-03-15T23:59:59.999Z");
        assert_eq!(payload.date_range.preset, Preset::Last7);
    }

    #[test]
    fn test_apply_output_offset() {
        let tz = FixedOffset::east_opt(3600).unwrap();
        let local_now = now().with_timezone(&tz);

        let session = fresh(Policy::default());
        let mut emitted = None;
        session.apply(&local_now, |payload| emitted = Some(payload));
        assert_eq!(emitted.unwrap().date_range.start, "2024-03-08T23:00:00.000Z");

        let session = fresh(Policy::default()).with_utc_output(false);
        let mut emitted = None;
        session.apply(&local_now, |payload| emitted = Some(payload));
        assert_eq!(
            emitted.unwrap().date_range.start,
            "2024-03-09T00:00:00.000+01:00"
        );
    }

    #[test]
    fn test_apply_blocked_when_unresolved() {
        let mut session = fresh(Policy::default());
        session.set_custom_range(Some(date(2024, 3, 1)), None, &now());

        let mut called = false;
        assert!(!session.apply(&now(), |_| called = true));
        assert!(!called);
    }

    #[test]
    fn test_apply_blocked_by_violation() {
        let policy = Policy {
            disallow_future: true,
            ..Policy::default()
        };
        let mut session = fresh(policy);
        session.set_preset(Preset::Today, &now());

        let mut called = false;
        assert!(!session.apply(&now(), |_| called = true));
        assert!(!called);

        session.set_preset(Preset::Yesterday, &now());
        assert!(session.apply(&now(), |_| called = true));
        assert!(called);
    }

    #[test]
    fn test_reset() {
        let mut session = fresh(Policy::default());
        session.set_preset(Preset::LastMonth, &now());
        session.reset(&now());
        assert_eq!(*session.selection(), SelectionState::default());
        assert_eq!(
            session.into_store().load(),
            Some(SelectionState::default())
        );
    }

    #[test]
    fn test_forget_removes_saved_selection() {
        let mut backend = MemoryStore::new();
        backend
            .set(DEFAULT_SLOT_KEY, r#"{"preset":"today","start":"","end":""}"#)
            .unwrap();
        let mut session = PickerSession::start(
            SelectionStore::with_default_key(backend),
            Policy::default(),
        );
        assert_eq!(session.origin(), Origin::Restored);
        assert_eq!(session.origin().label(), "last session");
        assert_eq!(session.selection().preset, Preset::Today);

        session.forget().unwrap();
        assert_eq!(*session.selection(), SelectionState::default());

        let restarted = PickerSession::start(session.into_store(), Policy::default());
        assert_eq!(restarted.origin(), Origin::Default);
        assert_eq!(restarted.origin().label(), "default");
    }

    #[test]
    fn test_max_input_date() {
        let session = fresh(Policy {
            disallow_future: true,
            ..Policy::default()
        });
        assert_eq!(session.max_input_date(&now()), Some(date(2024, 3, 15)));
    }
}
