//! Persistence of the last selection.
//!
//! The selection lives in a single named slot of a [`KeyValueStore`] as
//! opaque JSON text. [`SelectionStore`] sits on top of any backend and
//! enforces the persistence rules:
//!
//! - a missing, unreadable or malformed slot loads as "absent"
//! - saves are fire-and-forget; failures are logged and otherwise ignored
//! - the last write wins

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::selection::SelectionState;

/// Slot key the selection is stored under unless configured otherwise.
pub const DEFAULT_SLOT_KEY: &str = "dateRangePicker";

/// A string-keyed slot store holding opaque text values.
pub trait KeyValueStore {
    /// Read the value in `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` into `key`, replacing what was there.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Loads and saves a [`SelectionState`] in one slot of a backend.
#[derive(Debug, Clone)]
pub struct SelectionStore<S> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> SelectionStore<S> {
    /// Store the selection under `key` in `backend`.
    pub fn new(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Store the selection under [`DEFAULT_SLOT_KEY`].
    pub fn with_default_key(backend: S) -> Self {
        Self::new(backend, DEFAULT_SLOT_KEY)
    }

    /// Slot key in use.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the last saved selection.
    ///
    /// Returns `None` when nothing was saved or the slot cannot be read or
    /// parsed. None of these are surfaced as errors.
    pub fn load(&self) -> Option<SelectionState> {
        let text = match self.backend.get(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => {
                debug!(key = %self.key, "no saved selection");
                return None;
            }
            Err(e) => {
                debug!(key = %self.key, error = %e, "could not read saved selection");
                return None;
            }
        };

        let state = SelectionState::from_json(&text);
        if state.is_none() {
            debug!(key = %self.key, "ignoring malformed saved selection");
        }
        state
    }

    /// Save `state`, replacing the previous selection.
    ///
    /// A failed write is logged; the caller's in-memory state stays
    /// authoritative.
    pub fn save(&mut self, state: &SelectionState) {
        let result = state
            .to_json()
            .map_err(Error::from)
            .and_then(|text| self.backend.set(&self.key, &text));

        match result {
            Ok(()) => debug!(key = %self.key, preset = %state.preset, "saved selection"),
            Err(e) => warn!(key = %self.key, error = %e, "failed to save selection"),
        }
    }

    /// Forget the saved selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot remove the slot.
    pub fn clear(&mut self) -> Result<()> {
        self.backend.remove(&self.key)
    }

    /// Borrow the backend.
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    /// Take the backend back.
    pub fn into_inner(self) -> S {
        self.backend
    }
}
