//! JSON-file key-value store.
//!
//! All slots share one file holding a flat JSON object of string values,
//! e.g. `{"dateRangePicker": "{\"preset\":\"last7\",...}"}`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::KeyValueStore;
use crate::error::Result;

type Slots = BTreeMap<String, String>;

/// A [`KeyValueStore`] persisted to a single JSON file.
///
/// A missing file is an empty store. A file that exists but does not hold a
/// JSON object of strings is also read as empty and is replaced on the next
/// write.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Use the file at `path`. Nothing is read or created until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_slots(&self) -> Result<Slots> {
        if !self.path.exists() {
            return Ok(Slots::new());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str(&contents) {
            Ok(slots) => Ok(slots),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "state file is corrupt, treating as empty");
                Ok(Slots::new())
            }
        }
    }

    fn write_slots(&self, slots: &Slots) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(slots)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_slots()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut slots = self.read_slots()?;
        slots.insert(key.to_string(), value.to_string());
        self.write_slots(&slots)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut slots = self.read_slots()?;
        if slots.remove(key).is_some() {
            self.write_slots(&slots)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::Preset;
    use crate::selection::SelectionState;
    use crate::store::SelectionStore;
    use chrono::NaiveDate;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state.json"));
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("state.json");
        let mut store = FileStore::new(&path);
        store.set("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_slots_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut store = FileStore::new(&path);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.remove("a").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("a").unwrap(), None);
        assert_eq!(reopened.get("b").unwrap(), Some("2".to_string()));
    }

    #[test]
    fn test_corrupt_file_reads_empty_and_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "this is not json").unwrap();

        let mut store = FileStore::new(&path);
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
    }

    #[test]
    fn test_selection_survives_fresh_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let state = SelectionState::custom(
            NaiveDate::from_ymd_opt(2023, 12, 24),
            NaiveDate::from_ymd_opt(2024, 1, 2),
        );

        SelectionStore::with_default_key(FileStore::new(&path)).save(&state);

        let fresh = SelectionStore::with_default_key(FileStore::new(&path));
        assert_eq!(fresh.load(), Some(state));
    }

    #[test]
    fn test_corrupt_selection_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut backend = FileStore::new(&path);
        backend
            .set(crate::store::DEFAULT_SLOT_KEY, r#"{"preset":"sometime"}"#)
            .unwrap();

        let store = SelectionStore::with_default_key(backend);
        assert_eq!(store.load(), None);
        assert_eq!(store.load().unwrap_or_default().preset, Preset::Last7);
    }
}
