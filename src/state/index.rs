//! The local image index: an ordered list of records mirrored to a
//! persisted JSON snapshot so the gallery survives a restart.
//!
//! Every persisting mutation rewrites the full snapshot. Writes go to a
//! temporary file first and are renamed over the snapshot, so a crash
//! mid-write leaves the previous snapshot readable.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::GalleryError;
use crate::state::data::ImageRecord;

/// Ordered collection of image records backed by a snapshot file.
///
/// Insertion order is preserved and is the display order.
#[derive(Debug)]
pub struct LocalImageIndex {
    records: Vec<ImageRecord>,
    snapshot_path: PathBuf,
}

impl LocalImageIndex {
    /// Load the index from its snapshot file.
    ///
    /// A missing snapshot starts an empty gallery. A malformed snapshot is
    /// logged and discarded, never fatal.
    pub fn load(snapshot_path: PathBuf) -> Self {
        let records = match read_snapshot(&snapshot_path) {
            Ok(records) => records,
            Err(err) => {
                log::warn!(
                    "discarding unreadable snapshot {}: {}",
                    snapshot_path.display(),
                    err
                );
                Vec::new()
            }
        };

        LocalImageIndex {
            records,
            snapshot_path,
        }
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records.iter().any(|record| record.key == key)
    }

    pub fn get(&self, key: &str) -> Option<&ImageRecord> {
        self.records.iter().find(|record| record.key == key)
    }

    /// Insert a record at `position` (clamped to the end) and persist.
    pub fn insert(&mut self, position: usize, record: ImageRecord) {
        let position = position.min(self.records.len());
        self.records.insert(position, record);
        self.snapshot_persist();
    }

    /// Remove the record with `key` and persist. Returns false if the key
    /// was not present; the relative order of the remaining records is
    /// untouched.
    pub fn remove(&mut self, key: &str) -> bool {
        let Some(position) = self.records.iter().position(|record| record.key == key) else {
            return false;
        };
        self.records.remove(position);
        self.snapshot_persist();
        true
    }

    /// Mutate the record with `key` in place and persist. Returns false if
    /// the key was not present.
    pub fn update<F>(&mut self, key: &str, mutator: F) -> bool
    where
        F: FnOnce(&mut ImageRecord),
    {
        if !self.update_transient(key, mutator) {
            return false;
        }
        self.snapshot_persist();
        true
    }

    /// Mutate the record with `key` without persisting, for UI-only state
    /// (edit mode, caption drafts).
    pub fn update_transient<F>(&mut self, key: &str, mutator: F) -> bool
    where
        F: FnOnce(&mut ImageRecord),
    {
        let Some(record) = self.records.iter_mut().find(|record| record.key == key) else {
            return false;
        };
        mutator(record);
        true
    }

    /// Serialize the full record sequence and swap it into place.
    pub fn snapshot_persist(&self) {
        let json = match serde_json::to_string(&self.records) {
            Ok(json) => json,
            Err(err) => {
                log::error!("failed to serialize gallery snapshot: {}", err);
                return;
            }
        };

        if let Some(parent) = self.snapshot_path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                log::error!("failed to create {}: {}", parent.display(), err);
                return;
            }
        }

        // Write-then-swap keeps the previous snapshot intact on failure.
        let tmp_path = self.snapshot_path.with_extension("json.tmp");
        let result = fs::write(&tmp_path, &json)
            .and_then(|_| fs::rename(&tmp_path, &self.snapshot_path));
        if let Err(err) = result {
            log::error!(
                "failed to persist gallery snapshot {}: {}",
                self.snapshot_path.display(),
                err
            );
        }
    }
}

fn read_snapshot(path: &Path) -> Result<Vec<ImageRecord>, GalleryError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            log::warn!("could not read snapshot {}: {}", path.display(), err);
            return Ok(Vec::new());
        }
    };

    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::SyncState;

    fn temp_snapshot(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "cowshed-index-{}-{}.json",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    fn record(key: &str, caption: &str) -> ImageRecord {
        ImageRecord::new(key.into(), caption.into(), vec![0xAB, 0xCD])
    }

    #[test]
    fn test_load_missing_snapshot_is_empty() {
        let index = LocalImageIndex::load(temp_snapshot("missing"));
        assert!(index.records().is_empty());
    }

    #[test]
    fn test_malformed_snapshot_degrades_to_empty() {
        let path = temp_snapshot("malformed");
        fs::write(&path, "{ this is not json").unwrap();

        let index = LocalImageIndex::load(path.clone());
        assert!(index.records().is_empty());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let path = temp_snapshot("round-trip");

        let mut index = LocalImageIndex::load(path.clone());
        index.insert(0, record("k1", "a.jpg"));
        index.insert(1, record("k2", "b.jpg"));
        index.update("k2", |r| r.sync = SyncState::Failed);

        let reloaded = LocalImageIndex::load(path.clone());
        assert_eq!(reloaded.records(), index.records());
        assert_eq!(reloaded.get("k2").unwrap().sync, SyncState::Failed);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_persist_leaves_no_temp_file() {
        let path = temp_snapshot("swap");

        let mut index = LocalImageIndex::load(path.clone());
        index.insert(0, record("k1", "a.jpg"));

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_remove_preserves_relative_order() {
        let path = temp_snapshot("remove-order");

        let mut index = LocalImageIndex::load(path.clone());
        index.insert(0, record("k1", "a.jpg"));
        index.insert(1, record("k2", "b.jpg"));
        index.insert(2, record("k3", "c.jpg"));

        assert!(index.remove("k2"));
        let keys: Vec<&str> = index.records().iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["k1", "k3"]);

        assert!(!index.remove("k2"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_transient_update_is_not_persisted() {
        let path = temp_snapshot("transient");

        let mut index = LocalImageIndex::load(path.clone());
        index.insert(0, record("k1", "a.jpg"));
        index.update_transient("k1", |r| r.draft = Some("draft".into()));

        let reloaded = LocalImageIndex::load(path.clone());
        assert_eq!(reloaded.get("k1").unwrap().draft, None);
        assert_eq!(reloaded.get("k1").unwrap().caption, "a.jpg");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_update_unknown_key_returns_false() {
        let mut index = LocalImageIndex::load(temp_snapshot("unknown"));
        assert!(!index.update("nope", |r| r.caption = "x".into()));
    }
}
