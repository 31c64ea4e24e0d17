//! The gallery state manager.
//!
//! Owns the local image index and is its only writer. Upload, caption
//! editing, deletion and the expand/collapse viewer state all flow through
//! the handlers here; background completions (thumbnails, remote store
//! calls) are applied by key so stale results for deleted records are
//! dropped.

use chrono::Utc;

use crate::state::data::{ImageRecord, RecordStatus, SyncState};
use crate::state::index::LocalImageIndex;

/// An upload whose thumbnail has not been derived yet.
///
/// Pending entries are shown as placeholders in the grid and never enter
/// the persisted index; a record only exists once its thumbnail does.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub key: String,
    pub filename: String,
}

/// Serialized owner of all gallery state.
///
/// Handlers run to completion on the UI event stream, so no two mutations
/// ever interleave on the index.
#[derive(Debug)]
pub struct GalleryState {
    index: LocalImageIndex,
    pending: Vec<PendingUpload>,
    expanded: Option<String>,
    upload_seq: u64,
}

impl GalleryState {
    pub fn new(index: LocalImageIndex) -> Self {
        GalleryState {
            index,
            pending: Vec::new(),
            expanded: None,
            upload_seq: 0,
        }
    }

    pub fn records(&self) -> &[ImageRecord] {
        self.index.records()
    }

    pub fn pending(&self) -> &[PendingUpload] {
        &self.pending
    }

    /// Key of the currently expanded image, if any.
    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    /// Reserve a unique key for a file about to be uploaded and register
    /// its pending placeholder.
    ///
    /// The key is a fixed-width millisecond stamp plus a monotonic counter
    /// plus the sanitized filename, so two files with the same name picked
    /// in the same tick still get distinct keys, and key order equals
    /// reservation order.
    pub fn reserve_key(&mut self, filename: &str) -> String {
        let stamp = Utc::now().timestamp_millis();
        let safe_name = sanitize_filename(filename);

        loop {
            let key = format!("{:013}-{:06}-{}", stamp, self.upload_seq, safe_name);
            self.upload_seq += 1;
            if !self.index.contains(&key) && !self.pending.iter().any(|p| p.key == key) {
                self.pending.push(PendingUpload {
                    key: key.clone(),
                    filename: filename.to_string(),
                });
                return key;
            }
        }
    }

    /// Attach a derived thumbnail to its reserved upload, creating the
    /// record and persisting it.
    ///
    /// Returns `None` for keys that are no longer pending (failed or
    /// abandoned uploads); the completion is simply dropped.
    pub fn complete_upload(&mut self, key: &str, thumbnail: Vec<u8>) -> Option<&ImageRecord> {
        let position = self.pending.iter().position(|p| p.key == key)?;
        let upload = self.pending.remove(position);

        let record = ImageRecord::new(upload.key, upload.filename, thumbnail);

        // Keys sort by reservation time, so inserting in key order keeps a
        // batch in selection order even when thumbnails finish out of order.
        let insert_at = self
            .index
            .records()
            .iter()
            .position(|existing| existing.key.as_str() > key)
            .unwrap_or(self.index.records().len());
        self.index.insert(insert_at, record);

        self.index.get(key)
    }

    /// Drop the pending entry for an upload whose thumbnail derivation
    /// failed. Returns the entry so the caller can report the filename.
    pub fn fail_upload(&mut self, key: &str) -> Option<PendingUpload> {
        let position = self.pending.iter().position(|p| p.key == key)?;
        Some(self.pending.remove(position))
    }

    /// `Ready -> Editing`. Ignored for unknown keys or records already in
    /// edit mode.
    pub fn begin_edit(&mut self, key: &str) {
        self.index.update_transient(key, |record| {
            if record.status == RecordStatus::Ready {
                record.status = RecordStatus::Editing;
                record.draft = Some(record.caption.clone());
            }
        });
    }

    /// Update the caption draft. Only records in edit mode accept changes;
    /// nothing is persisted until `save_edit`.
    pub fn change_caption(&mut self, key: &str, text: String) {
        self.index.update_transient(key, |record| {
            if record.status == RecordStatus::Editing {
                record.draft = Some(text);
            }
        });
    }

    /// `Editing -> Ready`: commit the draft caption and persist. Saving a
    /// record that is not in edit mode changes nothing.
    pub fn save_edit(&mut self, key: &str) {
        if self.index.get(key).map(ImageRecord::is_editing) != Some(true) {
            return;
        }
        self.index.update(key, |record| {
            if let Some(draft) = record.draft.take() {
                record.caption = draft;
            }
            record.status = RecordStatus::Ready;
        });
    }

    /// Optimistically remove the record; the caller issues the remote
    /// delete. Returns false if the key was not present.
    pub fn delete_image(&mut self, key: &str) -> bool {
        if self.expanded.as_deref() == Some(key) {
            self.expanded = None;
        }
        self.index.remove(key)
    }

    /// Record a successful remote `put`. No-op if the record was deleted
    /// while the upload was in flight.
    pub fn mark_synced(&mut self, key: &str) {
        self.index.update(key, |record| record.sync = SyncState::Synced);
    }

    /// Record a failed remote `put`; the record stays local.
    pub fn mark_sync_failed(&mut self, key: &str) {
        self.index.update(key, |record| record.sync = SyncState::Failed);
    }

    /// Expand an image in the viewer. Ignored for unknown keys.
    pub fn expand(&mut self, key: &str) {
        if self.index.contains(key) {
            self.expanded = Some(key.to_string());
        }
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }
}

/// Keys double as object store paths, so restrict them to a safe alphabet.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
