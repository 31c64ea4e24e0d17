//! Shared data structures for the gallery state.
//!
//! These structs represent the data model that flows between the persisted
//! snapshot and the UI layer.

use serde::{Deserialize, Serialize};

/// Per-record editing state.
///
/// Uploads that have not produced a thumbnail yet are tracked separately as
/// pending entries by the gallery state, so an indexed record is always
/// either ready or being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordStatus {
    /// Caption is displayed read-only.
    #[default]
    Ready,
    /// The caption input is active; changes accumulate in the draft.
    Editing,
}

/// Synchronization state with the remote object store.
///
/// Serialized with the record so a failed upload is still visible after a
/// restart. The gallery is eventually-consistent with the remote store, not
/// transactional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SyncState {
    /// The remote `put` has not completed yet.
    #[default]
    Pending,
    /// The blob is stored remotely.
    Synced,
    /// The remote `put` failed; the record stays local.
    Failed,
}

/// Represents a single image in the gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Unique key, shared with the remote object store. Immutable.
    pub key: String,
    /// User-editable caption, defaults to the original filename.
    pub caption: String,
    /// Remote sync status.
    #[serde(default)]
    pub sync: SyncState,
    /// JPEG-encoded thumbnail, derived once at upload time. Immutable.
    pub thumbnail: Vec<u8>,
    /// Transient editing state, never persisted.
    #[serde(skip)]
    pub status: RecordStatus,
    /// In-progress caption text while editing, never persisted.
    #[serde(skip)]
    pub draft: Option<String>,
}

impl ImageRecord {
    pub fn new(key: String, caption: String, thumbnail: Vec<u8>) -> Self {
        ImageRecord {
            key,
            caption,
            sync: SyncState::Pending,
            thumbnail,
            status: RecordStatus::Ready,
            draft: None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.status == RecordStatus::Editing
    }

    /// Caption to show in the UI: the draft while editing, otherwise the
    /// saved caption.
    pub fn display_caption(&self) -> &str {
        self.draft.as_deref().unwrap_or(&self.caption)
    }
}
