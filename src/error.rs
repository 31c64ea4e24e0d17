//! Error taxonomy for the gallery.
//!
//! Nothing here is fatal: unsupported files are skipped per-file, store
//! failures become per-record sync status, and a corrupt snapshot degrades
//! to an empty gallery.

use std::io;
use thiserror::Error;

/// Errors from the remote object store client.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to upload object {key}: {source}")]
    Put { key: String, source: io::Error },

    #[error("failed to delete object {key}: {source}")]
    Delete { key: String, source: io::Error },

    #[error("failed to resolve object {key}: {source}")]
    Resolve { key: String, source: io::Error },
}

/// Errors raised by the gallery core itself.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// The uploaded payload could not be decoded as an image.
    #[error("not a supported image format: {0}")]
    UnsupportedFormat(String),

    /// The persisted snapshot could not be parsed.
    #[error("persisted gallery snapshot is unreadable: {0}")]
    PersistCorrupt(#[from] serde_json::Error),
}
