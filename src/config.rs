//! Application data layout and configuration.
//!
//! Everything lives under the platform data directory:
//! - Linux: ~/.local/share/cowshed/
//! - macOS: ~/Library/Application Support/cowshed/
//! - Windows: %APPDATA%\cowshed\
//!
//! An optional `config.json` in that directory overrides the remote bucket
//! root; a malformed config is logged and ignored.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory of the remote object store bucket.
    #[serde(default = "default_remote_root")]
    pub remote_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            remote_root: default_remote_root(),
        }
    }
}

impl Config {
    /// Load `config.json` from the data directory, falling back to the
    /// defaults if it is missing or malformed.
    pub fn load() -> Self {
        let path = data_dir().join("config.json");
        match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                log::warn!("ignoring malformed config {}: {}", path.display(), err);
                Config::default()
            }),
            Err(_) => Config::default(),
        }
    }
}

/// Application data directory.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_dir()
        .or_else(|| dirs::home_dir())
        .expect("Could not determine user data directory");

    path.push("cowshed");
    path
}

/// Path of the persisted gallery snapshot.
pub fn snapshot_path() -> PathBuf {
    data_dir().join("gallery.json")
}

/// Path of the persisted sign-in session.
pub fn session_path() -> PathBuf {
    data_dir().join("session.json")
}

fn default_remote_root() -> PathBuf {
    data_dir().join("remote")
}
