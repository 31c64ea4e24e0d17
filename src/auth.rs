//! Sign-in session handling.
//!
//! The gallery only mounts for a signed-in user. The session is persisted
//! so relaunching the app does not ask for the username again; signing out
//! removes it.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A signed-in user session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub signed_in_at: i64,
}

impl Session {
    /// Sign in as `username`. Whitespace is trimmed; an empty name is
    /// rejected. The session is persisted to `path` on success.
    pub fn sign_in(username: &str, path: &Path) -> Option<Session> {
        let username = username.trim();
        if username.is_empty() {
            return None;
        }

        let session = Session {
            username: username.to_string(),
            signed_in_at: Utc::now().timestamp(),
        };
        session.persist(path);
        Some(session)
    }

    /// Restore a previously persisted session, if any.
    pub fn restore(path: &Path) -> Option<Session> {
        let raw = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(err) => {
                log::warn!("discarding unreadable session {}: {}", path.display(), err);
                None
            }
        }
    }

    /// Forget the persisted session.
    pub fn sign_out(path: &Path) {
        let _ = fs::remove_file(path);
    }

    fn persist(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string(self) {
            Ok(json) => {
                if let Err(err) = fs::write(path, json) {
                    log::warn!("could not persist session {}: {}", path.display(), err);
                }
            }
            Err(err) => log::warn!("could not serialize session: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_session(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "cowshed-session-{}-{}.json",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_sign_in_round_trips_through_restore() {
        let path = temp_session("round-trip");

        let session = Session::sign_in("  daisy  ", &path).unwrap();
        assert_eq!(session.username, "daisy");

        let restored = Session::restore(&path).unwrap();
        assert_eq!(restored.username, "daisy");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_empty_username_is_rejected() {
        let path = temp_session("empty");
        assert!(Session::sign_in("   ", &path).is_none());
        assert!(Session::restore(&path).is_none());
    }

    #[test]
    fn test_sign_out_forgets_the_session() {
        let path = temp_session("sign-out");

        Session::sign_in("daisy", &path).unwrap();
        Session::sign_out(&path);
        assert!(Session::restore(&path).is_none());
    }

    #[test]
    fn test_corrupt_session_is_discarded() {
        let path = temp_session("corrupt");
        fs::write(&path, "{ nope").unwrap();
        assert!(Session::restore(&path).is_none());

        let _ = fs::remove_file(path);
    }
}
