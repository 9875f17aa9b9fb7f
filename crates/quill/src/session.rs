//! Persistence of the last input between runs.
//!
//! The session directory holds a single `session.json` file. Session storage
//! is a convenience: read and write failures are logged and never fail the
//! command.

use std::fs;
use std::path::{Path, PathBuf};

use quill_config::SessionConfig;
use serde::{Deserialize, Serialize};

/// Persisted session data.
///
/// Fields missing from older files take their default values.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct SessionState {
    /// Last segmented input text.
    pub text: String,
}

/// Session storage rooted at the configured session directory.
pub(crate) struct SessionStore {
    dir: PathBuf,
    file: PathBuf,
    enabled: bool,
}

impl SessionStore {
    pub(crate) fn new(config: &SessionConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            file: config.session_file(),
            enabled: config.enabled,
        }
    }

    /// Load the saved session, if any.
    ///
    /// Returns `None` when sessions are disabled, nothing was saved yet, or
    /// the file cannot be parsed.
    pub(crate) fn load(&self) -> Option<SessionState> {
        if !self.enabled {
            return None;
        }

        let content = match fs::read_to_string(&self.file) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("no session loaded from {}: {e}", self.file.display());
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!("ignoring unreadable session file {}: {e}", self.file.display());
                None
            }
        }
    }

    /// Save the session. Does nothing when sessions are disabled.
    pub(crate) fn save(&self, state: &SessionState) {
        if !self.enabled {
            return;
        }

        if let Err(e) = ensure_session_dir(&self.dir) {
            tracing::warn!("failed to create session directory: {e}");
            return;
        }

        let json = match serde_json::to_string(state) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("failed to serialize session: {e}");
                return;
            }
        };

        if let Err(e) = fs::write(&self.file, json) {
            tracing::warn!("failed to write session file {}: {e}", self.file.display());
        } else {
            tracing::debug!("saved session to {}", self.file.display());
        }
    }
}

/// Ensure the session directory exists with a `.gitignore`.
fn ensure_session_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;

    let gitignore_path = dir.join(".gitignore");
    if !gitignore_path.exists() {
        let _ = fs::write(&gitignore_path, "# Automatically created by quill\n*\n");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store(tmp: &TempDir, enabled: bool) -> SessionStore {
        SessionStore::new(&SessionConfig {
            enabled,
            dir: tmp.path().join(".quill"),
        })
    }

    #[test]
    fn test_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp, true);
        let state = SessionState {
            text: "He said \"hello\"\n\nand left.".to_owned(),
        };

        store.save(&state);

        assert_eq!(store.load(), Some(state));
    }

    #[test]
    fn test_load_without_saved_session() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(store(&tmp, true).load(), None);
    }

    #[test]
    fn test_save_creates_gitignore() {
        let tmp = TempDir::new().unwrap();
        store(&tmp, true).save(&SessionState::default());

        let gitignore = fs::read_to_string(tmp.path().join(".quill/.gitignore")).unwrap();
        assert!(gitignore.contains('*'));
    }

    #[test]
    fn test_disabled_store_does_nothing() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp, false);

        store.save(&SessionState {
            text: "ignored".to_owned(),
        });

        assert!(!tmp.path().join(".quill").exists());
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_corrupt_session_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp, true);
        fs::create_dir_all(tmp.path().join(".quill")).unwrap();
        fs::write(tmp.path().join(".quill/session.json"), "{not json").unwrap();

        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp, true);
        fs::create_dir_all(tmp.path().join(".quill")).unwrap();
        fs::write(tmp.path().join(".quill/session.json"), "{}").unwrap();

        assert_eq!(store.load(), Some(SessionState::default()));
    }
}
