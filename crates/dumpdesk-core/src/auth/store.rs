//! Persisted session storage.
//!
//! The session survives restarts as a `{token, username, role}` triple. The
//! file store keeps all three in one JSON document so they always change
//! together.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

/// What survives a restart. All fields absent means no session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub token: Option<String>,
    pub username: Option<String>,
    pub role: Option<String>,
}

impl PersistedSession {
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.username.is_none() && self.role.is_none()
    }
}

pub trait SessionStore: Send + Sync {
    /// Load the stored session, or the all-empty value if there is none.
    fn load(&self) -> Result<PersistedSession>;

    fn save(&self, session: &PersistedSession) -> Result<()>;

    fn clear(&self) -> Result<()>;
}

/// Session store backed by a single JSON file.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<PersistedSession> {
        if !self.path.exists() {
            return Ok(PersistedSession::default());
        }
        let contents =
            std::fs::read_to_string(&self.path).context("Failed to read session file")?;
        serde_json::from_str(&contents).context("Failed to parse session file")
    }

    fn save(&self, session: &PersistedSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create session directory")?;
        }
        let contents = serde_json::to_string_pretty(session)?;

        // Write-then-rename so a crash never leaves a half-written triple
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents).context("Failed to write session file")?;
        std::fs::rename(&tmp, &self.path).context("Failed to replace session file")?;
        debug!(path = ?self.path, "Session saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).context("Failed to remove session file")?;
            debug!(path = ?self.path, "Session file removed");
        }
        Ok(())
    }
}

/// In-process store. Nothing survives a restart.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<PersistedSession>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a session already stored, as if left by a previous run.
    pub fn with_session(session: PersistedSession) -> Self {
        Self {
            inner: Mutex::new(session),
        }
    }

    /// Current contents, for inspection.
    pub fn snapshot(&self) -> PersistedSession {
        self.inner
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<PersistedSession> {
        Ok(self.snapshot())
    }

    fn save(&self, session: &PersistedSession) -> Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("session store lock poisoned"))?;
        *inner = session.clone();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.save(&PersistedSession::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PersistedSession {
        PersistedSession {
            token: Some("a.b.c".to_string()),
            username: Some("alice".to_string()),
            role: Some("Admin".to_string()),
        }
    }

    #[test]
    fn test_file_store_load_missing_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path());
        let loaded = store.load().expect("load");
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_file_store_save_load_clear() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path().join("nested"));

        store.save(&sample()).expect("save");
        assert!(store.path().exists());
        assert_eq!(store.load().expect("load"), sample());

        store.clear().expect("clear");
        assert!(!store.path().exists());
        assert!(store.load().expect("load").is_empty());

        // Clearing twice is fine
        store.clear().expect("second clear");
    }

    #[test]
    fn test_file_store_save_of_load_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path());
        store.save(&sample()).expect("save");

        let before = std::fs::read_to_string(store.path()).expect("read");
        store.save(&store.load().expect("load")).expect("resave");
        let after = std::fs::read_to_string(store.path()).expect("read");

        assert_eq!(before, after);
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path());
        std::fs::write(store.path(), "not json").expect("write");
        assert!(store.load().is_err());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemorySessionStore::with_session(sample());
        let loaded = store.load().expect("load");
        store.save(&loaded).expect("save");
        assert_eq!(store.snapshot(), sample());

        store.clear().expect("clear");
        assert!(store.snapshot().is_empty());
    }
}
