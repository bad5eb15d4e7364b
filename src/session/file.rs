//! File-backed session store: one directory per session, one file per key.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use super::SessionStore;
use crate::error::{AppError, Result};

/// Session store persisted under `<root>/<session id>/<key>.json`.
///
/// A key whose file has not been touched for longer than the idle timeout
/// belongs to an ended session: it is deleted and reported as absent.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    idle: Duration,
}

impl FileStore {
    /// Open the store for `session_id` under `root`. Nothing is created on
    /// disk until the first write.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if `session_id` is empty or contains
    /// anything other than ASCII letters, digits, `-` and `_`.
    pub fn open(root: &Path, session_id: &str, idle: Duration) -> Result<Self> {
        validate_name("session id", session_id)?;
        Ok(Self {
            dir: root.join(session_id),
            idle,
        })
    }

    /// This session's directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// End the session: remove everything stored for it.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory exists but cannot be removed.
    pub fn end(&self) -> Result<()> {
        match std::fs::remove_dir_all(&self.dir) {
            Ok(()) => {
                tracing::info!(dir = %self.dir.display(), "session ended");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_name("key", key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn is_expired(&self, path: &Path) -> Result<bool> {
        let modified = std::fs::metadata(path)?.modified()?;
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        Ok(age > self.idle)
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        if self.is_expired(&path)? {
            tracing::debug!(key, "session entry idle past timeout, dropping");
            std::fs::remove_file(&path)?;
            return Ok(None);
        }

        let value = std::fs::read_to_string(&path)?;

        // Reading counts as activity.
        if let Err(e) = std::fs::File::options()
            .append(true)
            .open(&path)
            .and_then(|f| f.set_modified(SystemTime::now()))
        {
            tracing::debug!(key, error = %e, "could not refresh session entry mtime");
        }

        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;

        // Write-then-rename so a reader never sees a half-written value.
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn validate_name(what: &str, name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::Storage(format!("invalid {what}: {name:?}")))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn set_then_get_round_trip() {
        let root = tempfile::tempdir().unwrap();
        let store = FileStore::open(root.path(), "tab-1", HOUR).unwrap();
        store.set("lastSearchResult", r#"{"a":1}"#).unwrap();
        assert_eq!(
            store.get("lastSearchResult").unwrap().as_deref(),
            Some(r#"{"a":1}"#)
        );
        assert!(store.dir().join("lastSearchResult.json").exists());
    }

    #[test]
    fn persists_across_instances_of_same_session() {
        let root = tempfile::tempdir().unwrap();
        FileStore::open(root.path(), "s1", HOUR)
            .unwrap()
            .set("k", "kept")
            .unwrap();

        let reopened = FileStore::open(root.path(), "s1", HOUR).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("kept"));

        let other_session = FileStore::open(root.path(), "s2", HOUR).unwrap();
        assert_eq!(other_session.get("k").unwrap(), None);
    }

    #[test]
    fn missing_key_is_none() {
        let root = tempfile::tempdir().unwrap();
        let store = FileStore::open(root.path(), "s", HOUR).unwrap();
        assert_eq!(store.get("nothing").unwrap(), None);
    }

    #[test]
    fn idle_entry_is_dropped() {
        let root = tempfile::tempdir().unwrap();
        let store = FileStore::open(root.path(), "s", Duration::from_secs(60)).unwrap();
        store.set("k", "v").unwrap();

        let path = store.dir().join("k.json");
        let stale = SystemTime::now() - Duration::from_secs(3600);
        std::fs::File::options()
            .append(true)
            .open(&path)
            .unwrap()
            .set_modified(stale)
            .unwrap();

        assert_eq!(store.get("k").unwrap(), None);
        assert!(!path.exists());
    }

    #[test]
    fn end_removes_session_data() {
        let root = tempfile::tempdir().unwrap();
        let store = FileStore::open(root.path(), "s", HOUR).unwrap();
        store.set("k", "v").unwrap();
        store.end().unwrap();
        assert!(!store.dir().exists());
        assert_eq!(store.get("k").unwrap(), None);
        // Ending twice is fine.
        store.end().unwrap();
    }

    #[test]
    fn remove_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let store = FileStore::open(root.path(), "s", HOUR).unwrap();
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn rejects_path_like_names() {
        let root = tempfile::tempdir().unwrap();
        assert!(FileStore::open(root.path(), "../escape", HOUR).is_err());
        assert!(FileStore::open(root.path(), "", HOUR).is_err());

        let store = FileStore::open(root.path(), "ok", HOUR).unwrap();
        let err = store.set("a/b", "v").unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
