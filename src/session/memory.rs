//! Process-local session store backed by a [`moka`] cache.

use std::time::Duration;

use moka::sync::Cache;

use super::SessionStore;
use crate::error::Result;

/// Maximum number of keys one in-memory session holds.
const MAX_ENTRIES: u64 = 64;

/// In-memory [`SessionStore`]. Entries expire after `idle` without a read
/// or write, and all of them go away with the process.
#[derive(Clone)]
pub struct MemoryStore {
    entries: Cache<String, String>,
}

impl MemoryStore {
    /// Create an empty store whose entries expire after `idle` of inactivity.
    pub fn new(idle: Duration) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(MAX_ENTRIES)
                .time_to_idle(idle)
                .build(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(30 * 60))
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.invalidate(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_returns_none() {
        let store = MemoryStore::default();
        assert_eq!(store.get("absent").expect("get"), None);
    }

    #[test]
    fn set_then_get() {
        let store = MemoryStore::default();
        store.set("k", "v1").expect("set");
        assert_eq!(store.get("k").expect("get").as_deref(), Some("v1"));
    }

    #[test]
    fn overwrite_same_key_updates_value() {
        let store = MemoryStore::default();
        store.set("k", "old").expect("set");
        store.set("k", "new").expect("set");
        assert_eq!(store.get("k").expect("get").as_deref(), Some("new"));
    }

    #[test]
    fn remove_clears_key() {
        let store = MemoryStore::default();
        store.set("k", "v").expect("set");
        store.remove("k").expect("remove");
        store.remove("never-set").expect("remove missing");
        assert_eq!(store.get("k").expect("get"), None);
    }

    #[test]
    fn idle_entries_expire() {
        let store = MemoryStore::new(Duration::from_millis(50));
        store.set("k", "v").expect("set");
        std::thread::sleep(Duration::from_millis(150));
        assert_eq!(store.get("k").expect("get"), None);
    }

    #[test]
    fn clones_share_entries() {
        let store = MemoryStore::default();
        let other = store.clone();
        store.set("k", "shared").expect("set");
        assert_eq!(other.get("k").expect("get").as_deref(), Some("shared"));
    }
}
