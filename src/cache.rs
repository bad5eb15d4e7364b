//! Best-effort cache of the last rendered result block.
//!
//! One slot, last write wins, stored as JSON under a fixed key in the
//! session store. Storage failures are logged and swallowed: the cache is
//! advisory and never the reason a search fails.

use serde::{Deserialize, Serialize};

use devfinder_search::ProviderId;

use crate::session::SessionStore;

/// Session key holding the cached result.
pub const CACHE_KEY: &str = "lastSearchResult";

/// Snapshot of the last successful search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResult {
    /// Rendered results block, replayed verbatim on restore.
    #[serde(rename = "html")]
    pub rendered_markup: String,
    /// Query text that produced it.
    pub query: String,
    /// Provider that produced it, stored as its label.
    #[serde(rename = "type")]
    pub provider: ProviderId,
    /// Save time in epoch milliseconds.
    pub timestamp: i64,
}

/// The single-slot result cache.
#[derive(Debug)]
pub struct ResultCache<S> {
    store: S,
}

impl<S: SessionStore> ResultCache<S> {
    /// Wrap a session store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Overwrite the slot with `markup` stamped with the current time.
    /// Never fails.
    pub fn save(&self, markup: &str, query: &str, provider: ProviderId) {
        let entry = CachedResult {
            rendered_markup: markup.to_owned(),
            query: query.to_owned(),
            provider,
            timestamp: chrono::Utc::now().timestamp_millis(),
        };

        let json = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "could not encode cached result");
                return;
            }
        };

        match self.store.set(CACHE_KEY, &json) {
            Ok(()) => tracing::debug!(%provider, bytes = json.len(), "cached result saved"),
            Err(e) => tracing::warn!(error = %e, "could not save cached result"),
        }
    }

    /// Read the slot. Anything that cannot be read or decoded counts as
    /// "nothing cached".
    pub fn restore(&self) -> Option<CachedResult> {
        let raw = match self.store.get(CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "could not read cached result");
                return None;
            }
        };

        match serde_json::from_str::<CachedResult>(&raw) {
            Ok(cached) => Some(cached),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring undecodable cached result");
                None
            }
        }
    }
}
