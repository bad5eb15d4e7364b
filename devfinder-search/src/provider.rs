//! Trait definition for provider gateway + parser pairs.
//!
//! Each provider (arXiv, GitHub, Stack Overflow) implements [`Provider`],
//! which couples the outbound request (the gateway half) with the function
//! that normalises the raw payload (the parser half).

use std::future::Future;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::types::{ProviderId, ResultSet};

/// A search provider backend.
///
/// Implementors handle:
///
/// - URL construction with query encoding
/// - Provider-specific headers
/// - Parsing the raw payload into a [`ResultSet`], skipping individual
///   malformed entries instead of failing the whole set
///
/// All implementations must be `Send + Sync` so a controller can share them
/// across tasks.
pub trait Provider: Send + Sync {
    /// Which [`ProviderId`] this implementation represents.
    fn id(&self) -> ProviderId;

    /// Build the outbound request for `query`.
    fn request(
        &self,
        client: &reqwest::Client,
        query: &str,
        config: &SearchConfig,
    ) -> reqwest::RequestBuilder;

    /// Normalise a raw payload into results.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Parse`] when the payload's top-level shape is
    /// unusable. Individual bad entries never produce an error.
    fn parse(&self, raw: &str, query: &str, max_results: usize) -> Result<ResultSet, SearchError>;

    /// Issue the request and return the raw payload.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Transport`] on network failure or a non-success
    /// status.
    fn fetch(
        &self,
        client: &reqwest::Client,
        query: &str,
        config: &SearchConfig,
    ) -> impl Future<Output = Result<String, SearchError>> + Send {
        let request = self.request(client, query, config);
        let id = self.id();
        async move { http::fetch_text(request, id).await }
    }
}
