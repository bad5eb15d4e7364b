//! Provider dispatch: maps a [`ProviderId`] to its gateway + parser pair.
//!
//! The `match` in [`search_with_client`] is exhaustive, so adding a
//! provider variant without wiring it here fails to compile.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::provider::Provider;
use crate::providers::{ArxivProvider, GithubProvider, StackOverflowProvider};
use crate::types::{ProviderId, Query, ResultSet};

/// Run one search using an existing HTTP client.
///
/// Issues exactly one request to the query's provider, then parses the
/// payload with that provider's parser.
///
/// # Errors
///
/// [`SearchError::Transport`] for network failures and non-success
/// statuses, [`SearchError::Parse`] for unusable payloads.
pub async fn search_with_client(
    client: &reqwest::Client,
    query: &Query,
    config: &SearchConfig,
) -> Result<ResultSet, SearchError> {
    match query.provider {
        ProviderId::Arxiv => run(&ArxivProvider, client, &query.text, config).await,
        ProviderId::Github => run(&GithubProvider, client, &query.text, config).await,
        ProviderId::StackOverflow => {
            run(&StackOverflowProvider, client, &query.text, config).await
        }
    }
}

async fn run<P: Provider>(
    provider: &P,
    client: &reqwest::Client,
    query: &str,
    config: &SearchConfig,
) -> Result<ResultSet, SearchError> {
    let id = provider.id();
    tracing::trace!(provider = %id, query, "dispatching search");

    let raw = provider.fetch(client, query, config).await?;
    let results = provider.parse(&raw, query, config.max_results)?;

    tracing::debug!(provider = %id, count = results.len(), "search finished");
    Ok(results)
}
