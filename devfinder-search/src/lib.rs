//! # devfinder-search
//!
//! Provider gateways and response parsers for devfinder.
//!
//! This crate talks to three public search indexes and normalises their very
//! different payloads into one record shape:
//!
//! - arXiv: Atom XML, fetched through a raw-passthrough CORS relay
//! - GitHub: repository search JSON, sorted by stars
//! - Stack Overflow: Stack Exchange question search JSON
//!
//! ## Design
//!
//! - One [`Provider`] implementation per [`ProviderId`], selected by an
//!   exhaustive `match`
//! - Exactly one outbound request per search; no retries, no fan-out
//! - Individual malformed entries are skipped and logged; only an unusable
//!   top-level payload is an error
//! - Results are capped at [`MAX_RESULTS`] in provider order
//!
//! ## Logging
//!
//! Query text is logged only at trace level.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod markup;
pub mod provider;
pub mod providers;
pub mod types;

pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use provider::Provider;
pub use types::{ProviderId, Query, ResultRecord, ResultSet, UnknownProvider, MAX_RESULTS};

/// Search one provider.
///
/// Validates `config`, builds a client, and runs the query against the
/// provider named in `query`.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid configuration, otherwise
/// the errors of [`dispatch::search_with_client`].
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> devfinder_search::Result<()> {
/// use devfinder_search::{ProviderId, Query, SearchConfig};
///
/// let query = Query::new("async runtime", ProviderId::Github).expect("non-empty");
/// let results = devfinder_search::search(&query, &SearchConfig::default()).await?;
/// for record in &results {
///     println!("{}: {}", record.title, record.link);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &Query, config: &SearchConfig) -> Result<ResultSet> {
    config.validate()?;
    let client = http::build_client(config)?;
    dispatch::search_with_client(&client, query, config).await
}
