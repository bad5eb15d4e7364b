//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls the endpoints each provider is reached at, the
//! result cap, and request behaviour. The defaults reproduce the public
//! endpoints exactly; tests point the base URLs at a mock server instead.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::MAX_RESULTS;

/// Configuration for provider requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of results requested from providers and kept after parsing.
    /// Never more than [`MAX_RESULTS`].
    pub max_results: usize,
    /// Optional per-request timeout in seconds. `None` leaves the request to
    /// the transport's own limits.
    pub timeout_seconds: Option<u64>,
    /// User-Agent sent with every request. The GitHub API rejects requests
    /// without one.
    pub user_agent: String,
    /// Base URL of the arXiv export API.
    pub arxiv_base_url: String,
    /// Raw-passthrough CORS relay that arXiv requests are wrapped in.
    pub cors_relay_url: String,
    /// Whether arXiv requests go through `cors_relay_url`.
    pub use_cors_relay: bool,
    /// Base URL of the GitHub REST API.
    pub github_base_url: String,
    /// Base URL of the Stack Exchange API.
    pub stackexchange_base_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: MAX_RESULTS,
            timeout_seconds: None,
            user_agent: concat!("devfinder/", env!("CARGO_PKG_VERSION")).to_owned(),
            arxiv_base_url: "https://export.arxiv.org".to_owned(),
            cors_relay_url: "https://api.allorigins.win/raw".to_owned(),
            use_cors_relay: true,
            github_base_url: "https://api.github.com".to_owned(),
            stackexchange_base_url: "https://api.stackexchange.com".to_owned(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `max_results` must be between 1 and [`MAX_RESULTS`]
    /// - `timeout_seconds`, when set, must be greater than 0
    /// - `user_agent` must not be blank
    /// - every base URL must be an absolute `http`/`https` URL
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if self.max_results > MAX_RESULTS {
            return Err(SearchError::Config(format!(
                "max_results must be at most {MAX_RESULTS}"
            )));
        }
        if self.timeout_seconds == Some(0) {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(SearchError::Config("user_agent must not be empty".into()));
        }
        for (name, value) in [
            ("arxiv_base_url", &self.arxiv_base_url),
            ("cors_relay_url", &self.cors_relay_url),
            ("github_base_url", &self.github_base_url),
            ("stackexchange_base_url", &self.stackexchange_base_url),
        ] {
            if !is_http_url(value) {
                return Err(SearchError::Config(format!(
                    "{name} must be an absolute http(s) URL, got {value:?}"
                )));
            }
        }
        Ok(())
    }

    /// Join a path onto a base URL without doubling the separator.
    pub(crate) fn endpoint(base: &str, path: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

/// Whether `value` parses as an absolute `http` or `https` URL.
pub(crate) fn is_http_url(value: &str) -> bool {
    url::Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}
