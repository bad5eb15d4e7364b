//! Shared HTTP client and request helper for provider gateways.

use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::ProviderId;

/// Build a [`reqwest::Client`] configured for provider requests.
///
/// The client has:
/// - The configured User-Agent
/// - A request timeout only when `timeout_seconds` is set
/// - Brotli and gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Transport`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let mut builder = reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(10));

    if let Some(secs) = config.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder
        .build()
        .map_err(|e| SearchError::Transport(format!("failed to build HTTP client: {e}")))
}

/// Send `request` and return the response body as text.
///
/// A send failure, a non-success status, or a body that cannot be read are
/// all reported as [`SearchError::Transport`]; the status case carries
/// `status: <code>` in its message.
pub async fn fetch_text(
    request: reqwest::RequestBuilder,
    provider: ProviderId,
) -> Result<String, SearchError> {
    let response = request
        .send()
        .await
        .map_err(|e| SearchError::Transport(format!("{provider} request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SearchError::Transport(format!(
            "{provider} HTTP error! status: {}",
            status.as_u16()
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| SearchError::Transport(format!("{provider} response read failed: {e}")))?;

    tracing::trace!(%provider, bytes = body.len(), "response received");
    Ok(body)
}
