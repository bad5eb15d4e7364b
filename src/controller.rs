//! Search controller: one page's worth of search state.
//!
//! The controller owns the injected display surface and result cache. A
//! [`SearchController::submit`] validates input, makes exactly one provider
//! request, and always ends with the results region showing results, a
//! "no results" message, or an error message. It never returns an error.

use std::sync::atomic::{AtomicU64, Ordering};

use devfinder_search::{ProviderId, Query, SearchConfig, dispatch, http};

use crate::cache::{CachedResult, ResultCache};
use crate::config::{AppConfig, StalePolicy};
use crate::render;
use crate::session::SessionStore;
use crate::surface::DisplaySurface;

/// Page elements and storage handed to [`SearchController::init`].
#[derive(Debug)]
pub struct Bindings<D, S> {
    /// Where output goes.
    pub surface: D,
    /// Session storage for the result cache.
    pub store: S,
}

/// Input rejected before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInput {
    /// The query text was empty after trimming.
    MissingKeyword,
    /// The provider selection named no known provider.
    MissingProvider,
}

impl InvalidInput {
    /// The notice shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingKeyword => "Please enter a keyword to search!",
            Self::MissingProvider => "Please select a resource type!",
        }
    }
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Rejected by validation; nothing was requested.
    Invalid(InvalidInput),
    /// Results were displayed and cached.
    Rendered(usize),
    /// The provider returned nothing usable.
    NoResults,
    /// The request or the payload failed; the message was displayed.
    Failed(String),
    /// A newer submission started first and stale responses are discarded.
    Superseded,
}

/// Drives searches for one page.
pub struct SearchController<D, S> {
    surface: D,
    cache: ResultCache<S>,
    client: reqwest::Client,
    search: SearchConfig,
    stale_policy: StalePolicy,
    generation: AtomicU64,
    restored: Option<CachedResult>,
}

impl<D: DisplaySurface, S: SessionStore> SearchController<D, S> {
    /// Load the page: validate `config`, build the HTTP client, and replay
    /// any result cached earlier in the session.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid configuration or when the HTTP client
    /// cannot be built.
    pub fn init(bindings: Bindings<D, S>, config: &AppConfig) -> crate::error::Result<Self> {
        config.validate()?;
        let client = http::build_client(&config.search)?;

        let mut controller = Self {
            surface: bindings.surface,
            cache: ResultCache::new(bindings.store),
            client,
            search: config.search.clone(),
            stale_policy: config.controller.stale_responses,
            generation: AtomicU64::new(0),
            restored: None,
        };
        controller.restored = controller.restore_previous();
        Ok(controller)
    }

    /// Replay the cached result, if any: repopulate the inputs and show the
    /// cached block verbatim under a "restored" notice.
    fn restore_previous(&self) -> Option<CachedResult> {
        let cached = self.cache.restore()?;

        self.surface.set_query_text(&cached.query);
        self.surface.set_provider(cached.provider);
        self.surface
            .show(&render::render_restored(&cached.rendered_markup));

        tracing::info!(
            provider = %cached.provider,
            saved_at = cached.timestamp,
            "restored results from last session"
        );
        Some(cached)
    }

    /// What was restored when the page loaded.
    pub fn restored(&self) -> Option<&CachedResult> {
        self.restored.as_ref()
    }

    /// Ticket of the most recent submission (0 before the first).
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// The bound display surface.
    pub fn surface(&self) -> &D {
        &self.surface
    }

    /// The result cache.
    pub fn cache(&self) -> &ResultCache<S> {
        &self.cache
    }

    /// Run one search from raw form input.
    pub async fn submit(&self, raw_query_text: &str, raw_provider_selection: &str) -> SubmitOutcome {
        let text = raw_query_text.trim();
        if text.is_empty() {
            return self.reject(InvalidInput::MissingKeyword);
        }
        let Ok(provider) = raw_provider_selection.parse::<ProviderId>() else {
            return self.reject(InvalidInput::MissingProvider);
        };
        let query = Query {
            text: text.to_owned(),
            provider,
        };

        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.surface
            .show(&render::render_searching(provider, &query.text));
        tracing::debug!(%provider, ticket, "search submitted");
        tracing::trace!(query = %query.text, "search query");

        let result = dispatch::search_with_client(&self.client, &query, &self.search).await;

        if self.stale_policy == StalePolicy::Discard && self.generation() != ticket {
            tracing::debug!(%provider, ticket, latest = self.generation(), "discarding stale response");
            return SubmitOutcome::Superseded;
        }

        match result {
            Ok(results) if results.is_empty() => {
                tracing::info!(%provider, "no results");
                self.surface.show(&render::render_no_results(provider));
                SubmitOutcome::NoResults
            }
            Ok(results) => {
                let markup = render::render_results(&results);
                self.cache.save(&markup, &query.text, provider);
                self.surface.show(&markup);
                tracing::info!(%provider, count = results.len(), "results displayed");
                SubmitOutcome::Rendered(results.len())
            }
            Err(e) => {
                let detail = e.to_string();
                tracing::warn!(%provider, error = %detail, "search failed");
                self.surface.show(&render::render_failure(&detail));
                SubmitOutcome::Failed(detail)
            }
        }
    }

    fn reject(&self, invalid: InvalidInput) -> SubmitOutcome {
        tracing::debug!(?invalid, "submission rejected");
        self.surface.alert(invalid.message());
        SubmitOutcome::Invalid(invalid)
    }
}
