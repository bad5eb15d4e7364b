//! Display surfaces: where the controller writes what the user sees.
//!
//! A [`DisplaySurface`] stands in for the page: a results region that each
//! render fully replaces, a blocking notice for validation problems, and
//! the query and provider inputs that a restore repopulates.

use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

use devfinder_search::ProviderId;

/// Output side of a page.
pub trait DisplaySurface: Send + Sync {
    /// Replace the results region with `markup`.
    fn show(&self, markup: &str);

    /// Show a blocking notice.
    fn alert(&self, message: &str);

    /// Set the query input's text.
    fn set_query_text(&self, text: &str);

    /// Set the provider selector.
    fn set_provider(&self, provider: ProviderId);
}

impl<D: DisplaySurface + ?Sized> DisplaySurface for Arc<D> {
    fn show(&self, markup: &str) {
        (**self).show(markup);
    }

    fn alert(&self, message: &str) {
        (**self).alert(message);
    }

    fn set_query_text(&self, text: &str) {
        (**self).set_query_text(text);
    }

    fn set_provider(&self, provider: ProviderId) {
        (**self).set_provider(provider);
    }
}

/// Writes the results region to stdout and notices to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalSurface;

impl DisplaySurface for TerminalSurface {
    fn show(&self, markup: &str) {
        let mut out = std::io::stdout().lock();
        // A closed stdout (e.g. `| head`) is not worth a panic.
        let _ = writeln!(out, "{markup}");
        let _ = out.flush();
    }

    fn alert(&self, message: &str) {
        eprintln!("! {message}");
    }

    fn set_query_text(&self, text: &str) {
        eprintln!("query: {text}");
    }

    fn set_provider(&self, provider: ProviderId) {
        eprintln!("provider: {}", provider.form_value());
    }
}

/// Everything a [`BufferedSurface`] has been told.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceState {
    /// Current content of the results region.
    pub results: Option<String>,
    /// Every markup block shown, oldest first.
    pub history: Vec<String>,
    /// Every notice raised, oldest first.
    pub alerts: Vec<String>,
    /// Query input text.
    pub query_text: String,
    /// Provider selector value.
    pub provider: Option<ProviderId>,
}

/// Keeps the page state in memory, for embedding and tests.
#[derive(Debug, Default)]
pub struct BufferedSurface {
    state: Mutex<SurfaceState>,
}

impl BufferedSurface {
    /// An empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SurfaceState {
        self.lock().clone()
    }

    /// Current content of the results region.
    pub fn results(&self) -> Option<String> {
        self.lock().results.clone()
    }

    /// Notices raised so far.
    pub fn alerts(&self) -> Vec<String> {
        self.lock().alerts.clone()
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        // The state stays consistent even if a holder panicked mid-update.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DisplaySurface for BufferedSurface {
    fn show(&self, markup: &str) {
        let mut state = self.lock();
        state.results = Some(markup.to_owned());
        state.history.push(markup.to_owned());
    }

    fn alert(&self, message: &str) {
        self.lock().alerts.push(message.to_owned());
    }

    fn set_query_text(&self, text: &str) {
        self.lock().query_text = text.to_owned();
    }

    fn set_provider(&self, provider: ProviderId) {
        self.lock().provider = Some(provider);
    }
}
