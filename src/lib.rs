//! devfinder: search arXiv, GitHub and Stack Overflow from one place.
//!
//! # Architecture
//!
//! A search flows through:
//! - **SearchController**: validates input, shows a placeholder, makes one
//!   provider request, and reports the outcome to the display surface
//! - **devfinder-search**: provider gateways and parsers that normalise
//!   XML and JSON payloads into uniform records
//! - **CardRenderer** ([`render`]): records to markup
//! - **ResultCache** ([`cache`]): the last rendered block, kept for the
//!   rest of the session in a [`session::SessionStore`]
//!
//! When a page loads, the cached block is replayed verbatim and the query
//! inputs are repopulated.

pub mod cache;
pub mod config;
pub mod controller;
pub mod devfinder_dirs;
pub mod error;
pub mod render;
pub mod session;
pub mod surface;

pub use cache::{CachedResult, ResultCache};
pub use config::{AppConfig, ControllerConfig, SessionBackend, SessionConfig, StalePolicy};
pub use controller::{Bindings, InvalidInput, SearchController, SubmitOutcome};
pub use error::{AppError, Result};
pub use surface::{BufferedSurface, DisplaySurface, TerminalSurface};

pub use devfinder_search::{ProviderId, ResultRecord, ResultSet, SearchConfig};
