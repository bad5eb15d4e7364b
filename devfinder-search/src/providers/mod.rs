//! Provider implementations.
//!
//! Each module provides a struct implementing [`crate::provider::Provider`]
//! for one external search index.

pub mod arxiv;
pub mod github;
pub mod stackoverflow;

pub use arxiv::ArxivProvider;
pub use github::GithubProvider;
pub use stackoverflow::StackOverflowProvider;
