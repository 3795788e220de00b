//! # mvnrepo-workflow
//!
//! An Alfred workflow that searches [mvnrepository.com](https://mvnrepository.com)
//! and turns the results into Script Filter items.
//!
//! ## Architecture
//!
//! - [`models`]: Records extracted from the site (search hits, versions, snippets)
//! - [`sources`]: The [`Repository`] trait and its HTML-scraping implementation
//! - [`workflow`]: Argument dispatch and the presenter that builds items
//! - [`alfred`]: Script Filter feedback, workflow environment and host runtime
//! - [`utils`]: HTTP client, title cache and release checks
//! - [`config`]: Configuration management

pub mod alfred;
pub mod config;
pub mod models;
pub mod sources;
pub mod utils;
pub mod workflow;

// Re-export commonly used types
pub use models::{ArtifactRecord, Coordinate, SearchRecord, VersionSnippet};
pub use sources::{MvnRepositorySource, Repository, SourceError};
pub use workflow::Workflow;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
