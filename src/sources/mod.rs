//! Artifact repository sources.
//!
//! This module defines the [`Repository`] trait the workflow talks to. The only
//! real implementation is [`MvnRepositorySource`], which scrapes the HTML pages
//! of mvnrepository.com; [`MockRepository`] returns canned records for tests.
//!
//! # Failure semantics
//!
//! - Transport failures and unexpected HTTP statuses are [`SourceError::Network`].
//! - Bodies that cannot be read or are not HTML are [`SourceError::Parse`].
//! - A page whose markup no longer matches the selectors is **not** an error: the
//!   operation returns an empty list (or empty snippets). This keeps the workflow
//!   usable while the site layout drifts.

pub mod mock;
mod mvnrepository;

pub use mock::MockRepository;
pub use mvnrepository::{
    parse_search_page, parse_snippet_page, parse_versions_page, resolve_url, site_comment_marker,
    strip_site_comment, truncate_description, MvnRepositorySource,
};

use crate::models::{ArtifactRecord, SearchRecord, VersionSnippet};
use async_trait::async_trait;

/// The Repository trait defines the three lookups the workflow needs.
#[async_trait]
pub trait Repository: Send + Sync + std::fmt::Debug {
    /// Search artifacts matching a keyword
    async fn search(&self, keyword: &str) -> Result<Vec<SearchRecord>, SourceError>;

    /// List the published versions of an artifact
    async fn list_versions(
        &self,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<Vec<ArtifactRecord>, SourceError>;

    /// Fetch the dependency snippets of one version
    async fn fetch_snippet(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
    ) -> Result<VersionSnippet, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// The response could not be read as HTML
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}
