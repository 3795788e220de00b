//! Core data models for artifacts, versions and dependency snippets.

mod artifact;
mod coordinate;

pub use artifact::{ArtifactRecord, BuildTool, SearchRecord, VersionSnippet};
pub use coordinate::Coordinate;
