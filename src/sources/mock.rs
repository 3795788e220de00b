//! Mock repository for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::models::{ArtifactRecord, SearchRecord, VersionSnippet};
use crate::sources::{Repository, SourceError};

const MOCK_BASE_URL: &str = "https://mvnrepository.example";

/// A mock repository that returns predefined records and remembers its calls.
#[derive(Debug, Default)]
pub struct MockRepository {
    search_results: Mutex<Vec<SearchRecord>>,
    versions: Mutex<Vec<ArtifactRecord>>,
    snippet: Mutex<VersionSnippet>,
    failure: Mutex<Option<String>>,
    calls: Mutex<Vec<String>>,
}

impl MockRepository {
    /// Create a new mock repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the records returned by `search`.
    pub fn set_search_results(&self, results: Vec<SearchRecord>) {
        *lock(&self.search_results) = results;
    }

    /// Set the records returned by `list_versions`.
    pub fn set_versions(&self, versions: Vec<ArtifactRecord>) {
        *lock(&self.versions) = versions;
    }

    /// Set the snippet returned by `fetch_snippet`.
    pub fn set_snippet(&self, snippet: VersionSnippet) {
        *lock(&self.snippet) = snippet;
    }

    /// Make every lookup fail with a network error.
    pub fn fail_with(&self, message: &str) {
        *lock(&self.failure) = Some(message.to_string());
    }

    /// Calls received so far, as `"operation args..."`.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: String) -> Result<(), SourceError> {
        lock(&self.calls).push(call);
        match &*lock(&self.failure) {
            Some(message) => Err(SourceError::Network(message.clone())),
            None => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl Repository for MockRepository {
    async fn search(&self, keyword: &str) -> Result<Vec<SearchRecord>, SourceError> {
        self.record(format!("search {}", keyword))?;
        Ok(lock(&self.search_results).clone())
    }

    async fn list_versions(
        &self,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<Vec<ArtifactRecord>, SourceError> {
        self.record(format!("list_versions {} {}", group_id, artifact_id))?;
        Ok(lock(&self.versions).clone())
    }

    async fn fetch_snippet(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
    ) -> Result<VersionSnippet, SourceError> {
        self.record(format!(
            "fetch_snippet {} {} {}",
            group_id, artifact_id, version
        ))?;
        Ok(lock(&self.snippet).clone())
    }
}

/// Helper function to create a search record for testing.
pub fn make_search_record(group_id: &str, artifact_id: &str, title: &str) -> SearchRecord {
    SearchRecord {
        title: title.to_string(),
        group_id: group_id.to_string(),
        artifact_id: artifact_id.to_string(),
        url: format!("{}/artifact/{}/{}", MOCK_BASE_URL, group_id, artifact_id),
        description: format!("{} description", title),
    }
}

/// Helper function to create a version record for testing.
pub fn make_artifact_record(group_id: &str, artifact_id: &str, version: &str) -> ArtifactRecord {
    ArtifactRecord::new(MOCK_BASE_URL, group_id, artifact_id, version)
}
