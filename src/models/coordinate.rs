//! Maven coordinates and the strings derived from them.

use serde::{Deserialize, Serialize};

/// A (group id, artifact id, version) triple; the version is optional
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
}

impl Coordinate {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn without_version(mut self) -> Self {
        self.version = None;
        self
    }

    /// Space separated form, used as the follow-up query and as the title cache key
    ///
    /// `"{group} {artifact}"` or `"{group} {artifact} {version}"`.
    pub fn query(&self) -> String {
        match &self.version {
            Some(version) => format!("{} {} {}", self.group_id, self.artifact_id, version),
            None => format!("{} {}", self.group_id, self.artifact_id),
        }
    }

    /// Artifact or version page on the site rooted at `base_url`
    pub fn page_url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        match &self.version {
            Some(version) => format!(
                "{}/artifact/{}/{}/{}",
                base, self.group_id, self.artifact_id, version
            ),
            None => format!("{}/artifact/{}/{}", base, self.group_id, self.artifact_id),
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}:{}:{}", self.group_id, self.artifact_id, version),
            None => write!(f, "{}:{}", self.group_id, self.artifact_id),
        }
    }
}
