//! Records extracted from mvnrepository.com pages.

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// One artifact block from the search results page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Display title of the artifact (e.g. "Kotlin Stdlib")
    pub title: String,

    /// Maven group id
    pub group_id: String,

    /// Maven artifact id
    pub artifact_id: String,

    /// Absolute URL of the artifact page, empty if the page had no link
    pub url: String,

    /// Short description, HTML fragment with newlines removed
    pub description: String,
}

impl SearchRecord {
    /// Coordinate without a version
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(&self.group_id, &self.artifact_id)
    }
}

/// One released version of an artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// Maven group id
    pub group_id: String,

    /// Maven artifact id
    pub artifact_id: String,

    /// Version label as shown on the site
    pub version: String,

    /// Absolute URL of the version page
    pub url: String,
}

impl ArtifactRecord {
    /// Build a record, deriving the version page URL from `base_url`
    pub fn new(
        base_url: &str,
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        let group_id = group_id.into();
        let artifact_id = artifact_id.into();
        let version = version.into();
        let url = Coordinate::new(&group_id, &artifact_id)
            .with_version(&version)
            .page_url(base_url);

        Self {
            group_id,
            artifact_id,
            version,
            url,
        }
    }

    /// Full coordinate including the version
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(&self.group_id, &self.artifact_id).with_version(&self.version)
    }
}

/// Dependency declarations for a single version, one per build tool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSnippet {
    pub maven: String,
    pub gradle: String,
    pub sbt: String,
    pub ivy: String,
}

impl VersionSnippet {
    /// Snippets paired with their build tool name, in display order
    pub fn entries(&self) -> [(BuildTool, &str); 4] {
        [
            (BuildTool::Maven, self.maven.as_str()),
            (BuildTool::Gradle, self.gradle.as_str()),
            (BuildTool::Sbt, self.sbt.as_str()),
            (BuildTool::Ivy, self.ivy.as_str()),
        ]
    }
}

/// Build tools with a snippet on the version page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildTool {
    Maven,
    Gradle,
    Sbt,
    Ivy,
}

impl BuildTool {
    /// Returns the display name of the build tool
    pub fn name(&self) -> &'static str {
        match self {
            BuildTool::Maven => "Maven",
            BuildTool::Gradle => "Gradle",
            BuildTool::Sbt => "SBT",
            BuildTool::Ivy => "Ivy",
        }
    }

    /// Id of the textarea holding this tool's snippet
    pub fn textarea_id(&self) -> &'static str {
        match self {
            BuildTool::Maven => "maven-a",
            BuildTool::Gradle => "gradle-a",
            BuildTool::Sbt => "sbt-a",
            BuildTool::Ivy => "ivy-a",
        }
    }
}

impl std::fmt::Display for BuildTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_record_url() {
        let record = ArtifactRecord::new(
            "https://mvnrepository.com",
            "org.jetbrains.kotlin",
            "kotlin-stdlib",
            "1.3.11",
        );
        assert_eq!(
            record.url,
            "https://mvnrepository.com/artifact/org.jetbrains.kotlin/kotlin-stdlib/1.3.11"
        );
    }

    #[test]
    fn test_snippet_entries_order() {
        let snippet = VersionSnippet {
            maven: "m".to_string(),
            gradle: "g".to_string(),
            sbt: "s".to_string(),
            ivy: "i".to_string(),
        };
        let names: Vec<_> = snippet.entries().iter().map(|(t, _)| t.name()).collect();
        assert_eq!(names, vec!["Maven", "Gradle", "SBT", "Ivy"]);
        assert_eq!(snippet.entries()[2].1, "s");
    }
}
