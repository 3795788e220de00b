//! Query dispatch.
//!
//! Alfred calls the binary once per query with up to three positional
//! arguments; their count decides what to show:
//!
//! | args | shows |
//! |------|-------|
//! | 0 | update notice, if any |
//! | 1 (`keyword`) | search results |
//! | 2 (`group artifact`) | versions |
//! | 3 (`group artifact version`) | dependency snippets |
//!
//! Search results autocomplete to the two-argument form and versions to the
//! three-argument form, so a user walks the levels by pressing tab or enter.

pub mod present;

use std::sync::Arc;

use crate::alfred::{Feedback, HostRuntime, Icon, Item, UPDATE_JOB_NAME};
use crate::sources::{Repository, SourceError};
use crate::utils::TitleCache;

/// Icon for the update notice
const UPDATE_ICON: &str = "icons/update.png";

/// Errors that end an invocation with an error item
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// A parsed query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// No arguments
    Empty,
    /// Free text search
    Search(String),
    /// Versions of an artifact
    Versions { group_id: String, artifact_id: String },
    /// Snippets of one version
    Snippet {
        group_id: String,
        artifact_id: String,
        version: String,
    },
    /// More arguments than any level takes
    Unsupported(usize),
}

impl Query {
    /// Build a query from raw arguments.
    ///
    /// Each argument is split on whitespace, so `["g a"]` and `["g", "a"]` are
    /// the same query.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Self {
        let words: Vec<&str> = args
            .iter()
            .flat_map(|arg| arg.as_ref().split_whitespace())
            .collect();

        match words.as_slice() {
            [] => Query::Empty,
            [keyword] => Query::Search(keyword.to_string()),
            [group_id, artifact_id] => Query::Versions {
                group_id: group_id.to_string(),
                artifact_id: artifact_id.to_string(),
            },
            [group_id, artifact_id, version] => Query::Snippet {
                group_id: group_id.to_string(),
                artifact_id: artifact_id.to_string(),
                version: version.to_string(),
            },
            more => Query::Unsupported(more.len()),
        }
    }

    /// Whether a fatal error is reported as plain text instead of an item.
    ///
    /// The empty query runs the update flow, where errors are plain text.
    pub fn text_errors(&self) -> bool {
        matches!(self, Query::Empty)
    }
}

/// Everything one invocation needs, built once in `main`
#[derive(Debug, Clone)]
pub struct Workflow {
    repository: Arc<dyn Repository>,
    titles: TitleCache,
    runtime: Arc<dyn HostRuntime>,
}

impl Workflow {
    pub fn new(
        repository: Arc<dyn Repository>,
        titles: TitleCache,
        runtime: Arc<dyn HostRuntime>,
    ) -> Self {
        Self {
            repository,
            titles,
            runtime,
        }
    }

    /// Answer a query with the feedback to send
    pub async fn run(&self, query: &Query) -> Result<Feedback, WorkflowError> {
        let mut feedback = Feedback::new();

        match query {
            Query::Empty => {
                self.update_notice(&mut feedback);
            }
            Query::Search(keyword) => {
                tracing::info!("Searching for '{}'", keyword);
                let records = self.repository.search(keyword).await?;
                feedback.extend(present::search_items(&records, &self.titles));
            }
            Query::Versions {
                group_id,
                artifact_id,
            } => {
                tracing::info!("Listing versions of {}:{}", group_id, artifact_id);
                let records = self.repository.list_versions(group_id, artifact_id).await?;
                feedback.extend(present::artifact_items(&records, &self.titles));
            }
            Query::Snippet {
                group_id,
                artifact_id,
                version,
            } => {
                tracing::info!(
                    "Fetching snippets for {}:{}:{}",
                    group_id,
                    artifact_id,
                    version
                );
                let snippet = self
                    .repository
                    .fetch_snippet(group_id, artifact_id, version)
                    .await?;
                feedback.extend(present::snippet_items(&snippet));
            }
            Query::Unsupported(count) => {
                tracing::info!("Ignoring query with {} arguments", count);
            }
        }

        if matches!(query, Query::Empty | Query::Unsupported(_)) {
            feedback.warn_empty("No matching items", "Try a different query?");
        }

        Ok(feedback)
    }

    /// Start a background update check when one is due, and show the notice
    /// if the last check found a newer release.
    fn update_notice(&self, feedback: &mut Feedback) {
        if self.runtime.update_check_due() && !self.runtime.is_job_running(UPDATE_JOB_NAME) {
            tracing::info!("Running update check in background...");
            if let Err(e) = self.runtime.run_in_background(UPDATE_JOB_NAME, &["--check"]) {
                tracing::warn!("Error starting update check: {}", e);
            }
        }

        if self.runtime.update_available() {
            feedback.push(
                Item::new("Update available!")
                    .subtitle("↩ to open release page")
                    .arg(self.runtime.releases_url())
                    .valid(true)
                    .icon(Icon::path(UPDATE_ICON)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alfred::HostError;
    use crate::models::VersionSnippet;
    use crate::sources::mock::{make_artifact_record, make_search_record};
    use crate::sources::MockRepository;
    use crate::utils::UpdateState;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Debug, Default)]
    struct FakeRuntime {
        due: bool,
        available: bool,
        running: bool,
        started: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl HostRuntime for FakeRuntime {
        async fn check_for_update(&self) -> Result<UpdateState, HostError> {
            Ok(UpdateState {
                checked_at: chrono::Utc::now(),
                latest_version: None,
                update_available: self.available,
            })
        }

        fn update_check_due(&self) -> bool {
            self.due
        }

        fn update_available(&self) -> bool {
            self.available
        }

        fn releases_url(&self) -> String {
            "https://github.com/owner/workflow/releases".to_string()
        }

        fn is_job_running(&self, _name: &str) -> bool {
            self.running
        }

        fn run_in_background(&self, name: &str, args: &[&str]) -> Result<(), HostError> {
            self.started
                .lock()
                .unwrap()
                .push(format!("{} {}", name, args.join(" ")));
            Ok(())
        }
    }

    fn workflow(
        dir: &TempDir,
        repository: Arc<MockRepository>,
        runtime: Arc<FakeRuntime>,
    ) -> Workflow {
        Workflow::new(repository, TitleCache::new(dir.path()), runtime)
    }

    #[test]
    fn test_query_parse() {
        assert_eq!(Query::parse::<&str>(&[]), Query::Empty);
        assert_eq!(Query::parse(&["  "]), Query::Empty);
        assert_eq!(
            Query::parse(&["kotlin"]),
            Query::Search("kotlin".to_string())
        );
        assert_eq!(
            Query::parse(&["org.jetbrains.kotlin kotlin-stdlib"]),
            Query::Versions {
                group_id: "org.jetbrains.kotlin".to_string(),
                artifact_id: "kotlin-stdlib".to_string(),
            }
        );
        assert_eq!(
            Query::parse(&["g1", "a1 1.0"]),
            Query::Snippet {
                group_id: "g1".to_string(),
                artifact_id: "a1".to_string(),
                version: "1.0".to_string(),
            }
        );
        assert_eq!(Query::parse(&["a", "b", "c", "d"]), Query::Unsupported(4));
    }

    #[test]
    fn test_text_errors_only_for_empty_query() {
        assert!(Query::parse::<&str>(&[]).text_errors());
        assert!(!Query::parse(&["kotlin"]).text_errors());
        assert!(!Query::parse(&["g1", "a1"]).text_errors());
        assert!(!Query::parse(&["a b c d"]).text_errors());
    }

    #[tokio::test]
    async fn test_search_dispatch() {
        let dir = TempDir::new().unwrap();
        let repository = Arc::new(MockRepository::new());
        repository.set_search_results(vec![make_search_record("g1", "a1", "One")]);
        let wf = workflow(&dir, repository.clone(), Arc::new(FakeRuntime::default()));

        let feedback = wf.run(&Query::parse(&["one"])).await.unwrap();
        assert_eq!(feedback.len(), 1);
        assert_eq!(feedback.items()[0].title, "One");
        assert_eq!(repository.calls(), vec!["search one"]);
    }

    #[tokio::test]
    async fn test_empty_search_dispatch() {
        let dir = TempDir::new().unwrap();
        let repository = Arc::new(MockRepository::new());
        let wf = workflow(&dir, repository, Arc::new(FakeRuntime::default()));

        let feedback = wf.run(&Query::parse(&["nothing"])).await.unwrap();
        assert_eq!(feedback.len(), 1);
        assert_eq!(feedback.items()[0].title, "NOT FOUND");
    }

    #[tokio::test]
    async fn test_versions_dispatch() {
        let dir = TempDir::new().unwrap();
        let repository = Arc::new(MockRepository::new());
        repository.set_versions(vec![
            make_artifact_record("g1", "a1", "1.0"),
            make_artifact_record("g1", "a1", "1.1"),
        ]);
        let wf = workflow(&dir, repository.clone(), Arc::new(FakeRuntime::default()));

        let feedback = wf.run(&Query::parse(&["g1", "a1"])).await.unwrap();
        assert_eq!(feedback.len(), 2);
        assert_eq!(repository.calls(), vec!["list_versions g1 a1"]);
    }

    #[tokio::test]
    async fn test_no_versions_is_empty() {
        let dir = TempDir::new().unwrap();
        let repository = Arc::new(MockRepository::new());
        let wf = workflow(&dir, repository, Arc::new(FakeRuntime::default()));

        let feedback = wf.run(&Query::parse(&["g1", "a1"])).await.unwrap();
        assert!(feedback.is_empty());
    }

    #[tokio::test]
    async fn test_snippet_dispatch() {
        let dir = TempDir::new().unwrap();
        let repository = Arc::new(MockRepository::new());
        repository.set_snippet(VersionSnippet {
            maven: "<dependency/>".to_string(),
            ..VersionSnippet::default()
        });
        let wf = workflow(&dir, repository.clone(), Arc::new(FakeRuntime::default()));

        let feedback = wf.run(&Query::parse(&["g1 a1 1.0"])).await.unwrap();
        assert_eq!(feedback.len(), 4);
        assert_eq!(feedback.items()[0].arg.as_deref(), Some("<dependency/>"));
        assert_eq!(repository.calls(), vec!["fetch_snippet g1 a1 1.0"]);
    }

    #[tokio::test]
    async fn test_source_error_propagates() {
        let dir = TempDir::new().unwrap();
        let repository = Arc::new(MockRepository::new());
        repository.fail_with("connection refused");
        let wf = workflow(&dir, repository, Arc::new(FakeRuntime::default()));

        let result = wf.run(&Query::parse(&["kotlin"])).await;
        assert!(matches!(
            result,
            Err(WorkflowError::Source(SourceError::Network(_)))
        ));
    }

    #[tokio::test]
    async fn test_empty_query_starts_update_check() {
        let dir = TempDir::new().unwrap();
        let runtime = Arc::new(FakeRuntime {
            due: true,
            ..FakeRuntime::default()
        });
        let wf = workflow(&dir, Arc::new(MockRepository::new()), runtime.clone());

        let feedback = wf.run(&Query::Empty).await.unwrap();
        assert_eq!(
            *runtime.started.lock().unwrap(),
            vec!["checkForUpdate --check"]
        );
        assert_eq!(feedback.len(), 1);
        assert_eq!(feedback.items()[0].title, "No matching items");
    }

    #[tokio::test]
    async fn test_running_check_is_not_restarted() {
        let dir = TempDir::new().unwrap();
        let runtime = Arc::new(FakeRuntime {
            due: true,
            running: true,
            ..FakeRuntime::default()
        });
        let wf = workflow(&dir, Arc::new(MockRepository::new()), runtime.clone());

        wf.run(&Query::Empty).await.unwrap();
        assert!(runtime.started.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_available_notice() {
        let dir = TempDir::new().unwrap();
        let runtime = Arc::new(FakeRuntime {
            available: true,
            ..FakeRuntime::default()
        });
        let wf = workflow(&dir, Arc::new(MockRepository::new()), runtime);

        let feedback = wf.run(&Query::Empty).await.unwrap();
        assert_eq!(feedback.len(), 1);
        let item = &feedback.items()[0];
        assert_eq!(item.title, "Update available!");
        assert_eq!(
            item.arg.as_deref(),
            Some("https://github.com/owner/workflow/releases")
        );
        assert!(item.valid);
    }

    #[tokio::test]
    async fn test_unsupported_query() {
        let dir = TempDir::new().unwrap();
        let repository = Arc::new(MockRepository::new());
        let wf = workflow(&dir, repository.clone(), Arc::new(FakeRuntime::default()));

        let feedback = wf.run(&Query::parse(&["a b c d"])).await.unwrap();
        assert_eq!(feedback.items()[0].title, "No matching items");
        assert!(repository.calls().is_empty());
    }
}
