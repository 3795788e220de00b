//! Utility modules supporting the workflow.
//!
//! - [`HttpClient`]: HTTP client with timeouts and a fixed user agent
//! - [`TitleCache`]: best-effort JSON key-value store for display titles
//! - [`UpdateChecker`]: GitHub release check with a persisted result
//!
//! # Title cache
//!
//! ```rust,no_run
//! use mvnrepo_workflow::utils::TitleCache;
//!
//! let cache = TitleCache::new(std::path::Path::new("/tmp/mvnrepo"));
//! cache.store_json("org.jetbrains.kotlin kotlin-stdlib", &"Kotlin Stdlib");
//! let title: Option<String> = cache.load_json("org.jetbrains.kotlin kotlin-stdlib");
//! ```

mod cache;
mod http;
mod update;

pub use cache::{TitleCache, TITLE_CACHE_NAME};
pub use http::HttpClient;
pub use update::{ReleaseInfo, UpdateChecker, UpdateError, UpdateState, UPDATE_STATE_FILE};
