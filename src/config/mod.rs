//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `MVNREPO_` (nested keys use `__`).
//!
//! ```toml
//! [site]
//! base_url = "https://mvnrepository.com"
//! timeout_secs = 15
//!
//! [update]
//! enabled = true
//! github_repo = "wangkezun/alfred-mvnrepository-workflow"
//! check_interval_hours = 24
//!
//! [cache]
//! directory = "/tmp/mvnrepo-cache"
//! ```
//!
//! `MVNREPO_SITE__BASE_URL=http://localhost:8080` overrides `site.base_url`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::alfred::AlfredEnv;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "MVNREPO";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream site settings
    #[serde(default)]
    pub site: SiteConfig,

    /// Update check settings
    #[serde(default)]
    pub update: UpdateConfig,

    /// Title cache settings
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Upstream site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Origin of the artifact search site
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Total request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://mvnrepository.com".to_string()
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_connect_timeout() -> u64 {
    5
}

/// Update check configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// Whether the empty query checks for new releases
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// GitHub repository publishing releases, as `owner/name`
    #[serde(default = "default_github_repo")]
    pub github_repo: String,

    /// GitHub API root
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Minimum hours between two checks
    #[serde(default = "default_check_interval")]
    pub check_interval_hours: u64,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            github_repo: default_github_repo(),
            api_url: default_api_url(),
            check_interval_hours: default_check_interval(),
        }
    }
}

impl UpdateConfig {
    /// Page a user is sent to when an update is available
    pub fn releases_url(&self) -> String {
        format!("https://github.com/{}/releases", self.github_repo)
    }
}

fn default_true() -> bool {
    true
}

fn default_github_repo() -> String {
    "wangkezun/alfred-mvnrepository-workflow".to_string()
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_check_interval() -> u64 {
    24
}

/// Cache configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Overrides the cache directory Alfred assigns to the workflow
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

/// Load configuration from an optional file plus `MVNREPO_*` environment variables
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    build_config(path, None)
}

fn build_config(
    path: Option<&Path>,
    env: Option<HashMap<String, String>>,
) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(false));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()?;

    settings.try_deserialize()
}

/// Find a configuration file in the workflow data directory
pub fn find_config_file(env: &AlfredEnv) -> Option<PathBuf> {
    let path = env.data_dir()?.join("config.toml");
    path.exists().then_some(path)
}

/// Default cache directory when Alfred does not provide one
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(env!("CARGO_PKG_NAME"))
}

/// Default data directory when Alfred does not provide one
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(env!("CARGO_PKG_NAME"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.site.base_url, "https://mvnrepository.com");
        assert_eq!(config.site.timeout_secs, 15);
        assert!(config.update.enabled);
        assert_eq!(
            config.update.releases_url(),
            "https://github.com/wangkezun/alfred-mvnrepository-workflow/releases"
        );
        assert!(config.cache.directory.is_none());
    }

    #[test]
    fn test_load_without_sources_uses_defaults() {
        let config = build_config(None, Some(HashMap::new())).unwrap();
        assert_eq!(config.site.base_url, "https://mvnrepository.com");
        assert_eq!(config.update.check_interval_hours, 24);
    }

    #[test]
    fn test_env_overrides() {
        let env = HashMap::from([
            (
                "MVNREPO_SITE__BASE_URL".to_string(),
                "http://localhost:8080".to_string(),
            ),
            ("MVNREPO_SITE__TIMEOUT_SECS".to_string(), "3".to_string()),
            ("MVNREPO_UPDATE__ENABLED".to_string(), "false".to_string()),
        ]);

        let config = build_config(None, Some(env)).unwrap();
        assert_eq!(config.site.base_url, "http://localhost:8080");
        assert_eq!(config.site.timeout_secs, 3);
        assert!(!config.update.enabled);
        assert_eq!(config.site.connect_timeout_secs, 5);
    }

    #[test]
    fn test_file_then_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(
            br#"
[site]
base_url = "https://mirror.example.com"
timeout_secs = 30

[cache]
directory = "/tmp/mvnrepo"
"#,
        )
        .unwrap();

        let env = HashMap::from([("MVNREPO_SITE__TIMEOUT_SECS".to_string(), "7".to_string())]);
        let config = build_config(Some(&path), Some(env)).unwrap();

        assert_eq!(config.site.base_url, "https://mirror.example.com");
        assert_eq!(config.site.timeout_secs, 7);
        assert_eq!(config.cache.directory, Some(PathBuf::from("/tmp/mvnrepo")));
    }

    #[test]
    fn test_missing_file_is_optional() {
        let path = PathBuf::from("/nonexistent/config.toml");
        let config = build_config(Some(&path), Some(HashMap::new())).unwrap();
        assert_eq!(config.site.base_url, "https://mvnrepository.com");
    }
}
