//! Release checks against GitHub.
//!
//! The result of the last check is kept in `update.json` in the workflow data
//! directory, so the empty query can show "Update available!" without going
//! to the network.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::UpdateConfig;
use crate::utils::HttpClient;

/// File name of the persisted check result
pub const UPDATE_STATE_FILE: &str = "update.json";

/// Errors that can occur while checking for a new release
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid release data: {0}")]
    Parse(String),

    #[error("Invalid version: {0}")]
    Version(#[from] semver::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Latest published release
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseInfo {
    /// Tag name (e.g., "v0.3.1")
    pub tag_name: String,

    #[serde(default)]
    pub prerelease: bool,
}

impl ReleaseInfo {
    /// Version number without the 'v' prefix
    pub fn version(&self) -> Result<semver::Version, semver::Error> {
        semver::Version::parse(self.tag_name.trim_start_matches('v'))
    }
}

/// Outcome of the last check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateState {
    pub checked_at: DateTime<Utc>,
    pub latest_version: Option<String>,
    pub update_available: bool,
}

/// Checks for releases newer than the running binary
#[derive(Debug, Clone)]
pub struct UpdateChecker {
    client: HttpClient,
    config: UpdateConfig,
    state_path: PathBuf,
    current_version: String,
}

impl UpdateChecker {
    pub fn new(client: HttpClient, config: UpdateConfig, data_dir: &Path) -> Self {
        Self {
            client,
            config,
            state_path: data_dir.join(UPDATE_STATE_FILE),
            current_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_current_version(mut self, version: &str) -> Self {
        self.current_version = version.to_string();
        self
    }

    pub fn config(&self) -> &UpdateConfig {
        &self.config
    }

    /// Result of the last check, if one was recorded
    pub fn load_state(&self) -> Option<UpdateState> {
        let content = fs::read_to_string(&self.state_path).ok()?;
        match serde_json::from_str(&content) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!("Ignoring corrupt update state: {}", e);
                None
            }
        }
    }

    /// Whether the last check is older than the configured interval
    pub fn check_due(&self, now: DateTime<Utc>) -> bool {
        if !self.config.enabled {
            return false;
        }

        let interval = check_interval(self.config.check_interval_hours);
        match self.load_state() {
            Some(state) => now - state.checked_at >= interval,
            None => true,
        }
    }

    /// Whether the last check found a newer release
    pub fn update_available(&self) -> bool {
        self.config.enabled && self.load_state().is_some_and(|s| s.update_available)
    }

    /// Fetch the latest release
    pub async fn fetch_latest_release(&self) -> Result<ReleaseInfo, UpdateError> {
        let url = format!(
            "{}/repos/{}/releases/latest",
            self.config.api_url.trim_end_matches('/'),
            self.config.github_repo
        );
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| UpdateError::Network(format!("Failed to fetch latest release: {}", e)))?;

        if !response.status().is_success() {
            return Err(UpdateError::Network(format!(
                "GitHub API request failed with status: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| UpdateError::Parse(e.to_string()))
    }

    /// Check GitHub and persist the result.
    ///
    /// A failed check still records its time, keeping the previous result, so
    /// the next check waits for the interval instead of running on every query.
    pub async fn check_for_update(&self) -> Result<UpdateState, UpdateError> {
        match self.compare_latest_release().await {
            Ok(state) => {
                self.save_state(&state)?;
                Ok(state)
            }
            Err(e) => {
                let previous = self.load_state();
                let state = UpdateState {
                    checked_at: Utc::now(),
                    latest_version: previous.as_ref().and_then(|s| s.latest_version.clone()),
                    update_available: previous.is_some_and(|s| s.update_available),
                };
                if let Err(save_err) = self.save_state(&state) {
                    tracing::warn!("Failed to record update check: {}", save_err);
                }
                Err(e)
            }
        }
    }

    async fn compare_latest_release(&self) -> Result<UpdateState, UpdateError> {
        let release = self.fetch_latest_release().await?;
        let latest = release.version()?;
        let current = semver::Version::parse(&self.current_version)?;

        let state = UpdateState {
            checked_at: Utc::now(),
            latest_version: Some(latest.to_string()),
            update_available: !release.prerelease && latest > current,
        };

        tracing::info!(
            "Latest release {} (running {}), update available: {}",
            latest,
            current,
            state.update_available
        );

        Ok(state)
    }

    fn save_state(&self, state: &UpdateState) -> Result<(), UpdateError> {
        if let Some(parent) = self.state_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(state)
            .map_err(|e| UpdateError::Parse(e.to_string()))?;
        fs::write(&self.state_path, content)?;
        Ok(())
    }
}

/// Interval between checks, saturating for values chrono cannot represent
fn check_interval(hours: u64) -> TimeDelta {
    i64::try_from(hours)
        .ok()
        .and_then(TimeDelta::try_hours)
        .unwrap_or(TimeDelta::MAX)
}
