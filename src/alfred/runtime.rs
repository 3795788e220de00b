//! Host services the workflow needs besides rendering: update checks and
//! background jobs.

use async_trait::async_trait;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use crate::utils::{UpdateChecker, UpdateError, UpdateState};

/// Errors raised by the host runtime
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Update check failed: {0}")]
    Update(#[from] UpdateError),

    #[error("Background job '{0}' failed to start: {1}")]
    Job(String, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Capabilities supplied by the host around the core workflow
#[async_trait]
pub trait HostRuntime: Send + Sync + std::fmt::Debug {
    /// Contact the release server and record the result
    async fn check_for_update(&self) -> Result<UpdateState, HostError>;

    /// Whether enough time passed since the last update check
    fn update_check_due(&self) -> bool;

    /// Whether the last recorded check found a newer release
    fn update_available(&self) -> bool;

    /// Page shown to the user when an update is available
    fn releases_url(&self) -> String;

    /// Whether the background job `name` is still alive
    fn is_job_running(&self, name: &str) -> bool;

    /// Start this binary again with `args`, detached, as job `name`
    fn run_in_background(&self, name: &str, args: &[&str]) -> Result<(), HostError>;
}

/// Runtime backed by the local filesystem and process table
#[derive(Debug, Clone)]
pub struct LocalRuntime {
    updater: UpdateChecker,
    jobs_dir: PathBuf,
}

impl LocalRuntime {
    pub fn new(updater: UpdateChecker, cache_dir: &Path) -> Self {
        Self {
            updater,
            jobs_dir: cache_dir.join("jobs"),
        }
    }

    fn pid_path(&self, name: &str) -> PathBuf {
        self.jobs_dir.join(format!("{}.pid", name))
    }
}

#[async_trait]
impl HostRuntime for LocalRuntime {
    async fn check_for_update(&self) -> Result<UpdateState, HostError> {
        Ok(self.updater.check_for_update().await?)
    }

    fn update_check_due(&self) -> bool {
        self.updater.check_due(Utc::now())
    }

    fn update_available(&self) -> bool {
        self.updater.update_available()
    }

    fn releases_url(&self) -> String {
        self.updater.config().releases_url()
    }

    fn is_job_running(&self, name: &str) -> bool {
        let path = self.pid_path(name);
        let Some(pid) = fs::read_to_string(&path)
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok())
        else {
            return false;
        };

        if process_alive(pid) {
            return true;
        }

        tracing::debug!("Removing stale pid file for job '{}'", name);
        let _ = fs::remove_file(&path);
        false
    }

    fn run_in_background(&self, name: &str, args: &[&str]) -> Result<(), HostError> {
        let exe = std::env::current_exe()?;
        fs::create_dir_all(&self.jobs_dir)?;

        let child = spawn_detached(&exe, args)
            .map_err(|e| HostError::Job(name.to_string(), e.to_string()))?;

        fs::write(self.pid_path(name), child.id().to_string())?;
        tracing::info!("Started background job '{}' (pid {})", name, child.id());
        Ok(())
    }
}

/// Start `program` without stdio in a process group of its own, so Alfred
/// killing the script filter does not take the job down with it.
fn spawn_detached(program: &Path, args: &[&str]) -> std::io::Result<Child> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    command.spawn()
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    Command::new("kill")
        .args(["-0", &pid.to_string()])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn process_alive(_pid: u32) -> bool {
    false
}
