//! Alfred host adapter.
//!
//! Everything Alfred-specific lives here:
//!
//! - [`Feedback`], [`Item`], [`Modifier`]: the Script Filter JSON written to stdout
//! - [`AlfredEnv`]: workflow variables (cache/data directories, debug flag)
//! - [`HostRuntime`]: update checks and background jobs, with [`LocalRuntime`]
//!   as the filesystem-backed implementation
//!
//! The scraping and presentation code never reaches into the environment
//! directly; it receives these types from `main`.

mod env;
mod feedback;
mod runtime;

pub use env::AlfredEnv;
pub use feedback::{send_fatal, Feedback, Icon, Item, ItemText, ModKey, Modifier};
pub use runtime::{HostError, HostRuntime, LocalRuntime};

/// Name of the background job that checks for updates
pub const UPDATE_JOB_NAME: &str = "checkForUpdate";
