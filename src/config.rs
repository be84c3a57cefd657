use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for worktree sources.
///
/// The embedding application decides how this is loaded; every field has a
/// default so a partial deserialization fills in the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Keep a spare worktree warm in a background task.
    pub prewarm: bool,
    /// Offer a spare whose post-creation setup failed instead of discarding it.
    pub offer_partially_initialized: bool,
    /// Minimum interval between repeated failure log lines, in milliseconds.
    pub failure_log_interval_ms: u64,
    /// Pause before retrying after a failed provisioning attempt, in milliseconds.
    pub failure_retry_delay_ms: u64,
    /// How session names map to branches and checkout paths.
    pub naming: NamingConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            prewarm: true,
            offer_partially_initialized: true,
            failure_log_interval_ms: 5_000,
            failure_retry_delay_ms: 100,
            naming: NamingConfig::default(),
        }
    }
}

/// Deterministic mapping from session names to branch names and checkout paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Prefix for session branches, e.g. "wt" yields "wt/feature-x".
    pub branch_prefix: String,
    /// Directory under the repository root where checkouts live.
    pub worktree_dir: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            branch_prefix: "wt".to_string(),
            worktree_dir: ".worktrees".to_string(),
        }
    }
}

impl NamingConfig {
    /// Branch name for a session.
    pub fn branch(&self, session_name: &str) -> String {
        format!("{}/{}", self.branch_prefix, session_name)
    }

    /// Checkout path for a session under the repository root.
    pub fn path(&self, repo_root: &Path, session_name: &str) -> PathBuf {
        repo_root.join(&self.worktree_dir).join(session_name)
    }
}
