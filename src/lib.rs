//! warmtree - pre-warmed git worktree provisioning
//!
//! Creating a git worktree takes seconds; a session wants one instantly. A
//! background task keeps one spare checkout ready under a placeholder
//! identity, and acquiring a worktree for a session rebinds the spare to the
//! session's branch and path in milliseconds, falling back to a direct
//! provision when no spare is ready.

pub mod config;
pub mod error;
pub mod id;
pub mod source;
pub mod throttle;
pub mod worktree;

pub use config::{NamingConfig, SourceConfig};
pub use error::{Result, WarmtreeError};
pub use source::{
    PassthroughSource, PrewarmSource, WorktreeSource, new_source, new_source_with,
};
pub use worktree::{GitProvisioner, Worktree, WorktreeProvisioner};
