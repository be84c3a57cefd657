//! Worktree sources: the acquire contract and its two implementations.
//!
//! A source hands out a checkout bound to the session's branch and path.
//! `PrewarmSource` keeps one spare warm in the background and rebinds it on
//! demand; `PassthroughSource` provisions synchronously on every call. The
//! embedding application picks one at construction time through
//! `SourceConfig::prewarm`.

mod passthrough;
mod prewarm;

pub use passthrough::PassthroughSource;
pub use prewarm::PrewarmSource;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::SourceConfig;
use crate::error::Result;
use crate::worktree::{GitProvisioner, Worktree, WorktreeProvisioner};

/// Hands out a ready worktree for a session.
///
/// Callers see one contract: either a checkout whose branch and path match
/// the session's deterministic naming, or an error. Whether it came from a
/// warm spare or a fresh provision is not observable.
#[async_trait]
pub trait WorktreeSource: Send + Sync {
    /// Return a checkout for the session, provisioning one if no spare is ready.
    async fn acquire(&self, repo_root: &Path, session_name: &str) -> Result<Worktree>;
}

/// Build a source for the repository, backed by the git provisioner.
///
/// When `config.prewarm` is set this spawns the background production task
/// and must be called from within a tokio runtime.
pub fn new_source(repo_root: impl Into<PathBuf>, config: &SourceConfig) -> Arc<dyn WorktreeSource> {
    let provisioner = Arc::new(GitProvisioner::new(config.naming.clone()));
    new_source_with(repo_root, provisioner, config)
}

/// Build a source with a caller-supplied provisioner.
pub fn new_source_with(
    repo_root: impl Into<PathBuf>,
    provisioner: Arc<dyn WorktreeProvisioner>,
    config: &SourceConfig,
) -> Arc<dyn WorktreeSource> {
    if config.prewarm {
        Arc::new(PrewarmSource::with_provisioner(repo_root, provisioner, config))
    } else {
        Arc::new(PassthroughSource::new(provisioner))
    }
}

/// Provision synchronously with the caller's inputs: create, then set up.
pub(crate) async fn provision_direct(
    provisioner: &dyn WorktreeProvisioner,
    repo_root: &Path,
    session_name: &str,
) -> Result<Worktree> {
    let mut worktree = provisioner.create(repo_root, session_name).await?;
    provisioner.set_up(&mut worktree).await?;
    Ok(worktree)
}


#[cfg(test)]
mod tests {
    use super::test_support::StubProvisioner;
    use super::*;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    #[tokio::test]
    async fn test_factory_selects_passthrough() {
        let stub = Arc::new(StubProvisioner::new());
        let config = SourceConfig {
            prewarm: false,
            ..Default::default()
        };

        let source = new_source_with("/repo", Arc::clone(&stub) as _, &config);

        // No background production: nothing is created until acquire
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(stub.create_calls(), 0);

        source.acquire(Path::new("/repo"), "feature-x").await.unwrap();
        assert_eq!(stub.create_calls(), 1);
    }

    #[tokio::test]
    async fn test_factory_selects_prewarm() {
        let stub = Arc::new(StubProvisioner::new());
        let config = SourceConfig::default();

        let _source = new_source_with("/repo", Arc::clone(&stub) as _, &config);

        // Background production starts without any acquire
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(stub.create_calls() >= 1);
    }

    #[tokio::test]
    async fn test_provision_direct_surfaces_setup_error() {
        let stub = StubProvisioner::new();
        stub.fail_setup.store(true, Ordering::SeqCst);

        let result = provision_direct(&stub, Path::new("/repo"), "feature-x").await;

        assert!(matches!(result, Err(crate::error::WarmtreeError::Setup(_))));
    }
}
