//! Passthrough source: a fresh provision on every acquire, no caching.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::source::{WorktreeSource, provision_direct};
use crate::worktree::{Worktree, WorktreeProvisioner};

/// Provisions a checkout synchronously for every acquire.
///
/// Same contract as the prewarming source, selected when background
/// production is not wanted.
pub struct PassthroughSource {
    provisioner: Arc<dyn WorktreeProvisioner>,
}

impl PassthroughSource {
    /// Create a passthrough source over the given provisioner.
    pub fn new(provisioner: Arc<dyn WorktreeProvisioner>) -> Self {
        Self { provisioner }
    }
}

#[async_trait]
impl WorktreeSource for PassthroughSource {
    async fn acquire(&self, repo_root: &Path, session_name: &str) -> Result<Worktree> {
        provision_direct(self.provisioner.as_ref(), repo_root, session_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WarmtreeError;
    use crate::source::test_support::StubProvisioner;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_acquire_provisions_every_time() {
        let stub = Arc::new(StubProvisioner::new());
        let source = PassthroughSource::new(Arc::clone(&stub) as _);

        let first = source.acquire(Path::new("/repo"), "feature-x").await.unwrap();
        let second = source.acquire(Path::new("/repo"), "feature-y").await.unwrap();

        assert_eq!(first.branch(), "stub/feature-x");
        assert_eq!(second.branch(), "stub/feature-y");
        assert!(first.is_set_up());
        assert_eq!(stub.create_calls(), 2);
    }

    #[tokio::test]
    async fn test_acquire_surfaces_provision_error() {
        let stub = Arc::new(StubProvisioner::new());
        stub.fail_creates.store(true, Ordering::SeqCst);
        let source = PassthroughSource::new(Arc::clone(&stub) as _);

        let result = source.acquire(Path::new("/repo"), "feature-x").await;

        match result {
            Err(WarmtreeError::Provision(msg)) => assert_eq!(msg, "disk full"),
            other => panic!("expected provision error, got {:?}", other.map(|w| w.branch().to_string())),
        }
    }

    #[tokio::test]
    async fn test_acquire_surfaces_setup_error() {
        let stub = Arc::new(StubProvisioner::new());
        stub.fail_setup.store(true, Ordering::SeqCst);
        let source = PassthroughSource::new(Arc::clone(&stub) as _);

        let result = source.acquire(Path::new("/repo"), "feature-x").await;

        assert!(matches!(result, Err(WarmtreeError::Setup(_))));
    }
}
