//! Prewarming worktree source.
//!
//! Creating a worktree costs seconds; moving and renaming one costs
//! milliseconds. A background task keeps one spare checkout ready under a
//! placeholder identity, and acquire rebinds it to the requested session,
//! paying only the cheap part on the caller's thread.

use async_trait::async_trait;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use crate::config::{NamingConfig, SourceConfig};
use crate::error::Result;
use crate::id::placeholder_session_name;
use crate::source::{WorktreeSource, provision_direct};
use crate::throttle::Every;
use crate::worktree::{GitProvisioner, Worktree, WorktreeProvisioner};

/// Keeps one spare worktree warm and rebinds it on acquire.
///
/// The production task runs until `shutdown` or drop and never holds more
/// than one unconsumed spare: the slot permit is reserved before provisioning
/// starts, so a second checkout is not built until the first is drained.
/// Losing the race for the spare is not an error; the caller transparently
/// falls back to a direct provision.
pub struct PrewarmSource {
    provisioner: Arc<dyn WorktreeProvisioner>,
    naming: NamingConfig,
    slot: Mutex<mpsc::Receiver<Worktree>>,
    producer: JoinHandle<()>,
}

impl PrewarmSource {
    /// Build a prewarming source backed by the git provisioner.
    ///
    /// Spawns the production task; must be called from within a tokio runtime.
    pub fn new(repo_root: impl Into<PathBuf>, config: &SourceConfig) -> Self {
        let provisioner = Arc::new(GitProvisioner::new(config.naming.clone()));
        Self::with_provisioner(repo_root, provisioner, config)
    }

    /// Build a prewarming source with a caller-supplied provisioner.
    pub fn with_provisioner(
        repo_root: impl Into<PathBuf>,
        provisioner: Arc<dyn WorktreeProvisioner>,
        config: &SourceConfig,
    ) -> Self {
        let (tx, rx) = mpsc::channel(1);
        let producer = tokio::spawn(produce_spares(
            tx,
            repo_root.into(),
            Arc::clone(&provisioner),
            config.clone(),
        ));

        Self {
            provisioner,
            naming: config.naming.clone(),
            slot: Mutex::new(rx),
            producer,
        }
    }

    /// Stop the background production task and reclaim an unconsumed spare.
    ///
    /// Handles already returned from `acquire` are unaffected.
    pub async fn shutdown(&self) {
        self.producer.abort();

        let leftover = {
            let mut slot = self.slot.lock().await;
            slot.try_recv().ok()
        };
        if let Some(worktree) = leftover {
            if let Err(err) = self.provisioner.dispose(&worktree).await {
                warn!(
                    "failed to dispose cached worktree {} on shutdown: {}",
                    worktree.path().display(),
                    err
                );
            }
        }
    }

    /// Best-effort disposal of a spare that failed to rebind.
    async fn discard(&self, worktree: Worktree) {
        if let Err(err) = self.provisioner.dispose(&worktree).await {
            warn!(
                "failed to dispose abandoned spare {}: {}",
                worktree.path().display(),
                err
            );
        }
    }
}

impl Drop for PrewarmSource {
    fn drop(&mut self) {
        self.producer.abort();
    }
}

#[async_trait]
impl WorktreeSource for PrewarmSource {
    async fn acquire(&self, repo_root: &Path, session_name: &str) -> Result<Worktree> {
        let spare = {
            let mut slot = self.slot.lock().await;
            slot.try_recv().ok()
        };

        let Some(mut worktree) = spare else {
            return provision_direct(self.provisioner.as_ref(), repo_root, session_name).await;
        };

        let branch = self.naming.branch(session_name);
        let dest = self.naming.path(repo_root, session_name);

        if let Err(err) = self.provisioner.move_worktree(&mut worktree, &dest).await {
            warn!(
                "failed to move cached worktree {} to {}: {}",
                worktree.path().display(),
                dest.display(),
                err
            );
            self.discard(worktree).await;
            return provision_direct(self.provisioner.as_ref(), repo_root, session_name).await;
        }

        if let Err(err) = self.provisioner.rename_branch(&mut worktree, &branch).await {
            warn!(
                "failed to rename cached worktree branch {} to {}: {}",
                worktree.branch(),
                branch,
                err
            );
            self.discard(worktree).await;
            return provision_direct(self.provisioner.as_ref(), repo_root, session_name).await;
        }

        Ok(worktree)
    }
}

/// Background production loop: build spares one at a time, forever.
///
/// A failed iteration never kills the loop; it logs through the rate-limited
/// gate, waits out the retry delay, and tries again. Exits when the receiving
/// side of the slot is gone.
async fn produce_spares(
    slot: mpsc::Sender<Worktree>,
    repo_root: PathBuf,
    provisioner: Arc<dyn WorktreeProvisioner>,
    config: SourceConfig,
) {
    let mut log_gate = Every::new(Duration::from_millis(config.failure_log_interval_ms));
    let retry_delay = Duration::from_millis(config.failure_retry_delay_ms);

    loop {
        // Blocks while a spare sits unconsumed, keeping production at most
        // one checkout ahead of demand.
        let permit = match slot.reserve().await {
            Ok(permit) => permit,
            Err(_) => return,
        };

        let placeholder = placeholder_session_name();
        let mut worktree = match provisioner.create(&repo_root, &placeholder).await {
            Ok(worktree) => worktree,
            Err(err) => {
                if log_gate.ready() {
                    warn!("failed to create spare worktree: {}", err);
                }
                tokio::time::sleep(retry_delay).await;
                continue;
            }
        };

        if let Err(err) = provisioner.set_up(&mut worktree).await {
            if log_gate.ready() {
                warn!(
                    "failed to set up spare worktree {}: {}",
                    worktree.path().display(),
                    err
                );
            }
            if !config.offer_partially_initialized {
                if let Err(err) = provisioner.dispose(&worktree).await {
                    warn!(
                        "failed to dispose broken spare {}: {}",
                        worktree.path().display(),
                        err
                    );
                }
                tokio::time::sleep(retry_delay).await;
                continue;
            }
        }

        debug!("spare worktree ready at {}", worktree.path().display());
        permit.send(worktree);
    }
}
