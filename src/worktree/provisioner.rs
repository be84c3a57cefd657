//! Worktree provisioning, the expensive operation the prewarming source hides.

use async_trait::async_trait;
use log::warn;
use std::path::Path;
use tokio::process::Command;

use crate::config::NamingConfig;
use crate::error::{Result, WarmtreeError};
use crate::worktree::Worktree;

/// Creates, initializes, relocates, and disposes of worktree checkouts.
///
/// Implementations must tolerate concurrent calls against the same
/// repository: an acquire's fallback provision can run while the background
/// task is mid-provision. The git CLI supports this; other backends must
/// provide the same guarantee.
#[async_trait]
pub trait WorktreeProvisioner: Send + Sync {
    /// Create a checkout on a fresh branch for the session. Expensive: this
    /// allocates real storage and takes seconds on large repositories.
    async fn create(&self, repo_root: &Path, session_name: &str) -> Result<Worktree>;

    /// Finish initializing a freshly created checkout.
    async fn set_up(&self, worktree: &mut Worktree) -> Result<()>;

    /// Move the checkout to a new path. Cheap. Updates the handle on success.
    async fn move_worktree(&self, worktree: &mut Worktree, dest: &Path) -> Result<()>;

    /// Rename the branch bound to the checkout. Cheap. Updates the handle on success.
    async fn rename_branch(&self, worktree: &mut Worktree, branch: &str) -> Result<()>;

    /// Remove the checkout and delete its branch, reclaiming storage.
    async fn dispose(&self, worktree: &Worktree) -> Result<()>;
}

/// Provisioner backed by the `git` CLI.
#[derive(Debug, Clone)]
pub struct GitProvisioner {
    naming: NamingConfig,
}

impl GitProvisioner {
    /// Create a provisioner using the given naming scheme.
    pub fn new(naming: NamingConfig) -> Self {
        Self { naming }
    }
}

/// Run git in the given directory, returning stdout or the trimmed stderr.
async fn run_git(dir: &Path, args: &[&str]) -> std::result::Result<String, String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .await
        .map_err(|e| format!("failed to execute git: {}", e))?;

    if !output.status.success() {
        return Err(String::from_utf8_lossy(&output.stderr).trim().to_string());
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

fn utf8_path<'a>(path: &'a Path, what: &str) -> std::result::Result<&'a str, String> {
    path.to_str()
        .ok_or_else(|| format!("non-UTF-8 {}: {}", what, path.display()))
}

#[async_trait]
impl WorktreeProvisioner for GitProvisioner {
    async fn create(&self, repo_root: &Path, session_name: &str) -> Result<Worktree> {
        let branch = self.naming.branch(session_name);
        let path = self.naming.path(repo_root, session_name);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let path_str = utf8_path(&path, "worktree path").map_err(WarmtreeError::Provision)?;
        run_git(repo_root, &["worktree", "add", path_str, "-b", &branch])
            .await
            .map_err(WarmtreeError::Provision)?;

        Ok(Worktree::new(repo_root, branch, path))
    }

    async fn set_up(&self, worktree: &mut Worktree) -> Result<()> {
        // A checkout can exist on disk without being usable; require HEAD to
        // resolve before handing the worktree to a session.
        run_git(worktree.path(), &["rev-parse", "--verify", "HEAD"])
            .await
            .map_err(WarmtreeError::Setup)?;

        worktree.mark_set_up();
        Ok(())
    }

    async fn move_worktree(&self, worktree: &mut Worktree, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let from = utf8_path(worktree.path(), "worktree path")
            .map_err(WarmtreeError::Rebind)?
            .to_string();
        let dest_str = utf8_path(dest, "destination path").map_err(WarmtreeError::Rebind)?;

        run_git(worktree.repo_root(), &["worktree", "move", &from, dest_str])
            .await
            .map_err(WarmtreeError::Rebind)?;

        worktree.set_path(dest);
        Ok(())
    }

    async fn rename_branch(&self, worktree: &mut Worktree, branch: &str) -> Result<()> {
        let old = worktree.branch().to_string();

        run_git(worktree.repo_root(), &["branch", "-m", &old, branch])
            .await
            .map_err(WarmtreeError::Rebind)?;

        worktree.set_branch(branch);
        Ok(())
    }

    async fn dispose(&self, worktree: &Worktree) -> Result<()> {
        let path_str = utf8_path(worktree.path(), "worktree path").map_err(WarmtreeError::Dispose)?;

        run_git(worktree.repo_root(), &["worktree", "remove", path_str, "--force"])
            .await
            .map_err(WarmtreeError::Dispose)?;

        // The branch may already be gone; failing to delete it is not fatal.
        if let Err(err) = run_git(worktree.repo_root(), &["branch", "-D", worktree.branch()]).await {
            warn!("failed to delete branch {}: {}", worktree.branch(), err);
        }

        Ok(())
    }
}
