//! Source-control bookkeeping for promoted patches

use crate::error::{PatchError, PatchResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Records file renames with a version-control system
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Stage `new` and the removal of `old`
    async fn record_rename(&self, old: &Path, new: &Path) -> PatchResult<()>;
}

/// `git` in a working tree
#[derive(Debug, Clone)]
pub struct GitVersionControl {
    work_tree: PathBuf,
}

impl GitVersionControl {
    /// Use the repository containing `work_tree`
    pub fn new(work_tree: impl Into<PathBuf>) -> Self {
        Self {
            work_tree: work_tree.into(),
        }
    }

    async fn git(&self, args: &[&str], path: &Path) -> PatchResult<bool> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.work_tree)
            .args(args)
            .arg("--")
            .arg(path)
            .output()
            .await
            .map_err(|e| PatchError::VersionControl(format!("git: {e}")))?;
        Ok(output.status.success())
    }

    /// Whether `path` is tracked in the index
    pub async fn is_tracked(&self, path: &Path) -> PatchResult<bool> {
        self.git(&["ls-files", "--error-unmatch"], path).await
    }
}

#[async_trait]
impl VersionControl for GitVersionControl {
    async fn record_rename(&self, old: &Path, new: &Path) -> PatchResult<()> {
        if !self.git(&["add"], new).await? {
            return Err(PatchError::VersionControl(format!(
                "git add {} failed",
                new.display()
            )));
        }
        if self.is_tracked(old).await? && !self.git(&["add", "-u"], old).await? {
            return Err(PatchError::VersionControl(format!(
                "git add -u {} failed",
                old.display()
            )));
        }
        log::debug!("Staged rename {} -> {}", old.display(), new.display());
        Ok(())
    }
}

#[cfg(test)]
#[path = "vcs_test.rs"]
mod tests;
