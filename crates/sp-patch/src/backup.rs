//! Pre-patch backup
//!
//! The backup itself is an external action. [`BackupCoordinator`] makes
//! sure it runs at most once per run and that its failure never blocks
//! patching.

use crate::error::{PatchError, PatchResult};
use crate::run::RunContext;
use async_trait::async_trait;
use tokio::process::Command;

/// An external backup action
#[async_trait]
pub trait BackupAction: Send + Sync {
    /// Back up the database of system `target`
    async fn backup(&self, target: &str) -> PatchResult<()>;
}

/// Runs a configured program with the target appended as the last argument
#[derive(Debug, Clone)]
pub struct ShellBackup {
    program: String,
    args: Vec<String>,
}

impl ShellBackup {
    /// Build from a `[program, args...]` command line.
    ///
    /// Returns `None` for an empty command.
    pub fn from_command(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl BackupAction for ShellBackup {
    async fn backup(&self, target: &str) -> PatchResult<()> {
        log::debug!("Running backup: {} {:?} {target}", self.program, self.args);
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(target)
            .status()
            .await
            .map_err(|e| PatchError::Backup(format!("{}: {e}", self.program)))?;

        if status.success() {
            Ok(())
        } else {
            Err(PatchError::Backup(format!(
                "{} exited with {status}",
                self.program
            )))
        }
    }
}

/// Invokes a [`BackupAction`] at most once per [`RunContext`]
pub struct BackupCoordinator<'a> {
    action: &'a dyn BackupAction,
    target: String,
}

impl<'a> BackupCoordinator<'a> {
    /// Coordinate `action` for system `target`
    pub fn new(action: &'a dyn BackupAction, target: impl Into<String>) -> Self {
        Self {
            action,
            target: target.into(),
        }
    }

    /// Run the backup unless this run already did.
    ///
    /// Failures are logged and otherwise ignored. Returns whether the
    /// action was invoked.
    pub async fn backup_once(&self, ctx: &mut RunContext) -> bool {
        if ctx.backed_up {
            return false;
        }
        ctx.backed_up = true;

        log::info!("Backing up {} database", self.target);
        if let Err(e) = self.action.backup(&self.target).await {
            log::warn!("Backup did not complete, continuing: {e}");
        }
        true
    }
}

#[cfg(test)]
#[path = "backup_test.rs"]
mod tests;
