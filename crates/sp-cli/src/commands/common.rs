//! Shared utilities for CLI commands

use anyhow::Result;
use sp_core::Config;
use sp_patch::{
    AbortReason, ApplyOptions, BackupCoordinator, ErrorLog, PatchApplier, RunOutcome,
    SettingsVersionStore, ShellBackup,
};
use std::fmt;

use crate::context::RuntimeContext;

/// Exit status for a fatal statement abort
pub(crate) const EXIT_STATEMENT_ABORT: i32 = 1;

/// Exit status for a configuration abort
pub(crate) const EXIT_CONFIG_ABORT: i32 = 2;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that destructors run before the process ends.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; the reason was already printed.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Exit status for an aborted run
pub(crate) fn exit_code_for(reason: &AbortReason) -> i32 {
    if reason.is_configuration() {
        EXIT_CONFIG_ABORT
    } else {
        EXIT_STATEMENT_ABORT
    }
}

/// The configured backup command, if any
pub(crate) fn backup_action(config: &Config) -> Option<ShellBackup> {
    config
        .backup
        .as_ref()
        .and_then(|b| ShellBackup::from_command(&b.command))
}

/// Build an applier wired to the project's backup command and error log
pub(crate) fn build_applier<'a>(
    ctx: &'a RuntimeContext,
    store: &'a SettingsVersionStore<'a>,
    backup: Option<&'a ShellBackup>,
    no_backup: bool,
) -> PatchApplier<'a> {
    let mut options = ApplyOptions::from_config(&ctx.config, &ctx.root);
    if no_backup {
        options.safe = false;
    }
    if options.safe && backup.is_none() {
        ctx.verbose("Safe mode is on but no backup command is configured");
    }

    let error_log = ErrorLog::new(ctx.config.error_log_absolute(&ctx.root));
    let mut applier = PatchApplier::new(&*ctx.db, store, options).with_error_log(error_log);
    if let Some(action) = backup {
        applier = applier.with_backup(BackupCoordinator::new(
            action,
            ctx.config.database.family.as_str(),
        ));
    }
    applier
}

/// Print what a run did; aborted runs become an [`ExitCode`] error
pub(crate) fn report_outcome(outcome: &RunOutcome) -> Result<()> {
    let report = outcome.report();
    for applied in &report.applied {
        println!(
            "  Applied {} ({} statements)",
            applied.file.display(),
            applied.statements
        );
    }
    for promoted in &report.promoted {
        match &promoted.to {
            Some(to) => println!(
                "  Promoted {} -> {} (version {})",
                promoted.from.display(),
                to.display(),
                promoted.version
            ),
            None => println!(
                "  Applied {} as version {} (not renamed)",
                promoted.from.display(),
                promoted.version
            ),
        }
    }
    for skipped in &report.skipped {
        eprintln!("  Skipped {}", skipped.display());
    }

    match outcome {
        RunOutcome::Completed(report) => {
            let version = report
                .final_version
                .map(|v| v.to_string())
                .unwrap_or_default();
            println!(
                "{} patch(es) applied, schema version is now {version}",
                report.patched_count()
            );
            Ok(())
        }
        RunOutcome::UpToDate(report) => {
            let version = report
                .starting_version
                .map(|v| v.to_string())
                .unwrap_or_default();
            println!("Nothing to patch, you are already on version {version}");
            Ok(())
        }
        RunOutcome::Aborted { reason, .. } => {
            eprintln!("Patching aborted: {reason}");
            Err(ExitCode(exit_code_for(reason)).into())
        }
    }
}
