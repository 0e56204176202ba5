//! Patch application
//!
//! [`PatchApplier`] walks the pending patches in ordinal order, splits each
//! script into statements, executes them one at a time and advances the
//! stored version after every completed file. A fatal statement stops the
//! run; statements already executed stay applied.

use crate::backup::BackupCoordinator;
use crate::classify::{classify_failure, compat_statement, Classification};
use crate::error::PatchError;
use crate::error_log::ErrorLog;
use crate::run::{
    AbortReason, AppliedPatch, ExecutionOutcome, OutcomeKind, RunContext, RunOutcome, RunReport,
    RunState, StatementFailure,
};
use crate::source::PatchSource;
use crate::vcs::VersionControl;
use crate::version_store::VersionStore;
use sp_core::{Config, DbFamily, PatchDescriptor, SchemaVersion};
use sp_db::Database;
use sp_sql::{split_statements, Placeholders, SplitOptions, DEFAULT_DELIMITER};
use std::path::{Path, MAIN_SEPARATOR};

/// Applier settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Back up before the first patch of a run
    pub safe: bool,
    /// Default statement terminator
    pub delimiter: String,
    /// `{:local:}` / `{:data:}` values
    pub placeholders: Placeholders,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            safe: true,
            delimiter: DEFAULT_DELIMITER.to_string(),
            placeholders: Placeholders::default(),
        }
    }
}

impl ApplyOptions {
    /// Options for the project rooted at `root`
    pub fn from_config(config: &Config, root: &Path) -> Self {
        let mut data = config.data_dir_absolute(root).display().to_string();
        if !data.ends_with(MAIN_SEPARATOR) {
            data.push(MAIN_SEPARATOR);
        }
        Self {
            safe: config.safe,
            delimiter: DEFAULT_DELIMITER.to_string(),
            placeholders: Placeholders {
                local: Some(config.database.local_prefix().to_string()),
                data: Some(data),
            },
        }
    }

    pub(crate) fn split_options(&self) -> SplitOptions {
        SplitOptions {
            delimiter: self.delimiter.clone(),
            placeholders: self.placeholders.clone(),
        }
    }
}

/// Applies pending patches and tracks the schema version
pub struct PatchApplier<'a> {
    pub(crate) db: &'a dyn Database,
    pub(crate) store: &'a dyn VersionStore,
    backup: Option<BackupCoordinator<'a>>,
    pub(crate) vcs: Option<&'a dyn VersionControl>,
    error_log: ErrorLog,
    options: ApplyOptions,
    state: RunState,
}

impl<'a> PatchApplier<'a> {
    /// Create an applier without backup, version control or error log
    pub fn new(db: &'a dyn Database, store: &'a dyn VersionStore, options: ApplyOptions) -> Self {
        Self {
            db,
            store,
            backup: None,
            vcs: None,
            error_log: ErrorLog::disabled(),
            options,
            state: RunState::Idle,
        }
    }

    /// Back up through `backup` when running in safe mode
    pub fn with_backup(mut self, backup: BackupCoordinator<'a>) -> Self {
        self.backup = Some(backup);
        self
    }

    /// Record promoted-patch renames with `vcs`
    pub fn with_version_control(mut self, vcs: &'a dyn VersionControl) -> Self {
        self.vcs = Some(vcs);
        self
    }

    /// Append failed statements to `log`
    pub fn with_error_log(mut self, log: ErrorLog) -> Self {
        self.error_log = log;
        self
    }

    /// Lifecycle state of the last or current run
    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn options(&self) -> &ApplyOptions {
        &self.options
    }

    pub(crate) fn enter(&mut self, next: RunState) {
        log::debug!("Run state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    pub(crate) fn abort(&mut self, reason: AbortReason, report: RunReport) -> RunOutcome {
        self.enter(RunState::Aborted);
        log::error!("Patching aborted: {reason}");
        RunOutcome::Aborted { reason, report }
    }

    /// Apply every patch from `source` whose ordinal exceeds the stored version
    pub async fn process_patches(&mut self, source: &dyn PatchSource) -> RunOutcome {
        self.state = RunState::Idle;
        let mut report = RunReport::default();

        self.enter(RunState::LoadingVersion);
        let current = match self.store.read().await {
            Ok(version) => version,
            Err(e) => return self.abort(AbortReason::Configuration(e.to_string()), report),
        };
        report.starting_version = Some(current);
        report.final_version = Some(current);

        self.enter(RunState::Scanning);
        let patches = match source.patches() {
            Ok(patches) => patches,
            Err(e) => return self.abort(AbortReason::Configuration(e.to_string()), report),
        };
        if patches.is_empty() {
            let err = PatchError::NoPatches {
                location: source.location(),
            };
            return self.abort(AbortReason::Configuration(err.to_string()), report);
        }

        self.enter(RunState::Applying);
        log::info!("Looking for unprocessed patches...");
        let mut ctx = RunContext::new(current);
        for patch in &patches {
            if patch.ordinal <= ctx.current_version.get() {
                log::debug!("{} already applied", patch.file_name());
                continue;
            }
            if let Err(reason) = self.apply_patch(patch, &mut ctx, &mut report).await {
                report.backed_up = ctx.backed_up;
                return self.abort(reason, report);
            }
        }
        report.backed_up = ctx.backed_up;

        self.enter(RunState::Done);
        if ctx.patched_count == 0 {
            log::info!("Nothing to patch, you are already on version {current}");
            RunOutcome::UpToDate(report)
        } else {
            log::info!("{} patch(es) applied", ctx.patched_count);
            RunOutcome::Completed(report)
        }
    }

    async fn apply_patch(
        &self,
        patch: &PatchDescriptor,
        ctx: &mut RunContext,
        report: &mut RunReport,
    ) -> Result<(), AbortReason> {
        log::info!("Processing patch file: {}", patch.source_path.display());
        if self.options.safe {
            if let Some(backup) = &self.backup {
                backup.backup_once(ctx).await;
            }
        }

        let script = match std::fs::read_to_string(&patch.source_path) {
            Ok(script) => script,
            Err(e) => {
                let err = PatchError::ReadPatch {
                    path: patch.source_path.display().to_string(),
                    source: e,
                };
                log::warn!("{err}; skipping");
                report.skipped.push(patch.source_path.clone());
                return Ok(());
            }
        };

        let statements = self
            .execute_script(&script, &patch.source_path)
            .await
            .map_err(AbortReason::Statement)?;

        let version = SchemaVersion::new(patch.ordinal);
        if patch.records_version() {
            self.store
                .write(version)
                .await
                .map_err(|e| AbortReason::VersionUpdate(e.to_string()))?;
        }
        ctx.current_version = version;
        ctx.patched_count += 1;
        report.final_version = Some(version);
        report.applied.push(AppliedPatch {
            ordinal: patch.ordinal,
            file: patch.source_path.clone(),
            statements,
        });
        Ok(())
    }

    /// Split `script` and execute its statements in order.
    ///
    /// Returns the number of statements that ran or were already applied.
    /// Stops at the first fatal statement.
    pub async fn execute_script(
        &self,
        script: &str,
        file: &Path,
    ) -> Result<usize, StatementFailure> {
        let split_options = self.options.split_options();
        let mut statements = split_statements(script, &split_options);
        let mut executed = 0;

        for statement in statements.by_ref() {
            let outcome = self.execute_statement(&statement.text).await;
            if outcome.is_fatal() {
                return Err(StatementFailure {
                    file: file.to_path_buf(),
                    statement: statement.text,
                    source_line: statement.source_line,
                    outcome,
                });
            }
            executed += 1;
        }

        if let Some(rest) = statements.remainder() {
            log::warn!(
                "{}: unterminated trailing content was not executed: {rest}",
                file.display()
            );
        }
        Ok(executed)
    }

    /// Execute one statement and classify any failure
    pub async fn execute_statement(&self, sql: &str) -> ExecutionOutcome {
        let err = match self.db.execute(sql).await {
            Ok(_) => {
                log::info!("SUCCESS: {sql}");
                return ExecutionOutcome::success();
            }
            Err(err) => err,
        };
        self.error_log.record(err.message(), sql);

        let family = self.db.family();
        match classify_failure(family, &err, sql) {
            Classification::Benign(condition) => {
                let outcome = ExecutionOutcome::failure(OutcomeKind::Benign, &err);
                log::warn!(
                    "{sql} {} - No need to worry {{{}}}",
                    condition.describe(),
                    outcome.code()
                );
                outcome
            }
            Classification::RetryableDdl => self.retry_alter_ignore(sql, family).await,
            Classification::Fatal => {
                let outcome = ExecutionOutcome::failure(OutcomeKind::Fatal, &err);
                log::error!("{sql} Failed {{{}}} {}", outcome.code(), outcome.message);
                outcome
            }
        }
    }

    async fn retry_alter_ignore(&self, sql: &str, family: DbFamily) -> ExecutionOutcome {
        if let Some(compat) = compat_statement(family) {
            if let Err(e) = self.db.execute(compat).await {
                log::warn!("{compat}: {e}");
            }
        }

        match self.db.execute(sql).await {
            Ok(_) => {
                log::info!("SUCCESS: {sql}");
                ExecutionOutcome::retried()
            }
            Err(err) => {
                self.error_log.record(err.message(), sql);
                let outcome = ExecutionOutcome::failure(OutcomeKind::Fatal, &err);
                log::error!("{sql} Failed {{{}}} {}", outcome.code(), outcome.message);
                outcome
            }
        }
    }
}

#[cfg(test)]
#[path = "applier_test.rs"]
mod tests;
