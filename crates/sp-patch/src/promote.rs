//! Promotion of newly authored `+N~table.sql` patches
//!
//! New patches get the next free version number when they are first
//! applied. The file is then renamed to its canonical `NNNN~table.sql`
//! name so later runs treat it like any other numbered patch.

use crate::applier::PatchApplier;
use crate::error::PatchError;
use crate::run::{AbortReason, PromotedPatch, RunOutcome, RunReport, RunState};
use crate::source::PatchSource;
use sp_core::{canonical_file_name, discover_new_patches, NewPatchFileName};
use std::path::{Path, PathBuf};

impl PatchApplier<'_> {
    /// Bring the database up to date, then apply and number the new patches in `new_dir`.
    ///
    /// Stops with the same abort if the regular pass aborts. Rename and
    /// version-control failures are reported and do not stop the run.
    pub async fn promote_new_patches(
        &mut self,
        source: &dyn PatchSource,
        new_dir: &Path,
    ) -> RunOutcome {
        let mut report = match self.process_patches(source).await {
            RunOutcome::Completed(report) | RunOutcome::UpToDate(report) => report,
            aborted @ RunOutcome::Aborted { .. } => return aborted,
        };

        self.enter(RunState::Scanning);
        log::info!("Looking for new patches...");
        let candidates = match discover_new_patches(new_dir) {
            Ok(candidates) => candidates,
            Err(e) => return self.abort(AbortReason::Configuration(e.to_string()), report),
        };
        log::info!("{} found", candidates.len());

        self.enter(RunState::Applying);
        for (path, name) in candidates {
            if let Err(reason) = self.promote_one(&path, &name, &mut report).await {
                return self.abort(reason, report);
            }
        }

        self.enter(RunState::Done);
        if report.patched_count() == 0 {
            RunOutcome::UpToDate(report)
        } else {
            RunOutcome::Completed(report)
        }
    }

    async fn promote_one(
        &self,
        path: &Path,
        name: &NewPatchFileName,
        report: &mut RunReport,
    ) -> Result<(), AbortReason> {
        log::info!("Processing patch file: {}", path.display());
        let script = match std::fs::read_to_string(path) {
            Ok(script) => script,
            Err(e) => {
                let err = PatchError::ReadPatch {
                    path: path.display().to_string(),
                    source: e,
                };
                log::warn!("{err}; skipping");
                report.skipped.push(path.to_path_buf());
                return Ok(());
            }
        };

        self.execute_script(&script, path)
            .await
            .map_err(AbortReason::Statement)?;

        let version = self
            .store
            .read()
            .await
            .map_err(|e| AbortReason::VersionUpdate(e.to_string()))?
            .next()
            .map_err(|e| AbortReason::VersionUpdate(e.to_string()))?;
        self.store
            .write(version)
            .await
            .map_err(|e| AbortReason::VersionUpdate(e.to_string()))?;
        report.final_version = Some(version);

        let target = path.with_file_name(canonical_file_name(version.get(), &name.table));
        let to = self.rename(path, target, report).await;
        report.promoted.push(PromotedPatch {
            from: path.to_path_buf(),
            to,
            version,
        });
        Ok(())
    }

    async fn rename(&self, from: &Path, to: PathBuf, report: &mut RunReport) -> Option<PathBuf> {
        if let Err(e) = std::fs::rename(from, &to) {
            let err = PatchError::Rename {
                from: from.display().to_string(),
                to: to.display().to_string(),
                source: e,
            };
            log::warn!("{err}");
            report.skipped.push(from.to_path_buf());
            return None;
        }

        if let Some(vcs) = self.vcs {
            if let Err(e) = vcs.record_rename(from, &to).await {
                log::warn!("{e}");
            }
        }
        Some(to)
    }
}

#[cfg(test)]
#[path = "promote_test.rs"]
mod tests;
