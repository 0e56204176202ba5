//! sp-patch - Patch engine for sqlpatch
//!
//! This crate applies ordered SQL patches to a database, classifies
//! statement failures, and keeps the persisted schema version current.
//! Backup, version control and patch discovery are injected collaborators.

pub mod applier;
pub mod backup;
pub mod classify;
pub mod error;
pub mod error_log;
pub mod install;
pub mod promote;
pub mod run;
pub mod source;
pub mod vcs;
pub mod version_store;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use applier::{ApplyOptions, PatchApplier};
pub use backup::{BackupAction, BackupCoordinator, ShellBackup};
pub use classify::{classify, classify_failure, Classification, Condition};
pub use error::{PatchError, PatchResult};
pub use error_log::ErrorLog;
pub use install::{install_schema, InstallReport};
pub use run::{
    AbortReason, AppliedPatch, ExecutionOutcome, OutcomeKind, PromotedPatch, RunContext,
    RunOutcome, RunReport, RunState, StatementFailure,
};
pub use source::{DirectoryPatchSource, PatchList, PatchSource};
pub use vcs::{GitVersionControl, VersionControl};
pub use version_store::{SettingsVersionStore, VersionStore};
