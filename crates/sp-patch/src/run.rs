//! Per-run state and results

use sp_core::SchemaVersion;
use std::fmt;
use std::path::PathBuf;

/// Applier lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    LoadingVersion,
    Scanning,
    Applying,
    Done,
    Aborted,
}

/// Mutable state of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// Version as of the last completed file
    pub current_version: SchemaVersion,
    /// Whether the backup action already ran
    pub backed_up: bool,
    /// Files applied so far
    pub patched_count: usize,
}

impl RunContext {
    pub fn new(current_version: SchemaVersion) -> Self {
        Self {
            current_version,
            backed_up: false,
            patched_count: 0,
        }
    }
}

/// How a single statement ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    /// Failed with an "already applied" signature
    Benign,
    /// Succeeded on the `ALTER IGNORE` compatibility retry
    RetriedSuccess,
    Fatal,
}

/// Result of executing one statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub kind: OutcomeKind,
    pub native_code: Option<i64>,
    pub sqlstate: Option<String>,
    pub message: String,
}

impl ExecutionOutcome {
    /// Successful execution
    pub fn success() -> Self {
        Self {
            kind: OutcomeKind::Success,
            native_code: None,
            sqlstate: None,
            message: String::new(),
        }
    }

    /// Successful compatibility retry
    pub fn retried() -> Self {
        Self {
            kind: OutcomeKind::RetriedSuccess,
            ..Self::success()
        }
    }

    /// Failure of `kind` carrying the driver's codes
    pub fn failure(kind: OutcomeKind, err: &sp_db::DbError) -> Self {
        Self {
            kind,
            native_code: err.native_code(),
            sqlstate: err.sqlstate().map(str::to_string),
            message: err.message().to_string(),
        }
    }

    /// Whether the run may continue
    pub fn is_fatal(&self) -> bool {
        self.kind == OutcomeKind::Fatal
    }

    /// Best available error code for display
    pub fn code(&self) -> String {
        self.native_code
            .map(|c| c.to_string())
            .or_else(|| self.sqlstate.clone())
            .unwrap_or_default()
    }
}

/// A statement that aborted the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementFailure {
    /// Script the statement came from
    pub file: PathBuf,
    /// Statement text as executed
    pub statement: String,
    /// 1-based line of the statement in `file`
    pub source_line: usize,
    pub outcome: ExecutionOutcome,
}

/// Why a run stopped early
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// Bad stored version, failed discovery or no candidates; nothing executed
    Configuration(String),
    /// A statement failed fatally
    Statement(StatementFailure),
    /// The version could not be persisted after a file completed
    VersionUpdate(String),
}

impl AbortReason {
    /// Whether this abort happened before any statement ran
    pub fn is_configuration(&self) -> bool {
        matches!(self, AbortReason::Configuration(_))
    }
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::Configuration(message) => write!(f, "{message}"),
            AbortReason::Statement(failure) => write!(
                f,
                "{} (line {}): {} Failed {{{}}}\n\t{}",
                failure.file.display(),
                failure.source_line,
                failure.statement,
                failure.outcome.code(),
                failure.outcome.message
            ),
            AbortReason::VersionUpdate(message) => {
                write!(f, "Failed to record schema version: {message}")
            }
        }
    }
}

/// A file applied during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedPatch {
    pub ordinal: u32,
    pub file: PathBuf,
    /// Statements that executed or were recognized as already applied
    pub statements: usize,
}

/// A `+N~table.sql` file turned into a numbered patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotedPatch {
    /// Original `+N~table.sql` path
    pub from: PathBuf,
    /// New `NNNN~table.sql` path; `None` when the rename failed
    pub to: Option<PathBuf>,
    /// Version assigned to the patch
    pub version: SchemaVersion,
}

/// What a run did before it finished or stopped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Version read at the start; `None` when it could not be read
    pub starting_version: Option<SchemaVersion>,
    /// Version after the last completed file
    pub final_version: Option<SchemaVersion>,
    pub applied: Vec<AppliedPatch>,
    /// New patches executed and renamed
    pub promoted: Vec<PromotedPatch>,
    /// Files skipped because they could not be read or renamed
    pub skipped: Vec<PathBuf>,
    pub backed_up: bool,
}

impl RunReport {
    /// Files applied, promoted ones included
    pub fn patched_count(&self) -> usize {
        self.applied.len() + self.promoted.len()
    }
}

/// Terminal result of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// At least one file was applied or promoted
    Completed(RunReport),
    /// Candidates existed but all were already applied
    UpToDate(RunReport),
    /// The run stopped early
    Aborted {
        reason: AbortReason,
        report: RunReport,
    },
}

impl RunOutcome {
    pub fn report(&self) -> &RunReport {
        match self {
            RunOutcome::Completed(report) | RunOutcome::UpToDate(report) => report,
            RunOutcome::Aborted { report, .. } => report,
        }
    }

    pub fn patched_count(&self) -> usize {
        self.report().patched_count()
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, RunOutcome::Aborted { .. })
    }

    /// The abort reason, if the run stopped early
    pub fn abort_reason(&self) -> Option<&AbortReason> {
        match self {
            RunOutcome::Aborted { reason, .. } => Some(reason),
            _ => None,
        }
    }
}
