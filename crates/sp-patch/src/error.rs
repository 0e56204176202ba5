//! Error types for sp-patch

use sp_core::CoreError;
use sp_db::DbError;
use thiserror::Error;

/// Patch engine errors
#[derive(Error, Debug)]
pub enum PatchError {
    /// P001: Configuration, naming or discovery error
    #[error("[P001] {0}")]
    Core(#[from] CoreError),

    /// P002: Database error outside statement classification
    #[error("[P002] {0}")]
    Database(#[from] DbError),

    /// P003: Patch file could not be read
    #[error("[P003] Failed to read patch file '{path}': {source}")]
    ReadPatch {
        path: String,
        source: std::io::Error,
    },

    /// P004: Discovery produced no candidate files
    #[error("[P004] No patch files found in {location}. Check the patches directory and its permissions")]
    NoPatches { location: String },

    /// P005: External backup action failed
    #[error("[P005] Backup failed: {0}")]
    Backup(String),

    /// P006: Version control bookkeeping failed
    #[error("[P006] Version control failed: {0}")]
    VersionControl(String),

    /// P007: Patch file could not be renamed
    #[error("[P007] Failed to rename '{from}' to '{to}': {source}")]
    Rename {
        from: String,
        to: String,
        source: std::io::Error,
    },
}

/// Result type alias for PatchError
pub type PatchResult<T> = Result<T, PatchError>;
