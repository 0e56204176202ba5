//! Error types for sp-core

use thiserror::Error;

/// Core error type for sqlpatch
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {0}")]
    ConfigParseError(#[from] serde_yaml::Error),

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Patch directory not found or unreadable
    #[error("[E004] Patch directory not readable: {path}: {source}")]
    PatchDirUnreadable {
        path: String,
        source: std::io::Error,
    },

    /// E005: A patch file carries no ordinal, neither in its name nor its script
    #[error("[E005] No patch information available in {path}")]
    MissingOrdinal { path: String },

    /// E006: Two patch files claim the same ordinal
    #[error("[E006] Duplicate patch ordinal {ordinal}: {first} and {second}")]
    DuplicateOrdinal {
        ordinal: u32,
        first: String,
        second: String,
    },

    /// E007: Stored schema version is not a non-negative integer
    #[error("[E007] Bad sqlpatch value: '{value}'")]
    InvalidVersion { value: String },

    /// E008: File name does not follow the patch naming convention
    #[error("[E008] {file} does not match the pattern {pattern}")]
    InvalidPatchName { file: String, pattern: String },

    /// E009: IO error with file path context
    #[error("[E009] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E010: No version number is left after the stored one
    #[error("[E010] Schema version {value} has no successor")]
    VersionOverflow { value: u32 },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
