//! sp-core - Core library for sqlpatch
//!
//! This crate provides configuration parsing, the persisted schema version
//! type, patch file naming rules, and patch discovery shared across all
//! sqlpatch components.

pub mod config;
pub mod discovery;
pub mod error;
pub mod patch;
pub mod version;

pub use config::{BackupConfig, Config, DatabaseConfig, DbFamily, DbType};
pub use discovery::{describe_patch_files, discover_new_patches, discover_patches};
pub use error::{CoreError, CoreResult};
pub use patch::{
    canonical_file_name, NewPatchFileName, OrdinalSource, PatchDescriptor, PatchFileName,
};
pub use version::SchemaVersion;
