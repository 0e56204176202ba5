//! Patch file naming and descriptors
//!
//! Applied patches are named `NNNN~table.sql`, where `NNNN` is the zero-padded
//! ordinal. Freshly authored patches are named `+N~table.sql` until they are
//! promoted and given the next free ordinal.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Pattern for numbered patch file names, used in diagnostics
pub const PATCH_NAME_PATTERN: &str = r"^(\d{4})~(\w+)\.sql$";

/// Pattern for new, not yet numbered patch file names, used in diagnostics
pub const NEW_PATCH_NAME_PATTERN: &str = r"^\+(\d+)~(\w+)\.sql$";

fn patch_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PATCH_NAME_PATTERN).expect("valid regex"))
}

fn new_patch_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(NEW_PATCH_NAME_PATTERN).expect("valid regex"))
}

fn script_version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)UPDATE `?site`? SET `?value`? = '?(\d+)'? WHERE `?setting`? = 'sqlpatch'",
        )
        .expect("valid regex")
    })
}

/// Where a patch's ordinal was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrdinalSource {
    /// Parsed from a `NNNN~table.sql` file name; the applier records the version
    FileName,
    /// Found in the script's own version-update statement
    Script,
}

/// A patch file waiting to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchDescriptor {
    /// Patch sequence number
    pub ordinal: u32,
    /// Primary table touched by the patch
    pub table: String,
    /// Location of the SQL script
    pub source_path: PathBuf,
    /// Origin of `ordinal`
    pub ordinal_source: OrdinalSource,
}

impl PatchDescriptor {
    /// Whether the applier must write the version itself after the script runs
    pub fn records_version(&self) -> bool {
        self.ordinal_source == OrdinalSource::FileName
    }

    /// File name for display
    pub fn file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source_path.display().to_string())
    }
}

/// Parsed `NNNN~table.sql` name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchFileName {
    /// Patch ordinal
    pub ordinal: u32,
    /// Table part of the name
    pub table: String,
}

impl PatchFileName {
    /// Parse a bare file name (no directory)
    pub fn parse(file_name: &str) -> Option<Self> {
        let caps = patch_name_re().captures(file_name)?;
        Some(Self {
            ordinal: caps[1].parse().ok()?,
            table: caps[2].to_string(),
        })
    }

    /// Parse the file name component of `path`
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_name()
            .and_then(|n| n.to_str())
            .and_then(Self::parse)
    }
}

/// Parsed `+N~table.sql` name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPatchFileName {
    /// Author-chosen ordering among new patches
    pub order: u32,
    /// Table part of the name
    pub table: String,
}

impl NewPatchFileName {
    /// Parse a bare file name (no directory)
    pub fn parse(file_name: &str) -> Option<Self> {
        let caps = new_patch_name_re().captures(file_name)?;
        Some(Self {
            order: caps[1].parse().ok()?,
            table: caps[2].to_string(),
        })
    }

    /// Parse the file name component of `path`
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_name()
            .and_then(|n| n.to_str())
            .and_then(Self::parse)
    }
}

/// Canonical `NNNN~table.sql` file name for a promoted patch
pub fn canonical_file_name(ordinal: u32, table: &str) -> String {
    format!("{ordinal:04}~{table}.sql")
}

/// Find the ordinal in a legacy script's `UPDATE site SET value = N` statement
pub fn script_ordinal(script: &str) -> Option<u32> {
    script_version_re()
        .captures(script)
        .and_then(|caps| caps[1].parse().ok())
}

#[cfg(test)]
#[path = "patch_test.rs"]
mod tests;
