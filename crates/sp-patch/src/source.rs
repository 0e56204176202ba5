//! Where patch descriptors come from

use sp_core::{describe_patch_files, discover_patches, CoreResult, PatchDescriptor};
use std::path::PathBuf;

/// Supplies the ordered patch candidates for a run
pub trait PatchSource: Send + Sync {
    /// Candidates sorted by ordinal
    fn patches(&self) -> CoreResult<Vec<PatchDescriptor>>;

    /// Human-readable origin for messages
    fn location(&self) -> String;
}

/// `NNNN~table.sql` files in a directory
#[derive(Debug, Clone)]
pub struct DirectoryPatchSource {
    dir: PathBuf,
}

impl DirectoryPatchSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl PatchSource for DirectoryPatchSource {
    fn patches(&self) -> CoreResult<Vec<PatchDescriptor>> {
        discover_patches(&self.dir)
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }
}

/// An explicit list of patch files
#[derive(Debug, Clone, Default)]
pub struct PatchList {
    files: Vec<PathBuf>,
}

impl PatchList {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }
}

impl PatchSource for PatchList {
    fn patches(&self) -> CoreResult<Vec<PatchDescriptor>> {
        describe_patch_files(&self.files)
    }

    fn location(&self) -> String {
        format!("{} listed file(s)", self.files.len())
    }
}
