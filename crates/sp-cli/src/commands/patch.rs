//! Patch command implementation

use anyhow::Result;
use sp_patch::{DirectoryPatchSource, PatchList, PatchSource};

use crate::cli::{GlobalArgs, PatchArgs};
use crate::commands::common::{backup_action, build_applier, report_outcome};
use crate::context::RuntimeContext;

/// Execute the patch command
pub async fn execute(args: &PatchArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let store = ctx.version_store();
    let backup = backup_action(&ctx.config);
    let mut applier = build_applier(&ctx, &store, backup.as_ref(), args.no_backup);

    let source: Box<dyn PatchSource> = if args.files.is_empty() {
        let dir = ctx.config.patches_dir_absolute(&ctx.root);
        ctx.verbose(&format!("Scanning {}", dir.display()));
        Box::new(DirectoryPatchSource::new(dir))
    } else {
        Box::new(PatchList::new(args.files.clone()))
    };

    println!("Patching {} ({})", ctx.config.name, ctx.db.db_type());
    let outcome = applier.process_patches(source.as_ref()).await;
    report_outcome(&outcome)
}

#[cfg(test)]
#[path = "patch_test.rs"]
mod tests;
