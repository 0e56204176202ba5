//! New command implementation

use anyhow::Result;
use sp_patch::{DirectoryPatchSource, GitVersionControl};

use crate::cli::{GlobalArgs, NewArgs};
use crate::commands::common::{backup_action, build_applier, report_outcome};
use crate::context::RuntimeContext;

/// Execute the new command
pub async fn execute(args: &NewArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let store = ctx.version_store();
    let backup = backup_action(&ctx.config);
    let git = GitVersionControl::new(&ctx.root);

    let mut applier = build_applier(&ctx, &store, backup.as_ref(), args.no_backup);
    if !args.no_git {
        applier = applier.with_version_control(&git);
    }

    let dir = ctx.config.patches_dir_absolute(&ctx.root);
    let source = DirectoryPatchSource::new(&dir);
    let outcome = applier.promote_new_patches(&source, &dir).await;
    report_outcome(&outcome)
}
