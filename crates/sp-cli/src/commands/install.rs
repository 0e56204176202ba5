//! Install command implementation

use anyhow::{Context, Result};
use sp_patch::install_schema;

use crate::cli::{GlobalArgs, InstallArgs};
use crate::context::RuntimeContext;

/// Execute the install command
pub async fn execute(args: &InstallArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let ddl = args
        .file
        .clone()
        .unwrap_or_else(|| ctx.config.ddl_file_absolute(&ctx.root));
    let store = ctx.version_store();

    let report = install_schema(&*ctx.db, &store, &ddl)
        .await
        .with_context(|| format!("Failed to install schema from {}", ddl.display()))?;

    println!("Installed schema from {}", ddl.display());
    if report.seeded_version {
        println!(
            "Initialized {}.{} to 0",
            ctx.config.settings_table, ctx.config.version_setting
        );
    }
    Ok(())
}
