//! Version command implementation

use anyhow::{Context, Result};
use sp_core::SchemaVersion;

use crate::cli::GlobalArgs;
use crate::commands::common::{ExitCode, EXIT_CONFIG_ABORT};
use crate::context::RuntimeContext;

/// Execute the version command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let raw = ctx
        .version_store()
        .read_raw()
        .await
        .context("Failed to read schema version")?
        .unwrap_or_default();

    match SchemaVersion::parse(&raw) {
        Ok(version) => {
            println!("{version}");
            Ok(())
        }
        Err(e) => {
            eprintln!("{e}");
            Err(ExitCode(EXIT_CONFIG_ABORT).into())
        }
    }
}
