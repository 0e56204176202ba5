//! Fresh schema installation

use crate::error::{PatchError, PatchResult};
use crate::version_store::SettingsVersionStore;
use sp_db::Database;
use sp_sql::flatten_ddl_script;
use std::path::Path;

/// Result of [`install_schema`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallReport {
    /// Whether the version row had to be created
    pub seeded_version: bool,
}

/// Run the whole DDL file at `ddl` as one batch, then make sure the version row exists
pub async fn install_schema(
    db: &dyn Database,
    store: &SettingsVersionStore<'_>,
    ddl: &Path,
) -> PatchResult<InstallReport> {
    let script = std::fs::read_to_string(ddl).map_err(|e| PatchError::ReadPatch {
        path: ddl.display().to_string(),
        source: e,
    })?;

    log::info!("Installing schema from {}", ddl.display());
    db.execute_batch(&flatten_ddl_script(&script)).await?;

    let seeded_version = store.seed().await?;
    Ok(InstallReport { seeded_version })
}
