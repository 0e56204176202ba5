//! Persisted schema version

use crate::error::PatchResult;
use async_trait::async_trait;
use sp_core::SchemaVersion;
use sp_db::Database;

/// Get/set access to the persisted schema version
#[async_trait]
pub trait VersionStore: Send + Sync {
    /// Read the current version.
    ///
    /// A missing or non-numeric value is a configuration error.
    async fn read(&self) -> PatchResult<SchemaVersion>;

    /// Persist `version`
    async fn write(&self, version: SchemaVersion) -> PatchResult<()>;
}

/// Version kept as a row of a `(setting, value)` key/value table
pub struct SettingsVersionStore<'a> {
    db: &'a dyn Database,
    table: String,
    key: String,
}

impl<'a> SettingsVersionStore<'a> {
    /// Store using `table` and the row named `key`.
    ///
    /// Both names are interpolated into SQL and must be plain identifiers.
    pub fn new(db: &'a dyn Database, table: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            db,
            table: table.into(),
            key: key.into(),
        }
    }

    /// Store on the conventional `settings` / `sqlpatch` row
    pub fn with_defaults(db: &'a dyn Database) -> Self {
        Self::new(db, "settings", "sqlpatch")
    }

    /// The stored value as text, `None` when the row is missing or NULL
    pub async fn read_raw(&self) -> PatchResult<Option<String>> {
        let sql = format!(
            "SELECT value FROM {} WHERE setting = '{}'",
            self.table, self.key
        );
        Ok(self.db.query_optional_string(&sql).await?)
    }

    /// Insert the version row with value `0` unless it already exists.
    ///
    /// Returns whether a row was inserted.
    pub async fn seed(&self) -> PatchResult<bool> {
        if self.read_raw().await?.is_some() {
            return Ok(false);
        }
        let sql = format!(
            "INSERT INTO {} (setting, value) VALUES ('{}', '0')",
            self.table, self.key
        );
        self.db.execute(&sql).await?;
        log::info!("Seeded {}.{} = 0", self.table, self.key);
        Ok(true)
    }
}

#[async_trait]
impl VersionStore for SettingsVersionStore<'_> {
    async fn read(&self) -> PatchResult<SchemaVersion> {
        let raw = self.read_raw().await?.unwrap_or_default();
        Ok(SchemaVersion::parse(&raw)?)
    }

    async fn write(&self, version: SchemaVersion) -> PatchResult<()> {
        let sql = format!(
            "UPDATE {} SET value = '{}' WHERE setting = '{}'",
            self.table, version, self.key
        );
        self.db.execute(&sql).await?;
        log::debug!("Schema version set to {version}");
        Ok(())
    }
}

#[cfg(test)]
#[path = "version_store_test.rs"]
mod tests;
