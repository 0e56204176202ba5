//! Configuration types and parsing for sqlpatch.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names searched by [`Config::load_from_dir`], in order.
const CONFIG_FILE_NAMES: &[&str] = &["sqlpatch.yml", "sqlpatch.yaml"];

/// Main project configuration from sqlpatch.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Directory holding numbered patch files.
    ///
    /// Defaults to `db/patches/<family>` when unset.
    #[serde(default)]
    pub patches_dir: Option<String>,

    /// Directory substituted for `{:data:}` in patch scripts
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Full schema DDL used by `sqlpatch install`
    #[serde(default = "default_ddl_file")]
    pub ddl_file: String,

    /// Take a backup before the first patch of a run
    #[serde(default = "default_true")]
    pub safe: bool,

    /// External backup action
    #[serde(default)]
    pub backup: Option<BackupConfig>,

    /// Append-only log of failed statements
    #[serde(default = "default_error_log")]
    pub error_log: String,

    /// Table holding the key/value settings rows
    #[serde(default = "default_settings_table")]
    pub settings_table: String,

    /// Settings key holding the schema version
    #[serde(default = "default_version_setting")]
    pub version_setting: String,
}

/// Database backend selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Database family whose error codes a backend reports.
///
/// Selects the native code space consulted when classifying statement
/// failures, and the patch directory used by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbFamily {
    /// MySQL / MariaDB
    MySql,
    /// PostgreSQL
    Postgres,
    /// DuckDB
    #[default]
    DuckDb,
}

impl DbFamily {
    /// Lowercase identifier, also used as the backup target name
    pub fn as_str(&self) -> &'static str {
        match self {
            DbFamily::MySql => "mysql",
            DbFamily::Postgres => "postgres",
            DbFamily::DuckDb => "duckdb",
        }
    }
}

impl std::fmt::Display for DbFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database backend
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Database path (file-based or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Error-code family of the server
    #[serde(default)]
    pub family: DbFamily,

    /// Whether the server shares the local filesystem.
    ///
    /// Remote servers need `LOAD DATA LOCAL`, so `{:local:}` expands to
    /// `"LOCAL "` for them and to the empty string otherwise.
    #[serde(default = "default_true")]
    pub local: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DbType::default(),
            path: default_db_path(),
            family: DbFamily::default(),
            local: true,
        }
    }
}

impl DatabaseConfig {
    /// Value substituted for `{:local:}` in patch scripts
    pub fn local_prefix(&self) -> &'static str {
        if self.local {
            ""
        } else {
            "LOCAL "
        }
    }
}

/// External backup command configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackupConfig {
    /// Program followed by its arguments.
    ///
    /// The database family name is appended as the final argument.
    pub command: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_db_path() -> String {
    ":memory:".to_string()
}

fn default_data_dir() -> String {
    "db/schema/data".to_string()
}

fn default_ddl_file() -> String {
    "db/schema/ddl.sql".to_string()
}

fn default_error_log() -> String {
    "logs/patcherrors.log".to_string()
}

fn default_settings_table() -> String {
    "settings".to_string()
}

fn default_version_setting() -> String {
    "sqlpatch".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for sqlpatch.yml or sqlpatch.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
            .map(|path| Self::load(&path))
            .unwrap_or_else(|| {
                Err(CoreError::ConfigNotFound {
                    path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
                })
            })
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        if let Some(backup) = &self.backup {
            if backup.command.first().is_none_or(|program| program.is_empty()) {
                return Err(CoreError::ConfigInvalid {
                    message: "backup.command must name a program".to_string(),
                });
            }
        }

        for (field, value) in [
            ("settings_table", &self.settings_table),
            ("version_setting", &self.version_setting),
        ] {
            if !is_plain_identifier(value) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("{field} must be a plain identifier, got '{value}'"),
                });
            }
        }

        Ok(())
    }

    /// Get the absolute patch directory relative to a project root
    pub fn patches_dir_absolute(&self, root: &Path) -> PathBuf {
        match &self.patches_dir {
            Some(dir) => root.join(dir),
            None => root
                .join("db")
                .join("patches")
                .join(self.database.family.as_str()),
        }
    }

    /// Get the absolute data directory relative to a project root
    pub fn data_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.data_dir)
    }

    /// Get the absolute DDL file path relative to a project root
    pub fn ddl_file_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.ddl_file)
    }

    /// Get the absolute error log path relative to a project root
    pub fn error_log_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.error_log)
    }
}

fn is_plain_identifier(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
