//! Runtime context for CLI commands

use anyhow::{Context, Result};
use sp_core::Config;
use sp_db::{Database, DuckDbBackend};
use sp_patch::SettingsVersionStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// Load the project configuration named by the global arguments
pub fn load_config(args: &GlobalArgs) -> Result<Config> {
    let config = match &args.config {
        Some(path) => Config::load(path).context("Failed to load configuration file")?,
        None => Config::load_from_dir(&args.project_dir)
            .context("Failed to load project configuration")?,
    };
    Ok(config)
}

/// Runtime context containing loaded config and database connection
pub struct RuntimeContext {
    /// Project root
    pub root: PathBuf,

    /// The loaded configuration
    pub config: Config,

    /// Database connection
    pub db: Arc<dyn Database>,

    /// Verbose output enabled
    pub verbose: bool,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let root = args.project_dir.clone();
        let config = load_config(args)?;

        let db_path = resolve_db_path(
            &root,
            args.database.as_deref().unwrap_or(&config.database.path),
        );
        log::debug!("Opening {} database at {db_path}", config.database.db_type);
        let db: Arc<dyn Database> =
            Arc::new(DuckDbBackend::new(&db_path).context("Failed to connect to database")?);

        Ok(Self {
            root,
            config,
            db,
            verbose: args.verbose,
        })
    }

    /// Version store configured for this project
    pub fn version_store(&self) -> SettingsVersionStore<'_> {
        SettingsVersionStore::new(
            &*self.db,
            &self.config.settings_table,
            &self.config.version_setting,
        )
    }

    /// Print verbose output if enabled
    pub fn verbose(&self, msg: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", msg);
        }
    }
}

/// Relative database paths are taken from the project root
fn resolve_db_path(root: &Path, path: &str) -> String {
    if path == ":memory:" || Path::new(path).is_absolute() {
        path.to_string()
    } else {
        root.join(path).display().to_string()
    }
}
