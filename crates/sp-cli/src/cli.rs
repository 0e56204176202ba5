//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// sqlpatch - apply ordered SQL patches and track the schema version
#[derive(Parser, Debug)]
#[command(name = "sqlpatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override database path
    #[arg(short, long, global = true, env = "SQLPATCH_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending numbered patches
    Patch(PatchArgs),

    /// Apply pending patches, then number and apply new `+N~table.sql` patches
    New(NewArgs),

    /// Create the schema from the DDL file and seed the version row
    Install(InstallArgs),

    /// Print the stored schema version
    Version,

    /// Show how a script splits into statements without executing it
    Split(SplitArgs),
}

/// Arguments for the patch command
#[derive(Args, Debug, Default)]
pub struct PatchArgs {
    /// Skip the pre-patch backup
    #[arg(long)]
    pub no_backup: bool,

    /// Apply these files instead of scanning the patches directory
    #[arg(short, long = "file")]
    pub files: Vec<PathBuf>,
}

/// Arguments for the new command
#[derive(Args, Debug, Default)]
pub struct NewArgs {
    /// Skip the pre-patch backup
    #[arg(long)]
    pub no_backup: bool,

    /// Do not stage renamed patches with git
    #[arg(long)]
    pub no_git: bool,
}

/// Arguments for the install command
#[derive(Args, Debug, Default)]
pub struct InstallArgs {
    /// DDL file to run instead of the configured one
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

/// Arguments for the split command
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Script to split
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: SplitOutput,
}

/// Split output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitOutput {
    /// One block per statement
    Text,
    /// JSON document
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
