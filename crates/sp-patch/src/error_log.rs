//! Append-only log of failed statements

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Collapse every whitespace run to one space and trim
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Side file receiving an `[ERROR]` and a `[QUERY]` line per failed statement.
///
/// Write failures are logged and never interrupt patching.
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    path: Option<PathBuf>,
}

impl ErrorLog {
    /// Append to the file at `path`, creating it and its directory on first use
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A log that discards everything
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Target file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Render the two lines for one failure
    pub fn format_entry(timestamp: &str, message: &str, statement: &str) -> String {
        format!(
            "[{timestamp}] [ERROR] [{}]\n[{timestamp}] [QUERY] [{}]\n",
            collapse_whitespace(message),
            collapse_whitespace(statement)
        )
    }

    /// Record a failed statement
    pub fn record(&self, message: &str, statement: &str) {
        let Some(path) = &self.path else {
            return;
        };
        let entry = Self::format_entry(&Local::now().to_rfc2822(), message, statement);
        if let Err(e) = append(path, &entry) {
            log::warn!("Could not write error log {}: {e}", path.display());
        }
    }
}

fn append(path: &Path, entry: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(entry.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_entry_collapses_whitespace() {
        let entry = ErrorLog::format_entry(
            "Mon, 19 Oct 2026 10:00:00 +0000",
            "  Duplicate column\n name 'age' ",
            "ALTER TABLE users\n    ADD COLUMN age INT",
        );
        assert_eq!(
            entry,
            "[Mon, 19 Oct 2026 10:00:00 +0000] [ERROR] [Duplicate column name 'age']\n\
             [Mon, 19 Oct 2026 10:00:00 +0000] [QUERY] [ALTER TABLE users ADD COLUMN age INT]\n"
        );
    }

    #[test]
    fn test_record_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("patcherrors.log");
        let log = ErrorLog::new(&path);

        log.record("first failure", "SELECT 1");
        log.record("second failure", "SELECT 2");

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with("[ERROR] [first failure]"));
        assert!(lines[1].ends_with("[QUERY] [SELECT 1]"));
        assert!(lines[2].ends_with("[ERROR] [second failure]"));
        assert!(lines[3].ends_with("[QUERY] [SELECT 2]"));
        assert!(lines[0].starts_with('['));
    }

    #[test]
    fn test_disabled_log_writes_nothing() {
        let log = ErrorLog::disabled();
        assert!(log.path().is_none());
        log.record("ignored", "SELECT 1");
    }
}
