//! Fake collaborators for sp-patch tests

use crate::backup::BackupAction;
use crate::error::{PatchError, PatchResult};
use crate::vcs::VersionControl;
use crate::version_store::VersionStore;
use async_trait::async_trait;
use sp_core::{DbFamily, SchemaVersion};
use sp_db::{Database, DbError, DbResult};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

struct ScriptedFailure {
    pattern: String,
    sqlstate: Option<String>,
    native_code: Option<i64>,
    remaining: Option<usize>,
}

/// Database that records statements and fails the ones it is told to
pub struct FakeDatabase {
    family: DbFamily,
    failures: Mutex<Vec<ScriptedFailure>>,
    executed: Mutex<Vec<String>>,
}

impl FakeDatabase {
    pub fn new(family: DbFamily) -> Self {
        Self {
            family,
            failures: Mutex::new(Vec::new()),
            executed: Mutex::new(Vec::new()),
        }
    }

    fn script(
        &self,
        pattern: &str,
        sqlstate: Option<&str>,
        native_code: Option<i64>,
        remaining: Option<usize>,
    ) {
        self.failures.lock().unwrap().push(ScriptedFailure {
            pattern: pattern.to_string(),
            sqlstate: sqlstate.map(str::to_string),
            native_code,
            remaining,
        });
    }

    /// Fail every statement containing `pattern`
    pub fn fail_on(&self, pattern: &str, sqlstate: Option<&str>, native_code: Option<i64>) {
        self.script(pattern, sqlstate, native_code, None);
    }

    /// Fail the next statement containing `pattern`
    pub fn fail_once_on(&self, pattern: &str, sqlstate: Option<&str>, native_code: Option<i64>) {
        self.script(pattern, sqlstate, native_code, Some(1));
    }

    /// Every statement passed to `execute`, failed ones included
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    fn run(&self, sql: &str) -> DbResult<usize> {
        self.executed.lock().unwrap().push(sql.to_string());
        let mut failures = self.failures.lock().unwrap();
        let hit = failures
            .iter_mut()
            .find(|f| sql.contains(&f.pattern) && f.remaining != Some(0));
        match hit {
            Some(failure) => {
                if let Some(n) = failure.remaining.as_mut() {
                    *n -= 1;
                }
                Err(DbError::ExecutionError {
                    message: format!("scripted failure for '{}'", failure.pattern),
                    sqlstate: failure.sqlstate.clone(),
                    native_code: failure.native_code,
                })
            }
            None => Ok(0),
        }
    }
}

#[async_trait]
impl Database for FakeDatabase {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.run(sql)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.run(sql).map(|_| ())
    }

    async fn query_optional_string(&self, _sql: &str) -> DbResult<Option<String>> {
        Ok(None)
    }

    fn family(&self) -> DbFamily {
        self.family
    }

    fn db_type(&self) -> &'static str {
        "fake"
    }
}

/// In-memory version store holding the raw stored text
pub struct FakeVersionStore {
    raw: Mutex<String>,
    writes: Mutex<Vec<SchemaVersion>>,
}

impl FakeVersionStore {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: Mutex::new(raw.to_string()),
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Versions written, in order
    pub fn writes(&self) -> Vec<SchemaVersion> {
        self.writes.lock().unwrap().clone()
    }

    /// Currently stored text
    pub fn raw(&self) -> String {
        self.raw.lock().unwrap().clone()
    }
}

#[async_trait]
impl VersionStore for FakeVersionStore {
    async fn read(&self) -> PatchResult<SchemaVersion> {
        Ok(SchemaVersion::parse(&self.raw())?)
    }

    async fn write(&self, version: SchemaVersion) -> PatchResult<()> {
        *self.raw.lock().unwrap() = version.to_string();
        self.writes.lock().unwrap().push(version);
        Ok(())
    }
}

/// Backup action that counts its invocations
#[derive(Default)]
pub struct FakeBackup {
    fail: bool,
    targets: Mutex<Vec<String>>,
}

impl FakeBackup {
    /// A backup whose every invocation fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            targets: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.targets.lock().unwrap().len()
    }

    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }
}

#[async_trait]
impl BackupAction for FakeBackup {
    async fn backup(&self, target: &str) -> PatchResult<()> {
        self.targets.lock().unwrap().push(target.to_string());
        if self.fail {
            Err(PatchError::Backup("scripted backup failure".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Version control that records renames
#[derive(Default)]
pub struct FakeVersionControl {
    fail: AtomicBool,
    renames: Mutex<Vec<(PathBuf, PathBuf)>>,
    calls: AtomicUsize,
}

impl FakeVersionControl {
    /// Make every later call fail
    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn renames(&self) -> Vec<(PathBuf, PathBuf)> {
        self.renames.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VersionControl for FakeVersionControl {
    async fn record_rename(&self, old: &Path, new: &Path) -> PatchResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(PatchError::VersionControl("scripted failure".to_string()));
        }
        self.renames
            .lock()
            .unwrap()
            .push((old.to_path_buf(), new.to_path_buf()));
        Ok(())
    }
}
