//! End-to-end patch runs against an in-memory DuckDB database

use sp_core::SchemaVersion;
use sp_db::{Database, DuckDbBackend};
use sp_patch::test_utils::FakeBackup;
use sp_patch::{
    install_schema, AbortReason, ApplyOptions, BackupCoordinator, DirectoryPatchSource,
    PatchApplier, RunOutcome, SettingsVersionStore, VersionStore,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DDL: &str = "\
CREATE TABLE settings (setting VARCHAR PRIMARY KEY, value VARCHAR);
CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR);
";

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("patches")).unwrap();
        fs::write(dir.path().join("ddl.sql"), DDL).unwrap();
        Self { dir }
    }

    fn patches(&self) -> std::path::PathBuf {
        self.dir.path().join("patches")
    }

    fn add_patch(&self, name: &str, body: &str) {
        fs::write(self.patches().join(name), body).unwrap();
    }

    fn ddl(&self) -> std::path::PathBuf {
        self.dir.path().join("ddl.sql")
    }
}

fn options() -> ApplyOptions {
    ApplyOptions {
        safe: false,
        ..ApplyOptions::default()
    }
}

async fn installed(project: &Project) -> DuckDbBackend {
    let db = DuckDbBackend::in_memory().unwrap();
    let store = SettingsVersionStore::with_defaults(&db);
    install_schema(&db, &store, &project.ddl()).await.unwrap();
    db
}

async fn column_count(db: &DuckDbBackend, table: &str) -> String {
    db.query_optional_string(&format!(
        "SELECT CAST(COUNT(*) AS VARCHAR) FROM information_schema.columns WHERE table_name = '{table}'"
    ))
    .await
    .unwrap()
    .unwrap()
}

async fn run(db: &DuckDbBackend, dir: &Path) -> RunOutcome {
    let store = SettingsVersionStore::with_defaults(db);
    let mut applier = PatchApplier::new(db, &store, options());
    applier.process_patches(&DirectoryPatchSource::new(dir)).await
}

#[tokio::test]
async fn test_install_then_patch() {
    let project = Project::new();
    project.add_patch(
        "0001~users.sql",
        "ALTER TABLE users ADD COLUMN age INTEGER;\nALTER TABLE users ADD COLUMN city VARCHAR;\n",
    );
    project.add_patch(
        "0002~groups.sql",
        "-- groups table\nCREATE TABLE groups (\n  id INTEGER,\n  name VARCHAR\n);\n",
    );
    let db = installed(&project).await;

    let outcome = run(&db, &project.patches()).await;
    assert!(matches!(outcome, RunOutcome::Completed(_)));
    assert_eq!(outcome.patched_count(), 2);

    let store = SettingsVersionStore::with_defaults(&db);
    assert_eq!(store.read().await.unwrap(), SchemaVersion::new(2));
    assert_eq!(column_count(&db, "users").await, "4");
    assert_eq!(column_count(&db, "groups").await, "2");
}

#[tokio::test]
async fn test_rerun_reports_up_to_date() {
    let project = Project::new();
    project.add_patch("0001~users.sql", "ALTER TABLE users ADD COLUMN age INTEGER;\n");
    let db = installed(&project).await;

    assert_eq!(run(&db, &project.patches()).await.patched_count(), 1);
    let second = run(&db, &project.patches()).await;
    assert!(matches!(second, RunOutcome::UpToDate(_)));
}

#[tokio::test]
async fn test_existing_column_is_benign() {
    let project = Project::new();
    project.add_patch(
        "0001~users.sql",
        "ALTER TABLE users ADD COLUMN name VARCHAR;\nALTER TABLE users ADD COLUMN age INTEGER;\n",
    );
    let db = installed(&project).await;

    let outcome = run(&db, &project.patches()).await;
    assert!(matches!(outcome, RunOutcome::Completed(_)));
    assert_eq!(column_count(&db, "users").await, "3");

    let store = SettingsVersionStore::with_defaults(&db);
    assert_eq!(store.read().await.unwrap(), SchemaVersion::new(1));
}

#[tokio::test]
async fn test_missing_table_is_benign() {
    let project = Project::new();
    project.add_patch(
        "0001~releases.sql",
        "ALTER TABLE releases ADD COLUMN guid VARCHAR;\nALTER TABLE users ADD COLUMN age INTEGER;\n",
    );
    let db = installed(&project).await;

    let outcome = run(&db, &project.patches()).await;
    assert!(matches!(outcome, RunOutcome::Completed(_)));
    assert_eq!(column_count(&db, "users").await, "3");

    let store = SettingsVersionStore::with_defaults(&db);
    assert_eq!(store.read().await.unwrap(), SchemaVersion::new(1));
}

#[tokio::test]
async fn test_dropping_missing_index_is_benign() {
    let project = Project::new();
    project.add_patch(
        "0001~users.sql",
        "DROP INDEX ix_users_name;\nCREATE INDEX ix_users_name ON users (name);\n",
    );
    let db = installed(&project).await;

    let outcome = run(&db, &project.patches()).await;
    assert!(matches!(outcome, RunOutcome::Completed(_)));
    assert_eq!(outcome.patched_count(), 1);

    let indexes = db
        .query_optional_string(
            "SELECT index_name FROM duckdb_indexes() WHERE index_name = 'ix_users_name'",
        )
        .await
        .unwrap();
    assert_eq!(indexes.as_deref(), Some("ix_users_name"));
}

#[tokio::test]
async fn test_duplicate_seed_row_is_benign() {
    let project = Project::new();
    project.add_patch(
        "0001~settings.sql",
        "INSERT INTO settings VALUES ('sqlpatch', '0');\nINSERT INTO settings VALUES ('maxsize', '10');\n",
    );
    let db = installed(&project).await;

    let outcome = run(&db, &project.patches()).await;
    assert_eq!(outcome.patched_count(), 1);
    let value = db
        .query_optional_string("SELECT value FROM settings WHERE setting = 'maxsize'")
        .await
        .unwrap();
    assert_eq!(value.as_deref(), Some("10"));
}

#[tokio::test]
async fn test_syntax_error_aborts_and_keeps_version() {
    let project = Project::new();
    project.add_patch("0001~users.sql", "ALTER TABLE users ADD COLUMN age INTEGER;\n");
    project.add_patch(
        "0002~users.sql",
        "ALTER TABLE users ADD COLUMN city VARCHAR;\nTHIS IS NOT SQL;\nALTER TABLE users ADD COLUMN zip VARCHAR;\n",
    );
    project.add_patch("0003~users.sql", "ALTER TABLE users ADD COLUMN email VARCHAR;\n");
    let db = installed(&project).await;

    let outcome = run(&db, &project.patches()).await;
    match outcome.abort_reason() {
        Some(AbortReason::Statement(failure)) => {
            assert_eq!(failure.statement, "THIS IS NOT SQL");
            assert_eq!(failure.source_line, 2);
            assert_eq!(failure.outcome.sqlstate.as_deref(), Some("42601"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    let store = SettingsVersionStore::with_defaults(&db);
    assert_eq!(store.read().await.unwrap(), SchemaVersion::new(1));
    // id, name, age, city: the statement before the failure stays applied
    assert_eq!(column_count(&db, "users").await, "4");
}

#[tokio::test]
async fn test_bad_version_aborts_without_backup() {
    let project = Project::new();
    project.add_patch("0001~users.sql", "ALTER TABLE users ADD COLUMN age INTEGER;\n");
    let db = installed(&project).await;
    db.execute("UPDATE settings SET value = 'abc' WHERE setting = 'sqlpatch'")
        .await
        .unwrap();

    let store = SettingsVersionStore::with_defaults(&db);
    let action = FakeBackup::default();
    let mut applier = PatchApplier::new(&db, &store, ApplyOptions::default())
        .with_backup(BackupCoordinator::new(&action, "duckdb"));
    let outcome = applier
        .process_patches(&DirectoryPatchSource::new(project.patches()))
        .await;

    assert!(outcome.abort_reason().unwrap().is_configuration());
    assert_eq!(action.calls(), 0);
    assert_eq!(column_count(&db, "users").await, "2");
}

#[tokio::test]
async fn test_promote_against_duckdb() {
    let project = Project::new();
    project.add_patch("0001~users.sql", "ALTER TABLE users ADD COLUMN age INTEGER;\n");
    project.add_patch("+1~groups.sql", "CREATE TABLE groups (id INTEGER);\n");
    let db = installed(&project).await;

    let store = SettingsVersionStore::with_defaults(&db);
    let mut applier = PatchApplier::new(&db, &store, options());
    let outcome = applier
        .promote_new_patches(&DirectoryPatchSource::new(project.patches()), &project.patches())
        .await;

    assert!(matches!(outcome, RunOutcome::Completed(_)));
    assert_eq!(store.read().await.unwrap(), SchemaVersion::new(2));
    assert!(project.patches().join("0002~groups.sql").exists());
}
