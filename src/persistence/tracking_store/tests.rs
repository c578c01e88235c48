//! Tests for the `SQLite` tracking store.

type FixtureResult<T> = Result<T, Box<dyn std::error::Error>>;

use chrono::Duration;
use diesel::Connection;
use diesel::RunQueryDsl;
use diesel::sql_query;
use diesel::sqlite::SqliteConnection;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::SqliteTrackingStore;
use crate::persistence::{PersistenceError, migrate_database};
use crate::source::RepositorySlug;
use crate::source::test_support::{fixed_now, issue_open_for_days, pull_request_resolved};
use crate::telemetry::NoopTelemetrySink;
use crate::tracking::{TrackingKey, TrackingRecord, TrackingStore};

#[fixture]
fn temp_db() -> FixtureResult<(TempDir, String)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("repowatch.sqlite");
    Ok((temp_dir, db_path.to_string_lossy().to_string()))
}

#[fixture]
fn migrated_store(
    temp_db: FixtureResult<(TempDir, String)>,
) -> FixtureResult<(TempDir, SqliteTrackingStore)> {
    let (temp_dir, database_url) = temp_db?;
    migrate_database(&database_url, &NoopTelemetrySink)?;

    let store = SqliteTrackingStore::new(database_url)?;
    Ok((temp_dir, store))
}

fn repo(name: &str) -> RepositorySlug {
    RepositorySlug::new("octo", name).expect("slug should be valid")
}

fn sample_record() -> TrackingRecord {
    let now = fixed_now();
    let mut record = TrackingRecord::new();
    record.record_issue(&issue_open_for_days(12, 30, now), now);
    record.record_pull_request(
        &pull_request_resolved(40, now - Duration::hours(3), true),
        now,
    );
    record.record_issue(&issue_open_for_days(13, 9, now), now - Duration::days(1));
    record.mark_closed_issues(&[12].into_iter().collect());
    record
}

#[rstest]
fn persisted_record_loads_back_unchanged(
    migrated_store: FixtureResult<(TempDir, SqliteTrackingStore)>,
) {
    let (_temp_dir, store) = migrated_store.expect("fixture should succeed");
    let record = sample_record();

    store
        .persist(&repo("repo"), &record)
        .expect("persist should succeed");
    let loaded = store.load(&repo("repo")).expect("load should succeed");

    assert_eq!(loaded, record);
    assert!(
        loaded
            .get(TrackingKey::issue(13))
            .is_some_and(|entry| entry.closed_since_notified)
    );
}

#[rstest]
fn persist_replaces_previous_rows_for_repository_only(
    migrated_store: FixtureResult<(TempDir, SqliteTrackingStore)>,
) {
    let (_temp_dir, store) = migrated_store.expect("fixture should succeed");
    let other = sample_record();
    store
        .persist(&repo("other"), &other)
        .expect("persist should succeed");
    store
        .persist(&repo("repo"), &sample_record())
        .expect("persist should succeed");

    store
        .persist(&repo("repo"), &TrackingRecord::new())
        .expect("persist should succeed");

    assert!(store.load(&repo("repo")).expect("load").is_empty());
    assert_eq!(store.load(&repo("other")).expect("load"), other);
}

#[rstest]
fn load_without_rows_returns_empty_record(
    migrated_store: FixtureResult<(TempDir, SqliteTrackingStore)>,
) {
    let (_temp_dir, store) = migrated_store.expect("fixture should succeed");

    let loaded = store.load(&repo("fresh")).expect("load should succeed");

    assert!(loaded.is_empty());
}

#[rstest]
fn load_reports_missing_schema(temp_db: FixtureResult<(TempDir, String)>) {
    let (_temp_dir, database_url) = temp_db.expect("fixture should succeed");
    let store = SqliteTrackingStore::new(database_url).expect("store should build");

    let error = store.load(&repo("repo")).expect_err("load should fail");

    assert_eq!(error, PersistenceError::SchemaNotInitialised);
}

#[rstest]
fn persist_reports_missing_schema(temp_db: FixtureResult<(TempDir, String)>) {
    let (_temp_dir, database_url) = temp_db.expect("fixture should succeed");
    let store = SqliteTrackingStore::new(database_url).expect("store should build");

    let error = store
        .persist(&repo("repo"), &sample_record())
        .expect_err("persist should fail");

    assert_eq!(error, PersistenceError::SchemaNotInitialised);
}

#[rstest]
fn corrupt_timestamp_is_reported(
    temp_db: FixtureResult<(TempDir, String)>,
) -> FixtureResult<()> {
    let (_temp_dir, database_url) = temp_db?;
    migrate_database(&database_url, &NoopTelemetrySink)?;
    let mut connection = SqliteConnection::establish(&database_url)?;
    sql_query(
        "INSERT INTO notification_tracking \
         (repository, kind, item_number, state_marker, notified_at, closed_since_notified) \
         VALUES ('octo/repo', 'issue', 1, 'yesterday', 'today', 0);",
    )
    .execute(&mut connection)?;
    let store = SqliteTrackingStore::new(database_url)?;

    let error = store.load(&repo("repo")).expect_err("load should fail");

    assert!(
        matches!(error, PersistenceError::CorruptRow { .. }),
        "expected CorruptRow, got {error:?}"
    );
    Ok(())
}

#[test]
fn blank_database_url_is_rejected() {
    assert_eq!(
        SqliteTrackingStore::new("  ").map(|_| ()),
        Err(PersistenceError::BlankDatabaseUrl)
    );
}
