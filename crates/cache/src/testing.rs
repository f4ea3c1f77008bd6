//! On-disk snapshot fixtures for tests.

use crate::snapshot::Snapshot;
use sqlx::Connection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteJournalMode};
use std::path::PathBuf;
use tempfile::TempDir;

pub(crate) const SCHEMA: &str = include_str!("../fixtures/schema.sql");
pub(crate) const SEED: &str = include_str!("../fixtures/seed.sql");

/// Write a snapshot file with the full schema and then `sql` applied.
///
/// The file lives as long as the returned directory does.
pub(crate) async fn write_snapshot(sql: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.db");
    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Delete);
    let mut conn = SqliteConnection::connect_with(&options).await.unwrap();
    sqlx::raw_sql(SCHEMA).execute(&mut conn).await.unwrap();
    if !sql.trim().is_empty() {
        sqlx::raw_sql(sql).execute(&mut conn).await.unwrap();
    }
    conn.close().await.unwrap();
    (dir, path)
}

/// Open a read-only [`Snapshot`] over a freshly written fixture.
pub(crate) async fn snapshot(sql: &str) -> (TempDir, Snapshot) {
    let (dir, path) = write_snapshot(sql).await;
    let snapshot = Snapshot::open(&path, 2).await.unwrap();
    (dir, snapshot)
}
