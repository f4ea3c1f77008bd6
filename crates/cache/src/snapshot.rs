//! Read-only snapshot connection and pool management.

use crate::error::{ErrorKind, Result, SqlxResultExt};
use exn::ResultExt;
use futures::stream::BoxStream;
use futures::StreamExt;
use sqlx::pool::PoolConnectionMetadata;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{FromRow, Sqlite, SqliteConnection};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Tables every loader expects to find. Checked once when the snapshot is
/// opened so that an incompatible file is reported as an open failure rather
/// than as whichever loader happens to run first.
pub(crate) const REQUIRED_TABLES: &[&str] = &[
    "arch",
    "arch_compat",
    "content_set",
    "cpe_content_set",
    "cpe_repo",
    "cve_cwe",
    "cve_detail",
    "cve_pkg",
    "dbchange",
    "errata_bugzilla",
    "errata_cve",
    "errata_detail",
    "errata_module",
    "errata_modulepkg",
    "errata_refs",
    "errata_repo",
    "evr",
    "module_stream",
    "module_stream_require",
    "oval_criteria_dependency",
    "oval_criteria_type",
    "oval_definition_cpe",
    "oval_definition_cve",
    "oval_definition_detail",
    "oval_module_test_detail",
    "oval_state_arch",
    "oval_test_detail",
    "oval_test_state",
    "package_detail",
    "packagename",
    "packagename_oval_definition",
    "pkg_errata",
    "pkg_repo",
    "repo_detail",
    "string",
    "updates",
    "updates_index",
];

/// Read-only connection pool over one snapshot file.
///
/// Cloning is cheap (the pool is reference counted) and every clone shares
/// the same connections, which is how parallel loaders each get their own
/// cursor over the one file.
#[derive(Debug, Clone)]
pub struct Snapshot {
    path: PathBuf,
    pool: SqlitePool,
}

impl Snapshot {
    /// Open the snapshot at `path` with up to `max_connections` concurrent
    /// cursors.
    ///
    /// The file is never created or written to. Fails with
    /// [`ErrorKind::Open`] if it is missing, unreadable, not an SQLite
    /// database, or lacks one of the tables the loaders read.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>, max_connections: u32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let options = SqliteConnectOptions::new().filename(&path).read_only(true).create_if_missing(false);
        let pool = SqlitePoolOptions::new()
            // Pragmas must be applied to EVERY pooled connection, not only
            // the first one handed out.
            .after_connect(|conn, meta| Box::pin(async move { Self::apply_pragmas(conn, meta).await }))
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .or_raise(|| ErrorKind::Open(path.clone()))?;
        let snapshot = Self { path, pool };
        if let Err(err) = snapshot.verify_schema().await {
            snapshot.pool.close().await;
            return Err(err.raise(ErrorKind::Open(snapshot.path)));
        }
        Ok(snapshot)
    }

    /// Apply per-connection settings that aren't exposed via SqliteConnectOptions.
    async fn apply_pragmas(conn: &mut SqliteConnection, _meta: PoolConnectionMetadata) -> sqlx::Result<()> {
        sqlx::query(
            r#"
                PRAGMA query_only = ON;
                PRAGMA cache_size = -8192;
                PRAGMA temp_store = MEMORY;
                PRAGMA mmap_size = 268435456;
            "#,
        )
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn verify_schema(&self) -> Result<()> {
        let tables: HashSet<String> =
            sqlx::query_scalar::<Sqlite, String>(include_str!("../queries/list_tables.sql"))
                .fetch_all(&self.pool)
                .await
                .or_classify("sqlite_master")?
                .into_iter()
                .collect();
        if let Some(missing) = REQUIRED_TABLES.iter().find(|table| !tables.contains(**table)) {
            exn::bail!(ErrorKind::IncompatibleSchema(missing.to_string()));
        }
        Ok(())
    }

    /// Path this snapshot was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of distinct values in `table.column`.
    ///
    /// Only ever used to pre-size indexes, never for correctness.
    pub async fn count_distinct(&self, table: &'static str, column: &'static str) -> Result<usize> {
        let sql = format!("SELECT COUNT(DISTINCT {column}) FROM {table}");
        let count: i64 = sqlx::query_scalar::<Sqlite, i64>(&sql).fetch_one(&self.pool).await.or_classify(table)?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Stream every row returned by `sql`, decoded as `T`, in the order the
    /// query declares. Errors are attributed to `table`.
    pub fn fetch<'a, T>(&'a self, table: &'static str, sql: &'a str) -> BoxStream<'a, Result<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + 'a,
    {
        sqlx::query_as::<Sqlite, T>(sql).fetch(&self.pool).map(move |row| row.or_classify(table)).boxed()
    }

    /// Collect every row returned by `sql`.
    #[cfg(test)]
    pub(crate) async fn fetch_all<T>(&self, table: &'static str, sql: &str) -> Result<Vec<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        use futures::TryStreamExt;
        self.fetch(table, sql).try_collect().await
    }

    /// Close the connection pool, releasing the snapshot file.
    ///
    /// Waits for every checked-out connection to be returned first.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    #[cfg(test)]
    pub(crate) fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}
