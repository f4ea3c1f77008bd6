use crate::error::{ErrorKind, Result};
use crate::models::DbChange;
use crate::snapshot::Snapshot;
use futures::TryStreamExt;

/// The snapshot's single provenance row.
pub(super) async fn db_change(snapshot: &Snapshot) -> Result<DbChange> {
    let mut rows = snapshot.fetch::<DbChange>("dbchange", include_str!("../../queries/dbchange.sql"));
    let Some(change) = rows.try_next().await? else {
        exn::bail!(ErrorKind::EmptyTable("dbchange"));
    };
    if rows.try_next().await?.is_some() {
        exn::bail!(ErrorKind::TooManyRows("dbchange"));
    }
    Ok(change)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    const ROW: &str = r#"
        INSERT INTO dbchange (errata_changes, cve_changes, repository_changes, last_change, exported)
        VALUES ('2024-01-01', '2024-01-02', '2024-01-03', '2024-01-03', '2024-01-04');
    "#;

    #[tokio::test]
    async fn test_single_row() {
        let (_dir, snapshot) = testing::snapshot(ROW).await;
        let change = db_change(&snapshot).await.unwrap();
        assert_eq!(change.cve_changes, "2024-01-02");
        assert_eq!(change.exported, "2024-01-04");
    }

    #[tokio::test]
    async fn test_empty_table() {
        let (_dir, snapshot) = testing::snapshot("").await;
        let err = db_change(&snapshot).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::EmptyTable("dbchange")));
    }

    #[tokio::test]
    async fn test_too_many_rows() {
        let (_dir, snapshot) = testing::snapshot(&format!("{ROW}{ROW}")).await;
        let err = db_change(&snapshot).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::TooManyRows("dbchange")));
    }
}
