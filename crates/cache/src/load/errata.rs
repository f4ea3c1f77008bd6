use super::{grouped, multi_map, set_map};
use crate::error::Result;
use crate::ids::{ErratumId, PkgId, RepoId};
use crate::index::{BiMap, MultiMap};
use crate::models::{Errata, ErratumModule, ErratumModuleRow, ErratumRow};
use crate::snapshot::Snapshot;
use futures::TryStreamExt;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Errata with every child relation merged in.
///
/// Children are read first, one relation after another, so the whole
/// loader only ever holds a single cursor.
pub(super) async fn errata(snapshot: &Snapshot) -> Result<Errata> {
    let mut cves: HashMap<ErratumId, Vec<String>> =
        grouped(snapshot, "errata_cve", include_str!("../../queries/errata_cve.sql")).await?;
    let mut pkgs: HashMap<ErratumId, Vec<PkgId>> =
        grouped(snapshot, "pkg_errata", include_str!("../../queries/errata_pkg.sql")).await?;
    let mut module_pkgs: HashMap<ErratumId, Vec<PkgId>> =
        grouped(snapshot, "errata_modulepkg", include_str!("../../queries/errata_modulepkg.sql")).await?;
    let mut bugzillas: HashMap<ErratumId, Vec<String>> =
        grouped(snapshot, "errata_bugzilla", include_str!("../../queries/errata_bugzilla.sql")).await?;
    let mut refs: HashMap<ErratumId, Vec<String>> =
        grouped(snapshot, "errata_refs", include_str!("../../queries/errata_refs.sql")).await?;
    let mut modules: HashMap<ErratumId, Vec<ErratumModule>> = HashMap::new();
    let mut rows = snapshot.fetch::<ErratumModuleRow>("errata_module", include_str!("../../queries/errata_module.sql"));
    while let Some(row) = rows.try_next().await? {
        let (id, module): (ErratumId, ErratumModule) = row.into();
        modules.entry(id).or_default().push(module);
    }
    drop(rows);

    let capacity = snapshot.count_distinct("errata_detail", "id").await?;
    let mut errata = Errata { details: HashMap::with_capacity(capacity), names: BiMap::with_capacity(capacity) };
    let mut rows = snapshot.fetch::<ErratumRow>("errata_detail", include_str!("../../queries/errata_detail.sql"));
    while let Some(row) = rows.try_next().await? {
        let (name, mut detail) = row.into_detail();
        errata.names.insert("errata_detail", detail.id, name.clone())?;
        detail.cves = cves.remove(&detail.id).unwrap_or_default();
        detail.pkg_ids = pkgs.remove(&detail.id).unwrap_or_default();
        detail.module_pkg_ids = module_pkgs.remove(&detail.id).unwrap_or_default();
        detail.bugzillas = bugzillas.remove(&detail.id).unwrap_or_default();
        detail.refs = refs.remove(&detail.id).unwrap_or_default();
        detail.modules = modules.remove(&detail.id).unwrap_or_default();
        errata.details.insert(name, detail);
    }
    debug!(errata = errata.details.len(), "errata merged");
    Ok(errata)
}

pub(super) async fn package_errata(snapshot: &Snapshot) -> Result<MultiMap<PkgId, ErratumId>> {
    multi_map(snapshot, "pkg_errata", "pkg_id", include_str!("../../queries/pkg_errata.sql")).await
}

pub(super) async fn erratum_repos(snapshot: &Snapshot) -> Result<HashMap<ErratumId, HashSet<RepoId>>> {
    set_map(snapshot, "errata_repo", "errata_id", include_str!("../../queries/errata_repo.sql")).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::ids::ModuleStreamId;
    use crate::testing;

    const ERRATA: &str = r#"
        INSERT INTO errata_detail
            (id, name, synopsis, summary, type, severity, description, solution, issued, updated, url,
             third_party, requires_reboot)
        VALUES
            (1, 'RHSA-2024:0001', 'Important: bash security update', 'summary', 'security', 'Important',
             'desc', 'sol', '2024-01-02', '2024-01-03', 'https://access.example.com/errata/RHSA-2024:0001', 0, 1),
            (2, 'RHBA-2024:0002', 'bash bug fix', NULL, 'bugfix', NULL, NULL, NULL, NULL, NULL,
             'https://access.example.com/errata/RHBA-2024:0002', 1, 0);
        INSERT INTO errata_cve (errata_id, cve) VALUES (1, 'CVE-2024-0002'), (1, 'CVE-2024-0001');
        INSERT INTO pkg_errata (pkg_id, errata_id) VALUES (101, 1), (100, 1), (100, 2);
        INSERT INTO errata_modulepkg (pkg_id, errata_id, module_stream_id) VALUES (500, 1, 77);
        INSERT INTO errata_bugzilla (errata_id, bugzilla) VALUES (1, '2000001');
        INSERT INTO errata_refs (errata_id, ref) VALUES (1, 'https://example.com/ref');
        INSERT INTO errata_module
            (errata_id, module_name, module_stream_id, module_stream, module_version, module_context)
        VALUES (1, 'bash', 77, '5', '8100020240101', 'abcdef12');
    "#;

    #[tokio::test]
    async fn test_errata_merge_children() {
        let (_dir, snapshot) = testing::snapshot(ERRATA).await;
        let errata = errata(&snapshot).await.unwrap();
        assert_eq!(errata.details.len(), 2);

        let security = &errata.details["RHSA-2024:0001"];
        assert_eq!(security.kind, "security");
        assert!(security.requires_reboot);
        assert_eq!(security.cves, vec!["CVE-2024-0001", "CVE-2024-0002"]);
        assert_eq!(security.pkg_ids, vec![PkgId::new(100), PkgId::new(101)]);
        assert_eq!(security.module_pkg_ids, vec![PkgId::new(500)]);
        assert_eq!(security.bugzillas, vec!["2000001"]);
        assert_eq!(security.refs, vec!["https://example.com/ref"]);
        assert_eq!(security.modules.len(), 1);
        assert_eq!(security.modules[0].stream_id, ModuleStreamId::new(77));
        assert_eq!(security.modules[0].context, "abcdef12");

        let bugfix = &errata.details["RHBA-2024:0002"];
        assert!(bugfix.third_party);
        assert!(bugfix.cves.is_empty());
        assert!(bugfix.modules.is_empty());
        assert_eq!(bugfix.pkg_ids, vec![PkgId::new(100)]);

        assert_eq!(errata.names.get(&ErratumId::new(2)).map(String::as_str), Some("RHBA-2024:0002"));
        assert_eq!(errata.names.key_of("RHSA-2024:0001"), Some(ErratumId::new(1)));
    }

    #[tokio::test]
    async fn test_package_errata_and_repos() {
        let (_dir, snapshot) = testing::snapshot(
            r#"
                INSERT INTO pkg_errata (pkg_id, errata_id) VALUES (100, 2), (100, 1), (101, 1);
                INSERT INTO errata_repo (errata_id, repo_id) VALUES (1, 10), (1, 11), (1, 10);
            "#,
        )
        .await;
        let by_package = package_errata(&snapshot).await.unwrap();
        assert_eq!(by_package.get(&PkgId::new(100)), &[ErratumId::new(1), ErratumId::new(2)]);
        let repos = erratum_repos(&snapshot).await.unwrap();
        assert_eq!(repos[&ErratumId::new(1)], HashSet::from([RepoId::new(10), RepoId::new(11)]));
    }

    #[tokio::test]
    async fn test_duplicate_erratum_name_fails() {
        let (_dir, snapshot) = testing::snapshot(
            r#"
                INSERT INTO errata_detail
                    (id, name, synopsis, summary, type, severity, description, solution, issued, updated, url,
                     third_party, requires_reboot)
                VALUES
                    (1, 'RHSA-2024:0001', 's', NULL, 'security', NULL, NULL, NULL, NULL, NULL, 'u', 0, 0),
                    (2, 'RHSA-2024:0001', 's', NULL, 'security', NULL, NULL, NULL, NULL, NULL, 'u', 0, 0);
            "#,
        )
        .await;
        let err = errata(&snapshot).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::DuplicateKey { index: "errata_detail", .. }));
    }
}
