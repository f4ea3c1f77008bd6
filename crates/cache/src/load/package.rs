use super::{bimap, multi_map, set_map};
use crate::error::{ErrorKind, Result};
use crate::ids::{ArchId, EvrId, NameId, PkgId, StringId};
use crate::index::{BiMap, MultiMap, insert_unique};
use crate::models::{Evr, PackageDetail, PackageRow, Packages};
use crate::snapshot::Snapshot;
use exn::ResultExt;
use futures::TryStreamExt;
use std::collections::{HashMap, HashSet};
use tracing::debug;

pub(super) async fn names(snapshot: &Snapshot) -> Result<BiMap<NameId, String>> {
    bimap(snapshot, "packagename", "id", include_str!("../../queries/packagename.sql")).await
}

/// Update lineage per package name, in `package_order` order.
pub(super) async fn updates(snapshot: &Snapshot) -> Result<MultiMap<NameId, PkgId>> {
    multi_map(snapshot, "updates", "name_id", include_str!("../../queries/updates.sql")).await
}

/// Positions of every EVR inside its name's lineage.
pub(super) async fn updates_index(snapshot: &Snapshot) -> Result<HashMap<NameId, MultiMap<EvrId, usize>>> {
    let mut index: HashMap<NameId, MultiMap<EvrId, usize>> =
        HashMap::with_capacity(snapshot.count_distinct("updates_index", "name_id").await?);
    let mut rows = snapshot.fetch::<(NameId, EvrId, i64)>("updates_index", include_str!("../../queries/updates_index.sql"));
    while let Some((name_id, evr_id, order)) = rows.try_next().await? {
        let position = usize::try_from(order).or_raise(|| ErrorKind::RowDecode("updates_index"))?;
        index.entry(name_id).or_default().push(evr_id, position);
    }
    Ok(index)
}

pub(super) async fn evrs(snapshot: &Snapshot) -> Result<BiMap<EvrId, Evr>> {
    let mut evrs = BiMap::with_capacity(snapshot.count_distinct("evr", "id").await?);
    let mut rows = snapshot.fetch::<(EvrId, i64, String, String)>("evr", include_str!("../../queries/evr.sql"));
    while let Some((id, epoch, version, release)) = rows.try_next().await? {
        evrs.insert("evr", id, Evr { epoch, version, release })?;
    }
    Ok(evrs)
}

pub(super) async fn archs(snapshot: &Snapshot) -> Result<BiMap<ArchId, String>> {
    bimap(snapshot, "arch", "id", include_str!("../../queries/arch.sql")).await
}

pub(super) async fn arch_compat(snapshot: &Snapshot) -> Result<HashMap<ArchId, HashSet<ArchId>>> {
    set_map(snapshot, "arch_compat", "from_arch_id", include_str!("../../queries/arch_compat.sql")).await
}

/// Package details plus the NEVRA and source-package indexes derived from
/// them in the same pass.
pub(super) async fn packages(snapshot: &Snapshot) -> Result<Packages> {
    let capacity = snapshot.count_distinct("package_detail", "id").await?;
    let mut packages = Packages {
        details: HashMap::with_capacity(capacity),
        nevras: HashMap::with_capacity(capacity),
        by_source: MultiMap::default(),
    };
    let mut rows = snapshot.fetch::<PackageRow>("package_detail", include_str!("../../queries/package_detail.sql"));
    while let Some(row) = rows.try_next().await? {
        let (id, detail): (PkgId, PackageDetail) = row.into();
        insert_unique(&mut packages.nevras, "nevra", detail.nevra(), id)?;
        if let Some(source) = detail.source_package_id {
            packages.by_source.push(source, id);
        }
        insert_unique(&mut packages.details, "package_detail", id, detail)?;
    }
    debug!(packages = packages.details.len(), sources = packages.by_source.len(), "packages indexed");
    Ok(packages)
}

/// Shared string table. Rows with a NULL value are left out.
pub(super) async fn strings(snapshot: &Snapshot) -> Result<HashMap<StringId, String>> {
    let mut strings = HashMap::with_capacity(snapshot.count_distinct("string", "id").await?);
    let mut rows = snapshot.fetch::<(StringId, Option<String>)>("string", include_str!("../../queries/string.sql"));
    while let Some((id, value)) = rows.try_next().await? {
        if let Some(value) = value {
            insert_unique(&mut strings, "string", id, value)?;
        }
    }
    Ok(strings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[tokio::test]
    async fn test_updates_keep_row_order() {
        let (_dir, snapshot) = testing::snapshot(
            r#"
                INSERT INTO updates (name_id, package_id, package_order) VALUES
                    (1, 300, 2), (1, 100, 0), (2, 900, 0), (1, 200, 1);
                INSERT INTO updates_index (name_id, evr_id, package_order) VALUES
                    (1, 30, 2), (1, 10, 0), (1, 10, 1);
            "#,
        )
        .await;
        let updates = updates(&snapshot).await.unwrap();
        assert_eq!(updates.get(&NameId::new(1)), &[PkgId::new(100), PkgId::new(200), PkgId::new(300)]);
        assert_eq!(updates.get(&NameId::new(2)), &[PkgId::new(900)]);
        assert!(updates.get(&NameId::new(3)).is_empty());

        let index = updates_index(&snapshot).await.unwrap();
        assert_eq!(index[&NameId::new(1)].get(&EvrId::new(10)), &[0, 1]);
        assert_eq!(index[&NameId::new(1)].get(&EvrId::new(30)), &[2]);
    }

    #[tokio::test]
    async fn test_negative_update_position_is_rejected() {
        let (_dir, snapshot) =
            testing::snapshot("INSERT INTO updates_index (name_id, evr_id, package_order) VALUES (1, 10, -1);").await;
        let err = updates_index(&snapshot).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::RowDecode("updates_index")));
    }

    #[tokio::test]
    async fn test_evrs_both_directions() {
        let (_dir, snapshot) = testing::snapshot(
            r#"
                INSERT INTO evr (id, epoch, version, release) VALUES
                    (10, 0, '5.1', '1.el8'), (11, 1, '5.1', '1.el8');
            "#,
        )
        .await;
        let evrs = evrs(&snapshot).await.unwrap();
        assert_eq!(evrs.get(&EvrId::new(11)), Some(&Evr::new(1, "5.1", "1.el8")));
        assert_eq!(evrs.key_of(&Evr::new(0, "5.1", "1.el8")), Some(EvrId::new(10)));
    }

    #[tokio::test]
    async fn test_duplicate_package_name_fails() {
        let (_dir, snapshot) =
            testing::snapshot("INSERT INTO packagename (id, packagename) VALUES (1, 'bash'), (2, 'bash');").await;
        let err = names(&snapshot).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::DuplicateKey { index: "packagename", .. }));
    }

    #[tokio::test]
    async fn test_arch_compat_sets() {
        let (_dir, snapshot) = testing::snapshot(
            "INSERT INTO arch_compat (from_arch_id, to_arch_id) VALUES (1, 1), (1, 2), (1, 2), (3, 1);",
        )
        .await;
        let compat = arch_compat(&snapshot).await.unwrap();
        assert_eq!(compat[&ArchId::new(1)], HashSet::from([ArchId::new(1), ArchId::new(2)]));
        assert_eq!(compat[&ArchId::new(3)], HashSet::from([ArchId::new(1)]));
    }

    #[tokio::test]
    async fn test_packages_derive_nevra_and_source_indexes() {
        let (_dir, snapshot) = testing::snapshot(
            r#"
                INSERT INTO package_detail
                    (id, name_id, evr_id, arch_id, summary_id, description_id, source_package_id, modified)
                VALUES
                    (50, 1, 10, 3, 900, 901, NULL, NULL),
                    (100, 1, 10, 1, 900, 901, 50, '2023-04-01T12:00:00Z'),
                    (101, 1, 10, 2, 900, 901, 50, NULL);
            "#,
        )
        .await;
        let packages = packages(&snapshot).await.unwrap();
        assert_eq!(packages.details.len(), 3);
        let detail = &packages.details[&PkgId::new(100)];
        assert_eq!(packages.nevras[&detail.nevra()], PkgId::new(100));
        assert_eq!(packages.by_source.get(&PkgId::new(50)), &[PkgId::new(100), PkgId::new(101)]);
        assert!(detail.modified.is_some());
        assert_eq!(packages.details[&PkgId::new(50)].source_package_id, None);
    }

    #[tokio::test]
    async fn test_duplicate_nevra_fails() {
        let (_dir, snapshot) = testing::snapshot(
            r#"
                INSERT INTO package_detail
                    (id, name_id, evr_id, arch_id, summary_id, description_id, source_package_id, modified)
                VALUES
                    (100, 1, 10, 1, 900, 901, NULL, NULL),
                    (101, 1, 10, 1, 900, 901, NULL, NULL);
            "#,
        )
        .await;
        let err = packages(&snapshot).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::DuplicateKey { index: "nevra", .. }));
    }

    #[tokio::test]
    async fn test_strings_skip_null() {
        let (_dir, snapshot) =
            testing::snapshot("INSERT INTO string (id, string) VALUES (1, 'GNU Bourne Again shell'), (2, NULL);").await;
        let strings = strings(&snapshot).await.unwrap();
        assert_eq!(strings.len(), 1);
        assert_eq!(strings[&StringId::new(1)], "GNU Bourne Again shell");
    }
}
