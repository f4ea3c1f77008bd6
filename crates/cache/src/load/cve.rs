use super::grouped;
use crate::error::Result;
use crate::ids::{CveId, ErratumId, PkgId};
use crate::index::BiMap;
use crate::models::{CveRow, Cves};
use crate::snapshot::Snapshot;
use futures::TryStreamExt;
use std::collections::HashMap;

/// CVEs with their CWE, package and erratum relations merged in.
///
/// Erratum links are stored against the CVE name rather than its id, so
/// they are matched up by name.
pub(super) async fn cves(snapshot: &Snapshot) -> Result<Cves> {
    let mut cwes = grouped::<CveId, String>(snapshot, "cve_cwe", include_str!("../../queries/cve_cwe.sql")).await?;
    let mut pkgs = grouped::<CveId, PkgId>(snapshot, "cve_pkg", include_str!("../../queries/cve_pkg.sql")).await?;
    let mut errata =
        grouped::<String, ErratumId>(snapshot, "errata_cve", include_str!("../../queries/cve_errata.sql")).await?;

    let capacity = snapshot.count_distinct("cve_detail", "id").await?;
    let mut cves = Cves { details: HashMap::with_capacity(capacity), names: BiMap::with_capacity(capacity) };
    let mut rows = snapshot.fetch::<CveRow>("cve_detail", include_str!("../../queries/cve_detail.sql"));
    while let Some(row) = rows.try_next().await? {
        let (id, name, mut detail) = row.into_detail();
        cves.names.insert("cve_detail", id, name.clone())?;
        detail.cwes = cwes.remove(&id).unwrap_or_default();
        detail.cwes.sort_unstable();
        detail.pkg_ids = pkgs.remove(&id).unwrap_or_default();
        detail.errata_ids = errata.remove(&name).unwrap_or_default();
        cves.details.insert(name, detail);
    }
    Ok(cves)
}
