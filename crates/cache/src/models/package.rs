use crate::ids::{ArchId, EvrId, NameId, PkgId, StringId};
use crate::index::MultiMap;
use std::collections::HashMap;
use time::OffsetDateTime;

/// Epoch, version and release of a package build.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Evr {
    pub epoch: i64,
    pub version: String,
    pub release: String,
}

impl Evr {
    pub fn new(epoch: i64, version: impl Into<String>, release: impl Into<String>) -> Self {
        Self { epoch, version: version.into(), release: release.into() }
    }
}

/// Installable identity of a package build: name, EVR and architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nevra {
    pub name_id: NameId,
    pub evr_id: EvrId,
    pub arch_id: ArchId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDetail {
    pub name_id: NameId,
    pub evr_id: EvrId,
    pub arch_id: ArchId,
    pub summary_id: StringId,
    pub description_id: StringId,
    /// Source package this binary package was built from, if known.
    pub source_package_id: Option<PkgId>,
    pub modified: Option<OffsetDateTime>,
}

impl PackageDetail {
    pub fn nevra(&self) -> Nevra {
        Nevra { name_id: self.name_id, evr_id: self.evr_id, arch_id: self.arch_id }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PackageRow {
    pub(crate) id: PkgId,
    pub(crate) name_id: NameId,
    pub(crate) evr_id: EvrId,
    pub(crate) arch_id: ArchId,
    pub(crate) summary_id: StringId,
    pub(crate) description_id: StringId,
    pub(crate) source_package_id: Option<PkgId>,
    pub(crate) modified: Option<OffsetDateTime>,
}
impl From<PackageRow> for (PkgId, PackageDetail) {
    fn from(row: PackageRow) -> Self {
        (
            row.id,
            PackageDetail {
                name_id: row.name_id,
                evr_id: row.evr_id,
                arch_id: row.arch_id,
                summary_id: row.summary_id,
                description_id: row.description_id,
                source_package_id: row.source_package_id,
                modified: row.modified,
            },
        )
    }
}

/// Everything derived from `package_detail` in a single pass.
#[derive(Debug, Default)]
pub(crate) struct Packages {
    pub(crate) details: HashMap<PkgId, PackageDetail>,
    pub(crate) nevras: HashMap<Nevra, PkgId>,
    pub(crate) by_source: MultiMap<PkgId, PkgId>,
}
