use crate::ids::{ErratumId, ModuleStreamId, PkgId};
use crate::index::BiMap;
use std::collections::HashMap;

/// An advisory together with every child relation that references it.
///
/// Child collections are always present; an erratum without, say, any
/// bugzilla references simply has an empty `bugzillas`.
#[derive(Debug, Clone, PartialEq)]
pub struct ErratumDetail {
    pub id: ErratumId,
    pub synopsis: String,
    pub summary: Option<String>,
    /// Advisory type (security, bugfix, enhancement, ...).
    pub kind: String,
    pub severity: Option<String>,
    pub description: Option<String>,
    pub solution: Option<String>,
    pub issued: Option<String>,
    pub updated: Option<String>,
    pub url: String,
    pub third_party: bool,
    pub requires_reboot: bool,
    pub cves: Vec<String>,
    pub pkg_ids: Vec<PkgId>,
    pub module_pkg_ids: Vec<PkgId>,
    pub bugzillas: Vec<String>,
    pub refs: Vec<String>,
    pub modules: Vec<ErratumModule>,
}

/// A module stream an erratum ships packages for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErratumModule {
    pub name: String,
    pub stream_id: ModuleStreamId,
    pub stream: String,
    pub version: String,
    pub context: String,
}

#[derive(sqlx::FromRow)]
pub(crate) struct ErratumModuleRow {
    pub(crate) errata_id: ErratumId,
    pub(crate) module_name: String,
    pub(crate) module_stream_id: ModuleStreamId,
    pub(crate) module_stream: String,
    pub(crate) module_version: String,
    pub(crate) module_context: String,
}
impl From<ErratumModuleRow> for (ErratumId, ErratumModule) {
    fn from(row: ErratumModuleRow) -> Self {
        (
            row.errata_id,
            ErratumModule {
                name: row.module_name,
                stream_id: row.module_stream_id,
                stream: row.module_stream,
                version: row.module_version,
                context: row.module_context,
            },
        )
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ErratumRow {
    pub(crate) id: ErratumId,
    pub(crate) name: String,
    pub(crate) synopsis: String,
    pub(crate) summary: Option<String>,
    pub(crate) kind: String,
    pub(crate) severity: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) solution: Option<String>,
    pub(crate) issued: Option<String>,
    pub(crate) updated: Option<String>,
    pub(crate) url: String,
    pub(crate) third_party: bool,
    pub(crate) requires_reboot: bool,
}

impl ErratumRow {
    /// Split into the erratum name and a detail record with empty child
    /// collections, ready to have them spliced in.
    pub(crate) fn into_detail(self) -> (String, ErratumDetail) {
        (
            self.name,
            ErratumDetail {
                id: self.id,
                synopsis: self.synopsis,
                summary: self.summary,
                kind: self.kind,
                severity: self.severity,
                description: self.description,
                solution: self.solution,
                issued: self.issued,
                updated: self.updated,
                url: self.url,
                third_party: self.third_party,
                requires_reboot: self.requires_reboot,
                cves: Vec::new(),
                pkg_ids: Vec::new(),
                module_pkg_ids: Vec::new(),
                bugzillas: Vec::new(),
                refs: Vec::new(),
                modules: Vec::new(),
            },
        )
    }
}

#[derive(Debug, Default)]
pub(crate) struct Errata {
    pub(crate) details: HashMap<String, ErratumDetail>,
    pub(crate) names: BiMap<ErratumId, String>,
}
