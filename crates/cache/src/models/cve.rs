use crate::ids::{CveId, ErratumId, PkgId};
use crate::index::BiMap;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct CveDetail {
    pub redhat_url: Option<String>,
    pub secondary_url: Option<String>,
    pub cvss3_score: Option<String>,
    pub cvss3_metrics: Option<String>,
    pub impact: String,
    pub published_date: Option<String>,
    pub modified_date: Option<String>,
    pub iava: Option<String>,
    pub description: String,
    pub cvss2_score: Option<String>,
    pub cvss2_metrics: Option<String>,
    pub source: String,
    /// CWE identifiers, sorted ascending.
    pub cwes: Vec<String>,
    pub pkg_ids: Vec<PkgId>,
    pub errata_ids: Vec<ErratumId>,
}

#[derive(sqlx::FromRow)]
pub(crate) struct CveRow {
    pub(crate) id: CveId,
    pub(crate) name: String,
    pub(crate) redhat_url: Option<String>,
    pub(crate) secondary_url: Option<String>,
    pub(crate) cvss3_score: Option<String>,
    pub(crate) cvss3_metrics: Option<String>,
    pub(crate) impact: String,
    pub(crate) published_date: Option<String>,
    pub(crate) modified_date: Option<String>,
    pub(crate) iava: Option<String>,
    pub(crate) description: String,
    pub(crate) cvss2_score: Option<String>,
    pub(crate) cvss2_metrics: Option<String>,
    pub(crate) source: String,
}

impl CveRow {
    pub(crate) fn into_detail(self) -> (CveId, String, CveDetail) {
        (
            self.id,
            self.name,
            CveDetail {
                redhat_url: self.redhat_url,
                secondary_url: self.secondary_url,
                cvss3_score: self.cvss3_score,
                cvss3_metrics: self.cvss3_metrics,
                impact: self.impact,
                published_date: self.published_date,
                modified_date: self.modified_date,
                iava: self.iava,
                description: self.description,
                cvss2_score: self.cvss2_score,
                cvss2_metrics: self.cvss2_metrics,
                source: self.source,
                cwes: Vec::new(),
                pkg_ids: Vec::new(),
                errata_ids: Vec::new(),
            },
        )
    }
}

#[derive(Debug, Default)]
pub(crate) struct Cves {
    pub(crate) details: HashMap<String, CveDetail>,
    pub(crate) names: BiMap<CveId, String>,
}
