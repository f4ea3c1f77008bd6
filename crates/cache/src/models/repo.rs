use crate::ids::{CpeId, ProductId, RepoId};
use crate::index::MultiMap;
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoDetail {
    pub label: String,
    pub name: String,
    pub url: String,
    pub basearch: Option<String>,
    pub releasever: Option<String>,
    pub product: String,
    pub product_id: ProductId,
    pub revision: Option<String>,
    pub third_party: bool,
}

#[derive(sqlx::FromRow)]
pub(crate) struct RepoRow {
    pub(crate) id: RepoId,
    pub(crate) label: String,
    pub(crate) name: String,
    pub(crate) url: String,
    pub(crate) basearch: Option<String>,
    pub(crate) releasever: Option<String>,
    pub(crate) product: String,
    pub(crate) product_id: ProductId,
    pub(crate) revision: Option<String>,
    pub(crate) third_party: bool,
}
impl From<RepoRow> for (RepoId, RepoDetail) {
    fn from(row: RepoRow) -> Self {
        (
            row.id,
            RepoDetail {
                label: row.label,
                name: row.name,
                url: row.url,
                basearch: row.basearch,
                releasever: row.releasever,
                product: row.product,
                product_id: row.product_id,
                revision: row.revision,
                third_party: row.third_party,
            },
        )
    }
}

/// Everything derived from `repo_detail` in a single pass.
#[derive(Debug, Default)]
pub(crate) struct Repos {
    /// Every repository id, in label order.
    pub(crate) ids: Vec<RepoId>,
    pub(crate) details: HashMap<RepoId, RepoDetail>,
    pub(crate) by_label: MultiMap<String, RepoId>,
    /// Keyed by URL path without its trailing separator.
    pub(crate) by_path: MultiMap<String, RepoId>,
    pub(crate) by_product: MultiMap<ProductId, RepoId>,
}

/// Both directions of a CPE link table.
#[derive(Debug)]
pub(crate) struct CpeLinks<K> {
    pub(crate) cpes: MultiMap<K, CpeId>,
    pub(crate) owners: MultiMap<CpeId, K>,
}

impl<K> Default for CpeLinks<K> {
    fn default() -> Self {
        Self { cpes: MultiMap::default(), owners: MultiMap::default() }
    }
}

impl<K: Copy + Eq + Hash> CpeLinks<K> {
    pub(crate) fn push(&mut self, owner: K, cpe: CpeId) {
        self.cpes.push(owner, cpe);
        self.owners.push(cpe, owner);
    }
}
