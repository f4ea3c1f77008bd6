//! Table loaders.
//!
//! Each [`Loader`] reads one table (or a small cluster of tables that only
//! make sense together) and folds the rows into a private [`Fragment`]. A
//! loader never sees the cache under construction, so two loaders cannot
//! write to the same index: ownership is decided by which [`Fragment`]
//! variant a loader returns, and the merge step in
//! [`CacheBuilder`](crate::cache::CacheBuilder) accepts each variant once.

mod cve;
mod dbchange;
mod errata;
mod module;
mod oval;
mod package;
mod repo;

use crate::error::Result;
use crate::ids::{
    ArchId, ContentSetId, CpeId, CriteriaId, CriteriaTypeId, DefinitionId, ErratumId, EvrId, ModuleStreamId,
    ModuleTestId, NameId, OvalStateId, PkgId, RepoId, StringId, TestId,
};
use crate::index::{BiMap, MultiMap, insert_unique};
use crate::models::{
    CpeLinks, CriteriaDependency, Cves, DbChange, DefinitionDetail, Errata, Evr, ModuleStream, OvalState,
    OvalTestDetail, Packages, PkgErratum, Repos,
};
use crate::snapshot::Snapshot;
use futures::TryStreamExt;
use sqlx::FromRow;
use sqlx::sqlite::SqliteRow;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

/// Every table loader. The coordinator runs all of them for each build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Loader {
    PackageNames,
    Updates,
    UpdatesIndex,
    Evrs,
    Archs,
    ArchCompat,
    Packages,
    Repos,
    ContentSets,
    PackageRepos,
    Errata,
    PackageErrata,
    ErratumRepos,
    Cves,
    PackageErratumModules,
    ModuleStreams,
    ModuleRequires,
    DbChange,
    Strings,
    OvalDefinitions,
    OvalDefinitionCves,
    OvalPackageNameDefinitions,
    RepoCpes,
    ContentSetCpes,
    CpeDefinitions,
    CriteriaDependencies,
    CriteriaTypes,
    StateArches,
    ModuleTests,
    Tests,
    TestStates,
}

/// The output of exactly one [`Loader`].
#[derive(Debug)]
pub(crate) enum Fragment {
    PackageNames(BiMap<NameId, String>),
    Updates(MultiMap<NameId, PkgId>),
    UpdatesIndex(HashMap<NameId, MultiMap<EvrId, usize>>),
    Evrs(BiMap<EvrId, Evr>),
    Archs(BiMap<ArchId, String>),
    ArchCompat(HashMap<ArchId, HashSet<ArchId>>),
    Packages(Packages),
    Repos(Repos),
    ContentSets(HashMap<String, ContentSetId>),
    PackageRepos(MultiMap<PkgId, RepoId>),
    Errata(Errata),
    PackageErrata(MultiMap<PkgId, ErratumId>),
    ErratumRepos(HashMap<ErratumId, HashSet<RepoId>>),
    Cves(Cves),
    PackageErratumModules(MultiMap<PkgErratum, ModuleStreamId>),
    ModuleStreams(MultiMap<ModuleStream, ModuleStreamId>),
    ModuleRequires(MultiMap<ModuleStreamId, ModuleStreamId>),
    DbChange(DbChange),
    Strings(HashMap<StringId, String>),
    OvalDefinitions(HashMap<DefinitionId, DefinitionDetail>),
    OvalDefinitionCves(MultiMap<DefinitionId, String>),
    OvalPackageNameDefinitions(MultiMap<NameId, DefinitionId>),
    RepoCpes(CpeLinks<RepoId>),
    ContentSetCpes(CpeLinks<ContentSetId>),
    CpeDefinitions(MultiMap<CpeId, DefinitionId>),
    CriteriaDependencies(HashMap<CriteriaId, CriteriaDependency>),
    CriteriaTypes(HashMap<CriteriaId, CriteriaTypeId>),
    StateArches(MultiMap<OvalStateId, ArchId>),
    ModuleTests(HashMap<ModuleTestId, ModuleStream>),
    Tests(HashMap<TestId, OvalTestDetail>),
    TestStates(MultiMap<TestId, OvalState>),
}

impl Loader {
    pub(crate) const ALL: [Loader; 31] = [
        Self::PackageNames,
        Self::Updates,
        Self::UpdatesIndex,
        Self::Evrs,
        Self::Archs,
        Self::ArchCompat,
        Self::Packages,
        Self::Repos,
        Self::ContentSets,
        Self::PackageRepos,
        Self::Errata,
        Self::PackageErrata,
        Self::ErratumRepos,
        Self::Cves,
        Self::PackageErratumModules,
        Self::ModuleStreams,
        Self::ModuleRequires,
        Self::DbChange,
        Self::Strings,
        Self::OvalDefinitions,
        Self::OvalDefinitionCves,
        Self::OvalPackageNameDefinitions,
        Self::RepoCpes,
        Self::ContentSetCpes,
        Self::CpeDefinitions,
        Self::CriteriaDependencies,
        Self::CriteriaTypes,
        Self::StateArches,
        Self::ModuleTests,
        Self::Tests,
        Self::TestStates,
    ];

    /// Name used in logs, timings and errors.
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::PackageNames => "package_names",
            Self::Updates => "updates",
            Self::UpdatesIndex => "updates_index",
            Self::Evrs => "evrs",
            Self::Archs => "archs",
            Self::ArchCompat => "arch_compat",
            Self::Packages => "packages",
            Self::Repos => "repos",
            Self::ContentSets => "content_sets",
            Self::PackageRepos => "package_repos",
            Self::Errata => "errata",
            Self::PackageErrata => "package_errata",
            Self::ErratumRepos => "erratum_repos",
            Self::Cves => "cves",
            Self::PackageErratumModules => "package_erratum_modules",
            Self::ModuleStreams => "module_streams",
            Self::ModuleRequires => "module_requires",
            Self::DbChange => "db_change",
            Self::Strings => "strings",
            Self::OvalDefinitions => "oval_definitions",
            Self::OvalDefinitionCves => "oval_definition_cves",
            Self::OvalPackageNameDefinitions => "oval_package_name_definitions",
            Self::RepoCpes => "repo_cpes",
            Self::ContentSetCpes => "content_set_cpes",
            Self::CpeDefinitions => "cpe_definitions",
            Self::CriteriaDependencies => "criteria_dependencies",
            Self::CriteriaTypes => "criteria_types",
            Self::StateArches => "state_arches",
            Self::ModuleTests => "module_tests",
            Self::Tests => "tests",
            Self::TestStates => "test_states",
        }
    }

    /// Read this loader's tables and build its fragment.
    pub(crate) async fn load(self, snapshot: &Snapshot) -> Result<Fragment> {
        Ok(match self {
            Self::PackageNames => Fragment::PackageNames(package::names(snapshot).await?),
            Self::Updates => Fragment::Updates(package::updates(snapshot).await?),
            Self::UpdatesIndex => Fragment::UpdatesIndex(package::updates_index(snapshot).await?),
            Self::Evrs => Fragment::Evrs(package::evrs(snapshot).await?),
            Self::Archs => Fragment::Archs(package::archs(snapshot).await?),
            Self::ArchCompat => Fragment::ArchCompat(package::arch_compat(snapshot).await?),
            Self::Packages => Fragment::Packages(package::packages(snapshot).await?),
            Self::Strings => Fragment::Strings(package::strings(snapshot).await?),
            Self::Repos => Fragment::Repos(repo::repos(snapshot).await?),
            Self::ContentSets => Fragment::ContentSets(repo::content_sets(snapshot).await?),
            Self::PackageRepos => Fragment::PackageRepos(repo::package_repos(snapshot).await?),
            Self::RepoCpes => Fragment::RepoCpes(repo::repo_cpes(snapshot).await?),
            Self::ContentSetCpes => Fragment::ContentSetCpes(repo::content_set_cpes(snapshot).await?),
            Self::Errata => Fragment::Errata(errata::errata(snapshot).await?),
            Self::PackageErrata => Fragment::PackageErrata(errata::package_errata(snapshot).await?),
            Self::ErratumRepos => Fragment::ErratumRepos(errata::erratum_repos(snapshot).await?),
            Self::Cves => Fragment::Cves(cve::cves(snapshot).await?),
            Self::PackageErratumModules => {
                Fragment::PackageErratumModules(module::package_erratum_modules(snapshot).await?)
            },
            Self::ModuleStreams => Fragment::ModuleStreams(module::module_streams(snapshot).await?),
            Self::ModuleRequires => Fragment::ModuleRequires(module::module_requires(snapshot).await?),
            Self::DbChange => Fragment::DbChange(dbchange::db_change(snapshot).await?),
            Self::OvalDefinitions => Fragment::OvalDefinitions(oval::definitions(snapshot).await?),
            Self::OvalDefinitionCves => Fragment::OvalDefinitionCves(oval::definition_cves(snapshot).await?),
            Self::OvalPackageNameDefinitions => {
                Fragment::OvalPackageNameDefinitions(oval::package_name_definitions(snapshot).await?)
            },
            Self::CpeDefinitions => Fragment::CpeDefinitions(oval::cpe_definitions(snapshot).await?),
            Self::CriteriaDependencies => Fragment::CriteriaDependencies(oval::criteria_dependencies(snapshot).await?),
            Self::CriteriaTypes => Fragment::CriteriaTypes(oval::criteria_types(snapshot).await?),
            Self::StateArches => Fragment::StateArches(oval::state_arches(snapshot).await?),
            Self::ModuleTests => Fragment::ModuleTests(oval::module_tests(snapshot).await?),
            Self::Tests => Fragment::Tests(oval::tests(snapshot).await?),
            Self::TestStates => Fragment::TestStates(oval::test_states(snapshot).await?),
        })
    }
}

// =========================================================================
// Shared folds
// =========================================================================

/// Fold `(key, value)` rows into an ordered multi-map.
async fn multi_map<K, V>(snapshot: &Snapshot, table: &'static str, key: &'static str, sql: &str) -> Result<MultiMap<K, V>>
where
    K: Eq + Hash,
    (K, V): for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let mut map = MultiMap::with_capacity(snapshot.count_distinct(table, key).await?);
    let mut rows = snapshot.fetch::<(K, V)>(table, sql);
    while let Some((k, v)) = rows.try_next().await? {
        map.push(k, v);
    }
    Ok(map)
}

/// Fold `(key, value)` rows into owned per-key lists, for parents that take
/// their children out one key at a time.
async fn grouped<K, V>(snapshot: &Snapshot, table: &'static str, sql: &str) -> Result<HashMap<K, Vec<V>>>
where
    K: Eq + Hash,
    (K, V): for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let mut map: HashMap<K, Vec<V>> = HashMap::new();
    let mut rows = snapshot.fetch::<(K, V)>(table, sql);
    while let Some((k, v)) = rows.try_next().await? {
        map.entry(k).or_default().push(v);
    }
    Ok(map)
}

/// Fold `(key, value)` rows into a map with one entry per key.
async fn point_map<K, V>(snapshot: &Snapshot, table: &'static str, key: &'static str, sql: &str) -> Result<HashMap<K, V>>
where
    K: Eq + Hash + Debug,
    (K, V): for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let mut map = HashMap::with_capacity(snapshot.count_distinct(table, key).await?);
    let mut rows = snapshot.fetch::<(K, V)>(table, sql);
    while let Some((k, v)) = rows.try_next().await? {
        insert_unique(&mut map, table, k, v)?;
    }
    Ok(map)
}

/// Fold `(id, value)` rows into a validated bijection.
async fn bimap<K, V>(snapshot: &Snapshot, table: &'static str, key: &'static str, sql: &str) -> Result<BiMap<K, V>>
where
    K: Copy + Eq + Hash + Debug,
    V: Clone + Eq + Hash + Debug,
    (K, V): for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let mut map = BiMap::with_capacity(snapshot.count_distinct(table, key).await?);
    let mut rows = snapshot.fetch::<(K, V)>(table, sql);
    while let Some((k, v)) = rows.try_next().await? {
        map.insert(table, k, v)?;
    }
    Ok(map)
}

/// Fold `(key, value)` rows into a map of sets.
async fn set_map<K, V>(
    snapshot: &Snapshot,
    table: &'static str,
    key: &'static str,
    sql: &str,
) -> Result<HashMap<K, HashSet<V>>>
where
    K: Eq + Hash,
    V: Eq + Hash,
    (K, V): for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let mut map: HashMap<K, HashSet<V>> = HashMap::with_capacity(snapshot.count_distinct(table, key).await?);
    let mut rows = snapshot.fetch::<(K, V)>(table, sql);
    while let Some((k, v)) = rows.try_next().await? {
        map.entry(k).or_default().insert(v);
    }
    Ok(map)
}
