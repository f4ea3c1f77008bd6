//! The assembled, read-only cache.

use crate::error::{ErrorKind, Result};
use crate::ids::{
    ArchId, ContentSetId, CpeId, CriteriaId, CriteriaTypeId, CveId, DefinitionId, ErratumId, EvrId, ModuleStreamId,
    ModuleTestId, NameId, OvalStateId, PkgId, ProductId, RepoId, StringId, TestId,
};
use crate::index::{BiMap, MultiMap};
use crate::load::Fragment;
use crate::models::{
    CpeLinks, CriteriaDependency, CveDetail, Cves, DbChange, DefinitionDetail, Errata, ErratumDetail, Evr,
    ModuleStream, Nevra, OvalState, OvalTestDetail, PackageDetail, Packages, PkgErratum, RepoDetail, Repos,
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// How and when a [`Cache`] was built.
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub path: PathBuf,
    pub started: Instant,
    pub finished: Instant,
    /// Wall-clock time spent in each loader, in completion order.
    pub loaders: Vec<(&'static str, Duration)>,
}

impl BuildInfo {
    pub fn elapsed(&self) -> Duration {
        self.finished.saturating_duration_since(self.started)
    }
}

/// Every index read from one snapshot.
///
/// A `Cache` is only ever handed out fully built and behind an
/// [`Arc`](std::sync::Arc); nothing can modify it afterwards.
#[derive(Debug)]
pub struct Cache {
    package_names: BiMap<NameId, String>,
    updates: MultiMap<NameId, PkgId>,
    updates_index: HashMap<NameId, MultiMap<EvrId, usize>>,
    evrs: BiMap<EvrId, Evr>,
    archs: BiMap<ArchId, String>,
    arch_compat: HashMap<ArchId, HashSet<ArchId>>,
    packages: Packages,
    repos: Repos,
    content_sets: HashMap<String, ContentSetId>,
    package_repos: MultiMap<PkgId, RepoId>,
    errata: Errata,
    package_errata: MultiMap<PkgId, ErratumId>,
    erratum_repos: HashMap<ErratumId, HashSet<RepoId>>,
    cves: Cves,
    package_erratum_modules: MultiMap<PkgErratum, ModuleStreamId>,
    module_streams: MultiMap<ModuleStream, ModuleStreamId>,
    module_requires: MultiMap<ModuleStreamId, ModuleStreamId>,
    db_change: DbChange,
    strings: HashMap<StringId, String>,
    oval: Oval,
    build_info: BuildInfo,
}

/// OVAL definitions and the criteria/test/state graph they evaluate.
#[derive(Debug)]
pub struct Oval {
    definitions: HashMap<DefinitionId, DefinitionDetail>,
    definition_cves: MultiMap<DefinitionId, String>,
    package_name_definitions: MultiMap<NameId, DefinitionId>,
    repo_cpes: CpeLinks<RepoId>,
    content_set_cpes: CpeLinks<ContentSetId>,
    cpe_definitions: MultiMap<CpeId, DefinitionId>,
    criteria_dependencies: HashMap<CriteriaId, CriteriaDependency>,
    criteria_types: HashMap<CriteriaId, CriteriaTypeId>,
    state_arches: MultiMap<OvalStateId, ArchId>,
    module_tests: HashMap<ModuleTestId, ModuleStream>,
    tests: HashMap<TestId, OvalTestDetail>,
    test_states: MultiMap<TestId, OvalState>,
}

// =========================================================================
// Packages
// =========================================================================

impl Cache {
    pub fn package_name(&self, id: NameId) -> Option<&str> {
        self.package_names.get(&id).map(String::as_str)
    }

    pub fn package_name_id(&self, name: &str) -> Option<NameId> {
        self.package_names.key_of(name)
    }

    pub fn evr(&self, id: EvrId) -> Option<&Evr> {
        self.evrs.get(&id)
    }

    pub fn evr_id(&self, evr: &Evr) -> Option<EvrId> {
        self.evrs.key_of(evr)
    }

    pub fn arch(&self, id: ArchId) -> Option<&str> {
        self.archs.get(&id).map(String::as_str)
    }

    pub fn arch_id(&self, arch: &str) -> Option<ArchId> {
        self.archs.key_of(arch)
    }

    /// Architectures packages built for `arch` may be replaced with.
    pub fn compatible_arches(&self, arch: ArchId) -> Option<&HashSet<ArchId>> {
        self.arch_compat.get(&arch)
    }

    pub fn package(&self, id: PkgId) -> Option<&PackageDetail> {
        self.packages.details.get(&id)
    }

    pub fn package_id(&self, nevra: &Nevra) -> Option<PkgId> {
        self.packages.nevras.get(nevra).copied()
    }

    /// Binary packages built from the source package `source`.
    pub fn binary_packages(&self, source: PkgId) -> &[PkgId] {
        self.packages.by_source.get(&source)
    }

    pub fn string(&self, id: StringId) -> Option<&str> {
        self.strings.get(&id).map(String::as_str)
    }

    /// Every package carrying `name`, oldest first.
    pub fn updates(&self, name: NameId) -> &[PkgId] {
        self.updates.get(&name)
    }

    /// Positions of `evr` within the lineage of `name`.
    pub fn update_positions(&self, name: NameId, evr: EvrId) -> &[usize] {
        self.updates_index.get(&name).map(|index| index.get(&evr)).unwrap_or_default()
    }

    /// Packages of `name` that come after every occurrence of `evr` in the
    /// lineage. Empty if `evr` is not part of it.
    pub fn updates_after(&self, name: NameId, evr: EvrId) -> &[PkgId] {
        let lineage = self.updates(name);
        match self.update_positions(name, evr).iter().max() {
            Some(&last) => lineage.get(last.saturating_add(1)..).unwrap_or_default(),
            None => &[],
        }
    }
}

// =========================================================================
// Repositories
// =========================================================================

impl Cache {
    /// Every repository id, ordered by label.
    pub fn repo_ids(&self) -> &[RepoId] {
        &self.repos.ids
    }

    pub fn repo(&self, id: RepoId) -> Option<&RepoDetail> {
        self.repos.details.get(&id)
    }

    pub fn repos_by_label(&self, label: &str) -> &[RepoId] {
        self.repos.by_label.get(label)
    }

    /// Repositories served from `path`. A trailing `/` on the argument is
    /// ignored, matching how the index is keyed.
    pub fn repos_by_path(&self, path: &str) -> &[RepoId] {
        self.repos.by_path.get(path.trim_end_matches('/'))
    }

    pub fn repos_by_product(&self, product: ProductId) -> &[RepoId] {
        self.repos.by_product.get(&product)
    }

    pub fn content_set_id(&self, label: &str) -> Option<ContentSetId> {
        self.content_sets.get(label).copied()
    }

    /// Content set sharing the repository's label.
    pub fn repo_content_set(&self, repo: RepoId) -> Option<ContentSetId> {
        self.repo(repo).and_then(|detail| self.content_set_id(&detail.label))
    }

    pub fn package_repos(&self, pkg: PkgId) -> &[RepoId] {
        self.package_repos.get(&pkg)
    }
}

// =========================================================================
// Errata and CVEs
// =========================================================================

impl Cache {
    pub fn erratum(&self, name: &str) -> Option<&ErratumDetail> {
        self.errata.details.get(name)
    }

    pub fn erratum_name(&self, id: ErratumId) -> Option<&str> {
        self.errata.names.get(&id).map(String::as_str)
    }

    pub fn erratum_id(&self, name: &str) -> Option<ErratumId> {
        self.errata.names.key_of(name)
    }

    pub fn errata(&self) -> impl Iterator<Item = (&str, &ErratumDetail)> {
        self.errata.details.iter().map(|(name, detail)| (name.as_str(), detail))
    }

    pub fn package_errata(&self, pkg: PkgId) -> &[ErratumId] {
        self.package_errata.get(&pkg)
    }

    pub fn erratum_repos(&self, erratum: ErratumId) -> Option<&HashSet<RepoId>> {
        self.erratum_repos.get(&erratum)
    }

    pub fn cve(&self, name: &str) -> Option<&CveDetail> {
        self.cves.details.get(name)
    }

    pub fn cve_name(&self, id: CveId) -> Option<&str> {
        self.cves.names.get(&id).map(String::as_str)
    }

    pub fn cve_id(&self, name: &str) -> Option<CveId> {
        self.cves.names.key_of(name)
    }

    pub fn cves(&self) -> impl Iterator<Item = (&str, &CveDetail)> {
        self.cves.details.iter().map(|(name, detail)| (name.as_str(), detail))
    }
}

// =========================================================================
// Modules, provenance and OVAL
// =========================================================================

impl Cache {
    /// Module streams `pkg` ships in as part of `erratum`.
    pub fn package_erratum_modules(&self, pkg: PkgId, erratum: ErratumId) -> &[ModuleStreamId] {
        self.package_erratum_modules.get(&PkgErratum { pkg_id: pkg, erratum_id: erratum })
    }

    pub fn module_stream_ids(&self, stream: &ModuleStream) -> &[ModuleStreamId] {
        self.module_streams.get(stream)
    }

    pub fn module_requires(&self, stream: ModuleStreamId) -> &[ModuleStreamId] {
        self.module_requires.get(&stream)
    }

    pub fn db_change(&self) -> &DbChange {
        &self.db_change
    }

    pub fn oval(&self) -> &Oval {
        &self.oval
    }

    pub fn build_info(&self) -> &BuildInfo {
        &self.build_info
    }

    pub fn path(&self) -> &Path {
        &self.build_info.path
    }
}

impl Oval {
    pub fn definition(&self, id: DefinitionId) -> Option<&DefinitionDetail> {
        self.definitions.get(&id)
    }

    pub fn definition_cves(&self, id: DefinitionId) -> &[String] {
        self.definition_cves.get(&id)
    }

    /// Definitions that may apply to packages called `name`.
    pub fn package_name_definitions(&self, name: NameId) -> &[DefinitionId] {
        self.package_name_definitions.get(&name)
    }

    pub fn repo_cpes(&self, repo: RepoId) -> &[CpeId] {
        self.repo_cpes.cpes.get(&repo)
    }

    pub fn cpe_repos(&self, cpe: CpeId) -> &[RepoId] {
        self.repo_cpes.owners.get(&cpe)
    }

    pub fn content_set_cpes(&self, content_set: ContentSetId) -> &[CpeId] {
        self.content_set_cpes.cpes.get(&content_set)
    }

    pub fn cpe_content_sets(&self, cpe: CpeId) -> &[ContentSetId] {
        self.content_set_cpes.owners.get(&cpe)
    }

    pub fn cpe_definitions(&self, cpe: CpeId) -> &[DefinitionId] {
        self.cpe_definitions.get(&cpe)
    }

    pub fn criteria_dependency(&self, criteria: CriteriaId) -> Option<&CriteriaDependency> {
        self.criteria_dependencies.get(&criteria)
    }

    pub fn criteria_type(&self, criteria: CriteriaId) -> Option<CriteriaTypeId> {
        self.criteria_types.get(&criteria).copied()
    }

    pub fn test(&self, id: TestId) -> Option<&OvalTestDetail> {
        self.tests.get(&id)
    }

    pub fn test_states(&self, id: TestId) -> &[OvalState] {
        self.test_states.get(&id)
    }

    /// Architectures `state` is restricted to; empty means any.
    pub fn state_arches(&self, state: OvalStateId) -> &[ArchId] {
        self.state_arches.get(&state)
    }

    pub fn module_test(&self, id: ModuleTestId) -> Option<&ModuleStream> {
        self.module_tests.get(&id)
    }
}

// =========================================================================
// Assembly
// =========================================================================

/// Collects loader fragments and assembles them into a [`Cache`].
///
/// Each slot accepts exactly one fragment, so no two loaders can ever
/// contribute to the same index.
#[derive(Debug, Default)]
pub(crate) struct CacheBuilder {
    package_names: Option<BiMap<NameId, String>>,
    updates: Option<MultiMap<NameId, PkgId>>,
    updates_index: Option<HashMap<NameId, MultiMap<EvrId, usize>>>,
    evrs: Option<BiMap<EvrId, Evr>>,
    archs: Option<BiMap<ArchId, String>>,
    arch_compat: Option<HashMap<ArchId, HashSet<ArchId>>>,
    packages: Option<Packages>,
    repos: Option<Repos>,
    content_sets: Option<HashMap<String, ContentSetId>>,
    package_repos: Option<MultiMap<PkgId, RepoId>>,
    errata: Option<Errata>,
    package_errata: Option<MultiMap<PkgId, ErratumId>>,
    erratum_repos: Option<HashMap<ErratumId, HashSet<RepoId>>>,
    cves: Option<Cves>,
    package_erratum_modules: Option<MultiMap<PkgErratum, ModuleStreamId>>,
    module_streams: Option<MultiMap<ModuleStream, ModuleStreamId>>,
    module_requires: Option<MultiMap<ModuleStreamId, ModuleStreamId>>,
    db_change: Option<DbChange>,
    strings: Option<HashMap<StringId, String>>,
    definitions: Option<HashMap<DefinitionId, DefinitionDetail>>,
    definition_cves: Option<MultiMap<DefinitionId, String>>,
    package_name_definitions: Option<MultiMap<NameId, DefinitionId>>,
    repo_cpes: Option<CpeLinks<RepoId>>,
    content_set_cpes: Option<CpeLinks<ContentSetId>>,
    cpe_definitions: Option<MultiMap<CpeId, DefinitionId>>,
    criteria_dependencies: Option<HashMap<CriteriaId, CriteriaDependency>>,
    criteria_types: Option<HashMap<CriteriaId, CriteriaTypeId>>,
    state_arches: Option<MultiMap<OvalStateId, ArchId>>,
    module_tests: Option<HashMap<ModuleTestId, ModuleStream>>,
    tests: Option<HashMap<TestId, OvalTestDetail>>,
    test_states: Option<MultiMap<TestId, OvalState>>,
}

fn fill<T>(slot: &mut Option<T>, name: &'static str, value: T) -> Result<()> {
    if slot.is_some() {
        exn::bail!(ErrorKind::DuplicateIndex(name));
    }
    *slot = Some(value);
    Ok(())
}

fn take<T>(slot: Option<T>, name: &'static str) -> Result<T> {
    match slot {
        Some(value) => Ok(value),
        None => exn::bail!(ErrorKind::MissingIndex(name)),
    }
}

impl CacheBuilder {
    pub(crate) fn insert(&mut self, fragment: Fragment) -> Result<()> {
        match fragment {
            Fragment::PackageNames(v) => fill(&mut self.package_names, "package_names", v),
            Fragment::Updates(v) => fill(&mut self.updates, "updates", v),
            Fragment::UpdatesIndex(v) => fill(&mut self.updates_index, "updates_index", v),
            Fragment::Evrs(v) => fill(&mut self.evrs, "evrs", v),
            Fragment::Archs(v) => fill(&mut self.archs, "archs", v),
            Fragment::ArchCompat(v) => fill(&mut self.arch_compat, "arch_compat", v),
            Fragment::Packages(v) => fill(&mut self.packages, "packages", v),
            Fragment::Repos(v) => fill(&mut self.repos, "repos", v),
            Fragment::ContentSets(v) => fill(&mut self.content_sets, "content_sets", v),
            Fragment::PackageRepos(v) => fill(&mut self.package_repos, "package_repos", v),
            Fragment::Errata(v) => fill(&mut self.errata, "errata", v),
            Fragment::PackageErrata(v) => fill(&mut self.package_errata, "package_errata", v),
            Fragment::ErratumRepos(v) => fill(&mut self.erratum_repos, "erratum_repos", v),
            Fragment::Cves(v) => fill(&mut self.cves, "cves", v),
            Fragment::PackageErratumModules(v) => {
                fill(&mut self.package_erratum_modules, "package_erratum_modules", v)
            },
            Fragment::ModuleStreams(v) => fill(&mut self.module_streams, "module_streams", v),
            Fragment::ModuleRequires(v) => fill(&mut self.module_requires, "module_requires", v),
            Fragment::DbChange(v) => fill(&mut self.db_change, "db_change", v),
            Fragment::Strings(v) => fill(&mut self.strings, "strings", v),
            Fragment::OvalDefinitions(v) => fill(&mut self.definitions, "oval_definitions", v),
            Fragment::OvalDefinitionCves(v) => fill(&mut self.definition_cves, "oval_definition_cves", v),
            Fragment::OvalPackageNameDefinitions(v) => {
                fill(&mut self.package_name_definitions, "oval_package_name_definitions", v)
            },
            Fragment::RepoCpes(v) => fill(&mut self.repo_cpes, "repo_cpes", v),
            Fragment::ContentSetCpes(v) => fill(&mut self.content_set_cpes, "content_set_cpes", v),
            Fragment::CpeDefinitions(v) => fill(&mut self.cpe_definitions, "cpe_definitions", v),
            Fragment::CriteriaDependencies(v) => fill(&mut self.criteria_dependencies, "criteria_dependencies", v),
            Fragment::CriteriaTypes(v) => fill(&mut self.criteria_types, "criteria_types", v),
            Fragment::StateArches(v) => fill(&mut self.state_arches, "state_arches", v),
            Fragment::ModuleTests(v) => fill(&mut self.module_tests, "module_tests", v),
            Fragment::Tests(v) => fill(&mut self.tests, "tests", v),
            Fragment::TestStates(v) => fill(&mut self.test_states, "test_states", v),
        }
    }

    /// Assemble the cache. Fails if any index never arrived.
    pub(crate) fn finish(self, build_info: BuildInfo) -> Result<Cache> {
        let oval = Oval {
            definitions: take(self.definitions, "oval_definitions")?,
            definition_cves: take(self.definition_cves, "oval_definition_cves")?,
            package_name_definitions: take(self.package_name_definitions, "oval_package_name_definitions")?,
            repo_cpes: take(self.repo_cpes, "repo_cpes")?,
            content_set_cpes: take(self.content_set_cpes, "content_set_cpes")?,
            cpe_definitions: take(self.cpe_definitions, "cpe_definitions")?,
            criteria_dependencies: take(self.criteria_dependencies, "criteria_dependencies")?,
            criteria_types: take(self.criteria_types, "criteria_types")?,
            state_arches: take(self.state_arches, "state_arches")?,
            module_tests: take(self.module_tests, "module_tests")?,
            tests: take(self.tests, "tests")?,
            test_states: take(self.test_states, "test_states")?,
        };
        Ok(Cache {
            package_names: take(self.package_names, "package_names")?,
            updates: take(self.updates, "updates")?,
            updates_index: take(self.updates_index, "updates_index")?,
            evrs: take(self.evrs, "evrs")?,
            archs: take(self.archs, "archs")?,
            arch_compat: take(self.arch_compat, "arch_compat")?,
            packages: take(self.packages, "packages")?,
            repos: take(self.repos, "repos")?,
            content_sets: take(self.content_sets, "content_sets")?,
            package_repos: take(self.package_repos, "package_repos")?,
            errata: take(self.errata, "errata")?,
            package_errata: take(self.package_errata, "package_errata")?,
            erratum_repos: take(self.erratum_repos, "erratum_repos")?,
            cves: take(self.cves, "cves")?,
            package_erratum_modules: take(self.package_erratum_modules, "package_erratum_modules")?,
            module_streams: take(self.module_streams, "module_streams")?,
            module_requires: take(self.module_requires, "module_requires")?,
            db_change: take(self.db_change, "db_change")?,
            strings: take(self.strings, "strings")?,
            oval,
            build_info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::Loader;
    use crate::testing;

    fn build_info() -> BuildInfo {
        let now = Instant::now();
        BuildInfo { path: PathBuf::from("test.db"), started: now, finished: now, loaders: Vec::new() }
    }

    async fn build(sql: &str) -> Cache {
        let (_dir, snapshot) = testing::snapshot(sql).await;
        let mut builder = CacheBuilder::default();
        for loader in Loader::ALL {
            builder.insert(loader.load(&snapshot).await.unwrap()).unwrap();
        }
        builder.finish(build_info()).unwrap()
    }

    #[test]
    fn test_second_fragment_for_a_slot_is_rejected() {
        let mut builder = CacheBuilder::default();
        builder.insert(Fragment::Updates(MultiMap::default())).unwrap();
        let err = builder.insert(Fragment::Updates(MultiMap::default())).unwrap_err();
        assert!(matches!(&*err, ErrorKind::DuplicateIndex("updates")));
    }

    #[test]
    fn test_unfilled_slot_is_reported() {
        let err = CacheBuilder::default().finish(build_info()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::MissingIndex(_)));
    }

    #[tokio::test]
    async fn test_updates_after_latest_position() {
        let cache = build(
            r#"
                INSERT INTO updates (name_id, package_id, package_order) VALUES
                    (1, 100, 0), (1, 101, 1), (1, 102, 2), (1, 103, 3);
                INSERT INTO updates_index (name_id, evr_id, package_order) VALUES
                    (1, 10, 0), (1, 11, 1), (1, 11, 2), (1, 12, 3);
                INSERT INTO dbchange (errata_changes, cve_changes, repository_changes, last_change, exported)
                VALUES ('a', 'b', 'c', 'd', 'e');
            "#,
        )
        .await;
        let bash = NameId::new(1);
        assert_eq!(cache.updates_after(bash, EvrId::new(10)), &[PkgId::new(101), PkgId::new(102), PkgId::new(103)]);
        assert_eq!(cache.updates_after(bash, EvrId::new(11)), &[PkgId::new(103)]);
        assert!(cache.updates_after(bash, EvrId::new(12)).is_empty());
        assert!(cache.updates_after(bash, EvrId::new(99)).is_empty());
        assert!(cache.updates_after(NameId::new(2), EvrId::new(10)).is_empty());
        assert_eq!(cache.update_positions(bash, EvrId::new(11)), &[1, 2]);
    }

    #[tokio::test]
    async fn test_repo_content_set_and_path_lookup() {
        let cache = build(
            r#"
                INSERT INTO repo_detail
                    (id, label, name, url, basearch, releasever, product, product_id, revision, third_party)
                VALUES (1, 'rhel-8-baseos', 'BaseOS', 'https://cdn.example.com/repo/os/', 'x86_64', '8', 'RHEL', 1, NULL, 0);
                INSERT INTO content_set (id, label) VALUES (5, 'rhel-8-baseos');
                INSERT INTO dbchange (errata_changes, cve_changes, repository_changes, last_change, exported)
                VALUES ('a', 'b', 'c', 'd', 'e');
            "#,
        )
        .await;
        assert_eq!(cache.repo_content_set(RepoId::new(1)), Some(ContentSetId::new(5)));
        assert_eq!(cache.repos_by_path("/repo/os/"), &[RepoId::new(1)]);
        assert_eq!(cache.repos_by_path("/repo/os"), &[RepoId::new(1)]);
        assert!(cache.repo_content_set(RepoId::new(2)).is_none());
    }

    #[tokio::test]
    async fn test_seeded_accessors() {
        let cache = build(testing::SEED).await;

        let bash = cache.package_name_id("bash").unwrap();
        let x86_64 = cache.arch_id("x86_64").unwrap();
        let evr = cache.evr_id(&Evr::new(0, "4.4.20", "1.el8")).unwrap();
        let pkg = cache.package_id(&Nevra { name_id: bash, evr_id: evr, arch_id: x86_64 }).unwrap();
        assert_eq!(pkg, PkgId::new(102));
        let detail = cache.package(pkg).unwrap();
        assert_eq!(cache.string(detail.summary_id), Some("The GNU Bourne Again shell"));
        assert_eq!(detail.source_package_id, Some(PkgId::new(50)));
        assert_eq!(cache.binary_packages(PkgId::new(50)), &[pkg]);
        assert!(cache.string(StringId::new(902)).is_none());
        assert!(cache.compatible_arches(x86_64).unwrap().contains(&ArchId::new(2)));

        let erratum = cache.package_errata(pkg)[0];
        assert_eq!(cache.erratum_name(erratum), Some("RHSA-2024:0001"));
        assert!(cache.erratum_repos(erratum).unwrap().contains(&RepoId::new(1)));
        assert_eq!(cache.package_repos(pkg), &[RepoId::new(1)]);
        let cve = cache.cve("CVE-2024-0001").unwrap();
        assert_eq!(cve.cwes, vec!["CWE-20", "CWE-787"]);
        assert_eq!(cve.errata_ids, vec![erratum]);
        assert_eq!(cache.cve_name(CveId::new(1)), Some("CVE-2024-0001"));

        let nodejs = cache.module_stream_ids(&ModuleStream::new("nodejs", "18"));
        assert_eq!(nodejs, &[ModuleStreamId::new(30)]);
        assert_eq!(cache.module_requires(nodejs[0]), &[ModuleStreamId::new(40)]);
        assert_eq!(cache.package_erratum_modules(PkgId::new(200), ErratumId::new(2)), nodejs);
        assert_eq!(cache.erratum("RHEA-2024:0002").unwrap().modules[0].version, "8090020240101000000");

        let oval = cache.oval();
        let definition = oval.package_name_definitions(bash)[0];
        let root = oval.definition(definition).unwrap().criteria_id;
        let dependency = oval.criteria_dependency(root).unwrap();
        assert_eq!(dependency.criteria, vec![CriteriaId::new(101)]);
        assert_eq!(oval.module_test(dependency.module_tests[0]), Some(&ModuleStream::new("nodejs", "18")));
        let test = oval.criteria_dependency(CriteriaId::new(101)).unwrap().tests[0];
        assert_eq!(oval.test(test).unwrap().package_name_id, bash);
        let state = oval.test_states(test)[0];
        assert_eq!(state.evr_id, evr);
        assert_eq!(oval.state_arches(state.state_id), &[x86_64]);
        assert_eq!(oval.criteria_type(root), Some(CriteriaTypeId::new(1)));
        assert_eq!(oval.definition_cves(definition), &["CVE-2024-0001".to_string()]);
        assert_eq!(oval.cpe_definitions(CpeId::new(7)), &[definition]);
        assert_eq!(oval.repo_cpes(RepoId::new(1)), &[CpeId::new(7)]);
        assert_eq!(oval.cpe_content_sets(CpeId::new(8)), &[ContentSetId::new(2)]);
        assert_eq!(cache.repo_content_set(RepoId::new(2)), Some(ContentSetId::new(2)));
        assert_eq!(cache.repos_by_path("/content/dist/rhel8/8/x86_64/baseos/os"), &[RepoId::new(1)]);
        assert_eq!(cache.repos_by_product(ProductId::new(1)).len(), 2);
    }
}
