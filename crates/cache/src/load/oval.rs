//! OVAL rule tables.

use super::{multi_map, point_map};
use crate::error::Result;
use crate::ids::{
    ArchId, CheckExistenceId, CpeId, CriteriaId, CriteriaTypeId, DefinitionId, DefinitionTypeId, EvrId,
    EvrOperationId, ModuleTestId, NameId, OvalStateId, TestId,
};
use crate::index::{MultiMap, insert_unique};
use crate::models::{
    CriteriaDependency, CriteriaDependencyRow, DefinitionDetail, ModuleStream, OvalState,
    OvalTestDetail,
};
use crate::snapshot::Snapshot;
use futures::TryStreamExt;
use std::collections::HashMap;

pub(super) async fn definitions(snapshot: &Snapshot) -> Result<HashMap<DefinitionId, DefinitionDetail>> {
    let mut definitions = HashMap::with_capacity(snapshot.count_distinct("oval_definition_detail", "id").await?);
    let mut rows = snapshot.fetch::<(DefinitionId, DefinitionTypeId, CriteriaId)>(
        "oval_definition_detail",
        include_str!("../../queries/oval_definition_detail.sql"),
    );
    while let Some((id, definition_type, criteria_id)) = rows.try_next().await? {
        insert_unique(&mut definitions, "oval_definition_detail", id, DefinitionDetail { definition_type, criteria_id })?;
    }
    Ok(definitions)
}

pub(super) async fn definition_cves(snapshot: &Snapshot) -> Result<MultiMap<DefinitionId, String>> {
    multi_map(
        snapshot,
        "oval_definition_cve",
        "definition_id",
        include_str!("../../queries/oval_definition_cve.sql"),
    )
    .await
}

pub(super) async fn package_name_definitions(snapshot: &Snapshot) -> Result<MultiMap<NameId, DefinitionId>> {
    multi_map(
        snapshot,
        "packagename_oval_definition",
        "name_id",
        include_str!("../../queries/packagename_oval_definition.sql"),
    )
    .await
}

pub(super) async fn cpe_definitions(snapshot: &Snapshot) -> Result<MultiMap<CpeId, DefinitionId>> {
    multi_map(snapshot, "oval_definition_cpe", "cpe_id", include_str!("../../queries/oval_definition_cpe.sql")).await
}

/// Criteria tree edges. Each row links a parent to at most one child of
/// each kind; absent children (NULL or the exporter's `0` placeholder) are
/// not recorded.
pub(super) async fn criteria_dependencies(snapshot: &Snapshot) -> Result<HashMap<CriteriaId, CriteriaDependency>> {
    let mut dependencies: HashMap<CriteriaId, CriteriaDependency> =
        HashMap::with_capacity(snapshot.count_distinct("oval_criteria_dependency", "parent_criteria_id").await?);
    let mut rows = snapshot.fetch::<CriteriaDependencyRow>(
        "oval_criteria_dependency",
        include_str!("../../queries/oval_criteria_dependency.sql"),
    );
    while let Some((parent, criteria, test, module_test)) = rows.try_next().await? {
        let dependency = dependencies.entry(parent).or_default();
        dependency.criteria.extend(criteria.filter(|id| id.get() != 0));
        dependency.tests.extend(test.filter(|id| id.get() != 0));
        dependency.module_tests.extend(module_test.filter(|id| id.get() != 0));
    }
    Ok(dependencies)
}

pub(super) async fn criteria_types(snapshot: &Snapshot) -> Result<HashMap<CriteriaId, CriteriaTypeId>> {
    point_map(snapshot, "oval_criteria_type", "criteria_id", include_str!("../../queries/oval_criteria_type.sql")).await
}

/// Architectures a state is restricted to. States without rows apply to
/// every architecture.
pub(super) async fn state_arches(snapshot: &Snapshot) -> Result<MultiMap<OvalStateId, ArchId>> {
    multi_map(snapshot, "oval_state_arch", "state_id", include_str!("../../queries/oval_state_arch.sql")).await
}

pub(super) async fn module_tests(snapshot: &Snapshot) -> Result<HashMap<ModuleTestId, ModuleStream>> {
    let mut tests = HashMap::with_capacity(snapshot.count_distinct("oval_module_test_detail", "id").await?);
    let mut rows = snapshot.fetch::<(ModuleTestId, String)>(
        "oval_module_test_detail",
        include_str!("../../queries/oval_module_test_detail.sql"),
    );
    while let Some((id, value)) = rows.try_next().await? {
        let stream = value.parse::<ModuleStream>()?;
        insert_unique(&mut tests, "oval_module_test_detail", id, stream)?;
    }
    Ok(tests)
}

pub(super) async fn tests(snapshot: &Snapshot) -> Result<HashMap<TestId, OvalTestDetail>> {
    let mut tests = HashMap::with_capacity(snapshot.count_distinct("oval_test_detail", "id").await?);
    let mut rows = snapshot.fetch::<(TestId, NameId, CheckExistenceId)>(
        "oval_test_detail",
        include_str!("../../queries/oval_test_detail.sql"),
    );
    while let Some((id, package_name_id, check_existence)) = rows.try_next().await? {
        insert_unique(&mut tests, "oval_test_detail", id, OvalTestDetail { package_name_id, check_existence })?;
    }
    Ok(tests)
}

pub(super) async fn test_states(snapshot: &Snapshot) -> Result<MultiMap<TestId, OvalState>> {
    let mut states = MultiMap::with_capacity(snapshot.count_distinct("oval_test_state", "test_id").await?);
    let mut rows = snapshot.fetch::<(TestId, OvalStateId, EvrId, EvrOperationId)>(
        "oval_test_state",
        include_str!("../../queries/oval_test_state.sql"),
    );
    while let Some((test_id, state_id, evr_id, operation)) = rows.try_next().await? {
        states.push(test_id, OvalState { state_id, evr_id, operation });
    }
    Ok(states)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing;

    #[tokio::test]
    async fn test_criteria_dependencies_skip_absent_children() {
        let (_dir, snapshot) = testing::snapshot(
            r#"
                INSERT INTO oval_criteria_dependency
                    (parent_criteria_id, dep_criteria_id, dep_test_id, dep_module_test_id)
                VALUES
                    (7, NULL, 42, NULL),
                    (7, 8, NULL, NULL),
                    (7, NULL, NULL, 3),
                    (8, NULL, 43, NULL);
                INSERT INTO oval_criteria_type (criteria_id, type_id) VALUES (7, 1), (8, 2);
            "#,
        )
        .await;
        let dependencies = criteria_dependencies(&snapshot).await.unwrap();
        assert_eq!(
            dependencies[&CriteriaId::new(7)],
            CriteriaDependency {
                criteria: vec![CriteriaId::new(8)],
                tests: vec![TestId::new(42)],
                module_tests: vec![ModuleTestId::new(3)],
            }
        );
        assert_eq!(dependencies[&CriteriaId::new(8)].tests, vec![TestId::new(43)]);
        assert!(dependencies[&CriteriaId::new(8)].criteria.is_empty());

        let types = criteria_types(&snapshot).await.unwrap();
        assert_eq!(types[&CriteriaId::new(8)], CriteriaTypeId::new(2));
    }

    #[tokio::test]
    async fn test_criteria_dependencies_skip_zero_placeholders() {
        let (_dir, snapshot) = testing::snapshot(
            r#"
                INSERT INTO oval_criteria_dependency
                    (parent_criteria_id, dep_criteria_id, dep_test_id, dep_module_test_id)
                VALUES (7, 0, 42, 0), (9, 0, 0, 0);
            "#,
        )
        .await;
        let dependencies = criteria_dependencies(&snapshot).await.unwrap();
        assert_eq!(
            dependencies[&CriteriaId::new(7)],
            CriteriaDependency { criteria: vec![], tests: vec![TestId::new(42)], module_tests: vec![] }
        );
        assert_eq!(dependencies[&CriteriaId::new(9)], CriteriaDependency::default());
        assert!(!dependencies.contains_key(&CriteriaId::new(0)));
    }

    #[tokio::test]
    async fn test_definitions_and_links() {
        let (_dir, snapshot) = testing::snapshot(
            r#"
                INSERT INTO oval_definition_detail (id, definition_type_id, criteria_id) VALUES (1, 1, 7), (2, 2, 9);
                INSERT INTO oval_definition_cve (definition_id, cve) VALUES (1, 'CVE-2024-0001'), (1, 'CVE-2024-0002');
                INSERT INTO packagename_oval_definition (name_id, definition_id) VALUES (1, 2), (1, 1);
                INSERT INTO oval_definition_cpe (cpe_id, definition_id) VALUES (7, 1);
            "#,
        )
        .await;
        let definitions = definitions(&snapshot).await.unwrap();
        assert_eq!(definitions[&DefinitionId::new(2)].criteria_id, CriteriaId::new(9));
        let cves = definition_cves(&snapshot).await.unwrap();
        assert_eq!(cves.get(&DefinitionId::new(1)).len(), 2);
        let by_name = package_name_definitions(&snapshot).await.unwrap();
        assert_eq!(by_name.get(&NameId::new(1)), &[DefinitionId::new(1), DefinitionId::new(2)]);
        let by_cpe = cpe_definitions(&snapshot).await.unwrap();
        assert_eq!(by_cpe.get(&CpeId::new(7)), &[DefinitionId::new(1)]);
    }

    #[tokio::test]
    async fn test_tests_and_states() {
        let (_dir, snapshot) = testing::snapshot(
            r#"
                INSERT INTO oval_test_detail (id, package_name_id, check_existence_id) VALUES (42, 1, 2);
                INSERT INTO oval_test_state (test_id, state_id, evr_id, evr_operation_id) VALUES
                    (42, 5, 10, 1), (42, 4, 11, 2);
                INSERT INTO oval_state_arch (state_id, arch_id) VALUES (5, 1), (5, 2);
            "#,
        )
        .await;
        let tests = tests(&snapshot).await.unwrap();
        assert_eq!(
            tests[&TestId::new(42)],
            OvalTestDetail { package_name_id: NameId::new(1), check_existence: CheckExistenceId::new(2) }
        );
        let states = test_states(&snapshot).await.unwrap();
        let states = states.get(&TestId::new(42));
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].state_id, OvalStateId::new(4));
        assert_eq!(states[1].operation, EvrOperationId::new(1));
        let arches = state_arches(&snapshot).await.unwrap();
        assert_eq!(arches.get(&OvalStateId::new(5)), &[ArchId::new(1), ArchId::new(2)]);
        assert!(arches.get(&OvalStateId::new(4)).is_empty());
    }

    #[tokio::test]
    async fn test_module_tests_parse_streams() {
        let (_dir, snapshot) = testing::snapshot(
            "INSERT INTO oval_module_test_detail (id, module_stream) VALUES (1, 'nodejs:18'), (2, 'ruby:2.5');",
        )
        .await;
        let tests = module_tests(&snapshot).await.unwrap();
        assert_eq!(tests[&ModuleTestId::new(1)], ModuleStream::new("nodejs", "18"));
        assert_eq!(tests[&ModuleTestId::new(2)].stream, "2.5");
    }

    #[tokio::test]
    async fn test_module_test_without_separator_fails() {
        let (_dir, snapshot) =
            testing::snapshot("INSERT INTO oval_module_test_detail (id, module_stream) VALUES (1, 'nodejs');").await;
        let err = module_tests(&snapshot).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::MalformedModuleStream(value) if value == "nodejs"));
    }
}
