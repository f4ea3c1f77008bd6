use crate::ids::{
    CheckExistenceId, CriteriaId, DefinitionTypeId, EvrId, EvrOperationId, ModuleTestId, NameId,
    OvalStateId, TestId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefinitionDetail {
    pub definition_type: DefinitionTypeId,
    /// Root of the definition's criteria tree.
    pub criteria_id: CriteriaId,
}

/// Children of one criteria node, split by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriteriaDependency {
    pub criteria: Vec<CriteriaId>,
    pub tests: Vec<TestId>,
    pub module_tests: Vec<ModuleTestId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OvalTestDetail {
    pub package_name_id: NameId,
    pub check_existence: CheckExistenceId,
}

/// One state an OVAL test compares installed packages against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OvalState {
    pub state_id: OvalStateId,
    pub evr_id: EvrId,
    pub operation: EvrOperationId,
}

/// Row of `oval_criteria_dependency`. Exactly one of the child columns is
/// expected to be set, but each is read independently; NULL and `0` both
/// mean absent.
pub(crate) type CriteriaDependencyRow = (CriteriaId, Option<CriteriaId>, Option<TestId>, Option<ModuleTestId>);
