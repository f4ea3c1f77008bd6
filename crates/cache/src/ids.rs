//! Strongly-typed snapshot identifiers.
//!
//! Every table in the snapshot has its own integer id space. Each space gets
//! its own newtype so that, for example, a [`PkgId`] can never be used to look
//! up a repository or be compared against an [`ErratumId`].

use derive_more::{Display, From};

macro_rules! ids {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {$(
        $(#[$meta])*
        #[derive(Debug, Display, From, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type)]
        #[sqlx(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }
    )+};
}

ids! {
    /// Row id of `packagename`.
    NameId,
    /// Row id of `evr`.
    EvrId,
    /// Row id of `arch`.
    ArchId,
    /// Row id of `package_detail`.
    PkgId,
    /// Row id of `repo_detail`.
    RepoId,
    /// Row id of `errata_detail`.
    ErratumId,
    /// Row id of `cve_detail`.
    CveId,
    /// Row id of `content_set`.
    ContentSetId,
    /// Product id carried by repositories.
    ProductId,
    /// Row id of the shared `string` table (package summaries and descriptions).
    StringId,
    /// Numeric id of a module stream.
    ModuleStreamId,
    /// Row id of `oval_definition_detail`.
    DefinitionId,
    /// Opaque OVAL definition type (patch, vulnerability, ...).
    DefinitionTypeId,
    /// CPE id.
    CpeId,
    /// OVAL criteria node id.
    CriteriaId,
    /// Opaque boolean combination of a criteria node (AND/OR).
    CriteriaTypeId,
    /// OVAL test id.
    TestId,
    /// OVAL module test id.
    ModuleTestId,
    /// OVAL state id.
    OvalStateId,
    /// Opaque OVAL existence check mode of a test.
    CheckExistenceId,
    /// Opaque comparison operator applied to an OVAL state EVR.
    EvrOperationId,
}
