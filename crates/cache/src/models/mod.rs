mod cve;
mod dbchange;
mod errata;
mod module;
mod oval;
mod package;
mod repo;

pub use self::cve::CveDetail;
pub(crate) use self::cve::{CveRow, Cves};
pub use self::dbchange::DbChange;
pub use self::errata::{ErratumDetail, ErratumModule};
pub(crate) use self::errata::{Errata, ErratumModuleRow, ErratumRow};
pub use self::module::{ModuleStream, PkgErratum};
pub use self::oval::{CriteriaDependency, DefinitionDetail, OvalState, OvalTestDetail};
pub(crate) use self::oval::CriteriaDependencyRow;
pub use self::package::{Evr, Nevra, PackageDetail};
pub(crate) use self::package::{PackageRow, Packages};
pub use self::repo::RepoDetail;
pub(crate) use self::repo::{CpeLinks, RepoRow, Repos};
