//! In-memory vulnerability metadata cache.
//!
//! This crate reads a read-only SQLite snapshot of the vulnerability
//! database and turns it into a [`Cache`]: an immutable set of indexes over
//! packages, repositories, errata, CVEs, module streams and OVAL rules. The
//! snapshot is the source of truth; a cache is rebuilt from scratch whenever
//! a new snapshot is published and is never written back.
//!
//! # Architecture
//! - [`Snapshot`]: a read-only connection pool over one snapshot file.
//! - Table loaders: one per index (or small group of related indexes), each
//!   producing a private fragment without touching any shared state.
//! - [`Coordinator`]: runs the loaders on a bounded number of tasks, lets only
//!   one build run at a time, and assembles the fragments once every loader
//!   has finished. A single loader failure fails the whole build.
//! - [`Cache`]: the assembled result, handed out as an `Arc<Cache>`.

mod cache;
mod coordinator;
pub mod error;
pub mod ids;
mod index;
mod load;
mod models;
mod snapshot;
#[cfg(test)]
mod testing;

pub use crate::cache::{BuildInfo, Cache, Oval};
pub use crate::coordinator::Coordinator;
pub use crate::models::{
    CriteriaDependency, CveDetail, DbChange, DefinitionDetail, ErratumDetail, ErratumModule, Evr, ModuleStream,
    Nevra, OvalState, OvalTestDetail, PackageDetail, PkgErratum, RepoDetail,
};
pub use crate::snapshot::Snapshot;
