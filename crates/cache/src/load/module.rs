use super::multi_map;
use crate::error::Result;
use crate::ids::{ErratumId, ModuleStreamId, PkgId};
use crate::index::MultiMap;
use crate::models::{ModuleStream, PkgErratum};
use crate::snapshot::Snapshot;
use futures::TryStreamExt;

pub(super) async fn package_erratum_modules(snapshot: &Snapshot) -> Result<MultiMap<PkgErratum, ModuleStreamId>> {
    let mut streams = MultiMap::default();
    let mut rows = snapshot.fetch::<(PkgId, ErratumId, ModuleStreamId)>(
        "errata_modulepkg",
        include_str!("../../queries/pkg_errata_module.sql"),
    );
    while let Some((pkg_id, erratum_id, stream_id)) = rows.try_next().await? {
        streams.push(PkgErratum { pkg_id, erratum_id }, stream_id);
    }
    Ok(streams)
}

pub(super) async fn module_streams(snapshot: &Snapshot) -> Result<MultiMap<ModuleStream, ModuleStreamId>> {
    let mut streams = MultiMap::default();
    let mut rows =
        snapshot.fetch::<(String, String, ModuleStreamId)>("module_stream", include_str!("../../queries/module_stream.sql"));
    while let Some((module, stream, stream_id)) = rows.try_next().await? {
        streams.push(ModuleStream { module, stream }, stream_id);
    }
    Ok(streams)
}

pub(super) async fn module_requires(snapshot: &Snapshot) -> Result<MultiMap<ModuleStreamId, ModuleStreamId>> {
    multi_map(
        snapshot,
        "module_stream_require",
        "stream_id",
        include_str!("../../queries/module_stream_require.sql"),
    )
    .await
}
