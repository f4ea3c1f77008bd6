use super::multi_map;
use crate::error::Result;
use crate::ids::{ContentSetId, CpeId, PkgId, RepoId};
use crate::index::{MultiMap, insert_unique};
use crate::models::{CpeLinks, RepoDetail, RepoRow, Repos};
use crate::snapshot::Snapshot;
use futures::TryStreamExt;
use sqlx::FromRow;
use sqlx::sqlite::SqliteRow;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::{debug, warn};
use url::{ParseError, Url};

/// Path component of a repository URL, percent-decoded and without its
/// trailing separator. Dot segments are kept as written.
///
/// Relative references are used as-is. Returns `None` for URLs that cannot
/// serve as a path key: empty, with an invalid authority or escape, or
/// decoding to something other than UTF-8.
fn url_path(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }
    let reference = url.split(['?', '#']).next().unwrap_or_default();
    let hierarchical = match Url::parse(url) {
        Ok(_) => reference.split_once(':')?.1,
        Err(ParseError::RelativeUrlWithoutBase) => reference,
        Err(_) => return None,
    };
    let raw = match hierarchical.strip_prefix("//") {
        Some(authority) => authority.find('/').map_or("", |start| &authority[start..]),
        None => hierarchical,
    };
    if !has_valid_escapes(raw) {
        return None;
    }
    let path = urlencoding::decode(raw).ok()?;
    Some(path.trim_end_matches('/').to_string())
}

/// Every `%` starts a two digit hexadecimal escape.
fn has_valid_escapes(path: &str) -> bool {
    path.split('%').skip(1).all(|escape| escape.len() >= 2 && escape.as_bytes()[..2].iter().all(u8::is_ascii_hexdigit))
}

pub(super) async fn repos(snapshot: &Snapshot) -> Result<Repos> {
    let capacity = snapshot.count_distinct("repo_detail", "id").await?;
    let mut repos = Repos {
        ids: Vec::with_capacity(capacity),
        details: HashMap::with_capacity(capacity),
        by_label: MultiMap::with_capacity(capacity),
        by_path: MultiMap::with_capacity(capacity),
        by_product: MultiMap::default(),
    };
    let mut rows = snapshot.fetch::<RepoRow>("repo_detail", include_str!("../../queries/repo_detail.sql"));
    while let Some(row) = rows.try_next().await? {
        let (id, detail): (RepoId, RepoDetail) = row.into();
        repos.ids.push(id);
        repos.by_label.push(detail.label.clone(), id);
        repos.by_product.push(detail.product_id, id);
        match url_path(&detail.url) {
            Some(path) => repos.by_path.push(path, id),
            None if detail.url.is_empty() => {},
            None => warn!(repo = %id, url = %detail.url, "repository url is not usable as a path key"),
        }
        insert_unique(&mut repos.details, "repo_detail", id, detail)?;
    }
    debug!(repos = repos.ids.len(), paths = repos.by_path.len(), "repositories indexed");
    Ok(repos)
}

pub(super) async fn content_sets(snapshot: &Snapshot) -> Result<HashMap<String, ContentSetId>> {
    let mut labels = HashMap::with_capacity(snapshot.count_distinct("content_set", "id").await?);
    let mut rows = snapshot.fetch::<(ContentSetId, String)>("content_set", include_str!("../../queries/content_set.sql"));
    while let Some((id, label)) = rows.try_next().await? {
        insert_unique(&mut labels, "content_set", label, id)?;
    }
    Ok(labels)
}

pub(super) async fn package_repos(snapshot: &Snapshot) -> Result<MultiMap<PkgId, RepoId>> {
    multi_map(snapshot, "pkg_repo", "pkg_id", include_str!("../../queries/pkg_repo.sql")).await
}

pub(super) async fn repo_cpes(snapshot: &Snapshot) -> Result<CpeLinks<RepoId>> {
    cpe_links(snapshot, "cpe_repo", include_str!("../../queries/cpe_repo.sql")).await
}

pub(super) async fn content_set_cpes(snapshot: &Snapshot) -> Result<CpeLinks<ContentSetId>> {
    cpe_links(snapshot, "cpe_content_set", include_str!("../../queries/cpe_content_set.sql")).await
}

async fn cpe_links<K>(snapshot: &Snapshot, table: &'static str, sql: &str) -> Result<CpeLinks<K>>
where
    K: Copy + Eq + Hash,
    (K, CpeId): for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let mut links = CpeLinks::default();
    let mut rows = snapshot.fetch::<(K, CpeId)>(table, sql);
    while let Some((owner, cpe)) = rows.try_next().await? {
        links.push(owner, cpe);
    }
    Ok(links)
}
