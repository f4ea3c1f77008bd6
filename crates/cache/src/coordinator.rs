//! Bounded, single-flight cache builds.

use crate::cache::{BuildInfo, Cache, CacheBuilder};
use crate::error::{ErrorKind, Result};
use crate::load::Loader;
use crate::snapshot::Snapshot;
use exn::ResultExt;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, instrument};
use vulndb_config::Config;

/// Builds caches from snapshots, one build at a time.
///
/// Concurrent calls to [`load`](Self::load) on the same coordinator queue up
/// in arrival order; independent coordinators never wait on each other.
#[derive(Debug)]
pub struct Coordinator {
    max_concurrency: usize,
    flight: Mutex<()>,
}

impl Coordinator {
    /// `max_concurrency` bounds how many loaders read from the snapshot at
    /// once. Zero is treated as one.
    pub fn new(max_concurrency: usize) -> Self {
        Self { max_concurrency: max_concurrency.max(1), flight: Mutex::new(()) }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Read every index from the snapshot at `path`.
    ///
    /// Either every loader succeeds and a complete cache is returned, or the
    /// first failure is returned and nothing else is. The snapshot is closed
    /// before returning in both cases.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(&self, path: impl AsRef<Path>) -> Result<Arc<Cache>> {
        let path = path.as_ref();
        let _flight = self.flight.lock().await;
        let started = Instant::now();
        let connections = u32::try_from(self.max_concurrency).unwrap_or(u32::MAX);
        let snapshot = Snapshot::open(path, connections).await?;

        let jobs = Loader::ALL.into_iter().map(|loader| {
            let snapshot = snapshot.clone();
            (loader.name(), async move { loader.load(&snapshot).await })
        });
        let completed = run_bounded(jobs, self.max_concurrency).await;
        snapshot.close().await;

        let mut builder = CacheBuilder::default();
        let mut loaders = Vec::with_capacity(Loader::ALL.len());
        for done in completed? {
            loaders.push((done.name, done.elapsed));
            builder.insert(done.output)?;
        }
        let build_info = BuildInfo { path: snapshot.path().to_path_buf(), started, finished: Instant::now(), loaders };
        info!(elapsed = ?build_info.elapsed(), "cache built");
        Ok(Arc::new(builder.finish(build_info)?))
    }
}

impl From<&Config> for Coordinator {
    fn from(config: &Config) -> Self {
        Self::new(config.max_concurrency)
    }
}

/// Output of one job run by [`run_bounded`].
#[derive(Debug)]
pub(crate) struct Completed<T> {
    pub(crate) name: &'static str,
    pub(crate) elapsed: Duration,
    pub(crate) output: T,
}

/// Spawn every job at once, letting at most `limit` of them past the gate
/// at a time, and wait for all of them.
///
/// The first failure aborts whatever is still running and is returned once
/// those tasks have wound down. Results are in completion order.
pub(crate) async fn run_bounded<F, T>(
    jobs: impl IntoIterator<Item = (&'static str, F)>,
    limit: usize,
) -> Result<Vec<Completed<T>>>
where
    F: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let gate = Arc::new(Semaphore::new(limit.max(1)));
    let mut tasks = JoinSet::new();
    for (name, job) in jobs {
        let gate = Arc::clone(&gate);
        tasks.spawn(async move {
            let _permit = gate.acquire_owned().await.or_raise(|| ErrorKind::Coordinator)?;
            let started = Instant::now();
            let output = job.await.or_raise(|| ErrorKind::Loader(name))?;
            let elapsed = started.elapsed();
            debug!(loader = name, ?elapsed, "index loaded");
            Ok::<_, crate::error::Error>(Completed { name, elapsed, output })
        });
    }

    let mut completed = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        match joined.or_raise(|| ErrorKind::Coordinator).and_then(|result| result) {
            Ok(done) => completed.push(done),
            Err(err) => {
                tasks.shutdown().await;
                return Err(err);
            },
        }
    }
    Ok(completed)
}
