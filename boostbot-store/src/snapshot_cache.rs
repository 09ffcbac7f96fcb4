//! Snapshot cache with join-on-inflight.
//!
//! At most one fetch runs at a time. Callers arriving while it runs wait
//! for that fetch and receive the same [`CardSnapshot`]. The fetch runs on
//! its own task, so callers going away never abandon it. A finished
//! snapshot is served again for a short cool-down window unless its status
//! calls for an immediate retry.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use boostbot_core::{CardSnapshot, SnapshotSource, SnapshotStatus};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

type InflightFetch = Shared<BoxFuture<'static, Arc<CardSnapshot>>>;

// ============================================================================
// Inner State
// ============================================================================

/// Internal state for the cache.
#[derive(Default)]
struct CacheInner {
    /// Fetch currently running, tagged with its generation.
    inflight: Option<(u64, InflightFetch)>,
    /// Last completed snapshot and when it completed.
    last: Option<(Instant, Arc<CardSnapshot>)>,
    /// Generation of the most recently started fetch.
    generation: u64,
}

/// Counters for how requests were served.
#[derive(Debug, Default)]
struct Counters {
    fetches: AtomicU64,
    joins: AtomicU64,
    reuses: AtomicU64,
}

/// Point-in-time copy of the cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Fetches started.
    pub fetches: u64,
    /// Requests that joined a running fetch.
    pub joins: u64,
    /// Requests served from the cool-down window.
    pub reuses: u64,
}

// ============================================================================
// Snapshot Cache
// ============================================================================

/// Serializes snapshot fetches from one source.
pub struct SnapshotCache<S: SnapshotSource> {
    source: Arc<Mutex<S>>,
    inner: Arc<Mutex<CacheInner>>,
    counters: Arc<Counters>,
    cooldown: Duration,
}

impl<S: SnapshotSource> Clone for SnapshotCache<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            inner: Arc::clone(&self.inner),
            counters: Arc::clone(&self.counters),
            cooldown: self.cooldown,
        }
    }
}

impl<S: SnapshotSource> SnapshotCache<S> {
    /// Creates a cache over `source`. A zero `cooldown` disables reuse;
    /// concurrent callers still share one fetch.
    pub fn new(source: S, cooldown: Duration) -> Self {
        Self {
            source: Arc::new(Mutex::new(source)),
            inner: Arc::new(Mutex::new(CacheInner::default())),
            counters: Arc::new(Counters::default()),
            cooldown,
        }
    }

    /// Returns the current snapshot, fetching it if needed.
    pub async fn get_or_fetch(&self) -> Arc<CardSnapshot> {
        let fetch = {
            let mut inner = self.inner.lock().await;

            if let Some(snapshot) = self.reusable(&inner) {
                self.counters.reuses.fetch_add(1, Ordering::Relaxed);
                debug!(status = %snapshot.status(), "Serving snapshot from cool-down window");
                return snapshot;
            }

            let running = inner
                .inflight
                .as_ref()
                .map(|(generation, fetch)| (*generation, fetch.clone()));
            match running {
                Some((generation, fetch)) => {
                    self.counters.joins.fetch_add(1, Ordering::Relaxed);
                    debug!(generation, "Joining in-flight fetch");
                    fetch
                }
                None => self.start_fetch(&mut inner),
            }
        };

        fetch.await
    }

    /// The last completed snapshot, regardless of age.
    pub async fn last(&self) -> Option<Arc<CardSnapshot>> {
        self.inner
            .lock()
            .await
            .last
            .as_ref()
            .map(|(_, snapshot)| Arc::clone(snapshot))
    }

    /// Returns true while a fetch is running.
    pub async fn is_fetching(&self) -> bool {
        self.inner.lock().await.inflight.is_some()
    }

    /// Copy of the request counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            fetches: self.counters.fetches.load(Ordering::Relaxed),
            joins: self.counters.joins.load(Ordering::Relaxed),
            reuses: self.counters.reuses.load(Ordering::Relaxed),
        }
    }

    fn reusable(&self, inner: &CacheInner) -> Option<Arc<CardSnapshot>> {
        if self.cooldown.is_zero() {
            return None;
        }

        let (completed_at, snapshot) = inner.last.as_ref()?;
        (completed_at.elapsed() < self.cooldown && snapshot.status().is_reusable())
            .then(|| Arc::clone(snapshot))
    }

    /// Spawns a fetch and registers it as in flight. Called with the state
    /// lock held, so the fetch cannot settle before it is registered.
    ///
    /// The source runs on its own task; a second task settles the result,
    /// so the in-flight slot is released even if the source panics.
    fn start_fetch(&self, inner: &mut CacheInner) -> InflightFetch {
        inner.generation += 1;
        let generation = inner.generation;
        self.counters.fetches.fetch_add(1, Ordering::Relaxed);
        info!(generation, "Starting snapshot fetch");

        let source = Arc::clone(&self.source);
        let task = tokio::spawn(async move { source.lock().await.fetch_snapshot().await });

        let state = Arc::clone(&self.inner);
        let settle = tokio::spawn(async move {
            let snapshot = Arc::new(task.await.unwrap_or_else(|e| {
                error!(generation, error = %e, "Snapshot fetch task failed");
                CardSnapshot::failed(SnapshotStatus::NetworkError)
            }));

            let mut inner = state.lock().await;
            inner.last = Some((Instant::now(), Arc::clone(&snapshot)));
            if inner
                .inflight
                .as_ref()
                .is_some_and(|(running, _)| *running == generation)
            {
                inner.inflight = None;
            }
            info!(generation, status = %snapshot.status(), "Snapshot fetch finished");
            snapshot
        });

        let fetch = async move {
            settle.await.unwrap_or_else(|e| {
                error!(generation, error = %e, "Snapshot settle task failed");
                Arc::new(CardSnapshot::failed(SnapshotStatus::NetworkError))
            })
        }
        .boxed()
        .shared();

        inner.inflight = Some((generation, fetch.clone()));
        fetch
    }
}

// ============================================================================
// Tests
// ============================================================================
