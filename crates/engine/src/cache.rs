// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generic per-domain cache with TTL and single-flight refresh.
//!
//! ```text
//!            refresh()            ok              ttl elapsed
//!  Empty ───────────────▶ Fetching ───▶ Fresh ─────────────▶ Stale
//!    ▲                       │ err                             │
//!    │                       ▼                                 │ refresh()
//!    └── invalidate() ── (entry untouched) ◀───────────────────┘
//! ```
//!
//! Concurrent refreshes join the in-flight fetch. A fetch that started
//! before an [`invalidate`](DomainCache::invalidate) never writes the entry.
//! After a failed fetch, a stale cache waits a full TTL before it is due again.

use async_trait::async_trait;
use cw_adapters::QueryError;
use cw_core::{Clock, Domain, DomainUpdate, Event, UpdateSource};
use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Default time a snapshot stays valid.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Fetches and renders one domain.
///
/// `fetch` does the upstream I/O and resolves rows against reference data.
/// `render` derives the display rows from the resolved data and the current
/// time, and must not do I/O: the progress ticker calls it every few seconds.
#[async_trait]
pub trait DomainSource: Send + Sync + 'static {
    type Raw: Send + Sync + 'static;
    type Row: Clone + Send + Sync + 'static;

    const DOMAIN: Domain;

    async fn fetch(&self) -> Result<Self::Raw, QueryError>;

    fn render(&self, raw: &Self::Raw, now_micros: i64) -> Vec<Self::Row>;

    /// Wrap an update in this domain's event variant.
    fn event(update: DomainUpdate<Self::Row>) -> Event;
}

/// One successful fetch: the resolved data and its rendering at fetch time.
#[derive(Debug)]
pub struct Snapshot<R, T> {
    pub raw: R,
    pub rows: Arc<Vec<T>>,
}

#[derive(Debug)]
pub struct RefreshOutcome<R, T> {
    pub snapshot: Option<Arc<Snapshot<R, T>>>,
    pub success: bool,
    pub message: String,
    pub is_fresh: bool,
    /// An invalidation landed while the fetch was in flight. Carries the
    /// current last known snapshot and must not be emitted.
    pub superseded: bool,
}

impl<R, T> Clone for RefreshOutcome<R, T> {
    fn clone(&self) -> Self {
        Self {
            snapshot: self.snapshot.clone(),
            success: self.success,
            message: self.message.clone(),
            is_fresh: self.is_fresh,
            superseded: self.superseded,
        }
    }
}

impl<R, T> RefreshOutcome<R, T> {
    fn failed(snapshot: Option<Arc<Snapshot<R, T>>>, message: impl Into<String>) -> Self {
        Self {
            snapshot,
            success: false,
            message: message.into(),
            is_fresh: false,
            superseded: false,
        }
    }

    fn superseded(snapshot: Option<Arc<Snapshot<R, T>>>) -> Self {
        Self { superseded: true, ..Self::failed(snapshot, "superseded by invalidation") }
    }

    pub fn rows(&self) -> Arc<Vec<T>> {
        self.snapshot.as_ref().map(|s| Arc::clone(&s.rows)).unwrap_or_default()
    }

    pub fn to_update(&self, source: UpdateSource) -> DomainUpdate<T> {
        DomainUpdate {
            rows: self.rows(),
            success: self.success,
            message: self.message.clone(),
            is_fresh: self.is_fresh,
            source,
        }
    }
}

type Outcome<D> = RefreshOutcome<<D as DomainSource>::Raw, <D as DomainSource>::Row>;
type SnapshotOf<D> = Snapshot<<D as DomainSource>::Raw, <D as DomainSource>::Row>;

/// Resolves once the refresh it was handed out for completes.
pub struct RefreshTicket<R, T> {
    rx: watch::Receiver<Option<RefreshOutcome<R, T>>>,
}

impl<R, T> RefreshTicket<R, T>
where
    R: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    pub async fn outcome(mut self) -> RefreshOutcome<R, T> {
        let result = self.rx.wait_for(Option::is_some).await.ok().and_then(|v| v.clone());
        // sender dropped without a value: the task was cancelled or aborted
        result.unwrap_or_else(|| RefreshOutcome::failed(None, "refresh cancelled"))
    }
}

impl<R, T> IntoFuture for RefreshTicket<R, T>
where
    R: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    type Output = RefreshOutcome<R, T>;
    type IntoFuture = BoxFuture<'static, RefreshOutcome<R, T>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.outcome())
    }
}

struct Entry<S> {
    snapshot: Arc<S>,
    fetched_at: Instant,
}

struct InFlight<D: DomainSource> {
    id: u64,
    rx: watch::Receiver<Option<Outcome<D>>>,
}

struct CacheState<D: DomainSource> {
    entry: Option<Entry<SnapshotOf<D>>>,
    last_known: Option<Arc<SnapshotOf<D>>>,
    generation: u64,
    next_fetch_id: u64,
    in_flight: Option<InFlight<D>>,
    failed_at: Option<Instant>,
}

pub struct DomainCache<D: DomainSource, C: Clock> {
    source: Arc<D>,
    clock: C,
    ttl: Duration,
    state: Arc<Mutex<CacheState<D>>>,
    tracker: TaskTracker,
    cancel: CancellationToken,
}

impl<D: DomainSource, C: Clock> DomainCache<D, C> {
    pub fn new(
        source: D,
        clock: C,
        ttl: Duration,
        tracker: TaskTracker,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            source: Arc::new(source),
            clock,
            ttl,
            state: Arc::new(Mutex::new(CacheState {
                entry: None,
                last_known: None,
                generation: 0,
                next_fetch_id: 0,
                in_flight: None,
                failed_at: None,
            })),
            tracker,
            cancel,
        }
    }

    pub fn domain(&self) -> Domain {
        D::DOMAIN
    }

    pub fn source(&self) -> &D {
        &self.source
    }

    /// The snapshot if it is still within its TTL. Never does I/O.
    pub fn get_cached(&self) -> Option<Arc<SnapshotOf<D>>> {
        let state = self.state.lock();
        let entry = state.entry.as_ref()?;
        (self.clock.now().duration_since(entry.fetched_at) < self.ttl)
            .then(|| Arc::clone(&entry.snapshot))
    }

    /// The last successful snapshot, regardless of TTL.
    pub fn last_known(&self) -> Option<Arc<SnapshotOf<D>>> {
        self.state.lock().last_known.clone()
    }

    /// Whether a previously fetched snapshot has outlived its TTL.
    pub fn is_stale(&self) -> bool {
        let state = self.state.lock();
        state
            .entry
            .as_ref()
            .is_some_and(|e| self.clock.now().duration_since(e.fetched_at) >= self.ttl)
    }

    /// Stale, and no refresh has failed within the last TTL.
    pub fn is_due(&self) -> bool {
        let state = self.state.lock();
        let now = self.clock.now();
        let stale =
            state.entry.as_ref().is_some_and(|e| now.duration_since(e.fetched_at) >= self.ttl);
        stale && state.failed_at.map_or(true, |at| now.duration_since(at) >= self.ttl)
    }

    pub fn is_fetching(&self) -> bool {
        self.state.lock().in_flight.is_some()
    }

    /// Start a refresh, or join the one already in flight.
    pub fn refresh(&self) -> RefreshTicket<D::Raw, D::Row> {
        let mut state = self.state.lock();
        if let Some(in_flight) = &state.in_flight {
            return RefreshTicket { rx: in_flight.rx.clone() };
        }

        state.next_fetch_id += 1;
        let id = state.next_fetch_id;
        let generation = state.generation;
        let (tx, rx) = watch::channel(None);
        state.in_flight = Some(InFlight { id, rx: rx.clone() });
        drop(state);

        let source = Arc::clone(&self.source);
        let shared = Arc::clone(&self.state);
        let clock = self.clock.clone();
        let cancel = self.cancel.clone();
        self.tracker.spawn(async move {
            let result = tokio::select! {
                result = source.fetch() => Some(result),
                _ = cancel.cancelled() => None,
            };
            let outcome = match result {
                Some(result) => complete::<D, C>(&source, &shared, &clock, id, generation, result),
                None => {
                    clear_in_flight(&mut shared.lock(), id);
                    RefreshOutcome::failed(None, "refresh cancelled")
                }
            };
            tx.send_replace(Some(outcome));
        });

        RefreshTicket { rx }
    }

    /// Drop the snapshot and supersede any fetch in flight.
    pub fn invalidate(&self) {
        let mut state = self.state.lock();
        state.entry = None;
        state.last_known = None;
        state.in_flight = None;
        state.failed_at = None;
        state.generation += 1;
        tracing::debug!(domain = %D::DOMAIN, generation = state.generation, "cache invalidated");
    }

    /// Re-render the last known snapshot against the current time.
    pub fn tick_update(&self) -> Option<DomainUpdate<D::Row>> {
        let (snapshot, is_fresh) = {
            let state = self.state.lock();
            let snapshot = state.last_known.clone()?;
            let is_fresh = state
                .entry
                .as_ref()
                .is_some_and(|e| self.clock.now().duration_since(e.fetched_at) < self.ttl);
            (snapshot, is_fresh)
        };
        if snapshot.rows.is_empty() {
            return None;
        }
        let rows = self.source.render(&snapshot.raw, self.clock.epoch_micros());
        Some(DomainUpdate {
            rows: Arc::new(rows),
            success: true,
            message: String::new(),
            is_fresh,
            source: UpdateSource::Tick,
        })
    }

    /// [`tick_update`](Self::tick_update) wrapped in this domain's event.
    pub fn tick_event(&self) -> Option<Event> {
        self.tick_update().map(D::event)
    }

    pub fn event(outcome: &Outcome<D>, source: UpdateSource) -> Event {
        D::event(outcome.to_update(source))
    }
}

fn clear_in_flight<D: DomainSource>(state: &mut CacheState<D>, id: u64) {
    if state.in_flight.as_ref().is_some_and(|f| f.id == id) {
        state.in_flight = None;
    }
}

fn complete<D: DomainSource, C: Clock>(
    source: &D,
    shared: &Mutex<CacheState<D>>,
    clock: &C,
    id: u64,
    generation: u64,
    result: Result<D::Raw, QueryError>,
) -> Outcome<D> {
    let rendered = result.map(|raw| {
        let rows = source.render(&raw, clock.epoch_micros());
        Snapshot { raw, rows: Arc::new(rows) }
    });

    let mut state = shared.lock();
    clear_in_flight(&mut state, id);
    if state.generation != generation {
        tracing::debug!(domain = %D::DOMAIN, "discarding fetch superseded by invalidation");
        return RefreshOutcome::superseded(state.last_known.clone());
    }

    match rendered {
        Ok(snapshot) => {
            let snapshot = Arc::new(snapshot);
            state.entry = Some(Entry { snapshot: Arc::clone(&snapshot), fetched_at: clock.now() });
            state.last_known = Some(Arc::clone(&snapshot));
            state.failed_at = None;
            tracing::debug!(domain = %D::DOMAIN, rows = snapshot.rows.len(), "cache refreshed");
            RefreshOutcome {
                snapshot: Some(snapshot),
                success: true,
                message: String::new(),
                is_fresh: true,
                superseded: false,
            }
        }
        Err(e) => {
            tracing::warn!(domain = %D::DOMAIN, error = %e, "refresh failed");
            state.failed_at = Some(clock.now());
            RefreshOutcome::failed(state.last_known.clone(), e.to_string())
        }
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
