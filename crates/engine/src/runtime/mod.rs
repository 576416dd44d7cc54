// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime that owns the session, the domain caches and the claim manager,
//! and turns pushes, ticks and consumer requests into outbound events.

mod claims;
mod router;
mod ticker;

use crate::cache::{DomainCache, DomainSource, RefreshOutcome, DEFAULT_TTL};
use crate::claims::ClaimManager;
use crate::domains::{
    ActiveCraftingSource, InventorySource, PassiveCraftingSource, SourceContext, TasksSource,
};
use crate::error::RuntimeError;
use crate::reference::ReferenceData;
use crate::session::Session;
use crate::subscriptions;
use cw_adapters::UpstreamAdapter;
use cw_core::{ClaimInfo, Clock, Domain, Event, PlayerId, UpdateSource};
use cw_storage::PrefsStore;
use cw_wire::PushFrame;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Buffered push frames between the upstream reader and the router.
const PUSH_BUFFER: usize = 256;

/// Runtime timing configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub cache_ttl: Duration,
    /// Progress ticker period
    pub tick_interval: Duration,
    /// Pause after a failed tick
    pub tick_backoff: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_TTL,
            tick_interval: Duration::from_secs(3),
            tick_backoff: Duration::from_secs(5),
        }
    }
}

/// Runtime dependencies
pub struct RuntimeDeps<U: UpstreamAdapter> {
    pub session: Arc<Session<U>>,
    pub reference: Arc<ReferenceData>,
    pub prefs: PrefsStore,
    pub player_id: PlayerId,
}

pub struct Runtime<U: UpstreamAdapter, C: Clock> {
    session: Arc<Session<U>>,
    reference: Arc<ReferenceData>,
    claims: ClaimManager<C>,
    player_id: PlayerId,
    pub(crate) inventory: DomainCache<InventorySource<U>, C>,
    pub(crate) passive: DomainCache<PassiveCraftingSource<U>, C>,
    pub(crate) active: DomainCache<ActiveCraftingSource<U>, C>,
    pub(crate) tasks: DomainCache<TasksSource<U>, C>,
    config: RuntimeConfig,
    event_tx: mpsc::Sender<Event>,
    push_tx: mpsc::Sender<PushFrame>,
    push_rx: Mutex<Option<mpsc::Receiver<PushFrame>>>,
    ticker_enabled: AtomicBool,
    /// Serializes claim switches, list refreshes and membership changes
    switching: tokio::sync::Mutex<()>,
    tracker: TaskTracker,
    cancel: CancellationToken,
}

impl<U: UpstreamAdapter, C: Clock> Runtime<U, C> {
    pub fn new(
        deps: RuntimeDeps<U>,
        clock: C,
        config: RuntimeConfig,
        event_tx: mpsc::Sender<Event>,
    ) -> Self {
        let tracker = TaskTracker::new();
        let cancel = CancellationToken::new();
        let claims = ClaimManager::new(deps.prefs, clock.clone());
        let ctx = SourceContext {
            session: Arc::clone(&deps.session),
            reference: Arc::clone(&deps.reference),
            scope: claims.scope(),
        };
        let ttl = config.cache_ttl;
        let inventory = DomainCache::new(
            InventorySource::new(ctx.clone()),
            clock.clone(),
            ttl,
            tracker.clone(),
            cancel.clone(),
        );
        let passive = DomainCache::new(
            PassiveCraftingSource::new(ctx.clone()),
            clock.clone(),
            ttl,
            tracker.clone(),
            cancel.clone(),
        );
        let active = DomainCache::new(
            ActiveCraftingSource::new(ctx),
            clock.clone(),
            ttl,
            tracker.clone(),
            cancel.clone(),
        );
        let tasks = DomainCache::new(
            TasksSource::new(
                Arc::clone(&deps.session),
                Arc::clone(&deps.reference),
                deps.player_id.clone(),
            ),
            clock,
            ttl,
            tracker.clone(),
            cancel.clone(),
        );

        let (push_tx, push_rx) = mpsc::channel(PUSH_BUFFER);
        Self {
            session: deps.session,
            reference: deps.reference,
            claims,
            player_id: deps.player_id,
            inventory,
            passive,
            active,
            tasks,
            config,
            event_tx,
            push_tx,
            push_rx: Mutex::new(Some(push_rx)),
            ticker_enabled: AtomicBool::new(false),
            switching: tokio::sync::Mutex::new(()),
            tracker,
            cancel,
        }
    }

    pub fn session(&self) -> &Session<U> {
        &self.session
    }

    pub fn claims(&self) -> &ClaimManager<C> {
        &self.claims
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    /// Header data for the current claim.
    pub fn claim_info(&self) -> Option<ClaimInfo> {
        self.claims.current_info(self.reference.tile_cost())
    }

    pub fn claims_list_event(&self) -> Event {
        Event::ClaimsListUpdate {
            claims: self.claims.claims(),
            current_claim_id: self.claims.current_id(),
        }
    }

    pub fn set_ticker_enabled(&self, enabled: bool) {
        self.ticker_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn ticker_enabled(&self) -> bool {
        self.ticker_enabled.load(Ordering::Relaxed)
    }

    pub fn is_stopping(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Send an event to the consumer.
    pub async fn emit(&self, event: Event) -> Result<(), RuntimeError> {
        let name = event.name();
        self.event_tx.send(event).await.map_err(|_| RuntimeError::EventsClosed(name))
    }

    /// Like [`emit`](Self::emit), but a departed consumer is only logged.
    pub(crate) async fn publish(&self, event: Event) {
        if let Err(e) = self.emit(event).await {
            tracing::debug!(error = %e, "dropping event");
        }
    }

    /// Refresh every cache once, emitting each outcome in domain order,
    /// then the claim header. Returns whether every refresh succeeded.
    pub async fn prime(&self) -> bool {
        let inventory = self.inventory.refresh();
        let passive = self.passive.refresh();
        let active = self.active.refresh();
        let tasks = self.tasks.refresh();

        let mut ok = self.settle(&self.inventory, inventory.await, UpdateSource::Prime).await;
        ok &= self.settle(&self.passive, passive.await, UpdateSource::Prime).await;
        ok &= self.settle(&self.active, active.await, UpdateSource::Prime).await;
        ok &= self.settle(&self.tasks, tasks.await, UpdateSource::Prime).await;

        if let Some(info) = self.claim_info() {
            self.publish(Event::ClaimInfoUpdate(info)).await;
        }
        tracing::info!(ok, "caches primed");
        ok
    }

    /// Prime only the claim-scoped caches.
    pub(crate) async fn prime_claim_scoped(&self) -> bool {
        let inventory = self.inventory.refresh();
        let passive = self.passive.refresh();
        let active = self.active.refresh();

        let mut ok = self.settle(&self.inventory, inventory.await, UpdateSource::Prime).await;
        ok &= self.settle(&self.passive, passive.await, UpdateSource::Prime).await;
        ok &= self.settle(&self.active, active.await, UpdateSource::Prime).await;
        ok
    }

    async fn settle<D: DomainSource>(
        &self,
        cache: &DomainCache<D, C>,
        outcome: RefreshOutcome<D::Raw, D::Row>,
        source: UpdateSource,
    ) -> bool {
        let success = outcome.success;
        tracing::debug!(domain = %cache.domain(), %source, success, "refresh settled");
        if !outcome.superseded {
            self.publish(DomainCache::<D, C>::event(&outcome, source)).await;
        }
        success
    }

    /// Refresh `cache` in the background and emit the outcome when it
    /// lands. Skipped when a refresh is already in flight, since its owner
    /// emits the shared outcome.
    pub(crate) fn forward<D: DomainSource>(&self, cache: &DomainCache<D, C>, source: UpdateSource) {
        if cache.is_fetching() {
            tracing::debug!(domain = %D::DOMAIN, %source, "joining in-flight refresh");
            return;
        }
        let ticket = cache.refresh();
        let events = self.event_tx.clone();
        self.tracker.spawn(async move {
            let outcome = ticket.await;
            if outcome.superseded {
                tracing::debug!(domain = %D::DOMAIN, %source, "dropping superseded refresh");
                return;
            }
            if events.send(DomainCache::<D, C>::event(&outcome, source)).await.is_err() {
                tracing::debug!(domain = %D::DOMAIN, "dropping update, receiver gone");
            }
        });
    }

    /// Consumer-requested refresh of one domain.
    pub fn refresh(self: &Arc<Self>, domain: Domain) {
        match domain {
            Domain::Inventory => self.forward(&self.inventory, UpdateSource::Refresh),
            Domain::PassiveCrafting => self.forward(&self.passive, UpdateSource::Refresh),
            Domain::ActiveCrafting => self.forward(&self.active, UpdateSource::Refresh),
            Domain::Tasks => self.forward(&self.tasks, UpdateSource::Refresh),
            Domain::Claim => self.spawn_claim_refresh(false),
        }
    }

    /// Drop the snapshot backing `domain`.
    pub(crate) fn invalidate(&self, domain: Domain) {
        match domain {
            Domain::Inventory => self.inventory.invalidate(),
            Domain::PassiveCrafting => self.passive.invalidate(),
            Domain::ActiveCrafting => self.active.invalidate(),
            Domain::Tasks => self.tasks.invalidate(),
            Domain::Claim => {}
        }
    }

    /// Drop every claim-scoped snapshot.
    pub(crate) fn invalidate_claim_scoped(&self) {
        for domain in Domain::CACHED.into_iter().filter(|d| d.is_claim_scoped()) {
            self.invalidate(domain);
        }
    }

    /// Issue the subscription set for the current claim, replacing the
    /// previous one.
    pub async fn resubscribe(&self) -> Result<(), RuntimeError> {
        let claim_id = self.claims.current_id().ok_or(RuntimeError::NoClaim)?;
        let subscriptions = subscriptions::build(&self.player_id, &claim_id);
        let count = subscriptions.len();
        self.session
            .subscribe(subscriptions::query_strings(&subscriptions), self.push_tx.clone())
            .await?;
        tracing::info!(%claim_id, count, "subscribed");
        Ok(())
    }

    /// Take the push receiver. Only the first call gets it.
    pub fn take_pushes(&self) -> Option<mpsc::Receiver<PushFrame>> {
        self.push_rx.lock().take()
    }

    /// Run the router and the progress ticker until [`shutdown`](Self::shutdown).
    pub async fn run(self: Arc<Self>) {
        let Some(pushes) = self.take_pushes() else {
            tracing::warn!("runtime already running");
            return;
        };
        self.set_ticker_enabled(true);
        self.tracker.spawn(Arc::clone(&self).run_ticker());
        self.route(pushes).await;
    }

    /// Stop the ticker, cancel in-flight refreshes, and wait up to
    /// `timeout` for background tasks. Returns false on timeout.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.set_ticker_enabled(false);
        self.cancel.cancel();
        self.tracker.close();
        match tokio::time::timeout(timeout, self.tracker.wait()).await {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(?timeout, tasks = self.tracker.len(), "background tasks still running");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "../runtime_tests/mod.rs"]
mod tests;
