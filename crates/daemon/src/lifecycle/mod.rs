// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Data service lifecycle: bootstrap, steady state, stop.

mod startup;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use cw_adapters::{
    AuthAdapter, AuthError, ConnError, HttpAuth, QueryError, UpstreamAdapter, WsUpstream,
};
use cw_core::{ClaimId, ClaimInfo, Clock, Domain, Event, SystemClock};
use cw_engine::{Credentials, Runtime, RuntimeError};
use cw_storage::{PrefsError, ReferenceError};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::Config;

/// Outbound events buffered for the consumer.
const EVENT_BUFFER: usize = 256;

/// Errors that abort bootstrap
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Connection failed: {0}")]
    Conn(#[from] ConnError),

    #[error("Query failed: {0}")]
    Query(#[from] QueryError),

    #[error("Failed to load reference data: {0}")]
    Reference(#[from] ReferenceError),

    #[error("No player name configured")]
    NoPlayerName,

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Could not retrieve any claims for this player")]
    NoClaims,

    #[error("Failed to save preferences: {0}")]
    Prefs(#[from] PrefsError),

    #[error("Failed to acquire lock at {0}: already running?")]
    LockFailed(PathBuf, #[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Event receiver dropped")]
    EventsClosed,
}

impl BootstrapError {
    /// The single event a consumer sees when bootstrap fails.
    pub fn terminal_event(&self) -> Event {
        match self {
            BootstrapError::Auth(_) | BootstrapError::Conn(_) => {
                Event::connection_failed(self.to_string())
            }
            _ => Event::Error(self.to_string()),
        }
    }
}

impl From<RuntimeError> for BootstrapError {
    fn from(e: RuntimeError) -> Self {
        match e {
            RuntimeError::Query(e) => BootstrapError::Query(e),
            RuntimeError::Subscribe(e) => BootstrapError::Conn(e),
            RuntimeError::NoClaim | RuntimeError::UnknownClaim(_) => BootstrapError::NoClaims,
            RuntimeError::EventsClosed(_) => BootstrapError::EventsClosed,
        }
    }
}

/// Not-yet-started data service.
///
/// Take [`DataService::events`] before [`DataService::start`] to observe
/// bootstrap progress and the terminal event of a failed start.
pub struct DataService<U: UpstreamAdapter, A: AuthAdapter, C: Clock> {
    config: Config,
    upstream: U,
    auth: A,
    clock: C,
    event_tx: mpsc::Sender<Event>,
    event_rx: Option<mpsc::Receiver<Event>>,
}

/// Data service over the real websocket and login API
pub type LiveService = DataService<WsUpstream, HttpAuth, SystemClock>;

impl LiveService {
    pub fn live(config: Config) -> Self {
        let upstream = WsUpstream::new(config.query_timeout);
        Self::new(config, upstream, HttpAuth::default(), SystemClock)
    }
}

impl<U: UpstreamAdapter, A: AuthAdapter, C: Clock> DataService<U, A, C> {
    pub fn new(config: Config, upstream: U, auth: A, clock: C) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        Self { config, upstream, auth, clock, event_tx, event_rx: Some(event_rx) }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The outbound event stream. Only the first call returns it.
    pub fn events(&mut self) -> Option<mpsc::Receiver<Event>> {
        self.event_rx.take()
    }

    /// Run bootstrap and enter the steady state.
    pub async fn start(mut self, credentials: Credentials) -> Result<ServiceHandle<U, C>, BootstrapError> {
        match startup::bootstrap(&self, credentials).await {
            Ok(started) => Ok(ServiceHandle {
                runtime: started.runtime,
                steady: Some(started.steady),
                events: self.event_rx.take(),
                stop_timeout: self.config.stop_timeout,
                lock_file: started.lock_file,
            }),
            Err(e) => {
                tracing::error!(error = %e, "bootstrap failed");
                if self.event_tx.send(e.terminal_event()).await.is_err() {
                    tracing::debug!("no consumer for bootstrap failure");
                }
                Err(e)
            }
        }
    }
}

/// A running data service.
pub struct ServiceHandle<U: UpstreamAdapter, C: Clock> {
    runtime: Arc<Runtime<U, C>>,
    steady: Option<JoinHandle<()>>,
    events: Option<mpsc::Receiver<Event>>,
    stop_timeout: Duration,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
}

impl<U: UpstreamAdapter, C: Clock> ServiceHandle<U, C> {
    /// The outbound event stream, unless already taken from the service.
    pub fn events(&mut self) -> Option<mpsc::Receiver<Event>> {
        self.events.take()
    }

    pub fn runtime(&self) -> &Runtime<U, C> {
        &self.runtime
    }

    pub async fn switch_claim(&self, claim_id: &ClaimId) -> bool {
        self.runtime.switch_claim(claim_id).await
    }

    /// Re-fetch every claim-scoped domain for the current claim.
    pub async fn refresh_current_claim(&self) -> bool {
        match self.runtime.refresh_current_claim().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "claim refresh failed");
                false
            }
        }
    }

    pub async fn refresh_claims_list(&self) -> bool {
        match self.runtime.refresh_claims_list().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "claims list refresh failed");
                false
            }
        }
    }

    /// Refresh one domain; the result arrives as an event.
    pub fn refresh(&self, domain: Domain) {
        self.runtime.refresh(domain);
    }

    pub fn current_claim_info(&self) -> Option<ClaimInfo> {
        self.runtime.claim_info()
    }

    /// Stop the service.
    ///
    /// Closes the session so outstanding queries fail fast, cancels and
    /// joins in-flight work and the steady-state task within the stop
    /// timeout, then persists the claims.
    pub async fn stop(mut self) {
        info!("stopping data service");

        self.runtime.session().close().await;
        if !self.runtime.shutdown(self.stop_timeout).await {
            warn!("refresh tasks still running after stop timeout");
        }

        if let Some(steady) = self.steady.take() {
            match tokio::time::timeout(self.stop_timeout, steady).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "steady-state task failed"),
                Err(_) => warn!(timeout = ?self.stop_timeout, "steady-state task did not stop in time"),
            }
        }

        self.runtime.claims().save();
        info!("data service stopped");
    }
}

#[cfg(test)]
mod test_helpers;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
