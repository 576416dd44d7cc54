// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Push router: the single consumer of upstream push frames.

use super::Runtime;
use cw_adapters::UpstreamAdapter;
use cw_core::{affected_domains, Clock, Domain, Table, UpdateSource};
use cw_wire::PushFrame;
use std::sync::Arc;
use tokio::sync::mpsc;

impl<U: UpstreamAdapter, C: Clock> Runtime<U, C> {
    /// Route push frames until the runtime is shut down or the upstream
    /// drops the sender.
    pub async fn route(self: Arc<Self>, mut pushes: mpsc::Receiver<PushFrame>) {
        loop {
            let frame = tokio::select! {
                _ = self.cancel.cancelled() => break,
                frame = pushes.recv() => match frame {
                    Some(frame) => frame,
                    None => {
                        tracing::info!("push stream ended");
                        break;
                    }
                },
            };
            self.dispatch(&frame);
        }
        tracing::debug!("router stopped");
    }

    /// Start a refresh for every domain the frame touches. Never waits on
    /// the refreshes; each emits its update when it lands.
    pub fn dispatch(self: &Arc<Self>, frame: &PushFrame) -> Vec<Domain> {
        let domains = affected_domains(frame.table_names());
        if domains.is_empty() {
            tracing::trace!(kind = ?frame.kind, tables = ?frame.tables, "push touches no known table");
            return domains;
        }
        tracing::debug!(
            kind = ?frame.kind,
            reducer = frame.reducer.as_deref().unwrap_or("-"),
            ?domains,
            "push"
        );

        for domain in &domains {
            match domain {
                Domain::Inventory => self.forward(&self.inventory, UpdateSource::Push),
                Domain::PassiveCrafting => self.forward(&self.passive, UpdateSource::Push),
                Domain::ActiveCrafting => self.forward(&self.active, UpdateSource::Push),
                Domain::Tasks => self.forward(&self.tasks, UpdateSource::Push),
                Domain::Claim => {
                    let membership =
                        frame.table_names().any(|t| t == Table::ClaimMemberState.name());
                    self.spawn_claim_refresh(membership);
                }
            }
        }
        domains
    }

    /// Refresh the claim header in the background, checking membership
    /// first when `membership` is set. Abandoned on shutdown.
    pub(crate) fn spawn_claim_refresh(self: &Arc<Self>, membership: bool) {
        let runtime = Arc::clone(self);
        let cancel = self.cancel.clone();
        self.tracker.spawn(async move {
            tokio::select! {
                _ = runtime.on_claim_push(membership) => {}
                _ = cancel.cancelled() => tracing::debug!("claim refresh cancelled"),
            }
        });
    }

    async fn on_claim_push(&self, membership: bool) {
        if membership {
            if let Err(e) = self.handle_membership_change().await {
                tracing::warn!(error = %e, "membership check failed");
            }
        }
        if let Err(e) = self.refresh_claim_info().await {
            tracing::warn!(error = %e, "claim info refresh failed");
        }
    }
}
