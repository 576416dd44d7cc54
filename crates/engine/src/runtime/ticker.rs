// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress ticker: re-renders crafting countdowns without network I/O and
//! refreshes caches whose TTL has lapsed. A failing cache is retried once
//! per TTL, not on every tick.

use super::Runtime;
use crate::error::RuntimeError;
use cw_adapters::UpstreamAdapter;
use cw_core::{Clock, UpdateSource};
use std::sync::Arc;
use tokio::time::MissedTickBehavior;

impl<U: UpstreamAdapter, C: Clock> Runtime<U, C> {
    pub(crate) async fn run_ticker(self: Arc<Self>) {
        let mut interval = tokio::time::interval(self.config.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = interval.tick() => {}
            }
            if !self.ticker_enabled() {
                continue;
            }
            if let Err(e) = self.tick().await {
                tracing::warn!(error = %e, backoff = ?self.config.tick_backoff, "progress tick failed");
                tokio::select! {
                    _ = self.cancel.cancelled() => break,
                    _ = tokio::time::sleep(self.config.tick_backoff) => {}
                }
            }
        }
        tracing::debug!("ticker stopped");
    }

    /// One ticker iteration.
    pub async fn tick(&self) -> Result<(), RuntimeError> {
        if let Some(event) = self.passive.tick_event() {
            self.emit(event).await?;
        }
        if let Some(event) = self.active.tick_event() {
            self.emit(event).await?;
        }

        if self.inventory.is_due() {
            self.forward(&self.inventory, UpdateSource::Refresh);
        }
        if self.passive.is_due() {
            self.forward(&self.passive, UpdateSource::Refresh);
        }
        if self.active.is_due() {
            self.forward(&self.active, UpdateSource::Refresh);
        }
        if self.tasks.is_due() {
            self.forward(&self.tasks, UpdateSource::Refresh);
        }
        Ok(())
    }
}
