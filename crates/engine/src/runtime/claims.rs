// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Claim switching, claim list refresh and claim header updates.

use super::Runtime;
use crate::claims::{fetch_all_claims, fetch_claim_details};
use crate::error::RuntimeError;
use crate::queries;
use cw_adapters::UpstreamAdapter;
use cw_core::{ClaimId, ClaimInfo, Clock, Event, SwitchStatus};
use std::collections::HashSet;

impl<U: UpstreamAdapter, C: Clock> Runtime<U, C> {
    /// Switch to `claim_id`, announcing progress with `claim_switching`
    /// and `claim_switched` events. Returns whether the switch completed.
    pub async fn switch_claim(&self, claim_id: &ClaimId) -> bool {
        let _switching = self.switching.lock().await;
        let claim_name = self.claims.get(claim_id).map(|c| c.claim_name).unwrap_or_default();
        self.publish(Event::ClaimSwitching {
            status: SwitchStatus::Loading,
            claim_id: claim_id.clone(),
            claim_name,
        })
        .await;

        let result = if self.claims.switch_to(claim_id) {
            self.rescope().await
        } else {
            Err(RuntimeError::UnknownClaim(claim_id.clone()))
        };

        let event = match result {
            Ok(()) => Event::ClaimSwitched {
                status: SwitchStatus::Success,
                claim_id: Some(claim_id.clone()),
                claim_info: self.claim_info(),
                error: None,
            },
            Err(e) => {
                tracing::warn!(%claim_id, error = %e, "claim switch failed");
                Event::ClaimSwitched {
                    status: SwitchStatus::Error,
                    claim_id: Some(claim_id.clone()),
                    claim_info: None,
                    error: Some(e.to_string()),
                }
            }
        };
        let switched = matches!(event, Event::ClaimSwitched { status: SwitchStatus::Success, .. });
        self.publish(event).await;
        switched
    }

    /// Invalidate the claim-scoped caches, resubscribe, and prime them again
    /// for the current claim.
    pub async fn refresh_current_claim(&self) -> Result<(), RuntimeError> {
        let _switching = self.switching.lock().await;
        self.rescope().await?;
        if let Some(info) = self.claim_info() {
            self.publish(Event::ClaimInfoUpdate(info)).await;
        }
        Ok(())
    }

    /// Re-fetch the player's claims and publish the list. Moves to another
    /// claim if the current one is gone.
    pub async fn refresh_claims_list(&self) -> Result<(), RuntimeError> {
        let _switching = self.switching.lock().await;
        let before = self.claims.current_id();
        let claims = fetch_all_claims(&self.session, &self.player_id).await?;
        self.claims.set_available(claims);
        self.publish(self.claims_list_event()).await;

        if self.claims.current_id() != before {
            self.rescope().await?;
        }
        Ok(())
    }

    /// Re-query the current claim's state and publish its header.
    pub async fn refresh_claim_info(&self) -> Result<Option<ClaimInfo>, RuntimeError> {
        let Some(claim_id) = self.claims.current_id() else {
            return Ok(None);
        };
        let fresh = fetch_claim_details(&self.session, &claim_id).await?;
        self.claims.update_claim(&claim_id, |record| {
            record.set_name(fresh.claim_name);
            record.set_treasury(fresh.treasury);
            record.set_supplies(fresh.supplies);
            record.set_tile_count(fresh.tile_count);
        });

        let info = self.claim_info();
        if let Some(info) = &info {
            self.publish(Event::ClaimInfoUpdate(info.clone())).await;
        }
        Ok(info)
    }

    /// Drop claims the player no longer belongs to. Returns the removed ids.
    pub async fn handle_membership_change(&self) -> Result<Vec<ClaimId>, RuntimeError> {
        let _switching = self.switching.lock().await;
        let rows = self.session.query(&queries::claims_for_player(&self.player_id)).await?;
        let members: HashSet<ClaimId> = rows
            .iter()
            .filter_map(|row| row.entity_id("claim_entity_id").ok())
            .map(|id| ClaimId::from(id.as_str()))
            .collect();

        let before = self.claims.current_id();
        let removed: Vec<ClaimId> = self
            .claims
            .claims()
            .into_iter()
            .map(|c| c.claim_id)
            .filter(|id| !members.contains(id))
            .collect();
        if removed.is_empty() {
            return Ok(removed);
        }
        for claim_id in &removed {
            self.claims.remove(claim_id);
            tracing::info!(%claim_id, "no longer a member of claim");
        }
        self.publish(self.claims_list_event()).await;

        match self.claims.current_id() {
            current if current == before => {}
            Some(_) => self.rescope().await?,
            None => self.invalidate_claim_scoped(),
        }
        Ok(removed)
    }

    /// Point the claim-scoped caches and the subscription set at the
    /// current claim. Callers hold the switching lock.
    pub(crate) async fn rescope(&self) -> Result<(), RuntimeError> {
        self.invalidate_claim_scoped();
        self.resubscribe().await?;
        self.prime_claim_scoped().await;
        Ok(())
    }
}
