// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Claim manager: the player's claims and the current selection.
//!
//! All mutation goes through one mutex and is persisted to the preference
//! file before the lock is released. Persistence failures are logged and
//! never surface to callers.

use crate::queries;
use crate::session::Session;
use chrono::{DateTime, Utc};
use cw_adapters::{QueryError, UpstreamAdapter};
use cw_core::{ClaimId, ClaimInfo, ClaimRecord, Clock, PlayerId, TileCostTable};
use cw_storage::PrefsStore;
use cw_wire::Row;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Shared read handle on the current claim id.
///
/// Claim-scoped domain sources read it at fetch time; only the claim
/// manager writes it.
#[derive(Debug, Clone, Default)]
pub struct ClaimScope(Arc<RwLock<Option<ClaimId>>>);

impl ClaimScope {
    pub fn get(&self) -> Option<ClaimId> {
        self.0.read().clone()
    }

    /// The current claim, or [`QueryError::NoClaim`].
    pub fn require(&self) -> Result<ClaimId, QueryError> {
        self.get().ok_or(QueryError::NoClaim)
    }

    fn set(&self, claim_id: Option<ClaimId>) {
        *self.0.write() = claim_id;
    }
}

#[derive(Debug, Default)]
struct ClaimState {
    claims: Vec<ClaimRecord>,
    current: Option<ClaimId>,
    populated: bool,
    /// Selection restored from the preference file, used on first population
    persisted: Option<ClaimId>,
}

impl ClaimState {
    fn index_of(&self, claim_id: &str) -> Option<usize> {
        self.claims.iter().position(|c| c.claim_id == claim_id)
    }

    fn first_id(&self) -> Option<ClaimId> {
        self.claims.first().map(|c| c.claim_id.clone())
    }
}

pub struct ClaimManager<C: Clock> {
    clock: C,
    prefs: PrefsStore,
    state: Mutex<ClaimState>,
    scope: ClaimScope,
}

impl<C: Clock> ClaimManager<C> {
    pub fn new(prefs: PrefsStore, clock: C) -> Self {
        let persisted = prefs.load_or_default().last_selected_claim_id;
        Self {
            clock,
            prefs,
            state: Mutex::new(ClaimState { persisted, ..Default::default() }),
            scope: ClaimScope::default(),
        }
    }

    pub fn scope(&self) -> ClaimScope {
        self.scope.clone()
    }

    /// Replace the claims list and resolve the selection.
    ///
    /// First population prefers the persisted selection; later ones keep
    /// the current claim if it is still listed. Otherwise the first claim
    /// is selected, or none when the list is empty.
    pub fn set_available(&self, claims: Vec<ClaimRecord>) {
        let mut state = self.state.lock();
        state.claims = claims;
        let preferred = if state.populated { state.current.clone() } else { state.persisted.take() };
        state.populated = true;
        let current = preferred.filter(|id| state.index_of(id).is_some()).or_else(|| state.first_id());
        state.current = current;
        self.scope.set(state.current.clone());
        tracing::info!(
            count = state.claims.len(),
            current = state.current.as_deref().unwrap_or("-"),
            "claims list updated"
        );
        self.persist(&state);
    }

    /// Select `claim_id`. Returns false, changing nothing, if it is not a
    /// known claim.
    pub fn switch_to(&self, claim_id: &ClaimId) -> bool {
        let mut state = self.state.lock();
        let Some(idx) = state.index_of(claim_id) else {
            tracing::warn!(%claim_id, "switch to unknown claim");
            return false;
        };
        let now = self.clock.epoch_micros();
        state.claims[idx].touch(now);
        state.current = Some(claim_id.clone());
        self.scope.set(state.current.clone());
        tracing::info!(%claim_id, name = %state.claims[idx].claim_name, "switched claim");
        self.persist(&state);
        true
    }

    /// Drop a claim. Removing the current claim selects the first
    /// remaining one. Returns whether the claim was present.
    pub fn remove(&self, claim_id: &ClaimId) -> bool {
        let mut state = self.state.lock();
        let Some(idx) = state.index_of(claim_id) else {
            return false;
        };
        state.claims.remove(idx);
        if state.current.as_ref() == Some(claim_id) {
            state.current = state.first_id();
            self.scope.set(state.current.clone());
        }
        tracing::info!(%claim_id, current = state.current.as_deref().unwrap_or("-"), "removed claim");
        self.persist(&state);
        true
    }

    /// Apply `f` to the record for `claim_id`. Returns whether it exists.
    pub fn update_claim(&self, claim_id: &ClaimId, f: impl FnOnce(&mut ClaimRecord)) -> bool {
        let mut state = self.state.lock();
        let Some(idx) = state.index_of(claim_id) else {
            return false;
        };
        f(&mut state.claims[idx]);
        self.persist(&state);
        true
    }

    pub fn current(&self) -> Option<ClaimRecord> {
        let state = self.state.lock();
        let idx = state.index_of(state.current.as_deref()?)?;
        state.claims.get(idx).cloned()
    }

    pub fn current_id(&self) -> Option<ClaimId> {
        self.state.lock().current.clone()
    }

    pub fn claims(&self) -> Vec<ClaimRecord> {
        self.state.lock().claims.clone()
    }

    pub fn get(&self, claim_id: &str) -> Option<ClaimRecord> {
        let state = self.state.lock();
        state.index_of(claim_id).and_then(|idx| state.claims.get(idx).cloned())
    }

    pub fn contains(&self, claim_id: &str) -> bool {
        self.state.lock().index_of(claim_id).is_some()
    }

    pub fn has_multiple(&self) -> bool {
        self.state.lock().claims.len() > 1
    }

    /// `3 claims available, current: Alpha`
    pub fn summary(&self) -> String {
        let count = self.state.lock().claims.len();
        if count == 0 {
            return "No claims available".to_string();
        }
        let current = self.current().map(|c| c.claim_name).unwrap_or_else(|| "None".to_string());
        format!("{count} claims available, current: {current}")
    }

    /// Header data for the current claim.
    pub fn current_info(&self, tile_cost: &TileCostTable) -> Option<ClaimInfo> {
        self.current().map(|c| ClaimInfo {
            supplies_per_hour: tile_cost.supplies_per_hour(c.tile_count),
            claim_id: c.claim_id,
            claim_name: c.claim_name,
            treasury: c.treasury,
            supplies: c.supplies,
            tile_count: c.tile_count,
        })
    }

    /// Write the current list and selection to the preference file.
    pub fn save(&self) {
        self.persist(&self.state.lock());
    }

    fn persist(&self, state: &ClaimState) {
        let now = DateTime::<Utc>::from_timestamp_micros(self.clock.epoch_micros()).unwrap_or_default();
        let result = self.prefs.update(|prefs| {
            prefs.set_claims(state.claims.clone(), state.current.clone(), now);
        });
        if let Err(e) = result {
            tracing::warn!(path = %self.prefs.path().display(), error = %e, "failed to persist claims");
        }
    }
}

/// Query every claim `player_id` is a member of. Claims whose detail
/// queries fail are skipped.
pub async fn fetch_all_claims<U: UpstreamAdapter>(
    session: &Session<U>,
    player_id: &PlayerId,
) -> Result<Vec<ClaimRecord>, QueryError> {
    let memberships = session.query(&queries::claims_for_player(player_id)).await?;
    let mut claims: Vec<ClaimRecord> = Vec::with_capacity(memberships.len());
    for membership in &memberships {
        let claim_id = match membership.entity_id("claim_entity_id") {
            Ok(id) => ClaimId::from(id.as_str()),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed claim membership");
                continue;
            }
        };
        if claims.iter().any(|c| c.claim_id == claim_id) {
            continue;
        }
        match fetch_claim_details(session, &claim_id).await {
            Ok(record) => claims.push(record),
            Err(e) => tracing::warn!(%claim_id, error = %e, "skipping claim, detail query failed"),
        }
    }
    tracing::info!(%player_id, count = claims.len(), "fetched claims");
    Ok(claims)
}

/// Name from `claim_state`, treasury and supplies from `claim_local_state`.
pub async fn fetch_claim_details<U: UpstreamAdapter>(
    session: &Session<U>,
    claim_id: &ClaimId,
) -> Result<ClaimRecord, QueryError> {
    let state = session.query(&queries::claim_state(claim_id)).await?;
    let local = session.query(&queries::claim_local_state(claim_id)).await?;

    let mut record = ClaimRecord::new(claim_id.clone(), "Unknown Claim");
    if let Some(name) = state.first().and_then(|row| row.str("name").ok()) {
        record.set_name(name);
    }
    if let Some(row) = local.first() {
        apply_local_state(&mut record, row);
    }
    Ok(record)
}

/// Copy treasury, supplies and tile count from a `claim_local_state` row.
pub fn apply_local_state(record: &mut ClaimRecord, row: &Row) {
    record.set_treasury(row.i64_or("treasury", 0));
    record.set_supplies(row.i64_or("supplies", 0));
    record.set_tile_count(row.i64_or("num_tiles", 0));
}

#[cfg(test)]
#[path = "claims_tests.rs"]
mod tests;
