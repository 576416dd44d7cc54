// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Domain sources: upstream queries resolved into display rows.
//!
//! Claim-scoped sources read the current claim from a [`ClaimScope`] at
//! fetch time and fail with `NoClaim` when nothing is selected. Rows
//! missing required fields are skipped, never fatal.

mod active;
mod inventory;
mod passive;
mod tasks;

pub use active::ActiveCraftingSource;
pub use inventory::InventorySource;
pub use passive::PassiveCraftingSource;
pub use tasks::TasksSource;

use crate::claims::ClaimScope;
use crate::queries;
use crate::reference::ReferenceData;
use crate::session::Session;
use cw_adapters::{QueryError, UpstreamAdapter};
use cw_core::{Domain, EntityId};
use cw_wire::{DataShapeError, Row};
use std::collections::HashMap;
use std::sync::Arc;

/// What every claim-scoped source needs.
pub struct SourceContext<U: UpstreamAdapter> {
    pub session: Arc<Session<U>>,
    pub reference: Arc<ReferenceData>,
    pub scope: ClaimScope,
}

impl<U: UpstreamAdapter> Clone for SourceContext<U> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            reference: Arc::clone(&self.reference),
            scope: self.scope.clone(),
        }
    }
}

/// Display names of a claim's buildings, keyed by building entity id.
#[derive(Debug, Default)]
pub(crate) struct Buildings {
    names: HashMap<EntityId, String>,
}

impl Buildings {
    /// Nickname, else the building description name, else a placeholder.
    pub(crate) fn from_rows(buildings: &[Row], nicknames: &[Row], reference: &ReferenceData) -> Self {
        let nicknames: HashMap<EntityId, &str> = nicknames
            .iter()
            .filter_map(|row| {
                let nickname = row.str("nickname").ok().filter(|n| !n.trim().is_empty())?;
                Some((row.entity_id("entity_id").ok()?, nickname))
            })
            .collect();

        let mut names = HashMap::with_capacity(buildings.len());
        for row in buildings {
            let Ok(id) = row.entity_id("entity_id") else { continue };
            let name = match nicknames.get(&id) {
                Some(nickname) => nickname.to_string(),
                None => row
                    .i64("building_description_id")
                    .ok()
                    .and_then(|desc| reference.building_name(desc))
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Unknown Building {id}")),
            };
            names.insert(id, name);
        }
        Self { names }
    }

    pub(crate) fn name(&self, id: &EntityId) -> String {
        self.names.get(id).cloned().unwrap_or_else(|| format!("Unknown Building {id}"))
    }
}

/// Members of a claim: player entity id to user name.
#[derive(Debug, Default)]
pub(crate) struct Members {
    names: HashMap<EntityId, String>,
}

impl Members {
    pub(crate) fn from_rows(rows: &[Row]) -> Self {
        let names = rows
            .iter()
            .filter_map(|row| {
                let id = row.entity_id("player_entity_id").ok()?;
                let name = row.str_or("user_name", "").to_string();
                Some((id, name))
            })
            .collect();
        Self { names }
    }

    /// Whether an operation owned by `owner` belongs in the view. An empty
    /// member list admits everyone.
    pub(crate) fn admits(&self, owner: &EntityId) -> bool {
        self.names.is_empty() || self.names.contains_key(owner)
    }

    pub(crate) fn name(&self, id: &EntityId) -> String {
        self.names
            .get(id)
            .filter(|n| !n.is_empty())
            .cloned()
            .unwrap_or_else(|| format!("Player {id}"))
    }
}

pub(crate) async fn fetch_buildings<U: UpstreamAdapter>(
    ctx: &SourceContext<U>,
    claim_id: &str,
) -> Result<Buildings, QueryError> {
    let (buildings_q, nicknames_q) = (queries::claim_buildings(claim_id), queries::claim_nicknames(claim_id));
    let (buildings, nicknames) =
        tokio::try_join!(ctx.session.query(&buildings_q), ctx.session.query(&nicknames_q))?;
    Ok(Buildings::from_rows(&buildings, &nicknames, &ctx.reference))
}

pub(crate) async fn fetch_members<U: UpstreamAdapter>(
    ctx: &SourceContext<U>,
    claim_id: &str,
) -> Result<Members, QueryError> {
    let rows = ctx.session.query(&queries::claim_members(claim_id)).await?;
    Ok(Members::from_rows(&rows))
}

/// Counts rows dropped for shape errors and logs once per fetch.
#[derive(Debug)]
pub(crate) struct Skipped {
    domain: Domain,
    count: usize,
}

impl Skipped {
    pub(crate) fn new(domain: Domain) -> Self {
        Self { domain, count: 0 }
    }

    pub(crate) fn record(&mut self, error: DataShapeError) {
        tracing::debug!(domain = %self.domain, %error, "skipping row");
        self.count += 1;
    }
}

impl Drop for Skipped {
    fn drop(&mut self) {
        if self.count > 0 {
            tracing::warn!(domain = %self.domain, skipped = self.count, "skipped malformed rows");
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
