// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Active (progressive, effort-based) crafting in the claim's buildings.

use super::{fetch_buildings, fetch_members, Buildings, Members, Skipped, SourceContext};
use crate::cache::DomainSource;
use crate::queries;
use crate::reference::ReferenceData;
use async_trait::async_trait;
use cw_adapters::{QueryError, UpstreamAdapter};
use cw_core::crafting::{clamp_progress, clean_recipe_name};
use cw_core::{ActiveCraftingOperation, Domain, DomainUpdate, EntityId, Event, ProgressiveOperation};
use cw_wire::{DataShapeError, Row};
use std::collections::HashSet;

/// Effort per unit when the recipe does not say.
const DEFAULT_ACTIONS_REQUIRED: i64 = 100;

/// Fields that may carry the preparation flag, first present wins.
const PREPARATION_KEYS: [&str; 3] = ["preparation", "preparing", "is_preparing"];

pub struct ActiveCraftingSource<U: UpstreamAdapter> {
    ctx: SourceContext<U>,
}

impl<U: UpstreamAdapter> ActiveCraftingSource<U> {
    pub fn new(ctx: SourceContext<U>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<U: UpstreamAdapter> DomainSource for ActiveCraftingSource<U> {
    type Raw = Vec<ProgressiveOperation>;
    type Row = ActiveCraftingOperation;

    const DOMAIN: Domain = Domain::ActiveCrafting;

    async fn fetch(&self) -> Result<Vec<ProgressiveOperation>, QueryError> {
        let claim_id = self.ctx.scope.require()?;
        let (actions_q, public_q) =
            (queries::progressive_actions(&claim_id), queries::public_progressive_actions(&claim_id));
        let (buildings, members, actions, public) = tokio::try_join!(
            fetch_buildings(&self.ctx, &claim_id),
            fetch_members(&self.ctx, &claim_id),
            self.ctx.session.query(&actions_q),
            self.ctx.session.query(&public_q),
        )?;
        let public: HashSet<EntityId> =
            public.iter().filter_map(|row| row.entity_id("entity_id").ok()).collect();
        Ok(resolve(&actions, &public, &buildings, &members, &self.ctx.reference))
    }

    fn render(&self, raw: &Vec<ProgressiveOperation>, now_micros: i64) -> Vec<ActiveCraftingOperation> {
        raw.iter().map(|op| op.to_row(now_micros)).collect()
    }

    fn event(update: DomainUpdate<ActiveCraftingOperation>) -> Event {
        Event::ActiveCraftingUpdate(update)
    }
}

pub(crate) fn resolve(
    actions: &[Row],
    public: &HashSet<EntityId>,
    buildings: &Buildings,
    members: &Members,
    reference: &ReferenceData,
) -> Vec<ProgressiveOperation> {
    let mut skipped = Skipped::new(Domain::ActiveCrafting);
    let mut ops = Vec::with_capacity(actions.len());
    for row in actions {
        match resolve_row(row, public, buildings, members, reference) {
            Ok(Some(resolved)) => ops.extend(resolved),
            Ok(None) => {}
            Err(e) => skipped.record(e),
        }
    }
    ops.sort_by(|a, b| a.item_name.cmp(&b.item_name).then_with(|| a.crafter.cmp(&b.crafter)));
    ops
}

fn resolve_row(
    row: &Row,
    public: &HashSet<EntityId>,
    buildings: &Buildings,
    members: &Members,
    reference: &ReferenceData,
) -> Result<Option<Vec<ProgressiveOperation>>, DataShapeError> {
    let entity_id = row.entity_id("entity_id")?;
    let owner = row.entity_id("owner_entity_id")?;
    if !members.admits(&owner) {
        return Ok(None);
    }
    let recipe_id = row.i64("recipe_id")?;
    let building = row.entity_id("building_entity_id")?;
    let craft_count = row.i64_or("craft_count", 1);

    let recipe = reference.recipe(recipe_id);
    let recipe_name = recipe
        .map(|r| clean_recipe_name(&r.name))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("Recipe {recipe_id}"));
    let actions_required =
        recipe.and_then(|r| r.actions_required).unwrap_or(DEFAULT_ACTIONS_REQUIRED);
    let (current_progress, total_progress) =
        clamp_progress(row.i64_or("progress", 0), actions_required, craft_count);

    let base = ProgressiveOperation {
        accept_help: public.contains(&entity_id),
        entity_id,
        recipe_id,
        owner_id: owner.clone(),
        function_type: row.i64_or("function_type", 0),
        item_name: recipe_name.clone(),
        tier: 0,
        tag: String::new(),
        quantity: craft_count,
        crafter: members.name(&owner),
        building_name: buildings.name(&building),
        recipe_name,
        current_progress,
        total_progress,
        lock_expiration_micros: row.timestamp_micros("lock_expiration"),
        preparation: PREPARATION_KEYS
            .iter()
            .find(|key| row.contains(key))
            .is_some_and(|key| row.bool_or(key, false)),
    };

    let stacks = recipe.map(|r| r.crafted.as_slice()).unwrap_or_default();
    if stacks.is_empty() {
        return Ok(Some(vec![base]));
    }
    let ops = stacks
        .iter()
        .map(|&(item_id, quantity)| {
            let (item_name, tier, tag) = match reference.item(item_id) {
                Some(item) => (item.name.clone(), item.tier, item.tag.clone()),
                None => (format!("Unknown Item {item_id}"), 0, String::new()),
            };
            ProgressiveOperation {
                item_name,
                tier,
                tag,
                quantity: quantity.saturating_mul(craft_count),
                ..base.clone()
            }
        })
        .collect();
    Ok(Some(ops))
}

#[cfg(test)]
#[path = "active_tests.rs"]
mod tests;
