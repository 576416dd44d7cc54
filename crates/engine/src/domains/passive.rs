// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Passive (timed) crafting in the claim's buildings.

use super::{fetch_buildings, fetch_members, Buildings, Members, Skipped, SourceContext};
use crate::cache::DomainSource;
use crate::queries;
use crate::reference::ReferenceData;
use async_trait::async_trait;
use cw_adapters::{QueryError, UpstreamAdapter};
use cw_core::crafting::clean_recipe_name;
use cw_core::{CraftingOperation, Domain, DomainUpdate, Event, PassiveOperation};
use cw_wire::{DataShapeError, Row};

pub struct PassiveCraftingSource<U: UpstreamAdapter> {
    ctx: SourceContext<U>,
}

impl<U: UpstreamAdapter> PassiveCraftingSource<U> {
    pub fn new(ctx: SourceContext<U>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<U: UpstreamAdapter> DomainSource for PassiveCraftingSource<U> {
    type Raw = Vec<PassiveOperation>;
    type Row = CraftingOperation;

    const DOMAIN: Domain = Domain::PassiveCrafting;

    async fn fetch(&self) -> Result<Vec<PassiveOperation>, QueryError> {
        let claim_id = self.ctx.scope.require()?;
        let crafts_q = queries::passive_crafts(&claim_id);
        let (buildings, members, crafts) = tokio::try_join!(
            fetch_buildings(&self.ctx, &claim_id),
            fetch_members(&self.ctx, &claim_id),
            self.ctx.session.query(&crafts_q),
        )?;
        Ok(resolve(&crafts, &buildings, &members, &self.ctx.reference))
    }

    fn render(&self, raw: &Vec<PassiveOperation>, now_micros: i64) -> Vec<CraftingOperation> {
        raw.iter().map(|op| op.to_row(now_micros)).collect()
    }

    fn event(update: DomainUpdate<CraftingOperation>) -> Event {
        Event::CraftingUpdate(update)
    }
}

pub(crate) fn resolve(
    crafts: &[Row],
    buildings: &Buildings,
    members: &Members,
    reference: &ReferenceData,
) -> Vec<PassiveOperation> {
    let mut skipped = Skipped::new(Domain::PassiveCrafting);
    let mut ops = Vec::with_capacity(crafts.len());
    for row in crafts {
        match resolve_row(row, buildings, members, reference) {
            Ok(Some(resolved)) => ops.extend(resolved),
            Ok(None) => {}
            Err(e) => skipped.record(e),
        }
    }
    ops.sort_by(|a, b| a.item_name.cmp(&b.item_name).then_with(|| a.crafter.cmp(&b.crafter)));
    ops
}

/// One operation per crafted item stack; `None` for non-members.
fn resolve_row(
    row: &Row,
    buildings: &Buildings,
    members: &Members,
    reference: &ReferenceData,
) -> Result<Option<Vec<PassiveOperation>>, DataShapeError> {
    let entity_id = row.entity_id("entity_id")?;
    let owner = row.entity_id("owner_entity_id")?;
    if !members.admits(&owner) {
        return Ok(None);
    }
    let recipe_id = row.i64("recipe_id")?;
    let building = row.entity_id("building_entity_id")?;

    let base = PassiveOperation {
        entity_id,
        item_name: String::new(),
        tier: 0,
        tag: String::new(),
        quantity: 1,
        crafter: members.name(&owner),
        building_name: buildings.name(&building),
        recipe_name: format!("Unknown Recipe {recipe_id}"),
        status_code: row.tag("status").unwrap_or(0),
        started_at_micros: row.timestamp_micros("timestamp"),
        duration_secs: None,
    };

    let Some(recipe) = reference.recipe(recipe_id) else {
        return Ok(Some(vec![PassiveOperation { item_name: format!("Recipe {recipe_id}"), ..base }]));
    };
    let recipe_name = clean_recipe_name(&recipe.name);
    let base = PassiveOperation {
        recipe_name: recipe_name.clone(),
        duration_secs: recipe.time_requirement,
        ..base
    };
    if recipe.crafted.is_empty() {
        return Ok(Some(vec![PassiveOperation { item_name: recipe_name, ..base }]));
    }

    let ops = recipe
        .crafted
        .iter()
        .map(|&(item_id, quantity)| {
            let (item_name, tier, tag) = match reference.item(item_id) {
                Some(item) => (item.name.clone(), item.tier, item.tag.clone()),
                None => (format!("Unknown Item {item_id}"), 0, String::new()),
            };
            PassiveOperation { item_name, tier, tag, quantity, ..base.clone() }
        })
        .collect();
    Ok(Some(ops))
}

#[cfg(test)]
#[path = "passive_tests.rs"]
mod tests;
