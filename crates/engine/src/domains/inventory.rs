// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Claim inventory consolidated by item name across every building.

use super::{fetch_buildings, Buildings, Skipped, SourceContext};
use crate::cache::DomainSource;
use crate::queries;
use crate::reference::ReferenceData;
use async_trait::async_trait;
use cw_adapters::{QueryError, UpstreamAdapter};
use cw_core::{Domain, DomainUpdate, Event, InventoryItem};
use cw_wire::Row;
use serde_json::Value;
use std::collections::BTreeMap;

pub struct InventorySource<U: UpstreamAdapter> {
    ctx: SourceContext<U>,
}

impl<U: UpstreamAdapter> InventorySource<U> {
    pub fn new(ctx: SourceContext<U>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<U: UpstreamAdapter> DomainSource for InventorySource<U> {
    type Raw = Vec<InventoryItem>;
    type Row = InventoryItem;

    const DOMAIN: Domain = Domain::Inventory;

    async fn fetch(&self) -> Result<Vec<InventoryItem>, QueryError> {
        let claim_id = self.ctx.scope.require()?;
        let inventories_q = queries::claim_inventories(&claim_id);
        let (buildings, inventories) =
            tokio::try_join!(fetch_buildings(&self.ctx, &claim_id), self.ctx.session.query(&inventories_q))?;
        Ok(consolidate(&inventories, &buildings, &self.ctx.reference))
    }

    fn render(&self, raw: &Vec<InventoryItem>, _now_micros: i64) -> Vec<InventoryItem> {
        raw.clone()
    }

    fn event(update: DomainUpdate<InventoryItem>) -> Event {
        Event::InventoryUpdate(update)
    }
}

/// Sum every occupied pocket by item name, tracking per-container
/// quantities. Sorted by item name.
pub(crate) fn consolidate(
    inventories: &[Row],
    buildings: &Buildings,
    reference: &ReferenceData,
) -> Vec<InventoryItem> {
    let mut skipped = Skipped::new(Domain::Inventory);
    let mut items: BTreeMap<String, InventoryItem> = BTreeMap::new();

    for row in inventories {
        let owner = match row.entity_id("owner_entity_id") {
            Ok(owner) => owner,
            Err(e) => {
                skipped.record(e);
                continue;
            }
        };
        let container = buildings.name(&owner);

        for (item_id, quantity) in row.array("pockets").iter().filter_map(pocket_contents) {
            let (name, tier, tag) = match reference.item(item_id) {
                Some(info) => (info.name.clone(), info.tier, info.tag.clone()),
                None => (format!("Unknown Item {item_id}"), 0, String::new()),
            };
            let item = items.entry(name.clone()).or_insert_with(|| InventoryItem {
                name,
                tier,
                tag,
                total_quantity: 0,
                containers: BTreeMap::new(),
            });
            item.total_quantity += quantity;
            *item.containers.entry(container.clone()).or_insert(0) += quantity;
        }
    }

    items.into_values().collect()
}

/// `[slot_info, [tag, [item_id, quantity, ...]]]`; empty pockets carry no
/// item array. A non-numeric quantity counts as zero.
fn pocket_contents(pocket: &Value) -> Option<(i64, i64)> {
    let contents = pocket.as_array()?.get(1)?.as_array()?;
    let item = contents.get(1)?.as_array()?;
    let item_id = item.first()?.as_i64()?;
    let quantity = item.get(1).and_then(Value::as_i64).unwrap_or(0);
    Some((item_id, quantity))
}

#[cfg(test)]
#[path = "inventory_tests.rs"]
mod tests;
