// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only reference data bundle.
//!
//! Built once at startup from the raw reference tables and shared as
//! `Arc<ReferenceData>` by every domain source.

use cw_core::TileCostTable;
use cw_storage::ReferenceTables;
use cw_wire::Row;
use serde_json::Value;
use std::collections::HashMap;

/// Item tables in lookup precedence order; later tables override earlier ones.
const ITEM_TABLES: [&str; 3] = ["resource_desc", "item_desc", "cargo_desc"];

#[derive(Debug, Clone, PartialEq)]
pub struct ItemInfo {
    pub name: String,
    pub tier: i64,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecipeInfo {
    pub name: String,
    /// Seconds a passive craft takes
    pub time_requirement: Option<f64>,
    /// Effort a progressive craft takes per unit
    pub actions_required: Option<i64>,
    /// `(item_id, quantity)` per produced stack
    pub crafted: Vec<(i64, i64)>,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    items: HashMap<i64, ItemInfo>,
    recipes: HashMap<i64, RecipeInfo>,
    buildings: HashMap<i64, String>,
    travelers: HashMap<i64, String>,
    tile_cost: TileCostTable,
}

impl ReferenceData {
    pub fn from_tables(tables: &ReferenceTables) -> Self {
        let mut items = HashMap::new();
        for table in ITEM_TABLES {
            for row in rows(tables, table) {
                let Ok(id) = row.i64("id") else { continue };
                items.insert(
                    id,
                    ItemInfo {
                        name: row.str_or("name", "").to_string(),
                        tier: row.i64_or("tier", 0),
                        tag: row.str_or("tag", "").to_string(),
                    },
                );
            }
        }

        let mut recipes = HashMap::new();
        for row in rows(tables, "crafting_recipe_desc") {
            let Ok(id) = row.i64("id") else { continue };
            recipes.insert(
                id,
                RecipeInfo {
                    name: row.str_or("name", "").to_string(),
                    time_requirement: row.get("time_requirement").and_then(Value::as_f64),
                    actions_required: row.i64("actions_required").ok(),
                    crafted: stacks(row.array("crafted_item_stacks")),
                },
            );
        }

        let buildings: HashMap<i64, String> = rows(tables, "building_desc")
            .filter_map(|row| Some((row.i64("id").ok()?, row.str("name").ok()?.to_string())))
            .collect();

        // npc_desc wins over the legacy traveler_desc table
        let mut travelers = HashMap::new();
        for (table, key) in [("traveler_desc", "id"), ("npc_desc", "npc_type")] {
            for row in rows(tables, table) {
                if let (Ok(id), Ok(name)) = (row.i64(key), row.str("name")) {
                    travelers.insert(id, name.to_string());
                }
            }
        }

        let tile_cost = TileCostTable::new(
            rows(tables, "claim_tile_cost")
                .filter_map(|row| {
                    Some((row.i64("tile_count").ok()?, row.get("cost_per_tile")?.as_f64()?))
                })
                .collect(),
        );

        tracing::debug!(
            items = items.len(),
            recipes = recipes.len(),
            buildings = buildings.len(),
            travelers = travelers.len(),
            "built reference bundle"
        );
        Self { items, recipes, buildings, travelers, tile_cost }
    }

    pub fn item(&self, id: i64) -> Option<&ItemInfo> {
        self.items.get(&id)
    }

    pub fn item_name(&self, id: i64) -> String {
        self.item(id).map(|i| i.name.clone()).unwrap_or_else(|| format!("Unknown Item {id}"))
    }

    pub fn recipe(&self, id: i64) -> Option<&RecipeInfo> {
        self.recipes.get(&id)
    }

    pub fn building_name(&self, description_id: i64) -> Option<&str> {
        self.buildings.get(&description_id).map(String::as_str)
    }

    pub fn traveler_name(&self, id: i64) -> String {
        self.travelers.get(&id).cloned().unwrap_or_else(|| format!("Traveler {id}"))
    }

    pub fn tile_cost(&self) -> &TileCostTable {
        &self.tile_cost
    }
}

fn rows<'a>(tables: &'a ReferenceTables, name: &str) -> impl Iterator<Item = Row> + 'a {
    tables.rows(name).iter().filter_map(|v| Row::from_value(v.clone()).ok())
}

/// `[[item_id, quantity, ...], ...]` into pairs; malformed stacks are dropped.
pub(crate) fn stacks(values: &[Value]) -> Vec<(i64, i64)> {
    values
        .iter()
        .filter_map(|stack| {
            let stack = stack.as_array()?;
            let id = stack.first()?.as_i64()?;
            let qty = stack.get(1).and_then(Value::as_i64).unwrap_or(0);
            Some((id, qty))
        })
        .collect()
}

#[cfg(test)]
#[path = "reference_tests.rs"]
mod tests;
