// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn tables() -> ReferenceTables {
    let mut t = ReferenceTables::default();
    t.insert("resource_desc", vec![json!({"id": 1, "name": "Rough Log", "tier": 1, "tag": "Log"})]);
    t.insert(
        "item_desc",
        vec![
            json!({"id": 1, "name": "Log", "tier": 2, "tag": "Wood"}),
            json!({"id": 2, "name": "Plank", "tier": 1, "tag": "Plank"}),
            json!({"name": "no id"}),
        ],
    );
    t.insert("cargo_desc", vec![json!({"id": 3, "name": "Crate", "tier": 3})]);
    t.insert(
        "crafting_recipe_desc",
        vec![json!({
            "id": 10,
            "name": "Saw {0}",
            "time_requirement": 60.0,
            "actions_required": 250,
            "crafted_item_stacks": [[2, 4, [0, []]], ["bad"]]
        })],
    );
    t.insert("building_desc", vec![json!({"id": 5, "name": "Carpentry Station"})]);
    t.insert("traveler_desc", vec![json!({"id": 7, "name": "Old Name"})]);
    t.insert("npc_desc", vec![json!({"npc_type": 7, "name": "Rumbagh"})]);
    t.insert(
        "claim_tile_cost",
        vec![json!({"tile_count": 1, "cost_per_tile": 0.5}), json!({"tile_count": 100, "cost_per_tile": 1.0})],
    );
    t
}

#[test]
fn later_item_tables_override_earlier() {
    let data = ReferenceData::from_tables(&tables());
    let log = data.item(1).unwrap();
    assert_eq!((log.name.as_str(), log.tier, log.tag.as_str()), ("Log", 2, "Wood"));
    assert_eq!(data.item(3).unwrap().tag, "");
    assert_eq!(data.item_name(99), "Unknown Item 99");
}

#[test]
fn recipes_keep_stacks_and_timings() {
    let data = ReferenceData::from_tables(&tables());
    let recipe = data.recipe(10).unwrap();
    assert_eq!(recipe.crafted, vec![(2, 4)]);
    assert_eq!(recipe.time_requirement, Some(60.0));
    assert_eq!(recipe.actions_required, Some(250));
}

#[test]
fn names_fall_back_when_missing() {
    let data = ReferenceData::from_tables(&tables());
    assert_eq!(data.building_name(5), Some("Carpentry Station"));
    assert_eq!(data.building_name(6), None);
    assert_eq!(data.traveler_name(7), "Rumbagh");
    assert_eq!(data.traveler_name(8), "Traveler 8");
}

#[test]
fn tile_cost_comes_from_the_store() {
    let data = ReferenceData::from_tables(&tables());
    assert_eq!(data.tile_cost().cost_per_tile(150), 1.0);
    assert_eq!(ReferenceData::default().tile_cost(), &TileCostTable::default());
}
