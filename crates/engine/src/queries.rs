// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SQL text for one-off queries and subscriptions.
//!
//! Ids are substituted as quoted literals.

use cw_core::quote_literal;

fn q(id: &str) -> String {
    format!("'{}'", quote_literal(id))
}

pub fn player_by_username(username: &str) -> String {
    format!(
        "SELECT * FROM player_lowercase_username_state WHERE username_lowercase = {};",
        q(&username.to_lowercase())
    )
}

pub fn claims_for_player(player_id: &str) -> String {
    format!("SELECT * FROM claim_member_state WHERE player_entity_id = {};", q(player_id))
}

pub fn claim_members(claim_id: &str) -> String {
    format!("SELECT * FROM claim_member_state WHERE claim_entity_id = {};", q(claim_id))
}

pub fn claim_state(claim_id: &str) -> String {
    format!("SELECT * FROM claim_state WHERE entity_id = {};", q(claim_id))
}

pub fn claim_local_state(claim_id: &str) -> String {
    format!("SELECT * FROM claim_local_state WHERE entity_id = {};", q(claim_id))
}

pub fn claim_buildings(claim_id: &str) -> String {
    format!("SELECT * FROM building_state WHERE claim_entity_id = {};", q(claim_id))
}

pub fn claim_nicknames(claim_id: &str) -> String {
    format!(
        "SELECT building_nickname_state.* FROM building_nickname_state \
         JOIN building_state ON building_state.entity_id = building_nickname_state.entity_id \
         WHERE building_state.claim_entity_id = {};",
        q(claim_id)
    )
}

pub fn claim_inventories(claim_id: &str) -> String {
    format!(
        "SELECT inventory_state.* FROM inventory_state \
         JOIN building_state ON inventory_state.owner_entity_id = building_state.entity_id \
         WHERE building_state.claim_entity_id = {};",
        q(claim_id)
    )
}

pub fn passive_crafts(claim_id: &str) -> String {
    format!(
        "SELECT passive_craft_state.* FROM passive_craft_state \
         JOIN building_state ON passive_craft_state.building_entity_id = building_state.entity_id \
         WHERE building_state.claim_entity_id = {};",
        q(claim_id)
    )
}

pub fn progressive_actions(claim_id: &str) -> String {
    format!(
        "SELECT progressive_action_state.* FROM progressive_action_state \
         JOIN building_state ON progressive_action_state.building_entity_id = building_state.entity_id \
         WHERE building_state.claim_entity_id = {};",
        q(claim_id)
    )
}

pub fn public_progressive_actions(claim_id: &str) -> String {
    format!(
        "SELECT public_progressive_action_state.* FROM public_progressive_action_state \
         JOIN building_state ON public_progressive_action_state.building_entity_id = building_state.entity_id \
         WHERE building_state.claim_entity_id = {};",
        q(claim_id)
    )
}

pub fn traveler_tasks(player_id: &str) -> String {
    format!("SELECT * FROM traveler_task_state WHERE player_entity_id = {};", q(player_id))
}

pub fn traveler_task_descs(player_id: &str) -> String {
    format!(
        "SELECT traveler_task_desc.* FROM traveler_task_desc \
         JOIN traveler_task_state ON traveler_task_state.task_id = traveler_task_desc.id \
         WHERE traveler_task_state.player_entity_id = {};",
        q(player_id)
    )
}

pub const TRAVELER_TASK_TIMERS: &str = "SELECT * FROM traveler_task_loop_timer;";

pub fn player_claim_states(player_id: &str) -> String {
    format!(
        "SELECT claim_state.* FROM claim_state \
         JOIN claim_member_state ON claim_state.entity_id = claim_member_state.claim_entity_id \
         WHERE claim_member_state.player_entity_id = {};",
        q(player_id)
    )
}

pub fn player_claim_local_states(player_id: &str) -> String {
    format!(
        "SELECT claim_local_state.* FROM claim_local_state \
         JOIN claim_member_state ON claim_local_state.entity_id = claim_member_state.claim_entity_id \
         WHERE claim_member_state.player_entity_id = {};",
        q(player_id)
    )
}

#[cfg(test)]
#[path = "queries_tests.rs"]
mod tests;
