// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Display-ready rows published to consumers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::crafting::ProgressiveStatus;
use crate::id::{ClaimId, EntityId};

/// One item consolidated across every container in the claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    pub tier: i64,
    pub tag: String,
    pub total_quantity: i64,
    /// Container display name to quantity held there
    pub containers: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraftingOperation {
    pub entity_id: EntityId,
    pub item_name: String,
    pub tier: i64,
    pub tag: String,
    pub quantity: i64,
    pub crafter: String,
    pub building_name: String,
    pub recipe_name: String,
    pub status_code: i64,
    pub remaining_seconds: f64,
    pub time_remaining: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveCraftingOperation {
    pub entity_id: EntityId,
    pub item_name: String,
    pub tier: i64,
    pub tag: String,
    pub quantity: i64,
    pub crafter: String,
    pub building_name: String,
    pub recipe_name: String,
    pub current_progress: i64,
    pub total_progress: i64,
    pub remaining_effort: String,
    pub progress_value: String,
    pub accept_help: String,
    pub preparation: bool,
    pub lock_expiration_micros: Option<i64>,
    pub status: ProgressiveStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRow {
    pub task_id: i64,
    pub entity_id: EntityId,
    pub description: String,
    pub completed: bool,
    /// `Wood x5, Stone x2` or `No items required`
    pub required_items: String,
}

/// Tasks offered by one traveler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelerTasks {
    pub traveler_id: i64,
    pub traveler: String,
    pub tasks: Vec<TaskRow>,
    pub completed_count: usize,
    pub total_count: usize,
    pub complete: bool,
}

impl TravelerTasks {
    pub fn new(traveler_id: i64, traveler: impl Into<String>, tasks: Vec<TaskRow>) -> Self {
        let completed_count = tasks.iter().filter(|t| t.completed).count();
        let total_count = tasks.len();
        Self {
            traveler_id,
            traveler: traveler.into(),
            tasks,
            completed_count,
            total_count,
            complete: completed_count == total_count,
        }
    }
}

/// Header data for the selected claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimInfo {
    pub claim_id: ClaimId,
    pub claim_name: String,
    pub treasury: i64,
    pub supplies: i64,
    pub tile_count: i64,
    pub supplies_per_hour: f64,
}
