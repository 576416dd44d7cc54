// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Upstream tables and the data domains they feed.

use serde::{Deserialize, Serialize};

/// A cached category of game data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Inventory,
    PassiveCrafting,
    ActiveCrafting,
    Tasks,
    /// Claim header data, owned by the claim manager rather than a cache
    Claim,
}

crate::simple_display! {
    Domain {
        Inventory => "inventory",
        PassiveCrafting => "passive_crafting",
        ActiveCrafting => "active_crafting",
        Tasks => "tasks",
        Claim => "claim",
    }
}

impl Domain {
    /// Domains backed by a cache, in priming order.
    pub const CACHED: [Domain; 4] =
        [Domain::Inventory, Domain::PassiveCrafting, Domain::ActiveCrafting, Domain::Tasks];

    /// Whether switching claims invalidates this domain.
    pub fn is_claim_scoped(self) -> bool {
        !matches!(self, Domain::Tasks)
    }
}

/// Upstream tables the router knows how to classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    ClaimState,
    ClaimLocalState,
    ClaimMemberState,
    BuildingState,
    BuildingNicknameState,
    InventoryState,
    PassiveCraftState,
    ProgressiveActionState,
    PublicProgressiveActionState,
    TravelerTaskState,
    TravelerTaskDesc,
    TravelerTaskLoopTimer,
}

impl Table {
    pub const ALL: [Table; 12] = [
        Table::ClaimState,
        Table::ClaimLocalState,
        Table::ClaimMemberState,
        Table::BuildingState,
        Table::BuildingNicknameState,
        Table::InventoryState,
        Table::PassiveCraftState,
        Table::ProgressiveActionState,
        Table::PublicProgressiveActionState,
        Table::TravelerTaskState,
        Table::TravelerTaskDesc,
        Table::TravelerTaskLoopTimer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::ClaimState => "claim_state",
            Table::ClaimLocalState => "claim_local_state",
            Table::ClaimMemberState => "claim_member_state",
            Table::BuildingState => "building_state",
            Table::BuildingNicknameState => "building_nickname_state",
            Table::InventoryState => "inventory_state",
            Table::PassiveCraftState => "passive_craft_state",
            Table::ProgressiveActionState => "progressive_action_state",
            Table::PublicProgressiveActionState => "public_progressive_action_state",
            Table::TravelerTaskState => "traveler_task_state",
            Table::TravelerTaskDesc => "traveler_task_desc",
            Table::TravelerTaskLoopTimer => "traveler_task_loop_timer",
        }
    }

    /// Exact-name lookup; unknown tables return `None`.
    pub fn from_name(name: &str) -> Option<Table> {
        Table::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Domains whose view depends on this table.
    pub fn domains(self) -> &'static [Domain] {
        use Domain::*;
        match self {
            Table::ClaimState | Table::ClaimLocalState => &[Claim],
            Table::ClaimMemberState => &[Claim, PassiveCrafting, ActiveCrafting],
            Table::BuildingState | Table::BuildingNicknameState => {
                &[Inventory, PassiveCrafting, ActiveCrafting]
            }
            Table::InventoryState => &[Inventory],
            Table::PassiveCraftState => &[PassiveCrafting],
            Table::ProgressiveActionState | Table::PublicProgressiveActionState => {
                &[ActiveCrafting]
            }
            Table::TravelerTaskState | Table::TravelerTaskDesc | Table::TravelerTaskLoopTimer => {
                &[Tasks]
            }
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Distinct domains affected by a set of table names, in first-seen order.
pub fn affected_domains<'a>(tables: impl IntoIterator<Item = &'a str>) -> Vec<Domain> {
    let mut out = Vec::new();
    for domain in tables.into_iter().filter_map(Table::from_name).flat_map(|t| t.domains()) {
        if !out.contains(domain) {
            out.push(*domain);
        }
    }
    out
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
