// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound events published to the consumer.
//!
//! Serialized as `{"type": "...", "data": ...}`. Each domain update carries
//! the full replacement view for that domain, never a delta.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::claim::ClaimRecord;
use crate::display::{
    ActiveCraftingOperation, ClaimInfo, CraftingOperation, InventoryItem, TravelerTasks,
};
use crate::id::ClaimId;

/// What triggered a domain update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateSource {
    /// First fetch after bootstrap or a claim switch
    Prime,
    /// Upstream push notification
    Push,
    /// Consumer-requested refresh
    Refresh,
    /// Progress ticker re-render, no network
    Tick,
}

crate::simple_display! {
    UpdateSource {
        Prime => "prime",
        Push => "push",
        Refresh => "refresh",
        Tick => "tick",
    }
}

/// A full replacement view of one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainUpdate<T> {
    pub rows: Arc<Vec<T>>,
    pub success: bool,
    pub message: String,
    pub is_fresh: bool,
    pub source: UpdateSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Connected,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchStatus {
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Event {
    ConnectionStatus {
        status: ConnectionState,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    InventoryUpdate(DomainUpdate<InventoryItem>),
    CraftingUpdate(DomainUpdate<CraftingOperation>),
    ActiveCraftingUpdate(DomainUpdate<ActiveCraftingOperation>),
    TasksUpdate(DomainUpdate<TravelerTasks>),
    ClaimInfoUpdate(ClaimInfo),
    ClaimsListUpdate {
        claims: Vec<ClaimRecord>,
        current_claim_id: Option<ClaimId>,
    },
    ClaimSwitching {
        status: SwitchStatus,
        claim_id: ClaimId,
        claim_name: String,
    },
    ClaimSwitched {
        status: SwitchStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        claim_id: Option<ClaimId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        claim_info: Option<ClaimInfo>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Error(String),
}

impl Event {
    pub fn connected() -> Self {
        Event::ConnectionStatus { status: ConnectionState::Connected, reason: None }
    }

    pub fn connection_failed(reason: impl Into<String>) -> Self {
        Event::ConnectionStatus { status: ConnectionState::Failed, reason: Some(reason.into()) }
    }

    /// The `type` tag this event serializes with.
    pub fn name(&self) -> &'static str {
        match self {
            Event::ConnectionStatus { .. } => "connection_status",
            Event::InventoryUpdate(_) => "inventory_update",
            Event::CraftingUpdate(_) => "crafting_update",
            Event::ActiveCraftingUpdate(_) => "active_crafting_update",
            Event::TasksUpdate(_) => "tasks_update",
            Event::ClaimInfoUpdate(_) => "claim_info_update",
            Event::ClaimsListUpdate { .. } => "claims_list_update",
            Event::ClaimSwitching { .. } => "claim_switching",
            Event::ClaimSwitched { .. } => "claim_switched",
            Event::Error(_) => "error",
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
