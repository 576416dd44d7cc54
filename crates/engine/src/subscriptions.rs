// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The subscription set for one player and claim.

use crate::queries;
use cw_core::{ClaimId, Domain, PlayerId};

/// One subscribed query and the domain it feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub query: String,
    pub domain: Domain,
}

impl Subscription {
    fn new(domain: Domain, query: impl Into<String>) -> Self {
        Self { query: query.into(), domain }
    }
}

/// Build the full subscription set. Replaced wholesale whenever the claim
/// changes.
pub fn build(player_id: &PlayerId, claim_id: &ClaimId) -> Vec<Subscription> {
    let (p, c) = (player_id.as_str(), claim_id.as_str());
    vec![
        Subscription::new(Domain::Tasks, queries::TRAVELER_TASK_TIMERS),
        Subscription::new(Domain::Tasks, queries::traveler_tasks(p)),
        Subscription::new(Domain::Inventory, queries::claim_buildings(c)),
        Subscription::new(Domain::Claim, queries::claim_members(c)),
        Subscription::new(Domain::Claim, queries::player_claim_states(p)),
        Subscription::new(Domain::Claim, queries::player_claim_local_states(p)),
        Subscription::new(Domain::Tasks, queries::traveler_task_descs(p)),
        Subscription::new(Domain::Inventory, queries::claim_nicknames(c)),
        Subscription::new(Domain::Inventory, queries::claim_inventories(c)),
        Subscription::new(Domain::ActiveCrafting, queries::progressive_actions(c)),
        Subscription::new(Domain::ActiveCrafting, queries::public_progressive_actions(c)),
        Subscription::new(Domain::PassiveCrafting, queries::passive_crafts(c)),
    ]
}

pub fn query_strings(subscriptions: &[Subscription]) -> Vec<String> {
    subscriptions.iter().map(|s| s.query.clone()).collect()
}

#[cfg(test)]
#[path = "subscriptions_tests.rs"]
mod tests;
