// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::queries;
use cw_core::SwitchStatus;
use serde_json::json;

#[tokio::test]
async fn switching_rescopes_claim_caches() {
    let mut ctx = primed().await;
    ctx.upstream.clear_queries();

    assert!(ctx.runtime.switch_claim(&ClaimId::from(BETA)).await);

    let events = ctx.drain();
    assert_eq!(
        names(&events),
        [
            "claim_switching",
            "inventory_update",
            "crafting_update",
            "active_crafting_update",
            "claim_switched"
        ]
    );
    assert!(matches!(
        &events[0],
        Event::ClaimSwitching { status: SwitchStatus::Loading, claim_name, .. } if claim_name == "Beta"
    ));
    let update = inventory(&events[1]);
    assert_eq!(update.rows.len(), 1);
    assert_eq!(update.rows[0].name, "Stone");
    assert_eq!(update.rows[0].containers.get("Storage Chest"), Some(&9));

    let Event::ClaimSwitched { status, claim_info, .. } = &events[4] else { unreachable!() };
    assert_eq!(*status, SwitchStatus::Success);
    assert_eq!(claim_info.as_ref().map(|i| i.treasury), Some(7));

    // tasks are player-scoped and stay cached
    assert_eq!(ctx.upstream.query_count(&queries::traveler_tasks(PLAYER)), 0);
    assert!(ctx.runtime.tasks.get_cached().is_some());
}

#[tokio::test]
async fn claim_caches_are_empty_until_the_new_claim_primes() {
    let ctx = primed().await;
    ctx.upstream.clear_queries();
    ctx.upstream.pause();

    let runtime = Arc::clone(&ctx.runtime);
    let switch = tokio::spawn(async move { runtime.switch_claim(&ClaimId::from(BETA)).await });
    until(|| ctx.upstream.query_count(BETA) > 0).await;

    assert!(ctx.runtime.inventory.get_cached().is_none());
    assert!(ctx.runtime.passive.get_cached().is_none());
    assert!(ctx.runtime.active.get_cached().is_none());
    assert!(ctx.runtime.tasks.get_cached().is_some());

    ctx.upstream.release();
    assert!(switch.await.unwrap());
    assert!(ctx.runtime.inventory.get_cached().is_some());
}

#[tokio::test]
async fn refresh_in_flight_during_a_switch_is_not_emitted() {
    let mut ctx = primed().await;
    ctx.upstream.clear_queries();
    ctx.upstream.pause();
    ctx.runtime.refresh(Domain::Inventory);
    assert!(ctx.runtime.inventory.is_fetching());

    let runtime = Arc::clone(&ctx.runtime);
    let switch = tokio::spawn(async move { runtime.switch_claim(&ClaimId::from(BETA)).await });
    until(|| ctx.upstream.query_count(BETA) > 0).await;
    ctx.upstream.release();
    assert!(switch.await.unwrap());
    tokio::time::sleep(Duration::from_millis(20)).await;

    let events = ctx.drain();
    let updates: Vec<_> =
        events.iter().filter(|e| e.name() == "inventory_update").map(inventory).collect();
    assert_eq!(updates.len(), 1);
    assert!(updates[0].success);
    assert_eq!(updates[0].rows[0].name, "Stone");
    assert_eq!(events.last().map(Event::name), Some("claim_switched"));
}

#[tokio::test]
async fn switching_replaces_the_subscription_set() {
    let ctx = primed().await;
    ctx.runtime.resubscribe().await.unwrap();

    ctx.runtime.switch_claim(&ClaimId::from(BETA)).await;

    let subscriptions = ctx.upstream.subscriptions();
    assert_eq!(subscriptions.len(), 2);
    assert!(subscriptions[0].contains(&queries::claim_inventories(ALPHA)));
    assert!(subscriptions[1].contains(&queries::claim_inventories(BETA)));
    assert!(!subscriptions[1].contains(&queries::claim_inventories(ALPHA)));
}

#[tokio::test]
async fn switching_persists_the_selection() {
    let ctx = primed().await;

    ctx.runtime.switch_claim(&ClaimId::from(BETA)).await;

    let saved = ctx.prefs.load().unwrap();
    assert_eq!(saved.last_selected_claim_id, Some(ClaimId::from(BETA)));
    assert!(saved.available_claims.iter().any(|c| c.claim_id == BETA && c.last_accessed.is_some()));
}

#[tokio::test]
async fn switching_to_an_unknown_claim_reports_an_error() {
    let mut ctx = primed().await;

    assert!(!ctx.runtime.switch_claim(&ClaimId::from("9999")).await);

    let events = ctx.drain();
    assert_eq!(names(&events), ["claim_switching", "claim_switched"]);
    let Event::ClaimSwitched { status, error, .. } = &events[1] else { unreachable!() };
    assert_eq!(*status, SwitchStatus::Error);
    assert_eq!(error.as_deref(), Some("unknown claim: 9999"));
    assert_eq!(ctx.runtime.claims().current_id(), Some(ClaimId::from(ALPHA)));
    assert!(ctx.runtime.inventory.get_cached().is_some());
}

#[tokio::test]
async fn switch_fails_when_subscribing_fails() {
    let mut ctx = primed().await;
    ctx.upstream.disconnect();

    assert!(!ctx.runtime.switch_claim(&ClaimId::from(BETA)).await);

    let events = ctx.drain();
    let Event::ClaimSwitched { status, error, .. } = events.last().unwrap() else {
        panic!("expected claim_switched")
    };
    assert_eq!(*status, SwitchStatus::Error);
    assert_eq!(error.as_deref(), Some("subscribe failed: connection closed"));
}

#[tokio::test]
async fn refreshing_the_current_claim_reprimes_it() {
    let mut ctx = primed().await;
    ctx.upstream.clear_queries();

    ctx.runtime.refresh_current_claim().await.unwrap();

    assert_eq!(
        names(&ctx.drain()),
        ["inventory_update", "crafting_update", "active_crafting_update", "claim_info_update"]
    );
    assert_eq!(ctx.upstream.query_count(&queries::claim_inventories(ALPHA)), 1);
}

#[tokio::test]
async fn claims_list_refresh_moves_off_a_lost_claim() {
    let mut ctx = primed().await;
    ctx.upstream.on_query(
        &queries::claims_for_player(PLAYER),
        vec![json!({"claim_entity_id": 1002, "player_entity_id": 42})],
    );

    ctx.runtime.refresh_claims_list().await.unwrap();

    let events = ctx.drain();
    let Event::ClaimsListUpdate { claims, current_claim_id } = &events[0] else {
        panic!("expected claims_list_update")
    };
    assert_eq!(claims.len(), 1);
    assert_eq!(current_claim_id.as_deref(), Some(BETA));
    assert_eq!(inventory(&events[1]).rows[0].name, "Stone");
}

#[tokio::test]
async fn claims_list_refresh_keeps_the_current_claim() {
    let mut ctx = primed().await;

    ctx.runtime.refresh_claims_list().await.unwrap();

    assert_eq!(names(&ctx.drain()), ["claims_list_update"]);
    assert_eq!(ctx.runtime.claims().current_id(), Some(ClaimId::from(ALPHA)));
}

#[tokio::test]
async fn claim_info_refresh_applies_new_values() {
    let mut ctx = primed().await;
    ctx.upstream.on_query(
        &queries::claim_local_state(ALPHA),
        vec![json!({"entity_id": 1001, "treasury": 999, "supplies": 40, "num_tiles": 200})],
    );

    let info = ctx.runtime.refresh_claim_info().await.unwrap().unwrap();

    assert_eq!((info.treasury, info.supplies), (999, 40));
    assert_eq!(ctx.runtime.claims().current().unwrap().treasury, 999);
    assert!(matches!(ctx.drain().as_slice(), [Event::ClaimInfoUpdate(i)] if i.treasury == 999));
}

#[tokio::test]
async fn consumer_claim_refresh_publishes_the_header() {
    let mut ctx = primed().await;
    ctx.upstream.on_query(
        &queries::claim_local_state(ALPHA),
        vec![json!({"entity_id": 1001, "treasury": 321, "supplies": 50, "num_tiles": 200})],
    );

    ctx.runtime.refresh(Domain::Claim);

    let Event::ClaimInfoUpdate(info) = ctx.next_event().await else { panic!("expected header") };
    assert_eq!(info.treasury, 321);
    assert_eq!(ctx.runtime.claims().current().unwrap().treasury, 321);
}

#[tokio::test]
async fn losing_membership_of_the_current_claim_switches_away() {
    let mut ctx = primed().await;
    ctx.upstream.on_query(
        &queries::claims_for_player(PLAYER),
        vec![json!({"claim_entity_id": 1002, "player_entity_id": 42})],
    );

    let removed = ctx.runtime.handle_membership_change().await.unwrap();

    assert_eq!(removed, [ClaimId::from(ALPHA)]);
    assert_eq!(ctx.runtime.claims().current_id(), Some(ClaimId::from(BETA)));
    let events = ctx.drain();
    assert_eq!(events[0].name(), "claims_list_update");
    assert_eq!(inventory(&events[1]).rows[0].name, "Stone");
}

#[tokio::test]
async fn unchanged_membership_is_a_no_op() {
    let mut ctx = primed().await;

    let removed = ctx.runtime.handle_membership_change().await.unwrap();

    assert!(removed.is_empty());
    assert!(ctx.drain().is_empty());
}

#[tokio::test]
async fn losing_every_claim_clears_the_selection() {
    let mut ctx = primed().await;
    ctx.upstream.on_query(&queries::claims_for_player(PLAYER), vec![]);

    let removed = ctx.runtime.handle_membership_change().await.unwrap();

    assert_eq!(removed.len(), 2);
    assert_eq!(ctx.runtime.claims().current_id(), None);
    assert!(ctx.runtime.inventory.last_known().is_none());
    assert_eq!(names(&ctx.drain()), ["claims_list_update"]);
    assert!(matches!(ctx.runtime.resubscribe().await, Err(RuntimeError::NoClaim)));
}
