// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::queries;
use cw_wire::PushKind;
use serde_json::json;
use std::collections::BTreeSet;

fn frame(tables: &[&str]) -> PushFrame {
    PushFrame::new(PushKind::Transaction, tables.iter().copied())
}

#[tokio::test]
async fn inventory_push_refreshes_inventory() {
    let mut ctx = primed().await;
    ctx.upstream.clear_queries();

    let domains = ctx.runtime.dispatch(&frame(&["inventory_state"]));

    assert_eq!(domains, [Domain::Inventory]);
    let event = ctx.next_event().await;
    let update = inventory(&event);
    assert_eq!(update.source, UpdateSource::Push);
    assert!(update.success);
    assert_eq!(ctx.upstream.query_count(&queries::claim_inventories(ALPHA)), 1);
}

#[tokio::test]
async fn building_push_fans_out_to_every_building_domain() {
    let mut ctx = primed().await;

    let domains = ctx.runtime.dispatch(&frame(&["building_state", "building_nickname_state"]));

    assert_eq!(domains, [Domain::Inventory, Domain::PassiveCrafting, Domain::ActiveCrafting]);
    let mut seen = BTreeSet::new();
    for _ in 0..3 {
        seen.insert(ctx.next_event().await.name());
    }
    assert_eq!(
        seen,
        BTreeSet::from(["active_crafting_update", "crafting_update", "inventory_update"])
    );
}

#[tokio::test]
async fn unknown_tables_are_ignored() {
    let ctx = primed().await;
    ctx.upstream.clear_queries();

    let domains = ctx.runtime.dispatch(&frame(&["player_state", "chat_message_state"]));

    assert!(domains.is_empty());
    tokio::task::yield_now().await;
    assert!(ctx.upstream.queries().is_empty());
}

#[tokio::test]
async fn pushes_during_a_refresh_join_it() {
    let mut ctx = primed().await;
    ctx.upstream.clear_queries();
    ctx.upstream.pause();

    ctx.runtime.dispatch(&frame(&["inventory_state"]));
    ctx.runtime.dispatch(&frame(&["inventory_state", "inventory_state"]));
    assert!(ctx.runtime.inventory.is_fetching());
    ctx.upstream.release();

    assert_eq!(ctx.next_event().await.name(), "inventory_update");
    assert_eq!(ctx.upstream.query_count(&queries::claim_inventories(ALPHA)), 1);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(ctx.drain().is_empty());
}

#[tokio::test]
async fn claim_state_push_updates_the_header() {
    let mut ctx = primed().await;
    ctx.upstream.on_query(
        &queries::claim_local_state(ALPHA),
        vec![json!({"entity_id": 1001, "treasury": 5, "supplies": 50, "num_tiles": 200})],
    );

    assert_eq!(ctx.runtime.dispatch(&frame(&["claim_local_state"])), [Domain::Claim]);

    let Event::ClaimInfoUpdate(info) = ctx.next_event().await else { panic!("expected header") };
    assert_eq!(info.treasury, 5);
}

#[tokio::test]
async fn shutdown_abandons_a_stuck_header_refresh() {
    let ctx = primed().await;
    ctx.upstream.clear_queries();
    ctx.upstream.pause();

    ctx.runtime.dispatch(&frame(&["claim_local_state"]));
    until(|| !ctx.upstream.queries().is_empty()).await;

    assert!(ctx.runtime.shutdown(Duration::from_millis(300)).await);
}

#[tokio::test]
async fn member_push_drops_a_lost_claim() {
    let mut ctx = primed().await;
    ctx.upstream.on_query(
        &queries::claims_for_player(PLAYER),
        vec![json!({"claim_entity_id": 1002, "player_entity_id": 42})],
    );

    ctx.runtime.dispatch(&frame(&["claim_member_state"]));

    let events = events_until(&mut ctx, "claim_info_update").await;
    assert!(events.iter().any(|e| matches!(
        e,
        Event::ClaimsListUpdate { claims, .. } if claims.len() == 1
    )));
    let Some(Event::ClaimInfoUpdate(info)) = events.last() else { unreachable!() };
    assert_eq!(info.claim_id, BETA);
    assert_eq!(ctx.runtime.claims().current_id(), Some(ClaimId::from(BETA)));
}

#[tokio::test]
async fn router_consumes_subscription_pushes() {
    let mut ctx = primed().await;
    ctx.runtime.resubscribe().await.unwrap();
    let pushes = ctx.runtime.take_pushes().unwrap();
    let router = tokio::spawn(Arc::clone(&ctx.runtime).route(pushes));

    assert!(ctx.upstream.push(frame(&["traveler_task_state"])).await);

    let Event::TasksUpdate(update) = ctx.next_event().await else { panic!("expected tasks") };
    assert_eq!(update.source, UpdateSource::Push);

    assert!(ctx.runtime.shutdown(Duration::from_secs(1)).await);
    router.await.unwrap();
}

#[tokio::test]
async fn pushes_are_only_taken_once() {
    let ctx = setup().await;
    assert!(ctx.runtime.take_pushes().is_some());
    assert!(ctx.runtime.take_pushes().is_none());
}
