// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::queries;
use cw_adapters::QueryError;
use cw_core::ProgressiveStatus;
use std::collections::BTreeSet;

#[tokio::test]
async fn tick_rerenders_crafting_countdowns() {
    let mut ctx = primed().await;
    ctx.upstream.clear_queries();
    ctx.clock.advance(Duration::from_secs(10));

    ctx.runtime.tick().await.unwrap();

    let events = ctx.drain();
    assert_eq!(names(&events), ["crafting_update", "active_crafting_update"]);
    let Event::CraftingUpdate(passive) = &events[0] else { unreachable!() };
    assert_eq!(passive.source, UpdateSource::Tick);
    assert!(passive.is_fresh);
    assert_eq!(passive.rows[0].time_remaining, "20s");
    let Event::ActiveCraftingUpdate(active) = &events[1] else { unreachable!() };
    assert_eq!(active.rows[0].status, ProgressiveStatus::Crafting);
    assert!(ctx.upstream.queries().is_empty());
}

#[tokio::test]
async fn tick_is_silent_before_anything_is_cached() {
    let mut ctx = setup().await;

    ctx.runtime.tick().await.unwrap();

    assert!(ctx.drain().is_empty());
    assert!(ctx.upstream.queries().iter().all(|q| !q.contains("inventory_state")));
}

#[tokio::test]
async fn tick_refreshes_caches_past_their_ttl() {
    let mut ctx = primed().await;
    ctx.clock.advance(Duration::from_secs(301));

    ctx.runtime.tick().await.unwrap();

    let ticked = ctx.drain();
    let Event::CraftingUpdate(passive) = &ticked[0] else { panic!("expected crafting_update") };
    assert!(!passive.is_fresh);
    assert_eq!(passive.rows[0].time_remaining, "READY");
    // lock expired while stale
    let Event::ActiveCraftingUpdate(active) = &ticked[1] else { unreachable!() };
    assert_eq!(active.rows[0].status, ProgressiveStatus::Paused);

    let mut refreshed = BTreeSet::new();
    while refreshed.len() < 4 {
        let event = ctx.next_event().await;
        if is_refresh(&event) {
            refreshed.insert(event.name());
        }
    }
    assert!(ctx.runtime.inventory.get_cached().is_some());
}

#[tokio::test]
async fn failing_cache_is_not_swept_on_every_tick() {
    let mut ctx = primed().await;
    ctx.upstream.fail_query(&queries::claim_inventories(ALPHA), QueryError::Timeout);
    ctx.clock.advance(Duration::from_secs(301));

    ctx.runtime.tick().await.unwrap();
    let mut refreshed = 0;
    while refreshed < 4 {
        if is_refresh(&ctx.next_event().await) {
            refreshed += 1;
        }
    }
    assert!(ctx.runtime.inventory.is_stale());
    ctx.upstream.clear_queries();

    ctx.runtime.tick().await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(!ctx.drain().iter().any(is_refresh));
    assert_eq!(ctx.upstream.query_count(&queries::claim_inventories(ALPHA)), 0);
}

#[tokio::test]
async fn tick_fails_once_the_consumer_is_gone() {
    let ctx = primed().await;
    let TestContext { runtime, event_rx, .. } = ctx;
    drop(event_rx);

    let err = runtime.tick().await.unwrap_err();

    assert!(matches!(err, RuntimeError::EventsClosed("crafting_update")));
}

#[tokio::test(start_paused = true)]
async fn running_ticker_emits_on_its_interval() {
    let mut ctx = primed().await;
    let run = tokio::spawn(Arc::clone(&ctx.runtime).run());

    assert_eq!(ctx.next_event().await.name(), "crafting_update");
    assert_eq!(ctx.next_event().await.name(), "active_crafting_update");
    assert!(ctx.runtime.ticker_enabled());

    ctx.runtime.set_ticker_enabled(false);
    tokio::time::sleep(ctx.runtime.config.tick_interval * 3).await;
    assert!(ctx.drain().is_empty());

    assert!(ctx.runtime.shutdown(Duration::from_secs(1)).await);
    run.await.unwrap();
}

fn is_refresh(event: &Event) -> bool {
    match event {
        Event::InventoryUpdate(u) => u.source == UpdateSource::Refresh,
        Event::CraftingUpdate(u) => u.source == UpdateSource::Refresh,
        Event::ActiveCraftingUpdate(u) => u.source == UpdateSource::Refresh,
        Event::TasksUpdate(u) => u.source == UpdateSource::Refresh,
        _ => false,
    }
}
