// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn shutdown_cancels_a_stuck_refresh() {
    let mut ctx = primed().await;
    ctx.upstream.pause();
    ctx.runtime.refresh(Domain::Inventory);
    assert!(ctx.runtime.inventory.is_fetching());

    assert!(ctx.runtime.shutdown(Duration::from_secs(1)).await);

    let event = ctx.next_event().await;
    let update = inventory(&event);
    assert!(!update.success);
    assert_eq!(update.message, "refresh cancelled");
    assert!(ctx.runtime.is_stopping());
    assert!(!ctx.runtime.ticker_enabled());
}

#[tokio::test]
async fn shutdown_stops_a_running_runtime() {
    let ctx = primed().await;
    let run = tokio::spawn(Arc::clone(&ctx.runtime).run());
    tokio::task::yield_now().await;

    assert!(ctx.runtime.shutdown(Duration::from_secs(1)).await);

    run.await.unwrap();
}

#[tokio::test]
async fn running_twice_is_refused() {
    let ctx = setup().await;
    let _pushes = ctx.runtime.take_pushes();

    // returns at once instead of routing
    Arc::clone(&ctx.runtime).run().await;

    assert!(!ctx.runtime.ticker_enabled());
}

#[test]
fn default_config_matches_documented_timings() {
    let config = RuntimeConfig::default();
    assert_eq!(config.cache_ttl, Duration::from_secs(300));
    assert_eq!(config.tick_interval, Duration::from_secs(3));
    assert_eq!(config.tick_backoff, Duration::from_secs(5));
}
