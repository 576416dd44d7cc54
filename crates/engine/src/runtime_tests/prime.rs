// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::queries;
use cw_adapters::QueryError;

#[tokio::test]
async fn prime_emits_each_domain_then_the_claim_header() {
    let mut ctx = setup().await;

    assert!(ctx.runtime.prime().await);

    let events = ctx.drain();
    assert_eq!(
        names(&events),
        [
            "inventory_update",
            "crafting_update",
            "active_crafting_update",
            "tasks_update",
            "claim_info_update"
        ]
    );

    let update = inventory(&events[0]);
    assert!(update.success && update.is_fresh);
    assert_eq!(update.source, UpdateSource::Prime);
    let items: Vec<(&str, i64)> =
        update.rows.iter().map(|i| (i.name.as_str(), i.total_quantity)).collect();
    assert_eq!(items, [("Log", 8), ("Stone", 2)]);

    let Event::ClaimInfoUpdate(info) = &events[4] else { panic!("expected claim info") };
    assert_eq!(info.claim_name, "Alpha");
    assert_eq!(info.supplies_per_hour, 2.0);
}

#[tokio::test]
async fn failed_prime_is_reported_not_fatal() {
    let mut ctx = setup().await;
    ctx.upstream.fail_query(&queries::claim_inventories(ALPHA), QueryError::Timeout);

    assert!(!ctx.runtime.prime().await);

    let events = ctx.drain();
    let update = inventory(&events[0]);
    assert!(!update.success);
    assert!(!update.is_fresh);
    assert_eq!(update.message, "query timed out");
    assert!(update.rows.is_empty());
    assert_eq!(events.len(), 5);
}

#[tokio::test]
async fn primed_caches_serve_without_io() {
    let ctx = primed().await;
    ctx.upstream.clear_queries();

    let snapshot = ctx.runtime.inventory.get_cached().unwrap();

    assert_eq!(snapshot.rows.len(), 2);
    assert!(ctx.upstream.queries().is_empty());
}

#[tokio::test]
async fn consumer_refresh_reemits_one_domain() {
    let mut ctx = primed().await;

    ctx.runtime.refresh(Domain::Tasks);

    let Event::TasksUpdate(update) = ctx.next_event().await else { panic!("expected tasks") };
    assert_eq!(update.source, UpdateSource::Refresh);
    assert_eq!(update.rows.len(), 2);
}
