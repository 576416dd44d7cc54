// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime tests

mod claims;
mod lifecycle;
mod prime;
mod routing;
mod ticking;

use super::*;
use crate::test_helpers::{setup, TestContext, ALPHA, BETA, PLAYER};
use cw_core::{ClaimId, DomainUpdate, InventoryItem};

fn names(events: &[Event]) -> Vec<&'static str> {
    events.iter().map(Event::name).collect()
}

/// Prime every cache and discard the resulting events.
async fn primed() -> TestContext {
    let mut ctx = setup().await;
    assert!(ctx.runtime.prime().await);
    ctx.drain();
    ctx
}

fn inventory(event: &Event) -> &DomainUpdate<InventoryItem> {
    match event {
        Event::InventoryUpdate(update) => update,
        other => panic!("expected inventory_update, got {}", other.name()),
    }
}

/// Yield to background tasks until `cond` holds.
async fn until(cond: impl Fn() -> bool) {
    for _ in 0..1000 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never held");
}

/// Receive events until one named `name` arrives, returning everything
/// received including it.
async fn events_until(ctx: &mut TestContext, name: &str) -> Vec<Event> {
    let mut events = Vec::new();
    loop {
        let event = ctx.next_event().await;
        let done = event.name() == name;
        events.push(event);
        if done {
            return events;
        }
    }
}
