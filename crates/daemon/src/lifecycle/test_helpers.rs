// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for lifecycle tests.

use super::*;
pub(super) use cw_adapters::{FakeAuth, FakeUpstream};
pub(super) use cw_core::FakeClock;
pub(super) use cw_engine::queries;
pub(super) use serde_json::json;
pub(super) use std::time::Duration;
pub(super) use tempfile::{tempdir, TempDir};

pub(super) type TestService = DataService<FakeUpstream, FakeAuth, FakeClock>;

pub(super) const PLAYER: &str = "42";
pub(super) const ALPHA: &str = "1001";
pub(super) const BETA: &str = "1002";

/// Config rooted at `dir` with short timeouts and no environment input.
pub(super) fn test_config(dir: &std::path::Path) -> Config {
    Config {
        state_dir: dir.to_path_buf(),
        lock_path: dir.join(crate::config::LOCK_FILE),
        log_path: dir.join(crate::config::LOG_FILE),
        host: "test.local".to_string(),
        tls: false,
        region: Some("bitcraft-7".to_string()),
        player_name: Some("Wanderer".to_string()),
        email: None,
        reference_path: None,
        query_timeout: Duration::from_secs(1),
        stop_timeout: Duration::from_secs(2),
        runtime: cw_engine::RuntimeConfig::default(),
    }
}

pub(super) fn token() -> Credentials {
    Credentials { token: Some("stored".to_string()), ..Default::default() }
}

/// A reference store with one item and one building.
pub(super) fn write_reference(dir: &std::path::Path) {
    let store = json!({
        "item_desc": [{"id": 1, "name": "Log", "tier": 1, "tag": "Wood"}],
        "building_desc": [{"id": 500, "name": "Carpentry Station"}],
        "crafting_recipe_desc": [],
    });
    std::fs::write(dir.join(cw_storage::REFERENCE_FILE), store.to_string()).unwrap();
}

/// Player 42 ("Wanderer") with claims Alpha (1001) and Beta (1002).
pub(super) fn seed_world(upstream: &FakeUpstream) {
    upstream.on_query(
        &queries::player_by_username("Wanderer"),
        vec![json!({"entity_id": 42, "username_lowercase": "wanderer"})],
    );
    upstream.on_query(
        &queries::claims_for_player(PLAYER),
        vec![
            json!({"claim_entity_id": 1001, "player_entity_id": 42}),
            json!({"claim_entity_id": 1002, "player_entity_id": 42}),
        ],
    );
    for (claim, name) in [(ALPHA, "Alpha"), (BETA, "Beta")] {
        upstream.on_query(&queries::claim_state(claim), vec![json!({"entity_id": claim, "name": name})]);
        upstream.on_query(
            &queries::claim_local_state(claim),
            vec![json!({"entity_id": claim, "treasury": 10, "supplies": 20, "num_tiles": 100})],
        );
    }
    upstream.on_query(
        &queries::claim_buildings(ALPHA),
        vec![json!({"entity_id": 900, "claim_entity_id": 1001, "building_description_id": 500})],
    );
    upstream.on_query(
        &queries::claim_inventories(ALPHA),
        vec![json!({"entity_id": 1, "owner_entity_id": 900, "pockets": [[100, [0, [1, 4]]]]})],
    );
}

pub(super) struct TestContext {
    pub service: TestService,
    pub events: mpsc::Receiver<Event>,
    pub upstream: FakeUpstream,
    pub auth: FakeAuth,
    pub dir: TempDir,
}

/// A service over the seeded world, not yet started.
pub(super) fn setup() -> TestContext {
    let dir = tempdir().unwrap();
    write_reference(dir.path());
    let upstream = FakeUpstream::new();
    seed_world(&upstream);
    let auth = FakeAuth::new();
    let mut service =
        DataService::new(test_config(dir.path()), upstream.clone(), auth.clone(), FakeClock::new());
    let events = service.events().unwrap();
    TestContext { service, events, upstream, auth, dir }
}

/// Events already queued.
pub(super) fn drain(events: &mut mpsc::Receiver<Event>) -> Vec<Event> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

pub(super) fn names(events: &[Event]) -> Vec<&'static str> {
    events.iter().map(Event::name).collect()
}
