// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the engine crate.

use crate::claims::ClaimManager;
use crate::domains::SourceContext;
use crate::queries;
use crate::reference::ReferenceData;
use crate::runtime::{Runtime, RuntimeConfig, RuntimeDeps};
use crate::session::{Credentials, Session};
use cw_adapters::{FakeAuth, FakeUpstream};
use cw_core::{ClaimId, Clock, Event, FakeClock, PlayerId};
use cw_storage::{PrefsStore, ReferenceTables};
use cw_wire::{Row, TIMESTAMP_KEY};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;

pub(crate) const PLAYER: &str = "42";
pub(crate) const ALPHA: &str = "1001";
pub(crate) const BETA: &str = "1002";

pub(crate) type TestRuntime = Runtime<FakeUpstream, FakeClock>;

pub(crate) fn rows(values: Vec<Value>) -> Vec<Row> {
    values.into_iter().map(|v| Row::from_value(v).unwrap()).collect()
}

pub(crate) fn ts(micros: i64) -> Value {
    json!({ TIMESTAMP_KEY: micros })
}

/// Items, recipes, buildings and travelers used by the sample world.
pub(crate) fn reference() -> ReferenceData {
    let mut t = ReferenceTables::default();
    t.insert(
        "item_desc",
        vec![
            json!({"id": 1, "name": "Log", "tier": 1, "tag": "Wood"}),
            json!({"id": 2, "name": "Plank", "tier": 2, "tag": "Plank"}),
            json!({"id": 3, "name": "Stone", "tier": 1, "tag": "Rock"}),
        ],
    );
    t.insert(
        "crafting_recipe_desc",
        vec![
            json!({"id": 10, "name": "Saw {0}", "time_requirement": 60.0, "actions_required": 50,
                   "crafted_item_stacks": [[2, 3]]}),
            json!({"id": 11, "name": "Carve Totem", "crafted_item_stacks": []}),
        ],
    );
    t.insert(
        "building_desc",
        vec![json!({"id": 500, "name": "Carpentry Station"}), json!({"id": 501, "name": "Storage Chest"})],
    );
    t.insert(
        "npc_desc",
        vec![json!({"npc_type": 7, "name": "Rumbagh"}), json!({"npc_type": 8, "name": "Alesi"})],
    );
    ReferenceData::from_tables(&t)
}

/// Session with a token, connected to the fake upstream.
pub(crate) async fn connected_session() -> (Arc<Session<FakeUpstream>>, FakeUpstream) {
    let upstream = FakeUpstream::new();
    let session = Session::new(upstream.clone(), "test.local");
    let creds = Credentials { token: Some("t".into()), ..Default::default() };
    session.authenticate(&FakeAuth::new(), &creds).await.unwrap();
    session.connect("bitcraft-1").await.unwrap();
    (Arc::new(session), upstream)
}

/// Source context scoped to `claim`.
pub(crate) fn source_context(
    session: Arc<Session<FakeUpstream>>,
    claim: Option<&str>,
    prefs: PrefsStore,
) -> (SourceContext<FakeUpstream>, ClaimManager<FakeClock>) {
    let manager = ClaimManager::new(prefs, FakeClock::new());
    if let Some(claim) = claim {
        manager.set_available(vec![cw_core::ClaimRecord::new(claim, "Scoped")]);
    }
    let ctx = SourceContext { session, reference: Arc::new(reference()), scope: manager.scope() };
    (ctx, manager)
}

/// Canned responses for player 42 with claims Alpha (1001) and Beta (1002).
pub(crate) fn seed_world(upstream: &FakeUpstream, now_micros: i64) {
    upstream.on_query(
        &queries::player_by_username("Wanderer"),
        vec![json!({"entity_id": 42, "username_lowercase": "wanderer"})],
    );
    upstream.on_query(
        &queries::claims_for_player(PLAYER),
        vec![
            json!({"claim_entity_id": 1001, "player_entity_id": 42, "user_name": "Wanderer"}),
            json!({"claim_entity_id": 1002, "player_entity_id": 42, "user_name": "Wanderer"}),
        ],
    );
    for (claim, name, treasury, supplies, tiles) in
        [(ALPHA, "Alpha", 100, 50, 200), (BETA, "Beta", 7, 3, 10)]
    {
        upstream.on_query(&queries::claim_state(claim), vec![json!({"entity_id": claim, "name": name})]);
        upstream.on_query(
            &queries::claim_local_state(claim),
            vec![json!({"entity_id": claim, "treasury": treasury, "supplies": supplies, "num_tiles": tiles})],
        );
    }

    upstream.on_query(
        &queries::claim_buildings(ALPHA),
        vec![
            json!({"entity_id": 900, "claim_entity_id": 1001, "building_description_id": 500}),
            json!({"entity_id": 901, "claim_entity_id": 1001, "building_description_id": 501}),
        ],
    );
    upstream.on_query(&queries::claim_nicknames(ALPHA), vec![json!({"entity_id": 901, "nickname": "Vault"})]);
    upstream.on_query(
        &queries::claim_members(ALPHA),
        vec![
            json!({"player_entity_id": 42, "user_name": "Wanderer", "claim_entity_id": 1001}),
            json!({"player_entity_id": 43, "user_name": "Smith", "claim_entity_id": 1001}),
        ],
    );
    upstream.on_query(
        &queries::claim_inventories(ALPHA),
        vec![
            json!({"entity_id": 1, "owner_entity_id": 900, "pockets": [[100, [0, [1, 5]]], [100, [1, []]]]}),
            json!({"entity_id": 2, "owner_entity_id": 901, "pockets": [[100, [0, [1, 3]]], [100, [0, [3, 2]]]]}),
        ],
    );
    upstream.on_query(
        &queries::passive_crafts(ALPHA),
        vec![json!({"entity_id": 70, "owner_entity_id": 42, "recipe_id": 10, "building_entity_id": 900,
                    "timestamp": ts(now_micros - 30_000_000), "status": [1, {}]})],
    );
    upstream.on_query(
        &queries::progressive_actions(ALPHA),
        vec![json!({"entity_id": 80, "owner_entity_id": 43, "recipe_id": 10, "building_entity_id": 900,
                    "progress": 20, "craft_count": 2, "preparation": true,
                    "lock_expiration": ts(now_micros + 60_000_000)})],
    );
    upstream.on_query(&queries::public_progressive_actions(ALPHA), vec![json!({"entity_id": 80})]);

    upstream.on_query(
        &queries::claim_buildings(BETA),
        vec![json!({"entity_id": 950, "claim_entity_id": 1002, "building_description_id": 501})],
    );
    upstream.on_query(
        &queries::claim_inventories(BETA),
        vec![json!({"entity_id": 3, "owner_entity_id": 950, "pockets": [[100, [0, [3, 9]]]]})],
    );

    upstream.on_query(
        &queries::traveler_tasks(PLAYER),
        vec![
            json!({"entity_id": 60, "task_id": 5, "traveler_id": 7, "completed": false}),
            json!({"entity_id": 61, "task_id": 6, "traveler_id": 8, "completed": true}),
        ],
    );
    upstream.on_query(
        &queries::traveler_task_descs(PLAYER),
        vec![
            json!({"id": 5, "description": "Bring logs", "required_items": [[1, 5]]}),
            json!({"id": 6, "description": "", "required_items": []}),
        ],
    );
}

/// Test context holding the runtime, the fake upstream, and the event stream.
pub(crate) struct TestContext {
    pub runtime: Arc<TestRuntime>,
    pub upstream: FakeUpstream,
    pub clock: FakeClock,
    pub prefs: PrefsStore,
    pub event_rx: mpsc::Receiver<Event>,
    _dir: TempDir,
}

pub(crate) fn test_config() -> RuntimeConfig {
    RuntimeConfig {
        cache_ttl: Duration::from_secs(300),
        tick_interval: Duration::from_secs(3),
        tick_backoff: Duration::from_secs(5),
    }
}

/// Runtime over the sample world with both claims available and Alpha
/// selected. Nothing is primed yet.
pub(crate) async fn setup() -> TestContext {
    let dir = TempDir::new().unwrap();
    let (session, upstream) = connected_session().await;
    let clock = FakeClock::new();
    seed_world(&upstream, clock.epoch_micros());
    let prefs = PrefsStore::in_dir(dir.path());
    let (event_tx, event_rx) = mpsc::channel(256);

    let runtime = Runtime::new(
        RuntimeDeps {
            session,
            reference: Arc::new(reference()),
            prefs: prefs.clone(),
            player_id: PlayerId::from(PLAYER),
        },
        clock.clone(),
        test_config(),
        event_tx,
    );
    let claims = crate::claims::fetch_all_claims(runtime.session(), &PlayerId::from(PLAYER))
        .await
        .unwrap();
    runtime.claims().set_available(claims);
    assert_eq!(runtime.claims().current_id(), Some(ClaimId::from(ALPHA)));

    TestContext { runtime: Arc::new(runtime), upstream, clock, prefs, event_rx, _dir: dir }
}

impl TestContext {
    /// Receive the next event, failing after a generous timeout.
    pub(crate) async fn next_event(&mut self) -> Event {
        tokio::time::timeout(Duration::from_secs(5), self.event_rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("event channel closed")
    }

    /// Events already queued.
    pub(crate) fn drain(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = self.event_rx.try_recv() {
            events.push(event);
        }
        events
    }
}
