// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::{connected_session, reference, rows, seed_world, source_context, ALPHA};
use cw_core::{Clock, FakeClock};
use cw_storage::PrefsStore;
use serde_json::json;
use tempfile::TempDir;

fn buildings() -> Buildings {
    Buildings::from_rows(
        &rows(vec![
            json!({"entity_id": 900, "building_description_id": 500}),
            json!({"entity_id": 901, "building_description_id": 501}),
        ]),
        &rows(vec![json!({"entity_id": 901, "nickname": "Vault"})]),
        &reference(),
    )
}

#[test]
fn pockets_are_consolidated_by_item_name() {
    let inventories = rows(vec![
        json!({"owner_entity_id": 900, "pockets": [[100, [0, [1, 5]]], [100, [1, []]]]}),
        json!({"owner_entity_id": 901, "pockets": [[100, [0, [1, 3]]], [100, [0, [3, 2]]]]}),
        json!({"owner_entity_id": 901, "pockets": [[100, [0, [77, "x"]]]]}),
    ]);

    let items = consolidate(&inventories, &buildings(), &reference());

    let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Log", "Stone", "Unknown Item 77"]);
    let log = &items[0];
    assert_eq!(log.total_quantity, 8);
    assert_eq!((log.tier, log.tag.as_str()), (1, "Wood"));
    assert_eq!(log.containers.get("Carpentry Station"), Some(&5));
    assert_eq!(log.containers.get("Vault"), Some(&3));
    assert_eq!(items[2].total_quantity, 0);
}

#[yare::parameterized(
    not_an_array = { json!("pocket") },
    no_contents = { json!([100]) },
    empty_slot = { json!([100, [1, []]]) },
    no_item_id = { json!([100, [0, ["x", 1]]]) },
)]
fn malformed_pockets_are_ignored(pocket: serde_json::Value) {
    assert_eq!(pocket_contents(&pocket), None);
}

#[test]
fn rows_without_owner_are_skipped() {
    let inventories = rows(vec![json!({"pockets": [[100, [0, [1, 5]]]]})]);
    assert!(consolidate(&inventories, &buildings(), &reference()).is_empty());
}

#[tokio::test]
async fn fetch_reads_the_scoped_claim() {
    let dir = TempDir::new().unwrap();
    let (session, upstream) = connected_session().await;
    seed_world(&upstream, FakeClock::new().epoch_micros());
    let (ctx, _manager) = source_context(session, Some(ALPHA), PrefsStore::in_dir(dir.path()));

    let items = InventorySource::new(ctx).fetch().await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].containers.get("Vault"), Some(&3));
}

#[tokio::test]
async fn fetch_without_claim_fails() {
    let dir = TempDir::new().unwrap();
    let (session, upstream) = connected_session().await;
    let (ctx, _manager) = source_context(session, None, PrefsStore::in_dir(dir.path()));

    let err = InventorySource::new(ctx).fetch().await.unwrap_err();

    assert_eq!(err, QueryError::NoClaim);
    assert!(upstream.queries().is_empty());
}
