// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::{connected_session, reference, rows, seed_world, PLAYER};
use serde_json::json;

#[test]
fn tasks_group_by_traveler_sorted_by_name() {
    let states = rows(vec![
        json!({"entity_id": 60, "task_id": 5, "traveler_id": 7, "completed": false}),
        json!({"entity_id": 62, "task_id": 3, "traveler_id": 7, "completed": true}),
        json!({"entity_id": 61, "task_id": 6, "traveler_id": 8, "completed": true}),
    ]);
    let descs = rows(vec![
        json!({"id": 5, "description": "Bring logs", "required_items": [[1, 5], [3, 2]]}),
        json!({"id": 3, "description": "Say hello", "required_items": []}),
    ]);

    let travelers = group(&states, &descs, &reference());

    let names: Vec<&str> = travelers.iter().map(|t| t.traveler.as_str()).collect();
    assert_eq!(names, ["Alesi", "Rumbagh"]);

    let rumbagh = &travelers[1];
    assert_eq!(rumbagh.tasks.iter().map(|t| t.task_id).collect::<Vec<_>>(), [3, 5]);
    assert_eq!(rumbagh.tasks[1].required_items, "Log x5, Stone x2");
    assert_eq!(rumbagh.tasks[0].required_items, NO_ITEMS);
    assert_eq!((rumbagh.completed_count, rumbagh.total_count, rumbagh.complete), (1, 2, false));

    let alesi = &travelers[0];
    assert_eq!(alesi.tasks[0].description, "Task 6");
    assert_eq!(alesi.tasks[0].required_items, NO_ITEMS);
    assert!(alesi.complete);
}

#[test]
fn unknown_travelers_and_items_get_placeholders() {
    let states = rows(vec![json!({"entity_id": 63, "task_id": 9, "traveler_id": 55})]);
    let descs = rows(vec![json!({"id": 9, "description": "Odd job", "required_items": [[404, 1]]})]);

    let travelers = group(&states, &descs, &reference());

    assert_eq!(travelers[0].traveler, "Traveler 55");
    assert_eq!(travelers[0].tasks[0].required_items, "Unknown Item 404 x1");
    assert!(!travelers[0].tasks[0].completed);
}

#[test]
fn malformed_task_rows_are_skipped() {
    let states = rows(vec![
        json!({"entity_id": 64, "traveler_id": 7}),
        json!({"entity_id": 65, "task_id": 1, "traveler_id": 7}),
    ]);
    let travelers = group(&states, &[], &reference());
    assert_eq!(travelers.len(), 1);
    assert_eq!(travelers[0].total_count, 1);
}

#[tokio::test]
async fn fetch_is_player_scoped() {
    let (session, upstream) = connected_session().await;
    seed_world(&upstream, 0);
    let source = TasksSource::new(session, Arc::new(reference()), PlayerId::from(PLAYER));

    let travelers = source.fetch().await.unwrap();

    assert_eq!(travelers.len(), 2);
    assert_eq!(travelers[1].tasks[0].description, "Bring logs");
    assert_eq!(travelers[1].tasks[0].required_items, "Log x5");
    assert!(upstream.queries().iter().all(|q| !q.contains("claim_entity_id")));
}
