// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn connection_status_shape() {
    let value = serde_json::to_value(Event::connection_failed("Authentication failed")).unwrap();
    assert_eq!(
        value,
        json!({"type": "connection_status", "data": {"status": "failed", "reason": "Authentication failed"}})
    );
    let value = serde_json::to_value(Event::connected()).unwrap();
    assert_eq!(value, json!({"type": "connection_status", "data": {"status": "connected"}}));
}

#[test]
fn error_event_carries_plain_message() {
    let value = serde_json::to_value(Event::Error("Could not find player: bob".into())).unwrap();
    assert_eq!(value, json!({"type": "error", "data": "Could not find player: bob"}));
}

#[test]
fn domain_update_shape() {
    let event = Event::TasksUpdate(DomainUpdate {
        rows: Arc::new(vec![]),
        success: false,
        message: "no claim selected".into(),
        is_fresh: false,
        source: UpdateSource::Tick,
    });
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["type"], "tasks_update");
    assert_eq!(value["data"]["source"], "tick");
    assert_eq!(value["data"]["rows"], json!([]));
    assert_eq!(value["data"]["success"], false);
}

#[test]
fn name_matches_serialized_tag() {
    let events = vec![
        Event::connected(),
        Event::Error("x".into()),
        Event::ClaimsListUpdate { claims: vec![], current_claim_id: None },
        Event::ClaimSwitching {
            status: SwitchStatus::Loading,
            claim_id: ClaimId::from("1"),
            claim_name: "Alpha".into(),
        },
        Event::ClaimSwitched {
            status: SwitchStatus::Error,
            claim_id: None,
            claim_info: None,
            error: Some("boom".into()),
        },
    ];
    for event in events {
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], event.name());
    }
}

#[test]
fn events_deserialize_back() {
    let event = Event::ClaimSwitching {
        status: SwitchStatus::Loading,
        claim_id: ClaimId::from("2"),
        claim_name: "Beta".into(),
    };
    let text = serde_json::to_string(&event).unwrap();
    let back: Event = serde_json::from_str(&text).unwrap();
    assert_eq!(back, event);
}
