// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Claims list specs (offline, from the preference file)

use crate::prelude::*;

const PREFS: &str = r#"{
  "last_selected_claim_id": "1002",
  "available_claims": [
    {"claim_id": "1001", "claim_name": "Alpha", "treasury": 10, "supplies": 20, "tile_count": 100},
    {"claim_id": "1002", "claim_name": "Beta"}
  ],
  "player_name": "Wanderer"
}"#;

#[test]
fn no_preference_file_suggests_watch() {
    let state = StateDir::empty();

    state.cw().args(&["claims"]).passes().stdout_has("No claims saved");
}

#[test]
fn lists_saved_claims_and_marks_selection() {
    let state = StateDir::empty();
    state.file("player_data.json", PREFS);

    let run = state.cw().args(&["claims"]).passes().stdout_has("Alpha").stdout_has("Beta");

    assert!(run.stdout.lines().any(|l| l.starts_with("* 1002")));
}

#[test]
fn json_output_is_the_claims_array() {
    let state = StateDir::empty();
    state.file("player_data.json", PREFS);

    let run = state.cw().args(&["claims", "-o", "json"]).passes();

    let json = run.stdout_json();
    let names: Vec<&str> =
        json.as_array().unwrap().iter().map(|c| c["claim_name"].as_str().unwrap()).collect();
    similar_asserts::assert_eq!(names, vec!["Alpha", "Beta"]);
}

#[test]
fn corrupt_preference_file_is_an_error() {
    let state = StateDir::empty();
    state.file("player_data.json", "{ nope");

    state.cw().args(&["claims"]).fails_with(1).stderr_has("Serialization error");
}
