// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tile-cost specs

use crate::prelude::*;

#[test]
fn fallback_table_without_reference_store() {
    let state = StateDir::empty();

    state.cw().args(&["tile-cost", "100"]).passes().stdout_has("100 tiles: 1.00 supplies/hour");
}

#[test]
fn large_claims_use_the_upper_breakpoint() {
    let state = StateDir::empty();

    state.cw().args(&["tile-cost", "2000"]).passes().stdout_has("2000 tiles: 25.00 supplies/hour");
}

#[test]
fn non_positive_tiles_cost_nothing() {
    let state = StateDir::empty();

    state.cw().args(&["tile-cost", "-3"]).passes().stdout_has("0.00 supplies/hour");
}

#[test]
fn compressed_reference_store_in_state_dir_is_used() {
    let state = StateDir::empty();
    state.reference_zst(
        r#"{"claim_tile_cost": [
            {"tile_count": 1, "cost_per_tile": 0.05},
            {"tile_count": 500, "cost_per_tile": 0.5}
        ]}"#,
    );

    let run = state.cw().args(&["-o", "json", "tile-cost", "600"]).passes();

    let json = run.stdout_json();
    assert_eq!(json["tile_count"], 600);
    assert_eq!(json["cost_per_tile"], 0.5);
    assert_eq!(json["supplies_per_hour"], 300.0);
}

#[test]
fn explicit_reference_flag_wins() {
    let state = StateDir::empty();
    let path =
        state.file("custom.json", r#"{"claim_tile_cost": [{"tile_count": 1, "cost_per_tile": 1.0}]}"#);

    state
        .cw()
        .args(&["tile-cost", "10", "--reference", &path.display().to_string()])
        .passes()
        .stdout_has("10 tiles: 10.00 supplies/hour");
}

#[test]
fn corrupt_reference_store_fails() {
    let state = StateDir::empty();
    state.file("reference.json", "not json");

    state.cw().args(&["tile-cost", "10"]).fails_with(1).stderr_has("error:");
}
