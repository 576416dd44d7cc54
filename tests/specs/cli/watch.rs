// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watch specs that fail before any network traffic

use crate::prelude::*;

#[test]
fn without_login_reports_connection_failure() {
    let state = StateDir::empty();

    state
        .cw()
        .args(&["watch"])
        .fails_with(2)
        .stdout_has("connection_status failed: Authentication failed: no authorization token available")
        .stderr_has("error:");
}

#[test]
fn json_failure_event_is_a_single_line() {
    let state = StateDir::empty();

    let run = state.cw().args(&["-o", "json", "watch"]).fails_with(2);

    let json = run.stdout_json();
    assert_eq!(json["type"], "connection_status");
    assert_eq!(json["data"]["status"], "failed");
}

#[test]
fn writes_log_file_in_state_dir() {
    let state = StateDir::empty();

    state.cw().args(&["watch"]).fails_with(2);

    let log = std::fs::read_to_string(state.path().join("claimwatch.log")).unwrap();
    assert!(log.contains("bootstrap failed"));
}

#[test]
fn bad_config_file_fails_before_connecting() {
    let state = StateDir::empty();
    state.file("config.toml", "unknown_key = 1\n");

    state.cw().args(&["watch"]).fails_with(1).stderr_has("config.toml");
}
