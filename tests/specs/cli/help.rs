// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn cw_help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("watch")
        .stdout_has("login")
        .stdout_has("claims")
        .stdout_has("tile-cost");
}

#[test]
fn cw_watch_help_shows_login_flags() {
    cli()
        .args(&["watch", "--help"])
        .passes()
        .stdout_has("--email")
        .stdout_has("--access-code")
        .stdout_has("--claim");
}

#[test]
fn cw_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}

#[test]
fn cw_without_command_is_usage_error() {
    cli().fails_with(2).stderr_has("Usage:");
}

#[test]
fn login_rejects_malformed_email_before_any_request() {
    let state = StateDir::empty();

    state.cw().args(&["login", "--email", "not-an-email"]).fails_with(1).stderr_has("invalid email");
}
