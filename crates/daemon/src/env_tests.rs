// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

const VARS: [&str; 10] = [
    "CW_STATE_DIR",
    "XDG_STATE_HOME",
    "CW_HOST",
    "CW_QUERY_TIMEOUT_MS",
    "CW_CACHE_TTL_MS",
    "CW_TICK_MS",
    "CW_TICK_BACKOFF_MS",
    "CW_STOP_TIMEOUT_MS",
    "CW_REFERENCE_PATH",
    "CW_LOG",
];

fn clear() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn state_dir_prefers_explicit_override() {
    clear();
    std::env::set_var("CW_STATE_DIR", "/tmp/cw-state");
    std::env::set_var("XDG_STATE_HOME", "/tmp/xdg");

    assert_eq!(state_dir().unwrap(), PathBuf::from("/tmp/cw-state"));
    clear();
}

#[test]
#[serial]
fn state_dir_falls_back_to_xdg() {
    clear();
    std::env::set_var("XDG_STATE_HOME", "/tmp/xdg");

    assert_eq!(state_dir().unwrap(), PathBuf::from("/tmp/xdg/cw"));
    clear();
}

#[test]
#[serial]
fn blank_values_are_ignored() {
    clear();
    std::env::set_var("CW_STATE_DIR", "  ");
    std::env::set_var("XDG_STATE_HOME", "/tmp/xdg");
    std::env::set_var("CW_HOST", "");

    assert_eq!(state_dir().unwrap(), PathBuf::from("/tmp/xdg/cw"));
    assert_eq!(host(), None);
    clear();
}

#[test]
#[serial]
fn timings_default_when_unset() {
    clear();

    assert_eq!(query_timeout(), Duration::from_secs(10));
    assert_eq!(cache_ttl(), Duration::from_secs(300));
    assert_eq!(tick_interval(), Duration::from_secs(3));
    assert_eq!(tick_backoff(), Duration::from_secs(5));
    assert_eq!(stop_timeout(), Duration::from_secs(2));
    assert_eq!(reference_path(), None);
    assert_eq!(log_filter(), None);
}

#[test]
#[serial]
fn timings_read_milliseconds() {
    clear();
    std::env::set_var("CW_QUERY_TIMEOUT_MS", "1500");
    std::env::set_var("CW_TICK_MS", "250");
    std::env::set_var("CW_CACHE_TTL_MS", "not-a-number");

    assert_eq!(query_timeout(), Duration::from_millis(1500));
    assert_eq!(tick_interval(), Duration::from_millis(250));
    assert_eq!(cache_ttl(), Duration::from_secs(300));
    clear();
}

#[test]
#[serial]
fn log_filter_reads_cw_log() {
    clear();
    std::env::set_var("CW_LOG", "cw_engine=debug");

    assert_eq!(log_filter().as_deref(), Some("cw_engine=debug"));
    clear();
}
