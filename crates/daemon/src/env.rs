// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use cw_engine::DEFAULT_TTL;

use crate::config::ConfigError;

/// Resolve state directory: CW_STATE_DIR > XDG_STATE_HOME/cw > ~/.local/state/cw
pub fn state_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = non_empty("CW_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Some(xdg) = non_empty("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("cw"));
    }
    let home = dirs::home_dir().ok_or(ConfigError::NoStateDir)?;
    Ok(home.join(".local/state/cw"))
}

/// Upstream database host override
pub fn host() -> Option<String> {
    non_empty("CW_HOST")
}

/// One-off query timeout (default 10s)
pub fn query_timeout() -> Duration {
    millis("CW_QUERY_TIMEOUT_MS").unwrap_or(Duration::from_secs(10))
}

/// Domain cache TTL (default 5m)
pub fn cache_ttl() -> Duration {
    millis("CW_CACHE_TTL_MS").unwrap_or(DEFAULT_TTL)
}

/// Progress ticker period (default 3s)
pub fn tick_interval() -> Duration {
    millis("CW_TICK_MS").unwrap_or(Duration::from_secs(3))
}

/// Pause after a failed tick (default 5s)
pub fn tick_backoff() -> Duration {
    millis("CW_TICK_BACKOFF_MS").unwrap_or(Duration::from_secs(5))
}

/// How long stop waits for in-flight work (default 2s)
pub fn stop_timeout() -> Duration {
    millis("CW_STOP_TIMEOUT_MS").unwrap_or(Duration::from_secs(2))
}

/// Explicit reference store path, bypassing the state-dir lookup
pub fn reference_path() -> Option<PathBuf> {
    non_empty("CW_REFERENCE_PATH").map(PathBuf::from)
}

/// Log filter directives. Falls back to `RUST_LOG` in the logging setup.
pub fn log_filter() -> Option<String> {
    non_empty("CW_LOG")
}

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn millis(key: &str) -> Option<Duration> {
    std::env::var(key).ok().and_then(|s| s.trim().parse::<u64>().ok()).map(Duration::from_millis)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
