// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File logging for the data service.

use std::io;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, LOG_FILE};
use crate::env;

/// Filter from `CW_LOG`, then `RUST_LOG`, then `info`.
pub fn filter() -> EnvFilter {
    if let Some(directives) = env::log_filter() {
        return EnvFilter::new(directives);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber writing to `{state_dir}/claimwatch.log`.
///
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init(config: &Config) -> io::Result<WorkerGuard> {
    std::fs::create_dir_all(&config.state_dir)?;
    let appender = tracing_appender::rolling::never(&config.state_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))?;

    tracing::info!(log_path = %config.log_path.display(), "logging initialized");
    Ok(guard)
}
