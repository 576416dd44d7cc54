// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service configuration: state-dir paths, `config.toml` defaults and
//! `CW_*` environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use cw_adapters::DEFAULT_HOST;
use cw_engine::RuntimeConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::env;

pub const CONFIG_FILE: &str = "config.toml";
pub const LOCK_FILE: &str = "claimwatch.lock";
pub const LOG_FILE: &str = "claimwatch.log";

/// Errors resolving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("IO error reading {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid {0}: {1}")]
    Toml(PathBuf, #[source] toml::de::Error),
}

/// Optional `{state_dir}/config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub region: Option<String>,
    pub player_name: Option<String>,
    pub email: Option<String>,
    /// Set to `false` for plain `ws://` test servers
    pub tls: Option<bool>,
}

impl FileConfig {
    /// Read `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Io(path.to_path_buf(), e)),
        };
        toml::from_str(&text).map_err(|e| ConfigError::Toml(path.to_path_buf(), e))
    }
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/cw)
    pub state_dir: PathBuf,
    /// Single-instance lock file
    pub lock_path: PathBuf,
    /// Service log file
    pub log_path: PathBuf,
    pub host: String,
    pub tls: bool,
    /// Falls back to the preference file when unset
    pub region: Option<String>,
    /// Falls back to the preference file when unset
    pub player_name: Option<String>,
    pub email: Option<String>,
    /// Explicit reference store; otherwise looked up in the state dir
    pub reference_path: Option<PathBuf>,
    pub query_timeout: Duration,
    pub stop_timeout: Duration,
    pub runtime: RuntimeConfig,
}

impl Config {
    /// Load configuration for the current user.
    pub fn load() -> Result<Self, ConfigError> {
        Self::for_state_dir(env::state_dir()?)
    }

    /// Configuration rooted at `state_dir`. Environment overrides the file.
    pub fn for_state_dir(state_dir: PathBuf) -> Result<Self, ConfigError> {
        let file = FileConfig::load(&state_dir.join(CONFIG_FILE))?;
        Ok(Self::from_parts(state_dir, file))
    }

    fn from_parts(state_dir: PathBuf, file: FileConfig) -> Self {
        Self {
            lock_path: state_dir.join(LOCK_FILE),
            log_path: state_dir.join(LOG_FILE),
            host: env::host().or(file.host).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            tls: file.tls.unwrap_or(true),
            region: file.region,
            player_name: file.player_name,
            email: file.email,
            reference_path: env::reference_path(),
            query_timeout: env::query_timeout(),
            stop_timeout: env::stop_timeout(),
            runtime: RuntimeConfig {
                cache_ttl: env::cache_ttl(),
                tick_interval: env::tick_interval(),
                tick_backoff: env::tick_backoff(),
            },
            state_dir,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
