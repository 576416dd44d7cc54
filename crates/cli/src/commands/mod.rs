// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod claims;
pub mod login;
pub mod tile_cost;
pub mod watch;

use cw_daemon::Config;
use cw_storage::PrefsStore;

/// Preference store in the configured state directory.
pub(crate) fn prefs_store() -> anyhow::Result<PrefsStore> {
    let config = Config::load()?;
    Ok(PrefsStore::in_dir(&config.state_dir))
}
