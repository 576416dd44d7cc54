// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Preference file persistence.
//!
//! A single JSON document holding the player's last claim selection, the
//! claims list cache, and login details. Writes go to a temp file and are
//! renamed into place; the previous file is kept as a rotating `.bak`.

use chrono::{DateTime, Utc};
use cw_core::{ClaimId, ClaimRecord};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name under the state directory.
pub const PREFS_FILE: &str = "player_data.json";

const MAX_BAK_FILES: u32 = 3;

/// Errors that can occur reading or writing preferences
#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub last_selected_claim_id: Option<ClaimId>,
    pub available_claims: Vec<ClaimRecord>,
    /// When `available_claims` was last written
    pub cache_timestamp: Option<DateTime<Utc>>,
    pub player_name: Option<String>,
    pub region: Option<String>,
    pub email: Option<String>,
    /// `Bearer ...` header value
    pub auth_token: Option<String>,
}

impl Preferences {
    /// Replace the claims cache and selection, stamping the cache time.
    pub fn set_claims(&mut self, claims: Vec<ClaimRecord>, selected: Option<ClaimId>, now: DateTime<Utc>) {
        self.available_claims = claims;
        self.last_selected_claim_id = selected;
        self.cache_timestamp = Some(now);
    }
}

/// Reads and writes [`Preferences`] at a fixed path.
#[derive(Debug, Clone)]
pub struct PrefsStore {
    path: PathBuf,
}

impl PrefsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `{state_dir}/player_data.json`.
    pub fn in_dir(state_dir: &Path) -> Self {
        Self::new(state_dir.join(PREFS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load preferences; a missing file yields defaults.
    pub fn load(&self) -> Result<Preferences, PrefsError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Preferences::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Load, falling back to defaults (with a warning) when the file is
    /// unreadable or corrupt.
    pub fn load_or_default(&self) -> Preferences {
        self.load().unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to load preferences, using defaults");
            Preferences::default()
        })
    }

    /// Atomically write preferences, rotating the previous file to `.bak`.
    pub fn save(&self, prefs: &Preferences) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            serde_json::to_writer_pretty(&mut file, prefs)?;
            file.write_all(b"\n")?;
            file.sync_all()?;
        }

        if self.path.exists() {
            let bak = rotate_bak_path(&self.path);
            if let Err(e) = fs::copy(&self.path, &bak) {
                tracing::warn!(path = %bak.display(), error = %e, "failed to write preferences backup");
            }
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Load, apply `f`, and save.
    pub fn update(&self, f: impl FnOnce(&mut Preferences)) -> Result<Preferences, PrefsError> {
        let mut prefs = self.load_or_default();
        f(&mut prefs);
        self.save(&prefs)?;
        Ok(prefs)
    }
}

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
///
/// Keeps up to three backups: `.bak`, `.bak.2`, `.bak.3`.
pub fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        if n == 1 {
            path.with_file_name(format!("{name}.bak"))
        } else {
            path.with_file_name(format!("{name}.bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }
    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }
    bak(1)
}

#[cfg(test)]
#[path = "prefs_tests.rs"]
mod tests;
