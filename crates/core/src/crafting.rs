// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crafting operations and their time-derived display fields.
//!
//! Domain sources resolve upstream rows into [`PassiveOperation`] and
//! [`ProgressiveOperation`] once per fetch. Rendering into display rows is
//! pure given the wall-clock time, so the progress ticker can re-render the
//! same operations every few seconds without touching the network.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::display::{ActiveCraftingOperation, CraftingOperation};
use crate::id::EntityId;

/// Passive craft status code for a job still running.
pub const PASSIVE_IN_PROGRESS: i64 = 1;
/// Passive craft status code for a finished job.
pub const PASSIVE_COMPLETE: i64 = 2;

/// Status of an active (progressive) crafting job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressiveStatus {
    #[serde(rename = "Ready to Claim")]
    Ready,
    Crafting,
    Paused,
}

crate::simple_display! {
    ProgressiveStatus {
        Ready => "Ready to Claim",
        Crafting => "Crafting",
        Paused => "Paused",
    }
}

/// Derive the status of a progressive operation.
///
/// Completion wins over everything; an expired lock means nobody is working
/// on it; otherwise the preparation flag tells an active crafter apart from
/// an idle one.
pub fn derive_status(
    current_progress: i64,
    total_progress: i64,
    lock_expiration_micros: Option<i64>,
    preparation: bool,
    now_micros: i64,
) -> ProgressiveStatus {
    if current_progress >= total_progress {
        return ProgressiveStatus::Ready;
    }
    let expired = matches!(lock_expiration_micros, Some(lock) if lock > 0 && now_micros > lock);
    if expired {
        ProgressiveStatus::Paused
    } else if preparation {
        ProgressiveStatus::Crafting
    } else {
        ProgressiveStatus::Paused
    }
}

/// An active crafting job resolved against reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressiveOperation {
    pub entity_id: EntityId,
    pub recipe_id: i64,
    pub owner_id: EntityId,
    pub function_type: i64,
    pub item_name: String,
    pub tier: i64,
    pub tag: String,
    pub quantity: i64,
    pub crafter: String,
    pub building_name: String,
    pub recipe_name: String,
    pub current_progress: i64,
    pub total_progress: i64,
    pub lock_expiration_micros: Option<i64>,
    pub preparation: bool,
    pub accept_help: bool,
}

impl ProgressiveOperation {
    pub fn status(&self, now_micros: i64) -> ProgressiveStatus {
        derive_status(
            self.current_progress,
            self.total_progress,
            self.lock_expiration_micros,
            self.preparation,
            now_micros,
        )
    }

    pub fn to_row(&self, now_micros: i64) -> ActiveCraftingOperation {
        let remaining = (self.total_progress - self.current_progress).max(0);
        ActiveCraftingOperation {
            entity_id: self.entity_id.clone(),
            item_name: self.item_name.clone(),
            tier: self.tier,
            tag: self.tag.clone(),
            quantity: self.quantity,
            crafter: self.crafter.clone(),
            building_name: self.building_name.clone(),
            recipe_name: self.recipe_name.clone(),
            current_progress: self.current_progress,
            total_progress: self.total_progress,
            remaining_effort: if remaining > 0 {
                format_thousands(remaining)
            } else {
                "READY".to_string()
            },
            progress_value: format!("{}/{}", self.current_progress, self.total_progress),
            accept_help: if self.accept_help { "Yes" } else { "No" }.to_string(),
            preparation: self.preparation,
            lock_expiration_micros: self.lock_expiration_micros,
            status: self.status(now_micros),
        }
    }
}

/// Clamp raw progress into `[0, total]` with `total >= 1`.
pub fn clamp_progress(progress: i64, actions_required: i64, craft_count: i64) -> (i64, i64) {
    let total = actions_required.saturating_mul(craft_count).max(1);
    (progress.clamp(0, total), total)
}

/// A passive crafting job resolved against reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassiveOperation {
    pub entity_id: EntityId,
    pub item_name: String,
    pub tier: i64,
    pub tag: String,
    pub quantity: i64,
    pub crafter: String,
    pub building_name: String,
    pub recipe_name: String,
    pub status_code: i64,
    pub started_at_micros: Option<i64>,
    /// Recipe duration in seconds
    pub duration_secs: Option<f64>,
}

impl PassiveOperation {
    /// Seconds left, `None` when the job is not running or can't be timed.
    pub fn remaining_seconds(&self, now_micros: i64) -> Option<f64> {
        if self.status_code != PASSIVE_IN_PROGRESS {
            return None;
        }
        let started = self.started_at_micros?;
        let duration = self.duration_secs?;
        let elapsed = (now_micros - started) as f64 / 1_000_000.0;
        Some((duration - elapsed).max(0.0))
    }

    pub fn time_remaining(&self, now_micros: i64) -> String {
        match self.status_code {
            PASSIVE_COMPLETE => "READY".to_string(),
            PASSIVE_IN_PROGRESS => match self.remaining_seconds(now_micros) {
                None => "In Progress".to_string(),
                Some(s) if s <= 0.0 => "READY".to_string(),
                Some(s) => format_duration(s),
            },
            _ => "Unknown".to_string(),
        }
    }

    pub fn to_row(&self, now_micros: i64) -> CraftingOperation {
        CraftingOperation {
            entity_id: self.entity_id.clone(),
            item_name: self.item_name.clone(),
            tier: self.tier,
            tag: self.tag.clone(),
            quantity: self.quantity,
            crafter: self.crafter.clone(),
            building_name: self.building_name.clone(),
            recipe_name: self.recipe_name.clone(),
            status_code: self.status_code,
            remaining_seconds: self.remaining_seconds(now_micros).unwrap_or(0.0),
            time_remaining: self.time_remaining(now_micros),
        }
    }
}

/// Format a countdown: `2h 30m`, `2h`, `3m 15s` (under five minutes),
/// `45m`, `30s`, or `0s` once elapsed.
pub fn format_duration(seconds: f64) -> String {
    if seconds <= 0.0 {
        return "0s".to_string();
    }
    let total = seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        if minutes > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{hours}h")
        }
    } else if minutes > 0 {
        if secs > 0 && minutes < 5 {
            format!("{minutes}m {secs}s")
        } else {
            format!("{minutes}m")
        }
    } else {
        format!("{secs}s")
    }
}

/// `1234567` -> `1,234,567`
pub fn format_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\d+\}").expect("constant regex pattern is valid"));

/// Strip `{0}`-style placeholders from a recipe name.
pub fn clean_recipe_name(name: &str) -> String {
    PLACEHOLDER.replace_all(name, "").trim().to_string()
}

#[cfg(test)]
#[path = "crafting_tests.rs"]
mod tests;
