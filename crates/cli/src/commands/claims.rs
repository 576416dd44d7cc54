// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Claims command: the claims list cached by the last session

use anyhow::Result;
use cw_storage::Preferences;

use crate::color;
use crate::output::{claim_line, format_or_json, OutputFormat};

pub fn handle(format: OutputFormat) -> Result<()> {
    let prefs = super::prefs_store()?.load()?;
    format_or_json(format, &prefs.available_claims, || print!("{}", render(&prefs)))
}

pub(crate) fn render(prefs: &Preferences) -> String {
    if prefs.available_claims.is_empty() {
        return "No claims saved. Run `cw watch` to fetch them.\n".to_string();
    }
    let mut out = String::new();
    for claim in &prefs.available_claims {
        let current = prefs.last_selected_claim_id.as_ref() == Some(&claim.claim_id);
        out.push_str(&claim_line(claim, current));
        out.push('\n');
    }
    if let Some(at) = prefs.cache_timestamp {
        out.push_str(&color::context(&format!("as of {}", at.format("%Y-%m-%d %H:%M UTC"))));
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[path = "claims_tests.rs"]
mod tests;
