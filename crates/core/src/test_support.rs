// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{ClaimRecord, EntityId, ProgressiveOperation};

// ── Proptest strategies ─────────────────────────────────────────────────

pub mod strategies {
    use proptest::prelude::*;

    /// `(current_progress, total_progress)` with `total >= 1`.
    pub fn arb_progress() -> impl Strategy<Value = (i64, i64)> {
        (1i64..100_000).prop_flat_map(|total| (0i64..=total * 2, Just(total)))
    }

    /// Lock expiration relative to `now`: expired, live, or absent.
    pub fn arb_lock(now: i64) -> impl Strategy<Value = Option<i64>> {
        prop_oneof![
            Just(None),
            (1i64..86_400_000_000).prop_map(move |d| Some(now - d)),
            (0i64..86_400_000_000).prop_map(move |d| Some(now + d)),
        ]
    }
}

// ── Factories ───────────────────────────────────────────────────────────

/// `[A/Alpha, B/Beta, ...]` claim records with the given ids.
pub fn claims(ids: &[(&str, &str)]) -> Vec<ClaimRecord> {
    ids.iter().map(|(id, name)| ClaimRecord::new(*id, *name)).collect()
}

/// A progressive operation with the given progress fields and placeholder
/// names.
pub fn progressive(
    current: i64,
    total: i64,
    lock_expiration_micros: Option<i64>,
    preparation: bool,
) -> ProgressiveOperation {
    ProgressiveOperation {
        entity_id: EntityId::from("1"),
        recipe_id: 1,
        owner_id: EntityId::from("100"),
        function_type: 0,
        item_name: "Item".into(),
        tier: 1,
        tag: String::new(),
        quantity: 1,
        crafter: "crafter".into(),
        building_name: "Station".into(),
        recipe_name: "Recipe".into(),
        current_progress: current,
        total_progress: total,
        lock_expiration_micros,
        preparation,
        accept_help: false,
    }
}
