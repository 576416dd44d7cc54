// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Claim records and supply upkeep.

use serde::{Deserialize, Serialize};

use crate::id::ClaimId;

/// A claim the player belongs to.
///
/// Fields are updated through the typed setters only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub claim_id: ClaimId,
    pub claim_name: String,
    #[serde(default)]
    pub treasury: i64,
    #[serde(default)]
    pub supplies: i64,
    #[serde(default)]
    pub tile_count: i64,
    /// Microseconds since the Unix epoch of the last switch to this claim
    #[serde(default)]
    pub last_accessed: Option<i64>,
}

impl ClaimRecord {
    pub fn new(claim_id: impl Into<ClaimId>, claim_name: impl Into<String>) -> Self {
        Self {
            claim_id: claim_id.into(),
            claim_name: claim_name.into(),
            treasury: 0,
            supplies: 0,
            tile_count: 0,
            last_accessed: None,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.claim_name = name.into();
    }

    pub fn set_treasury(&mut self, treasury: i64) {
        self.treasury = treasury;
    }

    pub fn set_supplies(&mut self, supplies: i64) {
        self.supplies = supplies;
    }

    pub fn set_tile_count(&mut self, tile_count: i64) {
        self.tile_count = tile_count;
    }

    /// Record an access at `epoch_micros`.
    pub fn touch(&mut self, epoch_micros: i64) {
        self.last_accessed = Some(epoch_micros);
    }
}

crate::builder! {
    pub struct ClaimRecordBuilder => ClaimRecord {
        into {
            claim_id: ClaimId = "1001",
            claim_name: String = "Alpha",
        }
        set {
            treasury: i64 = 0,
            supplies: i64 = 0,
            tile_count: i64 = 0,
            last_accessed: Option<i64> = None,
        }
    }
}

/// Per-tile supply cost by claim size.
///
/// A step function over `tile_count` breakpoints: the cost at the largest
/// breakpoint not above the tile count, clamped to the first and last
/// breakpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct TileCostTable {
    // sorted by tile count, never empty
    steps: Vec<(i64, f64)>,
}

impl TileCostTable {
    /// Build from `(tile_count, cost_per_tile)` pairs. Falls back to the
    /// default table when `steps` is empty.
    pub fn new(mut steps: Vec<(i64, f64)>) -> Self {
        if steps.is_empty() {
            return Self::default();
        }
        steps.sort_by_key(|(tiles, _)| *tiles);
        steps.dedup_by_key(|(tiles, _)| *tiles);
        Self { steps }
    }

    pub fn cost_per_tile(&self, tile_count: i64) -> f64 {
        let idx = self.steps.partition_point(|(tiles, _)| *tiles <= tile_count);
        let idx = idx.saturating_sub(1);
        self.steps.get(idx).map(|(_, cost)| *cost).unwrap_or_default()
    }

    pub fn supplies_per_hour(&self, tile_count: i64) -> f64 {
        if tile_count <= 0 {
            return 0.0;
        }
        tile_count as f64 * self.cost_per_tile(tile_count)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Default for TileCostTable {
    fn default() -> Self {
        Self { steps: vec![(1, 0.01), (1001, 0.0125)] }
    }
}

#[cfg(test)]
#[path = "claim_tests.rs"]
mod tests;
