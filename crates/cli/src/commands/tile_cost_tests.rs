// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    small = { 100, 0.01, 1.0 },
    at_breakpoint = { 1001, 0.0125, 12.5125 },
    empty = { 0, 0.0, 0.0 },
    negative = { -5, 0.0, 0.0 },
)]
fn fallback_table(tiles: i64, per_tile: f64, per_hour: f64) {
    let cost = tile_cost(&TileCostTable::default(), tiles);

    assert_eq!(cost.tile_count, tiles);
    assert!((cost.cost_per_tile - per_tile).abs() < 1e-9);
    assert!((cost.supplies_per_hour - per_hour).abs() < 1e-9);
}

#[test]
fn custom_table_clamps_below_first_breakpoint() {
    let table = TileCostTable::new(vec![(50, 0.02), (500, 0.03)]);

    assert_eq!(tile_cost(&table, 10).cost_per_tile, 0.02);
    assert_eq!(tile_cost(&table, 5000).cost_per_tile, 0.03);
}
