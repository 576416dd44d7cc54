// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tile-cost command: supply upkeep for a claim size

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use cw_core::TileCostTable;
use cw_daemon::Config;
use cw_engine::ReferenceData;
use cw_storage::{load_reference, locate_reference};
use serde::Serialize;

use crate::output::{format_or_json, OutputFormat};

#[derive(Args)]
pub struct TileCostArgs {
    /// Number of tiles in the claim
    #[arg(allow_negative_numbers = true)]
    pub tiles: i64,
    /// Reference store to read the cost table from
    #[arg(long)]
    pub reference: Option<PathBuf>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct TileCost {
    pub tile_count: i64,
    pub cost_per_tile: f64,
    pub supplies_per_hour: f64,
}

pub fn handle(args: TileCostArgs, format: OutputFormat) -> Result<()> {
    let path = match args.reference {
        Some(path) => Some(path),
        None => {
            let config = Config::load()?;
            config.reference_path.or_else(|| locate_reference(&config.state_dir))
        }
    };
    let table = match path {
        Some(path) => ReferenceData::from_tables(&load_reference(&path)?).tile_cost().clone(),
        None => TileCostTable::default(),
    };

    let cost = tile_cost(&table, args.tiles);
    format_or_json(format, &cost, || {
        println!("{} tiles: {:.2} supplies/hour ({} per tile)", cost.tile_count, cost.supplies_per_hour, cost.cost_per_tile)
    })
}

pub(crate) fn tile_cost(table: &TileCostTable, tile_count: i64) -> TileCost {
    let cost_per_tile = if tile_count > 0 { table.cost_per_tile(tile_count) } else { 0.0 };
    TileCost { tile_count, cost_per_tile, supplies_per_hour: table.supplies_per_hour(tile_count) }
}

#[cfg(test)]
#[path = "tile_cost_tests.rs"]
mod tests;
