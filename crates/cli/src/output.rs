// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rendering of events and claim lists for the terminal.

use clap::ValueEnum;
use cw_core::{
    ActiveCraftingOperation, ClaimInfo, ClaimRecord, ConnectionState, CraftingOperation,
    DomainUpdate, Event, InventoryItem, SwitchStatus, TravelerTasks,
};
use serde::Serialize;
use std::fmt::Write;

use crate::color;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print `value` as pretty JSON, or run the text renderer.
pub fn format_or_json<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text_fn: impl FnOnce(),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => text_fn(),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

/// One event as a single JSON line (`{"type": ..., "data": ...}`).
pub fn event_json(event: &Event) -> anyhow::Result<String> {
    Ok(serde_json::to_string(event)?)
}

/// One event as a header line followed by indented rows.
pub fn event_text(event: &Event) -> String {
    let kind = color::header(event.name());
    match event {
        Event::ConnectionStatus { status: ConnectionState::Connected, .. } => {
            format!("{kind} connected")
        }
        Event::ConnectionStatus { status: ConnectionState::Failed, reason } => {
            format!("{kind} {}", color::alert(&format!("failed: {}", reason.as_deref().unwrap_or("unknown"))))
        }
        Event::InventoryUpdate(update) => domain(&kind, update, "items", inventory_row),
        Event::CraftingUpdate(update) => domain(&kind, update, "crafts", crafting_row),
        Event::ActiveCraftingUpdate(update) => domain(&kind, update, "crafts", active_row),
        Event::TasksUpdate(update) => domain(&kind, update, "travelers", traveler_rows),
        Event::ClaimInfoUpdate(info) => format!("{kind} {}", claim_header(info)),
        Event::ClaimsListUpdate { claims, current_claim_id } => {
            let mut out = format!("{kind} {} claim(s)", claims.len());
            for claim in claims {
                let current = current_claim_id.as_ref() == Some(&claim.claim_id);
                let _ = write!(out, "\n{}", claim_line(claim, current));
            }
            out
        }
        Event::ClaimSwitching { claim_id, claim_name, .. } => {
            format!("{kind} {claim_name} ({claim_id})")
        }
        Event::ClaimSwitched { status: SwitchStatus::Error, error, .. } => {
            format!("{kind} {}", color::alert(error.as_deref().unwrap_or("unknown error")))
        }
        Event::ClaimSwitched { claim_info, .. } => match claim_info {
            Some(info) => format!("{kind} {}", claim_header(info)),
            None => kind,
        },
        Event::Error(message) => format!("{kind} {}", color::alert(message)),
    }
}

fn domain<T>(
    kind: &str,
    update: &DomainUpdate<T>,
    noun: &str,
    row: impl Fn(&T) -> String,
) -> String {
    let source = color::context(&format!("[{}]", update.source));
    if !update.success {
        return format!("{kind} {source} {}", color::alert(&format!("failed: {}", update.message)));
    }
    let stale = if update.is_fresh { String::new() } else { color::context(" (stale)") };
    let mut out = format!("{kind} {source} {} {noun}{stale}", update.rows.len());
    for r in update.rows.iter() {
        let _ = write!(out, "\n{}", row(r));
    }
    out
}

fn inventory_row(item: &InventoryItem) -> String {
    let containers: Vec<String> =
        item.containers.iter().map(|(name, qty)| format!("{name} {qty}")).collect();
    format!("  {} x{}  {}", item.name, item.total_quantity, color::context(&containers.join(", ")))
}

fn crafting_row(op: &CraftingOperation) -> String {
    format!(
        "  {} x{}  {}  {} @ {}  {}",
        op.item_name, op.quantity, op.recipe_name, op.crafter, op.building_name, op.time_remaining
    )
}

fn active_row(op: &ActiveCraftingOperation) -> String {
    format!(
        "  {} x{}  {}  {}  {} @ {}",
        op.item_name, op.quantity, op.progress_value, op.status, op.crafter, op.building_name
    )
}

fn traveler_rows(traveler: &TravelerTasks) -> String {
    let mut out =
        format!("  {} {}/{}", traveler.traveler, traveler.completed_count, traveler.total_count);
    for task in &traveler.tasks {
        let mark = if task.completed { "x" } else { " " };
        let _ = write!(out, "\n    [{mark}] {}  {}", task.description, color::context(&task.required_items));
    }
    out
}

/// `Alpha (1001)  treasury 100  supplies 50  tiles 200  2.00/h`
pub fn claim_header(info: &ClaimInfo) -> String {
    format!(
        "{} ({})  treasury {}  supplies {}  tiles {}  {:.2}/h",
        info.claim_name,
        info.claim_id,
        info.treasury,
        info.supplies,
        info.tile_count,
        info.supplies_per_hour
    )
}

/// One line of a claims list, starred when current.
pub fn claim_line(claim: &ClaimRecord, current: bool) -> String {
    let marker = if current { "*" } else { " " };
    format!(
        "{marker} {:<10} {}  {}",
        claim.claim_id.as_str(),
        claim.claim_name,
        color::context(&format!("treasury {}  supplies {}  tiles {}", claim.treasury, claim.supplies, claim.tile_count))
    )
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
