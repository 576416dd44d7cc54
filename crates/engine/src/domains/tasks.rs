// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traveler tasks for the player, grouped by traveler.
//!
//! Player-scoped: unaffected by claim switches.

use super::Skipped;
use crate::cache::DomainSource;
use crate::queries;
use crate::reference::{stacks, ReferenceData};
use crate::session::Session;
use async_trait::async_trait;
use cw_adapters::{QueryError, UpstreamAdapter};
use cw_core::{Domain, DomainUpdate, Event, PlayerId, TaskRow, TravelerTasks};
use cw_wire::{DataShapeError, Row};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

pub struct TasksSource<U: UpstreamAdapter> {
    session: Arc<Session<U>>,
    reference: Arc<ReferenceData>,
    player_id: PlayerId,
}

impl<U: UpstreamAdapter> TasksSource<U> {
    pub fn new(session: Arc<Session<U>>, reference: Arc<ReferenceData>, player_id: PlayerId) -> Self {
        Self { session, reference, player_id }
    }
}

#[async_trait]
impl<U: UpstreamAdapter> DomainSource for TasksSource<U> {
    type Raw = Vec<TravelerTasks>;
    type Row = TravelerTasks;

    const DOMAIN: Domain = Domain::Tasks;

    async fn fetch(&self) -> Result<Vec<TravelerTasks>, QueryError> {
        let (states_q, descs_q) =
            (queries::traveler_tasks(&self.player_id), queries::traveler_task_descs(&self.player_id));
        let (states, descs) =
            tokio::try_join!(self.session.query(&states_q), self.session.query(&descs_q))?;
        Ok(group(&states, &descs, &self.reference))
    }

    fn render(&self, raw: &Vec<TravelerTasks>, _now_micros: i64) -> Vec<TravelerTasks> {
        raw.clone()
    }

    fn event(update: DomainUpdate<TravelerTasks>) -> Event {
        Event::TasksUpdate(update)
    }
}

struct TaskDesc {
    description: String,
    required_items: String,
}

pub(crate) fn group(states: &[Row], descs: &[Row], reference: &ReferenceData) -> Vec<TravelerTasks> {
    let descs: HashMap<i64, TaskDesc> = descs
        .iter()
        .filter_map(|row| {
            let id = row.i64("id").ok()?;
            let description = row.str_or("description", "").to_string();
            let required_items = required_items(row, reference);
            Some((id, TaskDesc { description, required_items }))
        })
        .collect();

    let mut skipped = Skipped::new(Domain::Tasks);
    let mut by_traveler: BTreeMap<i64, Vec<TaskRow>> = BTreeMap::new();
    for row in states {
        match task_row(row, &descs) {
            Ok((traveler_id, task)) => by_traveler.entry(traveler_id).or_default().push(task),
            Err(e) => skipped.record(e),
        }
    }

    let mut travelers: Vec<TravelerTasks> = by_traveler
        .into_iter()
        .map(|(traveler_id, mut tasks)| {
            tasks.sort_by_key(|t| t.task_id);
            TravelerTasks::new(traveler_id, reference.traveler_name(traveler_id), tasks)
        })
        .collect();
    travelers.sort_by(|a, b| a.traveler.cmp(&b.traveler));
    travelers
}

fn task_row(row: &Row, descs: &HashMap<i64, TaskDesc>) -> Result<(i64, TaskRow), DataShapeError> {
    let entity_id = row.entity_id("entity_id")?;
    let task_id = row.i64("task_id")?;
    let traveler_id = row.i64("traveler_id")?;
    let desc = descs.get(&task_id);
    let task = TaskRow {
        task_id,
        entity_id,
        description: desc
            .map(|d| d.description.clone())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!("Task {task_id}")),
        completed: row.bool_or("completed", false),
        required_items: desc
            .map(|d| d.required_items.clone())
            .unwrap_or_else(|| NO_ITEMS.to_string()),
    };
    Ok((traveler_id, task))
}

const NO_ITEMS: &str = "No items required";

/// `Wood x5, Stone x2`
fn required_items(row: &Row, reference: &ReferenceData) -> String {
    let items = stacks(row.array("required_items"));
    if items.is_empty() {
        return NO_ITEMS.to_string();
    }
    items
        .iter()
        .map(|&(id, qty)| format!("{} x{qty}", reference.item_name(id)))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
