// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::strategies::{arb_lock, arb_progress};
use proptest::prelude::*;

const NOW: i64 = 1_754_913_600_000_000;
const PAST: i64 = NOW - 60_000_000;
const FUTURE: i64 = NOW + 60_000_000;

#[yare::parameterized(
    complete = { 100, 100, None, false, ProgressiveStatus::Ready },
    complete_with_expired_lock = { 100, 100, Some(PAST), false, ProgressiveStatus::Ready },
    over_complete = { 120, 100, Some(FUTURE), true, ProgressiveStatus::Ready },
    expired_lock_pauses = { 50, 100, Some(PAST), false, ProgressiveStatus::Paused },
    expired_lock_beats_preparation = { 50, 100, Some(PAST), true, ProgressiveStatus::Paused },
    live_lock_preparing = { 50, 100, Some(FUTURE), true, ProgressiveStatus::Crafting },
    live_lock_idle = { 50, 100, Some(FUTURE), false, ProgressiveStatus::Paused },
    no_lock_preparing = { 50, 100, None, true, ProgressiveStatus::Crafting },
    zero_lock_preparing = { 50, 100, Some(0), true, ProgressiveStatus::Crafting },
    lock_equal_to_now = { 50, 100, Some(NOW), true, ProgressiveStatus::Crafting },
)]
fn status_derivation(
    current: i64,
    total: i64,
    lock: Option<i64>,
    preparation: bool,
    expected: ProgressiveStatus,
) {
    assert_eq!(derive_status(current, total, lock, preparation, NOW), expected);
}

#[test]
fn status_derivation_is_repeatable() {
    let first = derive_status(10, 20, Some(FUTURE), true, NOW);
    for _ in 0..5 {
        assert_eq!(derive_status(10, 20, Some(FUTURE), true, NOW), first);
    }
}

#[test]
fn status_labels() {
    assert_eq!(ProgressiveStatus::Ready.to_string(), "Ready to Claim");
    assert_eq!(
        serde_json::to_string(&ProgressiveStatus::Ready).unwrap(),
        "\"Ready to Claim\""
    );
    assert_eq!(ProgressiveStatus::Paused.to_string(), "Paused");
}

#[yare::parameterized(
    zero = { 0.0, "0s" },
    negative = { -5.0, "0s" },
    fraction = { 0.4, "0s" },
    seconds = { 30.0, "30s" },
    short_minutes_with_seconds = { 195.0, "3m 15s" },
    short_minutes_even = { 180.0, "3m" },
    long_minutes_drop_seconds = { 330.0, "5m" },
    hours_and_minutes = { 9_000.0, "2h 30m" },
    whole_hours = { 7_200.0, "2h" },
    hours_drop_seconds = { 7_205.0, "2h" },
)]
fn duration_formatting(seconds: f64, expected: &str) {
    assert_eq!(format_duration(seconds), expected);
}

#[yare::parameterized(
    small = { 999, "999" },
    thousand = { 1_000, "1,000" },
    million = { 1_234_567, "1,234,567" },
    negative = { -4_500, "-4,500" },
)]
fn thousands(n: i64, expected: &str) {
    assert_eq!(format_thousands(n), expected);
}

#[test]
fn recipe_placeholders_are_stripped() {
    assert_eq!(clean_recipe_name("{0} Refined Plank"), "Refined Plank");
    assert_eq!(clean_recipe_name("Plank {12}"), "Plank");
    assert_eq!(clean_recipe_name("Plain"), "Plain");
}

#[test]
fn progress_is_clamped() {
    assert_eq!(clamp_progress(-5, 100, 1), (0, 100));
    assert_eq!(clamp_progress(250, 100, 2), (200, 200));
    assert_eq!(clamp_progress(3, 0, 4), (1, 1));
}

#[test]
fn clamp_progress_saturates_huge_totals() {
    assert_eq!(clamp_progress(i64::MAX, i64::MAX, 3), (i64::MAX, i64::MAX));
    assert_eq!(clamp_progress(10, i64::MAX, -2), (1, 1));
}

fn passive(status_code: i64, started: Option<i64>, duration: Option<f64>) -> PassiveOperation {
    PassiveOperation {
        entity_id: EntityId::from("1"),
        item_name: "Plank".into(),
        tier: 1,
        tag: "Plank".into(),
        quantity: 5,
        crafter: "alice".into(),
        building_name: "Sawmill".into(),
        recipe_name: "Plank".into(),
        status_code,
        started_at_micros: started,
        duration_secs: duration,
    }
}

#[test]
fn passive_countdown_advances_with_clock() {
    let op = passive(PASSIVE_IN_PROGRESS, Some(NOW - 60_000_000), Some(600.0));
    assert_eq!(op.time_remaining(NOW), "9m");
    assert_eq!(op.remaining_seconds(NOW), Some(540.0));
    assert_eq!(op.time_remaining(NOW + 300_000_000), "4m");
    assert_eq!(op.time_remaining(NOW + 600_000_000), "READY");
}

#[yare::parameterized(
    complete = { PASSIVE_COMPLETE, Some(NOW), Some(10.0), "READY" },
    idle = { 0, Some(NOW), Some(10.0), "Unknown" },
    no_timestamp = { PASSIVE_IN_PROGRESS, None, Some(10.0), "In Progress" },
    no_recipe = { PASSIVE_IN_PROGRESS, Some(NOW), None, "In Progress" },
)]
fn passive_status_labels(code: i64, started: Option<i64>, duration: Option<f64>, label: &str) {
    assert_eq!(passive(code, started, duration).time_remaining(NOW), label);
}

#[test]
fn progressive_row_reports_remaining_effort() {
    let op = ProgressiveOperation {
        entity_id: EntityId::from("9"),
        recipe_id: 3,
        owner_id: EntityId::from("42"),
        function_type: 0,
        item_name: "Ingot".into(),
        tier: 2,
        tag: "Metal".into(),
        quantity: 1,
        crafter: "bob".into(),
        building_name: "Smelter".into(),
        recipe_name: "Ingot".into(),
        current_progress: 500,
        total_progress: 2_000,
        lock_expiration_micros: Some(FUTURE),
        preparation: true,
        accept_help: true,
    };
    let row = op.to_row(NOW);
    assert_eq!(row.remaining_effort, "1,500");
    assert_eq!(row.progress_value, "500/2000");
    assert_eq!(row.accept_help, "Yes");
    assert_eq!(row.status, ProgressiveStatus::Crafting);
    assert_eq!(op.to_row(FUTURE + 1).status, ProgressiveStatus::Paused);
}

proptest! {
    #[test]
    fn completed_work_is_always_ready(
        (current, total) in arb_progress(),
        lock in arb_lock(NOW),
        preparation in any::<bool>(),
    ) {
        prop_assume!(current >= total);
        prop_assert_eq!(derive_status(current, total, lock, preparation, NOW), ProgressiveStatus::Ready);
    }

    #[test]
    fn expired_lock_always_pauses_unfinished_work(
        (current, total) in arb_progress(),
        ago in 1i64..86_400_000_000,
        preparation in any::<bool>(),
    ) {
        prop_assume!(current < total);
        prop_assert_eq!(
            derive_status(current, total, Some(NOW - ago), preparation, NOW),
            ProgressiveStatus::Paused
        );
    }
}
