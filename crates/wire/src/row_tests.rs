// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn row(value: Value) -> Row {
    Row::from_value(value).unwrap()
}

#[test]
fn entity_ids_accept_numbers_and_strings() {
    let r = row(json!({"a": 504403158265495552u64, "b": "77", "c": "", "d": true}));
    assert_eq!(r.entity_id("a").unwrap(), "504403158265495552");
    assert_eq!(r.entity_id("b").unwrap(), "77");
    assert_eq!(r.entity_id("c"), Err(DataShapeError::WrongType("c".into())));
    assert_eq!(r.entity_id("d"), Err(DataShapeError::WrongType("d".into())));
    assert_eq!(r.entity_id("missing"), Err(DataShapeError::MissingField("missing".into())));
}

#[test]
fn null_reads_as_missing() {
    let r = row(json!({"nickname": null}));
    assert!(!r.contains("nickname"));
    assert_eq!(r.str_or("nickname", "none"), "none");
}

#[yare::parameterized(
    wrapped = { json!({"__timestamp_micros_since_unix_epoch__": 1_000}), Some(1_000) },
    option_some = { json!([0, {"__timestamp_micros_since_unix_epoch__": 2_000}]), Some(2_000) },
    bare = { json!(3_000), Some(3_000) },
    zero = { json!({"__timestamp_micros_since_unix_epoch__": 0}), None },
    option_none = { json!([1, []]), None },
)]
fn timestamps(value: Value, expected: Option<i64>) {
    let r = row(json!({"ts": value}));
    assert_eq!(r.timestamp_micros("ts"), expected);
}

#[test]
fn sum_type_tag() {
    let r = row(json!({"status": [1, {}], "bad": "x"}));
    assert_eq!(r.tag("status"), Some(1));
    assert_eq!(r.tag("bad"), None);
}

#[test]
fn numeric_defaults() {
    let r = row(json!({"n": 5, "f": 2.5, "s": "12", "b": true}));
    assert_eq!(r.i64("n").unwrap(), 5);
    assert_eq!(r.i64("s").unwrap(), 12);
    assert_eq!(r.i64_or("missing", 9), 9);
    assert_eq!(r.f64_or("f", 0.0), 2.5);
    assert!(r.bool_or("b", false));
    assert!(r.i64("f").is_err());
}

#[test]
fn non_object_rows_are_rejected() {
    assert_eq!(Row::from_value(json!([1, 2])), Err(DataShapeError::NotAnObject));
}
