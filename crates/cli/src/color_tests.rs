// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

fn force_color() {
    std::env::set_var("COLOR", "1");
    std::env::remove_var("NO_COLOR");
}

#[test]
#[serial]
fn styles_returns_styled_when_color_forced() {
    force_color();

    let debug = format!("{:?}", styles());
    assert_ne!(debug, format!("{:?}", Styles::plain()));
}

#[test]
#[serial]
fn styles_returns_plain_when_no_color() {
    std::env::set_var("NO_COLOR", "1");
    std::env::remove_var("COLOR");

    assert_eq!(format!("{:?}", styles()), format!("{:?}", Styles::plain()));
}

#[test]
#[serial]
fn header_produces_ansi_when_color_forced() {
    force_color();

    let result = header("inventory_update");
    assert!(result.starts_with("\x1b[38;5;74m"), "expected ANSI header color");
    assert!(result.contains("inventory_update"));
    assert!(result.ends_with("\x1b[0m"), "expected ANSI reset");
}

#[test]
#[serial]
fn alert_produces_ansi_when_color_forced() {
    force_color();

    assert!(alert("failed").contains("\x1b[38;5;167m"));
}

#[test]
#[serial]
fn no_color_returns_plain_text() {
    std::env::set_var("NO_COLOR", "1");
    std::env::remove_var("COLOR");

    assert_eq!(header("foo"), "foo");
    assert_eq!(context("bar"), "bar");
    assert_eq!(alert("baz"), "baz");
}
