// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! claimwatch data service
//!
//! Boots the upstream session and the engine runtime, then keeps the
//! consumer's event stream current until stopped.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod env;
pub mod lifecycle;
pub mod logging;

pub use config::{Config, ConfigError, FileConfig};
pub use lifecycle::{BootstrapError, DataService, LiveService, ServiceHandle};
