// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination.

use std::fmt;

use cw_daemon::BootstrapError;

/// Bootstrap could not authenticate or connect
pub const EXIT_CONNECTION: i32 = 2;
/// Bootstrap connected but could not resolve the player or a claim
pub const EXIT_BOOTSTRAP: i32 = 3;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl From<BootstrapError> for ExitError {
    fn from(e: BootstrapError) -> Self {
        let code = match e {
            BootstrapError::Auth(_) | BootstrapError::Conn(_) => EXIT_CONNECTION,
            _ => EXIT_BOOTSTRAP,
        };
        Self::new(code, e.to_string())
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}
