// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk state for claimwatch: the preference file and the read-only
//! reference data store.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod prefs;
mod reference;

pub use prefs::{rotate_bak_path, Preferences, PrefsError, PrefsStore, PREFS_FILE};
pub use reference::{
    load_reference, locate_reference, ReferenceError, ReferenceTables, REFERENCE_FILE,
    REFERENCE_FILE_ZST,
};
