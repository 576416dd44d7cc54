// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cw-core: domain types for the claimwatch sync engine

pub mod macros;

pub mod claim;
pub mod clock;
pub mod crafting;
pub mod display;
pub mod event;
pub mod id;
pub mod table;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use claim::{ClaimRecord, TileCostTable};
pub use clock::{Clock, FakeClock, SystemClock};
pub use crafting::{
    derive_status, format_duration, PassiveOperation, ProgressiveOperation, ProgressiveStatus,
};
pub use display::{
    ActiveCraftingOperation, ClaimInfo, CraftingOperation, InventoryItem, TaskRow, TravelerTasks,
};
pub use event::{ConnectionState, DomainUpdate, Event, SwitchStatus, UpdateSource};
pub use id::{quote_literal, ClaimId, EntityId, PlayerId};
pub use table::{affected_domains, Domain, Table};
