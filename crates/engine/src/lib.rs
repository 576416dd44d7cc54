// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cw-engine: session, domain caches, claim manager, push router and
//! progress ticker

pub mod cache;
pub mod claims;
pub mod domains;
mod error;
pub mod queries;
pub mod reference;
mod runtime;
pub mod session;
pub mod subscriptions;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use cache::{DomainCache, DomainSource, RefreshOutcome, RefreshTicket, DEFAULT_TTL};
pub use claims::{ClaimManager, ClaimScope};
pub use error::RuntimeError;
pub use reference::ReferenceData;
pub use runtime::{Runtime, RuntimeConfig, RuntimeDeps};
pub use session::{Credentials, Session};
