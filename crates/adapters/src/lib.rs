// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! I/O seams for claimwatch: the upstream database session and the
//! access-code login API.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod auth;
pub mod upstream;

pub use auth::{validate_email, AuthAdapter, AuthError, HttpAuth};
pub use upstream::{
    ConnError, ConnectTarget, QueryError, UpstreamAdapter, WsUpstream, DEFAULT_HOST,
};

#[cfg(any(test, feature = "test-support"))]
pub use auth::{AuthCall, FakeAuth};
#[cfg(any(test, feature = "test-support"))]
pub use upstream::FakeUpstream;
