// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Upstream protocol for the SpacetimeDB JSON websocket.
//!
//! Wire format: one JSON document per text frame, subprotocol
//! [`SUBPROTOCOL`].

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod message;
mod row;
mod wire;

pub use message::{ClientMessage, PushFrame, PushKind, QueryResponse, ServerMessage};
pub use row::{DataShapeError, Row, TIMESTAMP_KEY};
pub use wire::{decode, encode, ProtocolError};

/// Websocket subprotocol for the JSON text encoding.
pub const SUBPROTOCOL: &str = "v1.json.spacetimedb";
