// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client and server message types.

use serde::Serialize;

use crate::row::Row;

/// Messages sent to the upstream database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ClientMessage {
    /// Request/response query, answered by a `OneOffQueryResponse` carrying
    /// the same `message_id`.
    OneOffQuery { message_id: String, query_string: String },
    /// Replace the subscription set.
    Subscribe { request_id: u32, query_strings: Vec<String> },
}

/// Result of a one-off query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    pub message_id: String,
    /// Decoded rows, or the upstream error text.
    pub result: Result<Vec<Row>, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushKind {
    Transaction,
    SubscriptionUpdate,
    InitialSubscription,
}

/// A push notification that some subscribed tables changed.
#[derive(Debug, Clone, PartialEq)]
pub struct PushFrame {
    pub kind: PushKind,
    /// Table names from the structured `table_name` fields, in frame order
    pub tables: Vec<String>,
    pub reducer: Option<String>,
    pub timestamp_micros: Option<i64>,
}

impl PushFrame {
    pub fn new(kind: PushKind, tables: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            kind,
            tables: tables.into_iter().map(Into::into).collect(),
            reducer: None,
            timestamp_micros: None,
        }
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(String::as_str)
    }
}

/// Messages received from the upstream database.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// First frame after connecting
    IdentityToken,
    QueryResponse(QueryResponse),
    Push(PushFrame),
    /// A transaction that did not commit; carries the reducer name if known
    Uncommitted { reducer: Option<String> },
    /// Any other top-level message kind
    Other(String),
}
