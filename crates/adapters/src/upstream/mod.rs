// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Upstream database session adapter
//!
//! One websocket connection carries both request/response queries and the
//! push stream for the active subscription set:
//!
//! ```text
//! query() ──OneOffQuery──▶ ┌──────────┐ ◀──OneOffQueryResponse── (by message_id)
//!                          │ upstream │
//! subscribe() ─Subscribe─▶ └──────────┘ ──TransactionUpdate────▶ push sink
//! ```

mod ws;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeUpstream;

pub use ws::WsUpstream;

use async_trait::async_trait;
use cw_wire::{PushFrame, Row};
use thiserror::Error;
use tokio::sync::mpsc;

/// Host serving the early-access database.
pub const DEFAULT_HOST: &str = "bitcraft-early-access.spacetimedb.com";

/// Errors from establishing or using the connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnError {
    #[error("no authorization token")]
    MissingToken,
    #[error("websocket handshake failed: {0}")]
    Handshake(String),
    #[error("connection closed")]
    Closed,
    #[error("io error: {0}")]
    Io(String),
}

/// Errors from a single one-off query
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("query timed out")]
    Timeout,
    #[error("connection closed")]
    Closed,
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("no claim selected")]
    NoClaim,
}

/// Where and as whom to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectTarget {
    pub host: String,
    pub region: String,
    /// Full `Authorization` header value (`Bearer ...`)
    pub token: Option<String>,
    /// `wss` when set, plain `ws` otherwise (local test servers)
    pub tls: bool,
}

impl ConnectTarget {
    pub fn new(host: impl Into<String>, region: impl Into<String>, token: Option<String>) -> Self {
        Self { host: host.into(), region: region.into(), token, tls: true }
    }

    pub fn uri(&self) -> String {
        let scheme = if self.tls { "wss" } else { "ws" };
        format!("{scheme}://{}/v1/database/{}/subscribe", self.host, self.region)
    }
}

/// Adapter for the upstream database session
#[async_trait]
pub trait UpstreamAdapter: Clone + Send + Sync + 'static {
    /// Open the connection and wait for the identity frame. Reuses an
    /// existing connection.
    async fn connect(&self, target: &ConnectTarget) -> Result<(), ConnError>;

    /// Run a one-off query and return its decoded rows.
    async fn query(&self, query: &str) -> Result<Vec<Row>, QueryError>;

    /// Replace the subscription set. Every later push frame goes to `sink`.
    async fn subscribe(
        &self,
        queries: Vec<String>,
        sink: mpsc::Sender<PushFrame>,
    ) -> Result<(), ConnError>;

    /// Close the connection; pending queries fail with [`QueryError::Closed`].
    async fn close(&self);

    fn is_connected(&self) -> bool;
}
