// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake upstream adapter for testing

use super::{ConnError, ConnectTarget, QueryError, UpstreamAdapter};
use async_trait::async_trait;
use cw_wire::{PushFrame, Row};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

struct FakeUpstreamState {
    connected: bool,
    connect_error: Option<ConnError>,
    /// (substring, response); later registrations win
    responses: Vec<(String, Result<Vec<Row>, QueryError>)>,
    queries: Vec<String>,
    connects: Vec<ConnectTarget>,
    subscriptions: Vec<Vec<String>>,
    sink: Option<mpsc::Sender<PushFrame>>,
    gate: Option<Arc<Semaphore>>,
    closes: usize,
}

/// Fake upstream: canned query responses matched by substring, recorded
/// queries and subscriptions, and manual push injection.
#[derive(Clone)]
pub struct FakeUpstream {
    inner: Arc<Mutex<FakeUpstreamState>>,
}

impl Default for FakeUpstream {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeUpstreamState {
                connected: false,
                connect_error: None,
                responses: Vec::new(),
                queries: Vec::new(),
                connects: Vec::new(),
                subscriptions: Vec::new(),
                sink: None,
                gate: None,
                closes: 0,
            })),
        }
    }
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer queries containing `pattern` with `rows` (JSON objects).
    pub fn on_query(&self, pattern: &str, rows: Vec<Value>) -> &Self {
        let rows = rows.into_iter().filter_map(|v| Row::from_value(v).ok()).collect();
        self.inner.lock().responses.push((pattern.to_string(), Ok(rows)));
        self
    }

    /// Fail queries containing `pattern`.
    pub fn fail_query(&self, pattern: &str, error: QueryError) -> &Self {
        self.inner.lock().responses.push((pattern.to_string(), Err(error)));
        self
    }

    pub fn fail_connect(&self, error: ConnError) {
        self.inner.lock().connect_error = Some(error);
    }

    /// Hold every query until [`release`](Self::release) is called.
    pub fn pause(&self) {
        self.inner.lock().gate = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release(&self) {
        if let Some(gate) = self.inner.lock().gate.take() {
            gate.add_permits(Semaphore::MAX_PERMITS / 2);
        }
    }

    /// Deliver a push frame to the current subscription sink.
    pub async fn push(&self, frame: PushFrame) -> bool {
        let sink = self.inner.lock().sink.clone();
        match sink {
            Some(sink) => sink.send(frame).await.is_ok(),
            None => false,
        }
    }

    /// Drop the connection as if the server went away.
    pub fn disconnect(&self) {
        let mut inner = self.inner.lock();
        inner.connected = false;
        inner.sink = None;
    }

    pub fn queries(&self) -> Vec<String> {
        self.inner.lock().queries.clone()
    }

    /// Number of queries whose text contains `pattern`.
    pub fn query_count(&self, pattern: &str) -> usize {
        self.inner.lock().queries.iter().filter(|q| q.contains(pattern)).count()
    }

    pub fn clear_queries(&self) {
        self.inner.lock().queries.clear();
    }

    pub fn connects(&self) -> Vec<ConnectTarget> {
        self.inner.lock().connects.clone()
    }

    pub fn subscriptions(&self) -> Vec<Vec<String>> {
        self.inner.lock().subscriptions.clone()
    }

    pub fn close_count(&self) -> usize {
        self.inner.lock().closes
    }
}

#[async_trait]
impl UpstreamAdapter for FakeUpstream {
    async fn connect(&self, target: &ConnectTarget) -> Result<(), ConnError> {
        let mut inner = self.inner.lock();
        inner.connects.push(target.clone());
        if target.token.is_none() {
            return Err(ConnError::MissingToken);
        }
        if let Some(err) = inner.connect_error.clone() {
            return Err(err);
        }
        inner.connected = true;
        Ok(())
    }

    async fn query(&self, query: &str) -> Result<Vec<Row>, QueryError> {
        let gate = {
            let mut inner = self.inner.lock();
            inner.queries.push(query.to_string());
            inner.gate.clone()
        };
        if let Some(gate) = gate {
            let _ = gate.acquire().await;
        }

        let inner = self.inner.lock();
        if !inner.connected {
            return Err(QueryError::Closed);
        }
        inner
            .responses
            .iter()
            .rev()
            .find(|(pattern, _)| query.contains(pattern.as_str()))
            .map(|(_, result)| result.clone())
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn subscribe(
        &self,
        queries: Vec<String>,
        sink: mpsc::Sender<PushFrame>,
    ) -> Result<(), ConnError> {
        let mut inner = self.inner.lock();
        if !inner.connected {
            return Err(ConnError::Closed);
        }
        inner.subscriptions.push(queries);
        inner.sink = Some(sink);
        Ok(())
    }

    async fn close(&self) {
        let mut inner = self.inner.lock();
        inner.closes += 1;
        inner.connected = false;
        inner.sink = None;
        // held queries resolve as closed
        if let Some(gate) = inner.gate.take() {
            gate.add_permits(Semaphore::MAX_PERMITS / 2);
        }
    }

    fn is_connected(&self) -> bool {
        self.inner.lock().connected
    }
}
