// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Websocket session: a single reader task demultiplexes query responses
//! (by `message_id`) and push frames (to the subscription sink).

use super::{ConnError, ConnectTarget, QueryError, UpstreamAdapter};
use async_trait::async_trait;
use cw_wire::{ClientMessage, PushFrame, Row, ServerMessage, SUBPROTOCOL};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type Reply = oneshot::Sender<Result<Vec<Row>, QueryError>>;

/// How long to wait for the identity frame after the handshake.
const IDENTITY_TIMEOUT: Duration = Duration::from_secs(10);

/// How long `close` waits for the reader task to wind down.
const READER_JOIN_TIMEOUT: Duration = Duration::from_secs(1);

struct Connection {
    writer: SplitSink<WsStream, Message>,
    reader: JoinHandle<()>,
    shutdown_tx: oneshot::Sender<()>,
}

struct Shared {
    pending: parking_lot::Mutex<HashMap<String, Reply>>,
    sink: parking_lot::Mutex<Option<mpsc::Sender<PushFrame>>>,
    connected: AtomicBool,
}

impl Shared {
    fn fail_pending(&self) {
        let pending: Vec<Reply> = self.pending.lock().drain().map(|(_, tx)| tx).collect();
        for tx in pending {
            let _ = tx.send(Err(QueryError::Closed));
        }
    }
}

/// Upstream adapter over a tokio-tungstenite websocket.
#[derive(Clone)]
pub struct WsUpstream {
    query_timeout: Duration,
    conn: Arc<tokio::sync::Mutex<Option<Connection>>>,
    shared: Arc<Shared>,
    next_request_id: Arc<AtomicU32>,
}

impl WsUpstream {
    pub fn new(query_timeout: Duration) -> Self {
        Self {
            query_timeout,
            conn: Arc::new(tokio::sync::Mutex::new(None)),
            shared: Arc::new(Shared {
                pending: parking_lot::Mutex::new(HashMap::new()),
                sink: parking_lot::Mutex::new(None),
                connected: AtomicBool::new(false),
            }),
            next_request_id: Arc::new(AtomicU32::new(1)),
        }
    }

    async fn send(&self, text: String) -> Result<(), ConnError> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(ConnError::Closed)?;
        conn.writer.send(Message::text(text)).await.map_err(|e| ConnError::Io(e.to_string()))
    }
}

#[async_trait]
impl UpstreamAdapter for WsUpstream {
    async fn connect(&self, target: &ConnectTarget) -> Result<(), ConnError> {
        let token = target.token.as_deref().ok_or(ConnError::MissingToken)?;

        let mut guard = self.conn.lock().await;
        if guard.is_some() && self.shared.connected.load(Ordering::SeqCst) {
            tracing::info!("websocket already connected, reusing");
            return Ok(());
        }

        let uri = target.uri();
        let mut request =
            uri.as_str().into_client_request().map_err(|e| ConnError::Handshake(e.to_string()))?;
        let headers = request.headers_mut();
        headers.insert("Sec-WebSocket-Protocol", HeaderValue::from_static(SUBPROTOCOL));
        headers.insert(
            "Authorization",
            HeaderValue::from_str(token).map_err(|e| ConnError::Handshake(e.to_string()))?,
        );

        tracing::info!(%uri, "connecting to upstream");
        let (ws, _) = tokio_tungstenite::connect_async(request).await.map_err(|e| {
            tracing::error!(%uri, error = %e, "websocket handshake failed");
            ConnError::Handshake(e.to_string())
        })?;
        let (writer, mut read) = ws.split();

        match tokio::time::timeout(IDENTITY_TIMEOUT, read.next()).await {
            Ok(Some(Ok(Message::Text(text)))) => {
                let head: String = text.as_str().chars().take(20).collect();
                tracing::info!(%head, "received identity frame");
            }
            Ok(Some(Ok(Message::Close(frame)))) => {
                tracing::warn!(?frame, "upstream closed during handshake");
                return Err(ConnError::Closed);
            }
            Ok(Some(Ok(_))) => {}
            Ok(Some(Err(e))) => return Err(ConnError::Io(e.to_string())),
            Ok(None) => return Err(ConnError::Closed),
            Err(_) => {
                tracing::warn!("timed out waiting for identity frame, connection may still be valid");
            }
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        self.shared.connected.store(true, Ordering::SeqCst);
        let reader = tokio::spawn(read_loop(read, Arc::clone(&self.shared), shutdown_rx));
        *guard = Some(Connection { writer, reader, shutdown_tx });
        tracing::info!(region = %target.region, "upstream connected");
        Ok(())
    }

    async fn query(&self, query: &str) -> Result<Vec<Row>, QueryError> {
        if !self.is_connected() {
            return Err(QueryError::Closed);
        }

        let message_id = uuid::Uuid::new_v4().simple().to_string();
        let text = cw_wire::encode(&ClientMessage::OneOffQuery {
            message_id: message_id.clone(),
            query_string: query.to_string(),
        })
        .map_err(|e| QueryError::Decode(e.to_string()))?;

        let (tx, rx) = oneshot::channel();
        self.shared.pending.lock().insert(message_id.clone(), tx);
        if let Err(e) = self.send(text).await {
            self.shared.pending.lock().remove(&message_id);
            tracing::warn!(%message_id, error = %e, "failed to send query");
            return Err(QueryError::Closed);
        }

        match tokio::time::timeout(self.query_timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(QueryError::Closed),
            Err(_) => {
                self.shared.pending.lock().remove(&message_id);
                tracing::warn!(
                    %message_id,
                    timeout_ms = self.query_timeout.as_millis() as u64,
                    "query timed out, server may be slow or unresponsive"
                );
                Err(QueryError::Timeout)
            }
        }
    }

    async fn subscribe(
        &self,
        queries: Vec<String>,
        sink: mpsc::Sender<PushFrame>,
    ) -> Result<(), ConnError> {
        *self.shared.sink.lock() = Some(sink);
        if queries.is_empty() {
            tracing::warn!("empty subscription set, nothing sent");
            return Ok(());
        }
        let request_id = self.next_request_id.fetch_add(1, Ordering::SeqCst);
        let count = queries.len();
        let text = cw_wire::encode(&ClientMessage::Subscribe { request_id, query_strings: queries })
            .map_err(|e| ConnError::Io(e.to_string()))?;
        self.send(text).await?;
        tracing::info!(request_id, count, "subscription set replaced");
        Ok(())
    }

    async fn close(&self) {
        let Some(mut conn) = self.conn.lock().await.take() else {
            return;
        };
        tracing::info!("closing upstream connection");
        self.shared.connected.store(false, Ordering::SeqCst);
        let _ = conn.shutdown_tx.send(());
        if let Err(e) = conn.writer.close().await {
            tracing::warn!(error = %e, "error closing websocket");
        }
        if tokio::time::timeout(READER_JOIN_TIMEOUT, &mut conn.reader).await.is_err() {
            tracing::warn!("reader task did not finish in time, aborting");
            conn.reader.abort();
        }
        *self.shared.sink.lock() = None;
        self.shared.fail_pending();
    }

    fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::SeqCst)
    }
}

async fn read_loop(
    mut read: SplitStream<WsStream>,
    shared: Arc<Shared>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => dispatch(&shared, text.as_str()).await,
                    Some(Ok(Message::Close(frame))) => {
                        tracing::info!(?frame, "upstream sent close frame");
                        break;
                    }
                    None => {
                        tracing::info!("upstream stream ended");
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "upstream read error");
                        break;
                    }
                    _ => {} // Ping/Pong/Binary
                }
            }
            _ = &mut shutdown_rx => break,
        }
    }
    shared.connected.store(false, Ordering::SeqCst);
    shared.fail_pending();
}

async fn dispatch(shared: &Shared, text: &str) {
    match cw_wire::decode(text) {
        Ok(ServerMessage::QueryResponse(response)) => {
            let reply = shared.pending.lock().remove(&response.message_id);
            match reply {
                Some(tx) => {
                    let _ = tx.send(response.result.map_err(QueryError::Upstream));
                }
                None => {
                    tracing::debug!(message_id = %response.message_id, "response for unknown or expired query");
                }
            }
        }
        Ok(ServerMessage::Push(frame)) => {
            let sink = shared.sink.lock().clone();
            if let Some(sink) = sink {
                if sink.send(frame).await.is_err() {
                    tracing::warn!("push sink closed, dropping frame");
                }
            }
        }
        Ok(ServerMessage::Uncommitted { reducer }) => {
            tracing::debug!(?reducer, "ignoring uncommitted transaction");
        }
        Ok(ServerMessage::IdentityToken) => {}
        Ok(ServerMessage::Other(kind)) => {
            tracing::debug!(%kind, "ignoring upstream message");
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to decode upstream frame");
        }
    }
}

#[cfg(test)]
#[path = "ws_tests.rs"]
mod tests;
