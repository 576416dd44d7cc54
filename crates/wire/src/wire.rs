// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Frame encoding and decoding.

use serde_json::Value;
use thiserror::Error;

use crate::message::{ClientMessage, PushFrame, PushKind, QueryResponse, ServerMessage};
use crate::row::{as_i64, Row, TIMESTAMP_KEY};

/// Errors that can occur while encoding or decoding frames
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed message: {0}")]
    Malformed(&'static str),
}

/// Encode a client message as a JSON text frame.
pub fn encode(message: &ClientMessage) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(message)?)
}

/// Decode a server text frame.
pub fn decode(text: &str) -> Result<ServerMessage, ProtocolError> {
    let value: Value = serde_json::from_str(text)?;
    let object = value.as_object().ok_or(ProtocolError::Malformed("frame is not an object"))?;
    let Some((kind, body)) = object.iter().next() else {
        return Err(ProtocolError::Malformed("empty frame"));
    };

    match kind.as_str() {
        "IdentityToken" => Ok(ServerMessage::IdentityToken),
        "OneOffQueryResponse" => parse_query_response(body).map(ServerMessage::QueryResponse),
        "TransactionUpdate" => Ok(parse_transaction(body)),
        "SubscriptionUpdate" => Ok(ServerMessage::Push(parse_database_update(
            PushKind::SubscriptionUpdate,
            body,
        ))),
        "InitialSubscription" => Ok(ServerMessage::Push(parse_database_update(
            PushKind::InitialSubscription,
            body,
        ))),
        other => Ok(ServerMessage::Other(other.to_string())),
    }
}

fn parse_query_response(body: &Value) -> Result<QueryResponse, ProtocolError> {
    let message_id = body
        .get("message_id")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::Malformed("query response without message_id"))?
        .to_string();

    if let Some(error) = body.get("error").and_then(Value::as_str) {
        return Ok(QueryResponse { message_id, result: Err(error.to_string()) });
    }

    let mut rows = Vec::new();
    for table in body.get("tables").and_then(Value::as_array).into_iter().flatten() {
        for raw in table.get("rows").and_then(Value::as_array).into_iter().flatten() {
            // rows are JSON documents encoded as strings
            let parsed = match raw {
                Value::String(s) => serde_json::from_str::<Value>(s)?,
                other => other.clone(),
            };
            let row = Row::from_value(parsed)
                .map_err(|_| ProtocolError::Malformed("query row is not an object"))?;
            rows.push(row);
        }
    }
    Ok(QueryResponse { message_id, result: Ok(rows) })
}

fn parse_transaction(body: &Value) -> ServerMessage {
    let reducer = body
        .get("reducer_call")
        .and_then(|r| r.get("reducer_name"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let Some(committed) = body.get("status").and_then(|s| s.get("Committed")) else {
        return ServerMessage::Uncommitted { reducer };
    };

    let timestamp_micros =
        body.get("timestamp").and_then(|t| t.get(TIMESTAMP_KEY)).and_then(as_i64);

    ServerMessage::Push(PushFrame {
        kind: PushKind::Transaction,
        tables: table_names(committed),
        reducer,
        timestamp_micros,
    })
}

fn parse_database_update(kind: PushKind, body: &Value) -> PushFrame {
    let tables = body.get("database_update").map(table_names).unwrap_or_default();
    PushFrame { kind, tables, reducer: None, timestamp_micros: None }
}

fn table_names(update: &Value) -> Vec<String> {
    update
        .get("tables")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|t| t.get("table_name").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
