// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single upstream session: credentials plus the live connection.

use cw_adapters::{
    validate_email, AuthAdapter, AuthError, ConnError, ConnectTarget, QueryError, UpstreamAdapter,
};
use cw_wire::{PushFrame, Row};
use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Login inputs. An access code takes precedence over a stored token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: Option<String>,
    pub access_code: Option<String>,
    /// Previously issued token, with or without the `Bearer ` prefix
    pub token: Option<String>,
}

#[derive(Debug, Default)]
struct SessionState {
    auth_token: Option<String>,
    email: Option<String>,
    region: Option<String>,
}

pub struct Session<U: UpstreamAdapter> {
    upstream: U,
    host: String,
    tls: bool,
    state: Mutex<SessionState>,
}

impl<U: UpstreamAdapter> Session<U> {
    pub fn new(upstream: U, host: impl Into<String>) -> Self {
        Self { upstream, host: host.into(), tls: true, state: Mutex::new(SessionState::default()) }
    }

    /// Connect over plain `ws://`.
    pub fn without_tls(mut self) -> Self {
        self.tls = false;
        self
    }

    /// Resolve a token, exchanging an access code through `auth` if one is
    /// given. Returns the `Bearer ...` header value.
    pub async fn authenticate<A: AuthAdapter>(
        &self,
        auth: &A,
        credentials: &Credentials,
    ) -> Result<String, AuthError> {
        let token = match (&credentials.access_code, &credentials.token) {
            (Some(code), _) => {
                let email = credentials.email.as_deref().unwrap_or_default();
                validate_email(email)?;
                auth.authenticate(email, code).await?
            }
            (None, Some(token)) if !token.trim().is_empty() => bearer(token),
            _ => return Err(AuthError::MissingToken),
        };

        let mut state = self.state.lock();
        state.auth_token = Some(token.clone());
        state.email = credentials.email.clone();
        tracing::info!(email = state.email.as_deref().unwrap_or("-"), "session authenticated");
        Ok(token)
    }

    pub fn auth_token(&self) -> Option<String> {
        self.state.lock().auth_token.clone()
    }

    pub fn email(&self) -> Option<String> {
        self.state.lock().email.clone()
    }

    pub fn region(&self) -> Option<String> {
        self.state.lock().region.clone()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Open the connection to `region`. No retry.
    pub async fn connect(&self, region: &str) -> Result<(), ConnError> {
        let token = self.auth_token();
        if token.is_none() {
            return Err(ConnError::MissingToken);
        }
        let mut target = ConnectTarget::new(&self.host, region, token);
        target.tls = self.tls;
        self.upstream.connect(&target).await?;
        self.state.lock().region = Some(region.to_string());
        tracing::info!(host = %self.host, region, "session connected");
        Ok(())
    }

    pub async fn query(&self, text: &str) -> Result<Vec<Row>, QueryError> {
        self.upstream.query(text).await
    }

    pub async fn subscribe(
        &self,
        queries: Vec<String>,
        sink: mpsc::Sender<PushFrame>,
    ) -> Result<(), ConnError> {
        self.upstream.subscribe(queries, sink).await
    }

    pub async fn close(&self) {
        self.upstream.close().await;
    }

    pub fn is_connected(&self) -> bool {
        self.upstream.is_connected()
    }
}

fn bearer(token: &str) -> String {
    let token = token.trim();
    if token.starts_with("Bearer ") {
        token.to_string()
    } else {
        format!("Bearer {token}")
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
