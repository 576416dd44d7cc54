// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Base URL of the access-code login API.
pub const AUTH_API_BASE_URL: &str = "https://api.bitcraftonline.com/authentication";

/// Errors from login operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid email format: {0}")]
    InvalidEmail(String),
    #[error("login rejected: {0}")]
    Rejected(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("no authorization token available")]
    MissingToken,
}

#[allow(clippy::expect_used)]
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("constant regex pattern is valid")
});

pub fn validate_email(email: &str) -> Result<(), AuthError> {
    if EMAIL.is_match(email) {
        Ok(())
    } else {
        Err(AuthError::InvalidEmail(email.to_string()))
    }
}

/// Adapter for the email access-code login flow
#[async_trait]
pub trait AuthAdapter: Clone + Send + Sync + 'static {
    /// Ask the server to email a one-time access code.
    async fn request_access_code(&self, email: &str) -> Result<(), AuthError>;

    /// Exchange an access code for a token. Returns the `Bearer ...` header value.
    async fn authenticate(&self, email: &str, access_code: &str) -> Result<String, AuthError>;
}

/// Login over HTTPS with reqwest.
#[derive(Clone, Debug)]
pub struct HttpAuth {
    http_client: reqwest::Client,
    base_url: String,
}

impl Default for HttpAuth {
    fn default() -> Self {
        Self::new(AUTH_API_BASE_URL)
    }
}

impl HttpAuth {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { http_client: reqwest::Client::new(), base_url: base_url.into() }
    }

    async fn post(&self, path: &str, params: &[(&str, &str)]) -> Result<reqwest::Response, AuthError> {
        let response = self
            .http_client
            .post(format!("{}/{}", self.base_url, path))
            .query(params)
            .send()
            .await
            .map_err(|e| AuthError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, path, "login request rejected");
            return Err(AuthError::Rejected(format!("{}: {}", status.as_u16(), body.trim())));
        }
        Ok(response)
    }
}

#[async_trait]
impl AuthAdapter for HttpAuth {
    async fn request_access_code(&self, email: &str) -> Result<(), AuthError> {
        validate_email(email)?;
        tracing::info!(%email, "requesting access code");
        self.post("request-access-code", &[("email", email)]).await?;
        tracing::info!("access code sent");
        Ok(())
    }

    async fn authenticate(&self, email: &str, access_code: &str) -> Result<String, AuthError> {
        validate_email(email)?;
        if access_code.is_empty() {
            return Err(AuthError::Rejected("access code is required".into()));
        }
        tracing::info!("requesting authorization token");
        let response =
            self.post("authenticate", &[("email", email), ("accessCode", access_code)]).await?;
        let token: String = response.json().await.map_err(|e| AuthError::Http(e.to_string()))?;
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        Ok(format!("Bearer {token}"))
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{validate_email, AuthAdapter, AuthError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Recorded login call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum AuthCall {
        RequestAccessCode { email: String },
        Authenticate { email: String, access_code: String },
    }

    struct FakeAuthState {
        calls: Vec<AuthCall>,
        token: String,
        error: Option<AuthError>,
    }

    /// Fake login adapter for testing
    #[derive(Clone)]
    pub struct FakeAuth {
        inner: Arc<Mutex<FakeAuthState>>,
    }

    impl Default for FakeAuth {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeAuthState {
                    calls: Vec::new(),
                    token: "fake-token".to_string(),
                    error: None,
                })),
            }
        }
    }

    impl FakeAuth {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_error(&self, error: AuthError) {
            self.inner.lock().error = Some(error);
        }

        pub fn calls(&self) -> Vec<AuthCall> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl AuthAdapter for FakeAuth {
        async fn request_access_code(&self, email: &str) -> Result<(), AuthError> {
            validate_email(email)?;
            let mut inner = self.inner.lock();
            inner.calls.push(AuthCall::RequestAccessCode { email: email.to_string() });
            match inner.error.clone() {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }

        async fn authenticate(&self, email: &str, access_code: &str) -> Result<String, AuthError> {
            validate_email(email)?;
            let mut inner = self.inner.lock();
            inner.calls.push(AuthCall::Authenticate {
                email: email.to_string(),
                access_code: access_code.to_string(),
            });
            match inner.error.clone() {
                Some(e) => Err(e),
                None => Ok(format!("Bearer {}", inner.token)),
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{AuthCall, FakeAuth};

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
