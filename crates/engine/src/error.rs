// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime error types

use cw_adapters::{ConnError, QueryError};
use cw_core::ClaimId;
use thiserror::Error;

/// Errors from runtime operations
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("unknown claim: {0}")]
    UnknownClaim(ClaimId),
    #[error("no claim selected")]
    NoClaim,
    #[error("query failed: {0}")]
    Query(#[from] QueryError),
    #[error("subscribe failed: {0}")]
    Subscribe(#[from] ConnError),
    #[error("event receiver dropped, lost {0}")]
    EventsClosed(&'static str),
}
