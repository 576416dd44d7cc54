// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Login command: request an access code, or redeem one for a token

use anyhow::Result;
use clap::Args;
use cw_adapters::{validate_email, AuthAdapter, HttpAuth};
use cw_storage::PrefsStore;
use serde::Serialize;

use crate::output::{format_or_json, OutputFormat};

#[derive(Args)]
pub struct LoginArgs {
    /// Account email address
    #[arg(long)]
    pub email: String,
    /// Access code from the login email; omit to have one sent
    #[arg(long)]
    pub code: Option<String>,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum LoginOutcome {
    CodeRequested { email: String },
    LoggedIn { email: String },
}

pub async fn handle(args: LoginArgs, format: OutputFormat) -> Result<()> {
    let store = super::prefs_store()?;
    let outcome = login(&HttpAuth::default(), &store, args).await?;
    format_or_json(format, &outcome, || match &outcome {
        LoginOutcome::CodeRequested { email } => {
            println!("Access code sent to {email}");
            println!("Run `cw login --email {email} --code <CODE>` to finish");
        }
        LoginOutcome::LoggedIn { email } => println!("Logged in as {email}"),
    })
}

/// Without a code, ask for one. With a code, exchange it and save the
/// token and email for later `cw watch` runs.
pub async fn login<A: AuthAdapter>(
    auth: &A,
    store: &PrefsStore,
    args: LoginArgs,
) -> Result<LoginOutcome> {
    let email = args.email.trim().to_string();
    validate_email(&email)?;

    let Some(code) = args.code else {
        auth.request_access_code(&email).await?;
        return Ok(LoginOutcome::CodeRequested { email });
    };

    let token = auth.authenticate(&email, code.trim()).await?;
    store.update(|prefs| {
        prefs.auth_token = Some(token);
        prefs.email = Some(email.clone());
    })?;
    tracing::info!(%email, "saved login");
    Ok(LoginOutcome::LoggedIn { email })
}

#[cfg(test)]
#[path = "login_tests.rs"]
mod tests;
