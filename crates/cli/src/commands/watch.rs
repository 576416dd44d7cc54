// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watch command: run the data service and stream its events

use anyhow::{Context, Result};
use clap::Args;
use cw_core::{ClaimId, ConnectionState, Event};
use cw_daemon::{logging, Config, LiveService};
use cw_engine::Credentials;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::exit_error::ExitError;
use crate::output::{event_json, event_text, OutputFormat};

#[derive(Args)]
pub struct WatchArgs {
    /// Account email (defaults to the saved login)
    #[arg(long)]
    pub email: Option<String>,
    /// Access code from the login email
    #[arg(long)]
    pub access_code: Option<String>,
    /// Player name to look up (defaults to config.toml or the saved name)
    #[arg(long)]
    pub player: Option<String>,
    /// Database region, e.g. bitcraft-1
    #[arg(long)]
    pub region: Option<String>,
    /// Switch to this claim once connected
    #[arg(long)]
    pub claim: Option<String>,
}

pub async fn handle(args: WatchArgs, format: OutputFormat) -> Result<()> {
    let mut config = Config::load()?;
    if args.player.is_some() {
        config.player_name = args.player;
    }
    if args.region.is_some() {
        config.region = args.region;
    }
    let _guard = logging::init(&config).context("failed to initialize logging")?;

    let mut service = LiveService::live(config);
    let events = service.events().context("event stream already taken")?;
    let mut printer = spawn_printer(events, format);

    let credentials =
        Credentials { email: args.email, access_code: args.access_code, token: None };
    let handle = match service.start(credentials).await {
        Ok(handle) => handle,
        Err(e) => {
            // Let the printer flush the terminal event before exiting
            let _ = printer.await;
            return Err(ExitError::from(e).into());
        }
    };

    if let Some(claim) = args.claim {
        let claim_id = ClaimId::from(claim.as_str());
        if !handle.switch_claim(&claim_id).await {
            tracing::warn!(%claim_id, "requested claim not available");
        }
    }

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::warn!(error = %e, "failed to listen for ctrl-c");
            }
        }
        _ = &mut printer => {}
    }

    tracing::info!("stopping");
    handle.stop().await;
    printer.abort();
    Ok(())
}

fn spawn_printer(mut events: mpsc::Receiver<Event>, format: OutputFormat) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match format {
                OutputFormat::Text => println!("{}", event_text(&event)),
                OutputFormat::Json => match event_json(&event) {
                    Ok(line) => println!("{line}"),
                    Err(e) => tracing::warn!(error = %e, event = event.name(), "failed to encode event"),
                },
            }
            if is_terminal(&event) {
                break;
            }
        }
    })
}

/// Events after which the service will not recover on its own.
pub(crate) fn is_terminal(event: &Event) -> bool {
    matches!(event, Event::ConnectionStatus { status: ConnectionState::Failed, .. })
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
