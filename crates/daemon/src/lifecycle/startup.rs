// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bootstrap sequence.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use cw_adapters::{AuthAdapter, UpstreamAdapter};
use cw_core::{Clock, Event, PlayerId};
use cw_engine::claims::fetch_all_claims;
use cw_engine::{queries, Credentials, ReferenceData, Runtime, RuntimeDeps, Session};
use cw_storage::{load_reference, locate_reference, Preferences, PrefsStore, ReferenceTables};
use fs2::FileExt;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{BootstrapError, DataService};
use crate::config::Config;

/// Region used when neither the config nor the preference file names one.
pub const DEFAULT_REGION: &str = "bitcraft-1";

pub(super) struct Started<U: UpstreamAdapter, C: Clock> {
    pub runtime: Arc<Runtime<U, C>>,
    pub steady: JoinHandle<()>,
    pub lock_file: File,
}

pub(super) async fn bootstrap<U: UpstreamAdapter, A: AuthAdapter, C: Clock>(
    service: &DataService<U, A, C>,
    credentials: Credentials,
) -> Result<Started<U, C>, BootstrapError> {
    let config = &service.config;
    let lock_file = acquire_lock(&config.lock_path)?;

    let prefs = PrefsStore::in_dir(&config.state_dir);
    let saved = prefs.load_or_default();
    let credentials = with_saved_login(credentials, config, &saved);

    // 1. Authenticate
    let mut session = Session::new(service.upstream.clone(), config.host.clone());
    if !config.tls {
        session = session.without_tls();
    }
    let token = session.authenticate(&service.auth, &credentials).await?;

    // 2. Connect
    let region = config
        .region
        .clone()
        .or_else(|| saved.region.clone())
        .unwrap_or_else(|| DEFAULT_REGION.to_string());
    session.connect(&region).await?;
    let session = Arc::new(session);

    match connected(service, Arc::clone(&session), &prefs, &saved, &region, token, &credentials)
        .await
    {
        Ok((runtime, steady)) => Ok(Started { runtime, steady, lock_file }),
        Err(e) => {
            session.close().await;
            Err(e)
        }
    }
}

/// Steps after the session is open. The caller closes the session on error.
async fn connected<U: UpstreamAdapter, A: AuthAdapter, C: Clock>(
    service: &DataService<U, A, C>,
    session: Arc<Session<U>>,
    prefs: &PrefsStore,
    saved: &Preferences,
    region: &str,
    token: String,
    credentials: &Credentials,
) -> Result<(Arc<Runtime<U, C>>, JoinHandle<()>), BootstrapError> {
    let config = &service.config;
    emit(service, Event::connected()).await?;

    // 3. Reference data
    let reference = Arc::new(load_reference_data(config)?);

    // 4. Player
    let player_name = config
        .player_name
        .clone()
        .or_else(|| saved.player_name.clone())
        .ok_or(BootstrapError::NoPlayerName)?;
    let player_id = resolve_player(&session, &player_name).await?;

    prefs.update(|p| {
        p.auth_token = Some(token);
        p.email = credentials.email.clone();
        p.player_name = Some(player_name.clone());
        p.region = Some(region.to_string());
    })?;

    let runtime = Arc::new(Runtime::new(
        RuntimeDeps {
            session: Arc::clone(&session),
            reference,
            prefs: prefs.clone(),
            player_id: player_id.clone(),
        },
        service.clock.clone(),
        config.runtime.clone(),
        service.event_tx.clone(),
    ));

    // 5. Claims
    let claims = fetch_all_claims(&session, &player_id).await?;
    runtime.claims().set_available(claims);
    runtime.emit(runtime.claims_list_event()).await?;
    let claim_id = runtime.claims().current_id().ok_or(BootstrapError::NoClaims)?;
    info!(%player_id, %claim_id, claims = %runtime.claims().summary(), "resolved claim");

    // 6. Prime every cache once
    if !runtime.prime().await {
        warn!(%claim_id, "some caches failed to prime");
    }

    // 7. Claim buildings
    let buildings = session.query(&queries::claim_buildings(&claim_id)).await?;
    info!(%claim_id, count = buildings.len(), "enumerated claim buildings");

    // 8-9. Subscriptions
    runtime.resubscribe().await?;

    // 10. Router and ticker
    let steady = tokio::spawn(Arc::clone(&runtime).run());
    info!(%player_id, %claim_id, %region, "data service started");
    Ok((runtime, steady))
}

async fn emit<U: UpstreamAdapter, A: AuthAdapter, C: Clock>(
    service: &DataService<U, A, C>,
    event: Event,
) -> Result<(), BootstrapError> {
    service.event_tx.send(event).await.map_err(|_| BootstrapError::EventsClosed)
}

/// Fill in the stored token and email when the caller gave none.
fn with_saved_login(mut credentials: Credentials, config: &Config, saved: &Preferences) -> Credentials {
    if credentials.email.is_none() {
        credentials.email = config.email.clone().or_else(|| saved.email.clone());
    }
    if credentials.token.is_none() && credentials.access_code.is_none() {
        credentials.token = saved.auth_token.clone();
    }
    credentials
}

fn load_reference_data(config: &Config) -> Result<ReferenceData, BootstrapError> {
    let path = config.reference_path.clone().or_else(|| locate_reference(&config.state_dir));
    let tables = match path {
        Some(path) => load_reference(&path)?,
        None => {
            warn!(state_dir = %config.state_dir.display(), "no reference store, names will be placeholders");
            ReferenceTables::default()
        }
    };
    Ok(ReferenceData::from_tables(&tables))
}

async fn resolve_player<U: UpstreamAdapter>(
    session: &Session<U>,
    player_name: &str,
) -> Result<PlayerId, BootstrapError> {
    let rows = session.query(&queries::player_by_username(player_name)).await?;
    let id = rows
        .first()
        .and_then(|row| row.entity_id("entity_id").ok())
        .ok_or_else(|| BootstrapError::PlayerNotFound(player_name.to_string()))?;
    let player_id = PlayerId::from(id.as_str());
    info!(player_name, %player_id, "resolved player");
    Ok(player_id)
}

/// Take the single-instance lock and record our pid in it.
pub(crate) fn acquire_lock(path: &Path) -> Result<File, BootstrapError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    // Open without truncating so a running instance's pid survives
    let mut file =
        std::fs::OpenOptions::new().write(true).create(true).truncate(false).open(path)?;
    file.try_lock_exclusive().map_err(|e| BootstrapError::LockFailed(path.to_path_buf(), e))?;

    file.set_len(0)?;
    writeln!(file, "{}", std::process::id())?;
    Ok(file)
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
