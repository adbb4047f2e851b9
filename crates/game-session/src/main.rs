//! Event-log watcher
//!
//! Follows an NDJSON relay log and keeps one game session resolved against
//! it, logging head and status transitions as events arrive.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use chrono::Utc;

use game_core::status::display_name;
use game_session::config::WatchConfig;
use game_session::event_log;
use game_session::lobby;
use game_session::publisher::LogPublisher;
use game_session::session::{GameSession, Identity, SessionPhase};
use game_session::store::{MoveRecordStore, SharedMemoryStore};

/// Last reported state, so the loop only logs transitions.
#[derive(Default)]
struct Reported {
    phase: Option<SessionPhase>,
    head: Option<String>,
    status: Option<String>,
}

fn feed(
    session: &mut GameSession<LogPublisher>,
    store: &SharedMemoryStore,
    reported: &mut Reported,
) {
    let game_id = session.game_id().to_string();
    session.on_snapshot(store.get_start(&game_id), &store.get_moves(&game_id));

    let phase = session.phase();
    if reported.phase != Some(phase) {
        info!(game = %display_name(&game_id), ?phase, "session phase");
        reported.phase = Some(phase);
    }

    let head = session.head_id().map(|h| h.to_string());
    if head.is_some() && reported.head != head {
        info!(
            game = %display_name(&game_id),
            head = head.as_deref().unwrap_or("-"),
            pgn = session.pgn(),
            "head resolved"
        );
        reported.head = head;
    }

    let status = session.status().map(|s| s.to_string());
    if status.is_some() && reported.status != status {
        if let Some(text) = &status {
            info!(game = %display_name(&game_id), "{text}");
        }
        reported.status = status;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = WatchConfig::from_env();
    let store = SharedMemoryStore::new();
    let path = PathBuf::from(&config.event_log);

    match event_log::ingest_file(&path, &store) {
        Ok(accepted) => info!(accepted, log = %config.event_log, "event log ingested"),
        Err(err) => warn!(%err, log = %config.event_log, "event log not readable yet; will retry"),
    }

    let joinable = lobby::joinable_games(
        &store,
        Utc::now(),
        chrono::Duration::minutes(lobby::DEFAULT_WINDOW_MINUTES),
        lobby::DEFAULT_LIMIT,
    );
    info!(count = joinable.len(), "joinable games in the lobby");

    let game_id = match &config.game_id {
        Some(id) => id.clone(),
        None => store
            .list_starts(i64::MIN, i64::MAX, 1)
            .into_iter()
            .next()
            .map(|s| s.id)
            .context("no GAME_ID set and no start event in the log")?,
    };
    info!(game = %display_name(&game_id), "tracking game");

    let identity = match (config.pubkey.clone(), config.seckey.clone()) {
        (Some(pubkey), Some(seckey)) => Some(Identity { pubkey, seckey }),
        _ => None,
    };
    if identity.is_none() {
        info!("no PUBKEY/SECKEY configured; watching only");
    }

    let mut session = GameSession::new(game_id, identity, LogPublisher);
    let mut reported = Reported::default();
    let mut last_revision = store.revision();
    feed(&mut session, &store, &mut reported);

    let mut ticker = tokio::time::interval(Duration::from_millis(config.poll_interval_ms));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
            _ = ticker.tick() => {
                if let Err(err) = event_log::ingest_file(&path, &store) {
                    warn!(%err, "event log read failed");
                    continue;
                }
                let revision = store.revision();
                if revision == last_revision {
                    continue;
                }
                last_revision = revision;
                feed(&mut session, &store, &mut reported);
            }
        }
    }

    Ok(())
}
