//! Watcher configuration from environment variables.

use std::env;

#[derive(Clone, Debug)]
pub struct WatchConfig {
    /// Path to the NDJSON event log to follow.
    pub event_log: String,

    /// Game to track (id of its start event). When unset, the newest start
    /// record in the log is tracked.
    pub game_id: Option<String>,

    /// How often to re-read the event log.
    pub poll_interval_ms: u64,

    /// Local key material. Both must be set to play; otherwise the watcher
    /// is a spectator.
    pub pubkey: Option<String>,
    pub seckey: Option<String>,
}

impl WatchConfig {
    pub fn from_env() -> Self {
        Self {
            event_log: env::var("EVENT_LOG").unwrap_or_else(|_| "events.ndjson".to_string()),
            game_id: env::var("GAME_ID").ok(),
            poll_interval_ms: env::var("POLL_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1_000),
            pubkey: env::var("PUBKEY").ok(),
            seckey: env::var("SECKEY").ok(),
        }
    }
}
