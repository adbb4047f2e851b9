//! Lobby listing: which games are currently joinable.

use chrono::{DateTime, Duration, Utc};

use game_core::StartRecord;

use crate::store::MoveRecordStore;

/// Games older than this are no longer shown as joinable.
pub const DEFAULT_WINDOW_MINUTES: i64 = 10;

/// Page size of the lobby listing.
pub const DEFAULT_LIMIT: usize = 21;

/// Start records within ±`window` of `now`, newest first, capped at
/// `limit`. The forward half of the window tolerates author clocks that
/// run ahead of ours.
pub fn joinable_games<S: MoveRecordStore>(
    store: &S,
    now: DateTime<Utc>,
    window: Duration,
    limit: usize,
) -> Vec<StartRecord> {
    let from = (now - window).timestamp();
    let until = (now + window).timestamp();
    store.list_starts(from, until, limit)
}
