//! NDJSON event-log ingestion: a line-per-event file standing in for the
//! external relay during replays and local development.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use game_core::{MoveRecordEntry, StartRecord};

use crate::error::EventLogError;
use crate::store::SharedMemoryStore;

/// One line of the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayEvent {
    Start(StartRecord),
    Move(MoveRecordEntry),
}

/// Read `path` and feed every well-formed line into the store. Malformed
/// lines are logged and skipped; they never abort ingestion. Returns the
/// number of newly accepted records, so re-reading a file that has not
/// grown reports zero.
pub fn ingest_file(path: &Path, store: &SharedMemoryStore) -> Result<usize, EventLogError> {
    let text = fs::read_to_string(path)?;
    let mut accepted = 0;
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<RelayEvent>(line) {
            Ok(RelayEvent::Start(start)) => {
                if store.insert_start(start) {
                    accepted += 1;
                }
            }
            Ok(RelayEvent::Move(entry)) => {
                if store.insert_move(entry) {
                    accepted += 1;
                }
            }
            Err(err) => {
                warn!(line = lineno + 1, %err, "skipping malformed event log line");
            }
        }
    }
    Ok(accepted)
}
