//! Shared fixture builders for integration tests.

use game_core::{MoveRecordEntry, StartRecord};

pub fn start_event(id: &str, pubkey: &str, created_at: i64) -> StartRecord {
    StartRecord {
        id: id.to_string(),
        pubkey: pubkey.to_string(),
        created_at,
    }
}

pub fn move_event(
    id: &str,
    game_id: &str,
    parent: Option<&str>,
    created_at: i64,
    content: &str,
) -> MoveRecordEntry {
    MoveRecordEntry {
        id: id.to_string(),
        game_id: game_id.to_string(),
        parent_move_id: parent.map(|p| p.to_string()),
        pubkey: "peer".to_string(),
        created_at,
        move_counter: 0,
        content: content.to_string(),
    }
}
