//! Query surface over the append-only move-record store.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use game_core::{EventId, GameId, MoveRecordEntry, StartRecord};

/// Read surface the session polls. Implementations are append-only: records
/// accumulate and are never edited or removed.
pub trait MoveRecordStore {
    fn get_start(&self, game_id: &str) -> Option<StartRecord>;

    /// All known moves for a game, in storage order (`move_counter`, then
    /// `created_at`, then id). Resolution imposes its own order on top.
    fn get_moves(&self, game_id: &str) -> Vec<MoveRecordEntry>;

    /// Start records with `created_at` in `[from, until]`, newest first,
    /// capped at `limit`.
    fn list_starts(&self, from: i64, until: i64, limit: usize) -> Vec<StartRecord>;

    /// Monotonic counter bumped on every accepted insert. Pollers skip
    /// re-resolution while it is unchanged.
    fn revision(&self) -> u64;
}

#[derive(Debug, Default)]
struct MemoryStore {
    starts: HashMap<GameId, StartRecord>,
    moves: HashMap<GameId, Vec<MoveRecordEntry>>,
    move_ids: HashSet<EventId>,
    revision: u64,
}

impl MemoryStore {
    fn insert_start(&mut self, start: StartRecord) -> bool {
        if self.starts.contains_key(&start.id) {
            return false;
        }
        self.starts.insert(start.id.clone(), start);
        self.revision += 1;
        true
    }

    fn insert_move(&mut self, entry: MoveRecordEntry) -> bool {
        if !self.move_ids.insert(entry.id.clone()) {
            return false;
        }
        let moves = self.moves.entry(entry.game_id.clone()).or_default();
        moves.push(entry);
        moves.sort_by(|a, b| {
            a.move_counter
                .cmp(&b.move_counter)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        self.revision += 1;
        true
    }
}

/// In-memory append-only store behind a shared handle. Duplicate ids are
/// ignored (first observation wins), so feeding the same events repeatedly
/// is idempotent.
#[derive(Debug, Clone, Default)]
pub struct SharedMemoryStore {
    inner: Arc<Mutex<MemoryStore>>,
}

impl SharedMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the start was already known.
    pub fn insert_start(&self, start: StartRecord) -> bool {
        self.lock().insert_start(start)
    }

    /// Returns false if the move id was already known.
    pub fn insert_move(&self, entry: MoveRecordEntry) -> bool {
        self.lock().insert_move(entry)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryStore> {
        self.inner.lock().expect("store mutex poisoned")
    }
}

impl MoveRecordStore for SharedMemoryStore {
    fn get_start(&self, game_id: &str) -> Option<StartRecord> {
        self.lock().starts.get(game_id).cloned()
    }

    fn get_moves(&self, game_id: &str) -> Vec<MoveRecordEntry> {
        self.lock().moves.get(game_id).cloned().unwrap_or_default()
    }

    fn list_starts(&self, from: i64, until: i64, limit: usize) -> Vec<StartRecord> {
        let store = self.lock();
        let mut starts: Vec<StartRecord> = store
            .starts
            .values()
            .filter(|s| s.created_at >= from && s.created_at <= until)
            .cloned()
            .collect();
        starts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        starts.truncate(limit);
        starts
    }

    fn revision(&self) -> u64 {
        self.lock().revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(id: &str, created_at: i64) -> StartRecord {
        StartRecord {
            id: id.to_string(),
            pubkey: "abc".to_string(),
            created_at,
        }
    }

    fn mv(id: &str, game_id: &str, counter: u32) -> MoveRecordEntry {
        MoveRecordEntry {
            id: id.to_string(),
            game_id: game_id.to_string(),
            parent_move_id: None,
            pubkey: "peer".to_string(),
            created_at: 0,
            move_counter: counter,
            content: "e2e4".to_string(),
        }
    }

    #[test]
    fn duplicate_inserts_are_ignored() {
        let store = SharedMemoryStore::new();
        assert!(store.insert_start(start("g1", 1)));
        assert!(!store.insert_start(start("g1", 99)));
        assert!(store.insert_move(mv("e1", "g1", 1)));
        assert!(!store.insert_move(mv("e1", "g1", 2)));
        assert_eq!(store.revision(), 2);
        assert_eq!(store.get_start("g1").unwrap().created_at, 1);
        assert_eq!(store.get_moves("g1").len(), 1);
    }

    #[test]
    fn moves_come_back_in_storage_order() {
        let store = SharedMemoryStore::new();
        store.insert_move(mv("b", "g1", 2));
        store.insert_move(mv("a", "g1", 1));
        store.insert_move(mv("c", "g1", 3));
        let ids: Vec<String> = store.get_moves("g1").iter().map(|m| m.id.clone()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn list_starts_filters_sorts_and_limits() {
        let store = SharedMemoryStore::new();
        store.insert_start(start("old", 10));
        store.insert_start(start("mid", 50));
        store.insert_start(start("new", 90));
        let listed = store.list_starts(40, 100, 10);
        let ids: Vec<String> = listed.iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, vec!["new", "mid"]);

        let capped = store.list_starts(0, 100, 1);
        assert_eq!(capped.len(), 1);
        assert_eq!(capped[0].id, "new");
    }

    #[test]
    fn revision_tracks_accepted_inserts_only() {
        let store = SharedMemoryStore::new();
        assert_eq!(store.revision(), 0);
        store.insert_start(start("g1", 1));
        store.insert_start(start("g1", 1));
        store.insert_move(mv("e1", "g1", 1));
        assert_eq!(store.revision(), 2);
    }
}
