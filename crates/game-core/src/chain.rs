//! Walking a head back to the start event, replaying it into a board, and
//! caching rendered PGNs per head.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::board::GameBoard;
use crate::error::ChainError;
use crate::event::{EventId, MoveRecordEntry};
use crate::resolver::MoveNode;

/// The ordered move entries from the start to `head`. Deterministic and
/// side-effect free; walking the same head twice yields the same sequence.
/// A repeated id on the walk is reported as a cyclic reference.
pub fn entries(head: &MoveNode) -> Result<Vec<&MoveRecordEntry>, ChainError> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut reversed = Vec::new();
    let mut node = head;
    loop {
        if !seen.insert(node.id()) {
            return Err(ChainError::CyclicReference(node.id().to_string()));
        }
        match node {
            MoveNode::Start(_) => break,
            MoveNode::Move(entry, parent) => {
                reversed.push(entry);
                node = parent;
            }
        }
    }
    reversed.reverse();
    Ok(reversed)
}

/// Ids of `head` and all its ancestors, up to the first repeat.
pub fn ancestor_ids(head: &MoveNode) -> HashSet<String> {
    let mut ids = HashSet::new();
    let mut node = head;
    loop {
        if !ids.insert(node.id().to_string()) {
            break;
        }
        match node.parent() {
            Some(parent) => node = parent,
            None => break,
        }
    }
    ids
}

/// Feed the chain's payloads through the engine from the empty position.
pub fn replay(head: &MoveNode) -> Result<GameBoard, ChainError> {
    let mut board = GameBoard::new();
    for entry in entries(head)? {
        board.apply_uci(&entry.content)?;
    }
    Ok(board)
}

/// PGN rendered per resolved head. Heads are immutable once resolved, so a
/// cached render never goes stale.
#[derive(Debug, Default)]
pub struct PgnCache {
    rendered: HashMap<EventId, String>,
}

impl PgnCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, head: &MoveNode) -> Result<&str, ChainError> {
        match self.rendered.entry(head.id().to_string()) {
            Entry::Occupied(occupied) => Ok(occupied.into_mut()),
            Entry::Vacant(vacant) => {
                let pgn = replay(head)?.pgn();
                Ok(vacant.insert(pgn))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::StartRecord;

    fn start() -> StartRecord {
        StartRecord {
            id: "g1".to_string(),
            pubkey: "abc".to_string(),
            created_at: 0,
        }
    }

    fn mv(id: &str, parent: Option<&str>, content: &str) -> MoveRecordEntry {
        MoveRecordEntry {
            id: id.to_string(),
            game_id: "g1".to_string(),
            parent_move_id: parent.map(|p| p.to_string()),
            pubkey: "peer".to_string(),
            created_at: 0,
            move_counter: 0,
            content: content.to_string(),
        }
    }

    fn two_ply_head() -> MoveNode {
        let root = MoveNode::Start(start());
        let first = MoveNode::Move(mv("e1", None, "e2e4"), Box::new(root));
        MoveNode::Move(mv("e2", Some("e1"), "e7e5"), Box::new(first))
    }

    #[test]
    fn start_head_has_an_empty_chain() {
        let head = MoveNode::Start(start());
        assert!(entries(&head).unwrap().is_empty());
        assert_eq!(replay(&head).unwrap().pgn(), "");
    }

    #[test]
    fn chain_is_ordered_root_first() {
        let head = two_ply_head();
        let ids: Vec<&str> = entries(&head).unwrap().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e2"]);
        assert_eq!(replay(&head).unwrap().pgn(), "1. e4 e5");
    }

    #[test]
    fn rendering_is_idempotent() {
        let head = two_ply_head();
        let first: Vec<String> = entries(&head)
            .unwrap()
            .iter()
            .map(|e| e.id.clone())
            .collect();
        let second: Vec<String> = entries(&head)
            .unwrap()
            .iter()
            .map(|e| e.id.clone())
            .collect();
        assert_eq!(first, second);

        let mut cache = PgnCache::new();
        let a = cache.render(&head).unwrap().to_string();
        let b = cache.render(&head).unwrap().to_string();
        assert_eq!(a, "1. e4 e5");
        assert_eq!(a, b);
    }

    #[test]
    fn repeated_id_on_the_walk_is_a_cycle() {
        // Hand-built ancestry where an id reappears.
        let root = MoveNode::Start(start());
        let first = MoveNode::Move(mv("dup", None, "e2e4"), Box::new(root));
        let head = MoveNode::Move(mv("dup", Some("dup"), "e7e5"), Box::new(first));
        assert!(matches!(
            entries(&head),
            Err(ChainError::CyclicReference(id)) if id == "dup"
        ));
    }
}
