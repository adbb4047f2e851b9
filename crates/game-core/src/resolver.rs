//! Head resolution: given the current head and a snapshot of known move
//! events, find the canonical present moment of the game.
//!
//! The relay gives no ordering or exactly-once guarantee, so resolution is
//! pure over its inputs: re-running it on the same snapshot yields the same
//! head, and running it on a superset never moves the head backward.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::chain;
use crate::event::{MoveRecordEntry, StartRecord};

/// A node in the derived move tree: the start event, or a move event with
/// its fully resolved ancestry.
#[derive(Debug, Clone)]
pub enum MoveNode {
    Start(StartRecord),
    Move(MoveRecordEntry, Box<MoveNode>),
}

impl MoveNode {
    pub fn id(&self) -> &str {
        match self {
            MoveNode::Start(start) => &start.id,
            MoveNode::Move(entry, _) => &entry.id,
        }
    }

    pub fn game_id(&self) -> &str {
        match self {
            MoveNode::Start(start) => &start.id,
            MoveNode::Move(entry, _) => &entry.game_id,
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self, MoveNode::Start(_))
    }

    pub fn parent(&self) -> Option<&MoveNode> {
        match self {
            MoveNode::Start(_) => None,
            MoveNode::Move(_, parent) => Some(parent),
        }
    }

    pub fn entry(&self) -> Option<&MoveRecordEntry> {
        match self {
            MoveNode::Start(_) => None,
            MoveNode::Move(entry, _) => Some(entry),
        }
    }
}

/// Result of one resolution pass over a snapshot.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub head: MoveNode,
    /// True when the head has no viable continuation in the snapshot.
    pub settled: bool,
}

/// Walk from `current_head` to the deepest validated descendant reachable in
/// `known_moves`.
///
/// At each depth the earliest-arriving child wins (minimum `created_at`,
/// event id as tie-break). A winner that fails validation parks resolution
/// at the current node: losing-but-legal siblings are deliberately not
/// promoted, so a settled decision can never be re-broken by a later
/// snapshot. Entries whose id already appears on the ancestor chain are
/// excluded as cyclic.
pub fn resolve(current_head: MoveNode, known_moves: &[MoveRecordEntry]) -> Resolution {
    let mut visited = chain::ancestor_ids(&current_head);
    let mut board = match chain::replay(&current_head) {
        Ok(board) => board,
        Err(err) => {
            // The head was validated when it was promoted; a replay failure
            // means the node was built by hand from inconsistent records.
            warn!(head = current_head.id(), %err, "current head does not replay; resolution parked");
            return Resolution {
                head: current_head,
                settled: true,
            };
        }
    };
    let mut head = current_head;

    loop {
        let children = children_of(&head, known_moves, &visited);
        if children.is_empty() {
            return Resolution {
                head,
                settled: true,
            };
        }

        let Some(winner) = children
            .iter()
            .min_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)))
            .copied()
        else {
            return Resolution {
                head,
                settled: true,
            };
        };

        match board.apply_uci(&winner.content) {
            Ok(()) => {
                debug!(event = %winner.id, ply = board.ply(), "promoted child to head");
                visited.insert(winner.id.clone());
                head = MoveNode::Move(winner.clone(), Box::new(head));
            }
            Err(err) => {
                warn!(event = %winner.id, %err, "rejected fork: earliest child does not continue the head");
                // Settled only if no child at this depth would validate.
                let any_legal = children.iter().any(|c| {
                    let mut probe = board.clone();
                    probe.apply_uci(&c.content).is_ok()
                });
                return Resolution {
                    head,
                    settled: !any_legal,
                };
            }
        }
    }
}

fn children_of<'a>(
    head: &MoveNode,
    known_moves: &'a [MoveRecordEntry],
    visited: &HashSet<String>,
) -> Vec<&'a MoveRecordEntry> {
    let parent_id = if head.is_start() {
        None
    } else {
        Some(head.id())
    };
    known_moves
        .iter()
        .filter(|e| e.game_id == head.game_id())
        .filter(|e| e.parent_move_id.as_deref() == parent_id)
        .filter(|e| {
            if visited.contains(&e.id) {
                warn!(event = %e.id, "excluding cyclic reference from resolution");
                false
            } else {
                true
            }
        })
        .collect()
}
