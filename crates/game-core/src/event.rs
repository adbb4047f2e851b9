//! Relay event records: the game start event and move events.

use serde::{Deserialize, Serialize};

/// Identifier of a relay event, assigned by the signer/relay. Opaque here.
pub type EventId = String;

/// Identifier of a game: the id of its start event.
pub type GameId = String;

/// The root "game start" event. Represents ply 0, the empty position.
/// Immutable once observed; observing it again is idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRecord {
    pub id: GameId,
    /// Public key of the proposing player. The proposer plays white.
    pub pubkey: String,
    /// Author-asserted unix timestamp, not receipt time.
    pub created_at: i64,
}

/// A single move event. Append-only: never edited, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecordEntry {
    pub id: EventId,
    pub game_id: GameId,
    /// The move this entry continues from. `None` means a child of the
    /// start event, i.e. the first ply.
    pub parent_move_id: Option<EventId>,
    pub pubkey: String,
    /// Author-asserted unix timestamp, not receipt time.
    pub created_at: i64,
    /// Author-asserted ply index. Storage ordering only; resolution never
    /// trusts it.
    pub move_counter: u32,
    /// Move payload in coordinate notation, e.g. "e2e4" or "e7e8q".
    pub content: String,
}
