//! Reactive game session: owns the resolved head for one game and
//! recomputes state on every store snapshot.

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use game_core::status::display_name;
use game_core::{
    chain, game_over_reason, game_status, resolve, GameBoard, GameId, GameStatus, MovableColor,
    MoveNode, MoveRecordEntry, PgnCache, StartRecord,
};

use crate::error::SubmitError;
use crate::publisher::MovePublisher;

/// Local key material. Keys are opaque strings; signing happens outside.
#[derive(Debug, Clone)]
pub struct Identity {
    pub pubkey: String,
    pub seckey: String,
}

/// Externally visible lifecycle phase. Long-lived: there is no terminal
/// state, the session keeps re-resolving for as long as it is fed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No snapshot processed yet.
    Loading,
    /// Snapshots observed, but no start event for the game.
    AwaitingStart,
    /// Start observed; the head still has unexplored children.
    HeadSearching,
    /// Start observed; the head has no viable continuation right now.
    HeadSettled,
}

struct ActiveGame {
    start: StartRecord,
    head: MoveNode,
    settled: bool,
    board: GameBoard,
    pgn: String,
}

impl ActiveGame {
    fn fresh(start: StartRecord) -> Self {
        Self {
            head: MoveNode::Start(start.clone()),
            start,
            settled: false,
            board: GameBoard::new(),
            pgn: String::new(),
        }
    }
}

enum SessionState {
    Loading,
    AwaitingStart,
    Active(Box<ActiveGame>),
}

/// One tracked game. All mutation happens on the caller's thread; the
/// session holds no subscription machinery of its own and is driven purely
/// by [`GameSession::on_snapshot`].
pub struct GameSession<P: MovePublisher> {
    game_id: GameId,
    identity: Option<Identity>,
    state: SessionState,
    color: MovableColor,
    pgn_cache: PgnCache,
    publisher: P,
}

impl<P: MovePublisher> GameSession<P> {
    pub fn new(game_id: GameId, identity: Option<Identity>, publisher: P) -> Self {
        Self {
            game_id,
            identity,
            state: SessionState::Loading,
            color: MovableColor::None,
            pgn_cache: PgnCache::new(),
            publisher,
        }
    }

    /// Process the current snapshot of the store's knowledge for this game.
    /// Must not be invoked concurrently for the same game; resolving twice
    /// over the same snapshot is harmless.
    pub fn on_snapshot(&mut self, start: Option<StartRecord>, moves: &[MoveRecordEntry]) {
        let state = std::mem::replace(&mut self.state, SessionState::Loading);
        self.state = match state {
            SessionState::Loading | SessionState::AwaitingStart => match start {
                None => SessionState::AwaitingStart,
                Some(start) => {
                    debug!(game = %display_name(&start.id), "start observed; head initialized");
                    self.color = MovableColor::assign(
                        Some(&start),
                        self.identity.as_ref().map(|i| i.pubkey.as_str()),
                        self.identity.as_ref().map(|i| i.seckey.as_str()),
                    );
                    let game = self.run_resolution(Box::new(ActiveGame::fresh(start)), moves);
                    SessionState::Active(game)
                }
            },
            SessionState::Active(game) => SessionState::Active(self.run_resolution(game, moves)),
        };
    }

    fn run_resolution(
        &mut self,
        mut game: Box<ActiveGame>,
        moves: &[MoveRecordEntry],
    ) -> Box<ActiveGame> {
        let resolution = resolve(game.head.clone(), moves);
        let head_changed = resolution.head.id() != game.head.id();
        game.settled = resolution.settled;
        game.head = resolution.head;

        if head_changed {
            match chain::replay(&game.head) {
                Ok(board) => game.board = board,
                Err(err) => {
                    // Keep the previous board; the head itself was validated
                    // during resolution, so this should be unreachable.
                    warn!(head = game.head.id(), %err, "replay of resolved head failed");
                }
            }
            match self.pgn_cache.render(&game.head) {
                Ok(pgn) => game.pgn = pgn.to_string(),
                Err(err) => warn!(head = game.head.id(), %err, "pgn render failed"),
            }
            debug!(
                game = %display_name(&self.game_id),
                head = game.head.id(),
                settled = game.settled,
                pgn = %game.pgn,
                "head advanced"
            );
        }
        game
    }

    /// Replace the local key material, e.g. after login. Recomputes the
    /// movable color against the current start record.
    pub fn set_identity(&mut self, identity: Option<Identity>) {
        self.identity = identity;
        let start = match &self.state {
            SessionState::Active(game) => Some(game.start.clone()),
            _ => None,
        };
        self.color = MovableColor::assign(
            start.as_ref(),
            self.identity.as_ref().map(|i| i.pubkey.as_str()),
            self.identity.as_ref().map(|i| i.seckey.as_str()),
        );
    }

    /// Validate and publish a move from the local player. On success the
    /// constructed event is returned, but the head does NOT advance: the
    /// session stays at the pre-move head until the event comes back
    /// through a store snapshot.
    pub fn submit_move(&mut self, from: &str, to: &str) -> Result<MoveRecordEntry, SubmitError> {
        self.submit_uci(&format!("{from}{to}"))
    }

    pub fn submit_uci(&mut self, uci: &str) -> Result<MoveRecordEntry, SubmitError> {
        let identity = self
            .identity
            .as_ref()
            .ok_or(SubmitError::IdentityUnavailable)?
            .clone();
        let SessionState::Active(game) = &self.state else {
            return Err(SubmitError::NoResolvedHead);
        };
        if !game.settled {
            return Err(SubmitError::HeadSearching);
        }
        if game_over_reason(&game.board).is_some() {
            return Err(SubmitError::GameOver);
        }
        if !self.color.allows(game.board.turn()) {
            return Err(SubmitError::NotYourTurn);
        }

        // Validate locally before constructing the event.
        let mut probe = game.board.clone();
        probe.apply_uci(uci)?;

        let entry = MoveRecordEntry {
            id: Uuid::new_v4().to_string(),
            game_id: self.game_id.clone(),
            parent_move_id: if game.head.is_start() {
                None
            } else {
                Some(game.head.id().to_string())
            },
            pubkey: identity.pubkey,
            created_at: Utc::now().timestamp(),
            move_counter: game.board.ply() as u32 + 1,
            content: uci.to_string(),
        };
        self.publisher.publish(entry.clone())?;
        info!(
            game = %display_name(&self.game_id),
            event = %entry.id,
            parent = ?entry.parent_move_id,
            mv = %uci,
            "move event handed to publisher"
        );
        Ok(entry)
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn phase(&self) -> SessionPhase {
        match &self.state {
            SessionState::Loading => SessionPhase::Loading,
            SessionState::AwaitingStart => SessionPhase::AwaitingStart,
            SessionState::Active(game) if game.settled => SessionPhase::HeadSettled,
            SessionState::Active(_) => SessionPhase::HeadSearching,
        }
    }

    pub fn color(&self) -> MovableColor {
        self.color
    }

    pub fn start(&self) -> Option<&StartRecord> {
        match &self.state {
            SessionState::Active(game) => Some(&game.start),
            _ => None,
        }
    }

    pub fn head_id(&self) -> Option<&str> {
        match &self.state {
            SessionState::Active(game) => Some(game.head.id()),
            _ => None,
        }
    }

    pub fn board(&self) -> Option<&GameBoard> {
        match &self.state {
            SessionState::Active(game) => Some(&game.board),
            _ => None,
        }
    }

    /// Replayable PGN of the resolved line; empty before the first move.
    pub fn pgn(&self) -> &str {
        match &self.state {
            SessionState::Active(game) => &game.pgn,
            _ => "",
        }
    }

    /// Title state for the local viewer, once the game is resolved.
    pub fn status(&self) -> Option<GameStatus> {
        match &self.state {
            SessionState::Active(game) => Some(game_status(&game.board, self.color)),
            _ => None,
        }
    }
}
