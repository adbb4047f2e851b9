//! Which side, if any, the local identity is allowed to move.

use shakmaty::Color;

use crate::event::StartRecord;

/// Derived from the start event's author and the local key material;
/// recomputed whenever either changes. Holds no hidden state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovableColor {
    /// Watch-only: no key material, or the game's start is unknown.
    None,
    White,
    Black,
    /// Hot-seat/dev mode; never produced by [`MovableColor::assign`].
    Both,
}

impl MovableColor {
    /// The proposer always plays white; anyone else with keys plays black.
    pub fn assign(
        start: Option<&StartRecord>,
        pubkey: Option<&str>,
        seckey: Option<&str>,
    ) -> Self {
        match (start, pubkey, seckey) {
            (Some(start), Some(pubkey), Some(_)) => {
                if pubkey == start.pubkey {
                    MovableColor::White
                } else {
                    MovableColor::Black
                }
            }
            _ => MovableColor::None,
        }
    }

    pub fn allows(self, side: Color) -> bool {
        match self {
            MovableColor::None => false,
            MovableColor::White => side == Color::White,
            MovableColor::Black => side == Color::Black,
            MovableColor::Both => true,
        }
    }

    pub fn is_player(self) -> bool {
        !matches!(self, MovableColor::None)
    }
}
