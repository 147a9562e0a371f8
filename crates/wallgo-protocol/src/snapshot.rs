use serde::{Deserialize, Serialize};

use crate::{PlayerId, Square, WallSlot};

/// Turn/phase of the game state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Room is open but the second player has not joined yet.
    Waiting,
    /// Players alternate placing their pieces.
    Placement,
    /// Current player moves a piece (up to the per-turn quota).
    Move,
    /// Current player must build a wall to end the turn.
    Wall,
    /// Game over; `winner` is set.
    End,
}

/// Final result of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum Outcome {
    Winner { player: PlayerId },
    Draw,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub pieces_placed: u8,
}

/// Full game state projection for sync to clients.
///
/// Carries everything a client needs to render and to pre-check legality:
/// occupancy, the active wall set, whose turn it is, and the mid-turn
/// move/lock bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Board edge length N; the board has N*N playable squares.
    pub size: u8,
    pub phase: Phase,
    pub current_player: PlayerId,
    pub players: Vec<PlayerSnapshot>,
    /// Row-major occupancy, `size * size` entries.
    pub board: Vec<Option<PlayerId>>,
    /// Every active wall slot, in canonical slot order.
    pub walls: Vec<WallSlot>,
    pub moves_this_turn: u8,
    #[serde(default)]
    pub last_moved_to: Option<Square>,
    #[serde(default)]
    pub locked_piece: Option<Square>,
    #[serde(default)]
    pub winner: Option<Outcome>,
}
