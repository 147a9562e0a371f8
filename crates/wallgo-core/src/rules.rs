use thiserror::Error;

use wallgo_protocol::{PlayerId, Square, WallSlot};

use crate::board::Board;

/// Why an intent was rejected. Sent back to the offending client verbatim.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("intent not valid in the current phase")]
    WrongPhase,
    #[error("the game is over")]
    GameOver,
    #[error("square is off the board")]
    OutOfBounds,
    #[error("square is already occupied")]
    SquareOccupied,
    #[error("all pieces already placed")]
    PlacementQuotaReached,
    #[error("no piece of yours on the source square")]
    NotYourPiece,
    #[error("destination is not one cardinal step away")]
    NotAdjacent,
    #[error("a wall blocks that step")]
    StepBlocked,
    #[error("another piece already moved this turn")]
    PieceLocked,
    #[error("move quota for this turn is spent")]
    MoveQuotaSpent,
    #[error("move at least one step before building a wall")]
    NoMoveYet,
    #[error("wall slot is off the board")]
    WallOutOfBounds,
    #[error("a wall is already built there")]
    WallAlreadyBuilt,
    #[error("wall must touch the piece that moved this turn")]
    WallNotAnchored,
}

/// Validate a placement-phase drop on `at`.
pub fn check_place(
    board: &Board,
    at: Square,
    pieces_placed: u8,
    pieces_per_player: u8,
) -> Result<(), RuleViolation> {
    if pieces_placed >= pieces_per_player {
        return Err(RuleViolation::PlacementQuotaReached);
    }
    if !at.in_bounds(board.size()) {
        return Err(RuleViolation::OutOfBounds);
    }
    if board.occupant(at).is_some() {
        return Err(RuleViolation::SquareOccupied);
    }
    Ok(())
}

/// Validate one step of a move-phase move.
///
/// `locked` is the square of the piece that already stepped this turn; once a
/// piece has moved, only that piece may take the second step.
pub fn check_move(
    board: &Board,
    player: PlayerId,
    from: Square,
    to: Square,
    locked: Option<Square>,
) -> Result<(), RuleViolation> {
    if !from.in_bounds(board.size()) || !to.in_bounds(board.size()) {
        return Err(RuleViolation::OutOfBounds);
    }
    if board.occupant(from) != Some(player) {
        return Err(RuleViolation::NotYourPiece);
    }
    if let Some(locked) = locked {
        if from != locked {
            return Err(RuleViolation::PieceLocked);
        }
    }
    if !from.is_adjacent(to) {
        return Err(RuleViolation::NotAdjacent);
    }
    if board.occupant(to).is_some() {
        return Err(RuleViolation::SquareOccupied);
    }
    if board.walls().is_blocked(from, to) {
        return Err(RuleViolation::StepBlocked);
    }
    Ok(())
}

/// Validate a wall build in `slot`.
///
/// `anchor` is the square the moved piece ended its turn on; the wall must
/// share an endpoint with it.
pub fn check_wall(board: &Board, slot: WallSlot, anchor: Square) -> Result<(), RuleViolation> {
    if !slot.in_bounds(board.size()) {
        return Err(RuleViolation::WallOutOfBounds);
    }
    if board.walls().is_active(slot) {
        return Err(RuleViolation::WallAlreadyBuilt);
    }
    if !slot.touches(anchor) {
        return Err(RuleViolation::WallNotAnchored);
    }
    Ok(())
}

/// Does `player` have at least one legal single step anywhere?
pub fn has_any_move(board: &Board, player: PlayerId) -> bool {
    board
        .pieces_of(player)
        .into_iter()
        .any(|piece| board.open_neighbors(piece).any(|n| board.occupant(n).is_none()))
}

/// Every open slot `player` could legally build a wall into, ignoring the
/// this-turn anchor (used for end-of-game detection).
pub fn buildable_slots(board: &Board, player: PlayerId) -> Vec<WallSlot> {
    let mut out = Vec::new();
    for piece in board.pieces_of(player) {
        for neighbor in piece.neighbors() {
            if !neighbor.in_bounds(board.size()) {
                continue;
            }
            if let Some(slot) = WallSlot::between(piece, neighbor) {
                if !board.walls().is_active(slot) && !out.contains(&slot) {
                    out.push(slot);
                }
            }
        }
    }
    out
}
