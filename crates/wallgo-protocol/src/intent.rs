use serde::{Deserialize, Serialize};

use crate::{Square, WallSlot};

/// All possible player→engine intents. Fully serializable.
///
/// The engine validates every field; the transport only resolves which seat
/// the intent came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Intent {
    /// Place one of the player's pieces during the placement phase.
    PlacePiece { at: Square },
    /// Move a piece one cardinal step during the move phase.
    MovePiece { from: Square, to: Square },
    /// Build a wall adjacent to the piece moved this turn.
    PlaceWall { slot: WallSlot },
}
