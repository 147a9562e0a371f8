//! Shared wire-visible types for WallGo.
//!
//! Everything that crosses the engine boundary lives here: player ids, board
//! coordinates and wall-slot keys, player intents, the outbound state
//! snapshot, and the serialization helpers used by both client and server.

mod grid;
mod ids;
mod intent;
mod snapshot;
pub mod wire;

pub use crate::grid::{Axis, Square, WallSlot};
pub use crate::ids::PlayerId;
pub use crate::intent::Intent;
pub use crate::snapshot::{Outcome, Phase, PlayerSnapshot, Snapshot};
pub use crate::wire::WireError;
