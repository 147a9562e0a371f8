//! Authoritative WallGo rules engine.
//!
//! Pure state machine: no I/O, no clocks, deterministic from a seed. The
//! transport layer feeds it player intents and broadcasts the snapshots it
//! produces.

mod board;
mod game;
mod region;
mod rng;
mod rules;

pub use crate::board::{Board, WallSet};
pub use crate::game::{EndRule, GameConfig, GameEngine, GameState, PlayerState};
pub use crate::region::{Component, Partition};
pub use crate::rng::GameRng;
pub use crate::rules::RuleViolation;
