//! WallGo Multiplayer Server
//!
//! Authoritative server using Renet for networking.
//! Hosts any number of two-player rooms, one game engine per room.

pub mod channels;
pub mod config;
pub mod protocol;
pub mod room;
pub mod transport;

pub use channels::*;
pub use config::ServerConfig;
pub use protocol::*;
pub use room::{JoinError, JoinOutcome, LeaveOutcome, Room, RoomManager, SubmitError, SubmitOutcome};
pub use transport::{ServerRunner, TransportConfig, PROTOCOL_ID};
