//! Network protocol messages.
//!
//! Extends wallgo-protocol with room and session messages.

use serde::{Deserialize, Serialize};

use wallgo_protocol::{Intent, Outcome, PlayerId, Snapshot};

/// Client-to-server messages
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Request a seat in a room; the room is created on first join
    JoinRoom { room: String, player_name: String },
    /// Submit one game intent for the room the client is seated in
    SubmitIntent { intent: Intent },
    /// Request the current snapshot (e.g. after a rendering glitch)
    RequestState,
    /// Chat message, relayed to the other seat
    Chat { message: String },
    /// Ping for latency measurement
    Ping { timestamp: u64 },
}

/// Server-to-client messages
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Seat granted
    JoinAccepted { player_id: PlayerId, room: String },
    /// Seat denied
    JoinRejected { reason: JoinRejectReason },
    /// Seated alone; the game starts when a second player joins
    WaitingForOpponent,
    /// Both seats filled; placement begins
    GameStarted { snapshot: Snapshot, checksum: u64 },
    /// Full state after every accepted intent (and on request)
    GameState { snapshot: Snapshot, checksum: u64 },
    /// The turn passed to a player
    TurnStarted { active_player: PlayerId },
    /// The client's last intent was refused; state did not change
    IntentRejected { reason: String },
    /// Terminal condition reached
    GameEnded { outcome: Outcome },
    /// The other seat emptied; the room was reset to waiting
    OpponentLeft,
    /// Chat message from the other seat
    Chat { from: PlayerId, message: String },
    /// Pong response
    Pong {
        client_timestamp: u64,
        server_timestamp: u64,
    },
}

/// Reasons for rejecting a join request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinRejectReason {
    RoomFull,
    AlreadySeated,
}

/// Serialize a client message for network transmission
pub fn serialize_client_message(msg: &ClientMessage) -> Result<Vec<u8>, rmp_serde::encode::Error> {
    rmp_serde::encode::to_vec(msg)
}

/// Deserialize a client message from network data
pub fn deserialize_client_message(data: &[u8]) -> Result<ClientMessage, rmp_serde::decode::Error> {
    rmp_serde::decode::from_slice(data)
}

/// Serialize a server message for network transmission
pub fn serialize_server_message(msg: &ServerMessage) -> Result<Vec<u8>, rmp_serde::encode::Error> {
    rmp_serde::encode::to_vec(msg)
}

/// Deserialize a server message from network data
pub fn deserialize_server_message(data: &[u8]) -> Result<ServerMessage, rmp_serde::decode::Error> {
    rmp_serde::decode::from_slice(data)
}
