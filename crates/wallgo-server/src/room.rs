//! Room bookkeeping: seats, sessions, and the engine owned by each room.
//!
//! One room holds at most two seats and at most one running game. All intents
//! for a room are applied sequentially by the single server loop, so the
//! engine never sees overlapping mutations.

use std::collections::HashMap;

use thiserror::Error;
use tracing::info;

use wallgo_core::{GameConfig, GameEngine, RuleViolation};
use wallgo_protocol::{wire, Intent, Outcome, Phase, PlayerId, PlayerSnapshot, Snapshot};

/// A connected player holding one of the room's two seats.
#[derive(Clone, Debug)]
pub struct Seat {
    pub client_id: u64,
    pub name: String,
}

/// One two-player room. The engine exists only while both seats are filled.
#[derive(Debug)]
pub struct Room {
    name: String,
    seats: [Option<Seat>; 2],
    engine: Option<GameEngine>,
}

impl Room {
    fn new(name: String) -> Self {
        Self {
            name,
            seats: [None, None],
            engine: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_full(&self) -> bool {
        self.seats.iter().all(Option::is_some)
    }

    pub fn seat_of(&self, client_id: u64) -> Option<PlayerId> {
        self.seats.iter().position(|seat| {
            seat.as_ref()
                .is_some_and(|seat| seat.client_id == client_id)
        })
        .map(|slot| PlayerId(slot as u8))
    }

    pub fn client_ids(&self) -> Vec<u64> {
        self.seats
            .iter()
            .flatten()
            .map(|seat| seat.client_id)
            .collect()
    }

    pub fn engine(&self) -> Option<&GameEngine> {
        self.engine.as_ref()
    }

    /// Projection sent while the room is short a player.
    fn waiting_snapshot(&self, config: &GameConfig) -> Snapshot {
        let n = config.size as usize;
        Snapshot {
            size: config.size,
            phase: Phase::Waiting,
            current_player: PlayerId(0),
            players: self
                .seats
                .iter()
                .enumerate()
                .filter_map(|(slot, seat)| {
                    seat.as_ref().map(|seat| PlayerSnapshot {
                        id: PlayerId(slot as u8),
                        name: seat.name.clone(),
                        pieces_placed: 0,
                    })
                })
                .collect(),
            board: vec![None; n * n],
            walls: Vec::new(),
            moves_this_turn: 0,
            last_moved_to: None,
            locked_piece: None,
            winner: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JoinError {
    #[error("room already has two players")]
    RoomFull,
    #[error("client is already seated")]
    AlreadySeated,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("client is not seated in any room")]
    NoSession,
    #[error("the game has not started")]
    NotStarted,
    #[error(transparent)]
    Rejected(#[from] RuleViolation),
}

/// Result of a successful join.
#[derive(Debug, PartialEq, Eq)]
pub struct JoinOutcome {
    pub room: String,
    pub player: PlayerId,
    /// True when this join filled the second seat and a game began.
    pub started: bool,
}

/// Result of a successfully applied intent.
#[derive(Debug)]
pub struct SubmitOutcome {
    pub room: String,
    pub snapshot: Snapshot,
    pub checksum: u64,
    pub active_player: PlayerId,
    pub outcome: Option<Outcome>,
}

/// Result of a client leaving: the room reverted to waiting.
#[derive(Debug)]
pub struct LeaveOutcome {
    pub room: String,
    pub remaining_client: Option<u64>,
    /// True when a running game was discarded by the reset.
    pub game_discarded: bool,
}

fn checksum(snapshot: &Snapshot) -> u64 {
    wire::snapshot_hash(snapshot).unwrap_or(0)
}

/// All rooms on this server, keyed by room name.
pub struct RoomManager {
    config: GameConfig,
    rooms: HashMap<String, Room>,
    room_by_client: HashMap<u64, String>,
}

impl RoomManager {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rooms: HashMap::new(),
            room_by_client: HashMap::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn room_of(&self, client_id: u64) -> Option<&Room> {
        self.room_by_client
            .get(&client_id)
            .and_then(|name| self.rooms.get(name))
    }

    /// Seat a client, creating the room on first join. Filling the second
    /// seat starts a game with the given seed.
    pub fn join(
        &mut self,
        client_id: u64,
        room_name: &str,
        player_name: String,
        seed: u64,
    ) -> Result<JoinOutcome, JoinError> {
        if self.room_by_client.contains_key(&client_id) {
            return Err(JoinError::AlreadySeated);
        }

        let room = self
            .rooms
            .entry(room_name.to_string())
            .or_insert_with(|| Room::new(room_name.to_string()));

        let Some(slot) = room.seats.iter().position(Option::is_none) else {
            return Err(JoinError::RoomFull);
        };
        room.seats[slot] = Some(Seat {
            client_id,
            name: player_name,
        });
        self.room_by_client
            .insert(client_id, room_name.to_string());

        let started = room.is_full();
        if started {
            let names = [
                room.seats[0].as_ref().map(|s| s.name.clone()).unwrap_or_default(),
                room.seats[1].as_ref().map(|s| s.name.clone()).unwrap_or_default(),
            ];
            room.engine = Some(GameEngine::new(self.config, names, seed));
            info!("Game started in {} (seed {:x})", room_name, seed);
        }

        Ok(JoinOutcome {
            room: room_name.to_string(),
            player: PlayerId(slot as u8),
            started,
        })
    }

    /// Unseat a client. Any running game in the room is discarded; the
    /// remaining player (if any) drops back to waiting.
    pub fn leave(&mut self, client_id: u64) -> Option<LeaveOutcome> {
        let room_name = self.room_by_client.remove(&client_id)?;
        let room = self.rooms.get_mut(&room_name)?;

        for seat in room.seats.iter_mut() {
            if seat.as_ref().is_some_and(|s| s.client_id == client_id) {
                *seat = None;
            }
        }
        let game_discarded = room.engine.take().is_some();
        let remaining_client = room.client_ids().first().copied();

        if remaining_client.is_none() {
            self.rooms.remove(&room_name);
        }
        info!(
            "Seat emptied in {} (game discarded: {})",
            room_name, game_discarded
        );

        Some(LeaveOutcome {
            room: room_name,
            remaining_client,
            game_discarded,
        })
    }

    /// Apply one intent from a seated client to its room's engine.
    pub fn submit_intent(
        &mut self,
        client_id: u64,
        intent: Intent,
    ) -> Result<SubmitOutcome, SubmitError> {
        let room_name = self
            .room_by_client
            .get(&client_id)
            .ok_or(SubmitError::NoSession)?
            .clone();
        let room = self
            .rooms
            .get_mut(&room_name)
            .ok_or(SubmitError::NoSession)?;
        let player = room.seat_of(client_id).ok_or(SubmitError::NoSession)?;
        let engine = room.engine.as_mut().ok_or(SubmitError::NotStarted)?;

        engine.try_apply_intent(player, intent)?;

        let snapshot = engine.snapshot();
        let checksum = checksum(&snapshot);
        Ok(SubmitOutcome {
            room: room_name,
            active_player: snapshot.current_player,
            outcome: snapshot.winner,
            snapshot,
            checksum,
        })
    }

    /// Current snapshot for a seated client: the live game state, or the
    /// waiting-room projection before the second player arrives.
    pub fn state_for(&self, client_id: u64) -> Option<(Snapshot, u64)> {
        let room = self.room_of(client_id)?;
        let snapshot = match room.engine() {
            Some(engine) => engine.snapshot(),
            None => room.waiting_snapshot(&self.config),
        };
        let checksum = checksum(&snapshot);
        Some((snapshot, checksum))
    }
}
