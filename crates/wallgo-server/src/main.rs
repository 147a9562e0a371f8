//! WallGo Multiplayer Server
//!
//! Authoritative server: clients send intents, the engine arbitrates, every
//! accepted intent fans the fresh snapshot out to the room.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use renet::{ConnectionConfig, RenetServer};
use tracing::{info, warn};
use wallgo_protocol::Intent;

use wallgo_server::{
    channel_id,
    config::ServerConfig as AppConfig,
    create_channel_configs,
    protocol::{
        deserialize_client_message, serialize_server_message, ClientMessage, JoinRejectReason,
        ServerMessage,
    },
    room::{JoinError, RoomManager, SubmitError, SubmitOutcome},
};

/// Server state
struct Server {
    /// Renet server
    renet: RenetServer,
    /// All rooms, one engine each
    rooms: RoomManager,
}

impl Server {
    fn new(config: &AppConfig) -> Self {
        let connection_config = ConnectionConfig {
            available_bytes_per_tick: 60_000,
            server_channels_config: create_channel_configs(),
            client_channels_config: create_channel_configs(),
        };

        Self {
            renet: RenetServer::new(connection_config),
            rooms: RoomManager::new(config.game),
        }
    }

    /// Main server loop tick
    fn update(&mut self) {
        while let Some(event) = self.renet.get_event() {
            self.handle_server_event(event);
        }

        for client_id in self.renet.clients_id() {
            while let Some(message) = self.renet.receive_message(client_id, channel_id::INTENTS) {
                self.handle_client_message(client_id, &message);
            }
        }
    }

    fn handle_server_event(&mut self, event: renet::ServerEvent) {
        match event {
            renet::ServerEvent::ClientConnected { client_id } => {
                info!("Client {:?} connected", client_id);
            }
            renet::ServerEvent::ClientDisconnected { client_id, reason } => {
                info!("Client {:?} disconnected: {:?}", client_id, reason);
                // Disconnect is a hard reset: the room's game is discarded
                // and the survivor waits for a fresh opponent.
                if let Some(left) = self.rooms.leave(client_id) {
                    if let Some(survivor) = left.remaining_client {
                        self.send_message(survivor, ServerMessage::OpponentLeft);
                        self.send_message(survivor, ServerMessage::WaitingForOpponent);
                    }
                }
            }
        }
    }

    fn handle_client_message(&mut self, client_id: u64, data: &[u8]) {
        let message = match deserialize_client_message(data) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("Failed to deserialize message from {:?}: {}", client_id, e);
                return;
            }
        };

        match message {
            ClientMessage::JoinRoom { room, player_name } => {
                self.handle_join(client_id, room, player_name);
            }
            ClientMessage::SubmitIntent { intent } => {
                self.handle_submit(client_id, intent);
            }
            ClientMessage::RequestState => {
                self.handle_state_request(client_id);
            }
            ClientMessage::Chat { message } => {
                self.handle_chat(client_id, message);
            }
            ClientMessage::Ping { timestamp } => {
                self.handle_ping(client_id, timestamp);
            }
        }
    }

    fn handle_join(&mut self, client_id: u64, room: String, player_name: String) {
        let seed = rand::random::<u64>();
        match self.rooms.join(client_id, &room, player_name.clone(), seed) {
            Ok(outcome) => {
                info!("Player {} joined {} as {:?}", player_name, room, outcome.player);
                self.send_message(
                    client_id,
                    ServerMessage::JoinAccepted {
                        player_id: outcome.player,
                        room: outcome.room,
                    },
                );
                if outcome.started {
                    self.broadcast_game_start(client_id);
                } else {
                    self.send_message(client_id, ServerMessage::WaitingForOpponent);
                }
            }
            Err(JoinError::RoomFull) => {
                self.send_message(
                    client_id,
                    ServerMessage::JoinRejected {
                        reason: JoinRejectReason::RoomFull,
                    },
                );
            }
            Err(JoinError::AlreadySeated) => {
                self.send_message(
                    client_id,
                    ServerMessage::JoinRejected {
                        reason: JoinRejectReason::AlreadySeated,
                    },
                );
            }
        }
    }

    fn broadcast_game_start(&mut self, client_id: u64) {
        let Some((snapshot, checksum)) = self.rooms.state_for(client_id) else {
            return;
        };
        let targets = self
            .rooms
            .room_of(client_id)
            .map(|room| room.client_ids())
            .unwrap_or_default();
        let active_player = snapshot.current_player;

        for target in targets {
            self.send_message(
                target,
                ServerMessage::GameStarted {
                    snapshot: snapshot.clone(),
                    checksum,
                },
            );
            self.send_message(target, ServerMessage::TurnStarted { active_player });
        }
    }

    fn handle_submit(&mut self, client_id: u64, intent: Intent) {
        match self.rooms.submit_intent(client_id, intent) {
            Ok(outcome) => self.broadcast_room_state(client_id, outcome),
            Err(SubmitError::Rejected(violation)) => {
                self.send_message(
                    client_id,
                    ServerMessage::IntentRejected {
                        reason: violation.to_string(),
                    },
                );
            }
            Err(err) => {
                warn!("Intent from {:?} dropped: {}", client_id, err);
            }
        }
    }

    fn broadcast_room_state(&mut self, client_id: u64, outcome: SubmitOutcome) {
        let targets = self
            .rooms
            .room_of(client_id)
            .map(|room| room.client_ids())
            .unwrap_or_default();

        for target in targets {
            self.send_message(
                target,
                ServerMessage::GameState {
                    snapshot: outcome.snapshot.clone(),
                    checksum: outcome.checksum,
                },
            );
            match outcome.outcome {
                Some(result) => {
                    self.send_message(target, ServerMessage::GameEnded { outcome: result });
                }
                None => {
                    self.send_message(
                        target,
                        ServerMessage::TurnStarted {
                            active_player: outcome.active_player,
                        },
                    );
                }
            }
        }
    }

    fn handle_state_request(&mut self, client_id: u64) {
        match self.rooms.state_for(client_id) {
            Some((snapshot, checksum)) => {
                self.send_message(client_id, ServerMessage::GameState { snapshot, checksum });
            }
            None => {
                warn!("State request from unseated client {:?}", client_id);
            }
        }
    }

    fn handle_chat(&mut self, client_id: u64, message: String) {
        let Some(room) = self.rooms.room_of(client_id) else {
            return;
        };
        let Some(from) = room.seat_of(client_id) else {
            return;
        };
        for target in room.client_ids() {
            self.send_message(
                target,
                ServerMessage::Chat {
                    from,
                    message: message.clone(),
                },
            );
        }
    }

    fn handle_ping(&mut self, client_id: u64, client_timestamp: u64) {
        let server_timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;

        self.send_message(
            client_id,
            ServerMessage::Pong {
                client_timestamp,
                server_timestamp,
            },
        );
    }

    fn send_message(&mut self, client_id: u64, message: ServerMessage) {
        if let Ok(data) = serialize_server_message(&message) {
            let channel = match &message {
                ServerMessage::Chat { .. } | ServerMessage::OpponentLeft => channel_id::CHAT,
                ServerMessage::Pong { .. } => channel_id::HEARTBEAT,
                _ => channel_id::INTENTS,
            };
            self.renet.send_message(client_id, channel, data);
        }
    }

    /// Access to Renet server for transport integration
    fn renet_server(&mut self) -> &mut RenetServer {
        &mut self.renet
    }
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("wallgo_server=info")
        .init();

    let config = AppConfig::default();
    let mut server = Server::new(&config);

    // Create transport layer
    let transport_config = wallgo_server::TransportConfig {
        public_address: config.bind_address,
        max_clients: config.max_clients,
        private_key: None, // Unsecure mode for development
    };

    let mut transport = match wallgo_server::ServerRunner::new(transport_config) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("Failed to create transport: {}", e);
            std::process::exit(1);
        }
    };

    info!("WallGo Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Listening on {}", config.bind_address);
    info!("Protocol ID: {:016x}", wallgo_server::PROTOCOL_ID);

    // Main server loop
    let tick_duration = Duration::from_millis(16); // ~60 Hz
    loop {
        let start = Instant::now();

        // Update transport (receive/send packets)
        transport.update(server.renet_server(), tick_duration);

        // Process client messages
        server.update();

        let elapsed = start.elapsed();
        if let Some(sleep_time) = tick_duration.checked_sub(elapsed) {
            std::thread::sleep(sleep_time);
        }
    }
}
