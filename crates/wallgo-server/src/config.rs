//! Server configuration

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use wallgo_core::GameConfig;

/// Server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the server
    pub bind_address: SocketAddr,
    /// Maximum concurrent clients across all rooms
    pub max_clients: usize,
    /// Rule set applied to every new game
    pub game: GameConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:7777".parse().unwrap(),
            max_clients: 64,
            game: GameConfig::default(),
        }
    }
}
