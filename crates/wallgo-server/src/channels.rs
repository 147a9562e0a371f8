//! Renet channel configuration.
//!
//! Channel 0: ReliableOrdered - intents and state sync
//! Channel 1: ReliableUnordered - chat, room notifications
//! Channel 2: Unreliable - ping/heartbeat

use std::time::Duration;

use renet::ChannelConfig;

/// Channel IDs for different message types
pub mod channel_id {
    /// Player intents and snapshots - must arrive in order
    pub const INTENTS: u8 = 0;
    /// Chat and room notifications - reliable but order less critical
    pub const CHAT: u8 = 1;
    /// Ping/keepalive - can be lost
    pub const HEARTBEAT: u8 = 2;
}

/// Maximum bytes per channel
const MAX_CHANNEL_MEMORY: usize = 2 * 1024 * 1024; // 2 MB

/// Create channel configurations for the game server
pub fn create_channel_configs() -> Vec<ChannelConfig> {
    vec![
        // Channel 0: Intents (ReliableOrdered)
        // Intent submissions and snapshot broadcasts
        ChannelConfig {
            channel_id: channel_id::INTENTS,
            max_memory_usage_bytes: MAX_CHANNEL_MEMORY,
            send_type: renet::SendType::ReliableOrdered {
                resend_time: Duration::from_millis(300),
            },
        },
        // Channel 1: Chat (ReliableUnordered)
        ChannelConfig {
            channel_id: channel_id::CHAT,
            max_memory_usage_bytes: MAX_CHANNEL_MEMORY / 2,
            send_type: renet::SendType::ReliableUnordered {
                resend_time: Duration::from_millis(300),
            },
        },
        // Channel 2: Heartbeat (Unreliable)
        ChannelConfig {
            channel_id: channel_id::HEARTBEAT,
            max_memory_usage_bytes: 64 * 1024, // 64 KB
            send_type: renet::SendType::Unreliable,
        },
    ]
}
