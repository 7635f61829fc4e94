//! Orders Shared Types
//!
//! This crate provides the command envelope and the channel transport
//! abstraction shared by the publisher and every subscriber process.

pub mod config;
pub mod envelope;
pub mod error;
pub mod transport;

use std::time::{SystemTime, UNIX_EPOCH};

pub use envelope::{CommandEnvelope, EnvelopeError};
pub use error::{ConfigError, TransportError};
pub use transport::{ChannelConnection, MessageStream, TransportConnector};

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Default wiring shared by the publisher and subscribers
pub mod defaults {
    /// The single topic every command is broadcast on
    pub const TOPIC: &str = "orders";

    /// Broker address used when `REDIS_URL` is not set
    pub const REDIS_URL: &str = "redis://127.0.0.1:6379";

    /// Ingress listen address used when `ORDERS_BIND_ADDR` is not set
    pub const BIND_ADDR: &str = "0.0.0.0:3000";

    /// Initial delay before a subscriber reconnect attempt
    pub const RECONNECT_DELAY_MS: u64 = 1000;

    /// Upper bound for the reconnect backoff
    pub const MAX_RECONNECT_DELAY_MS: u64 = 30000;
}
