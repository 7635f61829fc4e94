//! Publisher configuration

use orders_shared::config::{process_env, read_var};
use orders_shared::{defaults, ConfigError};
use std::net::SocketAddr;

/// Configuration for the publisher process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherConfig {
    /// Address the HTTP ingress listens on
    pub bind_addr: SocketAddr,
    /// Broker connection URL
    pub redis_url: String,
    /// Topic every command is published on
    pub topic: String,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            redis_url: defaults::REDIS_URL.into(),
            topic: defaults::TOPIC.into(),
        }
    }
}

impl PublisherConfig {
    /// Build the config from `ORDERS_BIND_ADDR`, `REDIS_URL` and `ORDERS_TOPIC`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind = read_var(&lookup, "ORDERS_BIND_ADDR", defaults::BIND_ADDR)?;
        let bind_addr = bind.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            var: "ORDERS_BIND_ADDR",
            value: bind.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            bind_addr,
            redis_url: read_var(&lookup, "REDIS_URL", defaults::REDIS_URL)?,
            topic: read_var(&lookup, "ORDERS_TOPIC", defaults::TOPIC)?,
        })
    }
}
