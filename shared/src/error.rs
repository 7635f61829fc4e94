//! Channel transport and configuration errors

use thiserror::Error;

/// Failure talking to the channel transport
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Invalid broker URL: {0}")]
    InvalidUrl(String),

    #[error("Connect failed: {0}")]
    Connect(String),

    #[error("Publish to '{topic}' failed: {reason}")]
    Publish { topic: String, reason: String },

    #[error("Subscribe to '{topic}' failed: {reason}")]
    Subscribe { topic: String, reason: String },

    #[error("Connection to broker lost")]
    Disconnected,
}

impl TransportError {
    pub fn publish(topic: &str, reason: impl ToString) -> Self {
        TransportError::Publish {
            topic: topic.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn subscribe(topic: &str, reason: impl ToString) -> Self {
        TransportError::Subscribe {
            topic: topic.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Invalid process configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is empty")]
    Empty { var: &'static str },

    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}
