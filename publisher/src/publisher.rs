//! Publisher core: validate a request, wrap it, broadcast it once

use orders_shared::{ChannelConnection, CommandEnvelope, TransportError};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

/// The request did not name a usable command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("command not specified")]
    CommandNotSpecified,
}

/// Why a submission was not published
#[derive(Error, Debug)]
pub enum PublishError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl PublishError {
    /// Only transport failures are worth retrying; the same request will
    /// fail validation again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PublishError::Transport(_))
    }
}

/// The broker accepted the publish. Says nothing about delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ack {
    pub command: String,
    pub topic: String,
}

/// Extract the `command` field from a raw request body
///
/// Missing, empty, and non-string values are all rejected.
pub fn extract_command(raw: &Value) -> Result<&str, ValidationError> {
    raw.get("command")
        .and_then(Value::as_str)
        .filter(|command| !command.is_empty())
        .ok_or(ValidationError::CommandNotSpecified)
}

/// Broadcasts commands on a single topic over an owned connection
pub struct Publisher<C: ChannelConnection> {
    conn: C,
    topic: String,
}

impl<C: ChannelConnection> Publisher<C> {
    /// Create a publisher that owns `conn`
    pub fn new(conn: C, topic: impl Into<String>) -> Self {
        Self {
            conn,
            topic: topic.into(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Validate a raw request and publish its command
    pub async fn submit(&self, raw: &Value) -> Result<Ack, PublishError> {
        let command = extract_command(raw)?;
        self.publish_command(command).await
    }

    /// Publish an already-extracted command identifier
    pub async fn publish_command(&self, command: &str) -> Result<Ack, PublishError> {
        // Only an empty command fails to encode
        let payload = CommandEnvelope::stamped(command)
            .to_bytes()
            .map_err(|_| ValidationError::CommandNotSpecified)?;
        self.conn.publish(&self.topic, payload).await?;

        info!(command, topic = %self.topic, "Command published");

        Ok(Ack {
            command: command.to_string(),
            topic: self.topic.clone(),
        })
    }

    /// Release the broker connection
    pub fn close(self) {
        info!(topic = %self.topic, "Publisher connection released");
    }
}
