//! JSON command envelope
//!
//! Every broadcast message is a single JSON record:
//! ```text
//! { "command": "<identifier>", "issued_at_ms": 1700000000000 }
//! ```
//!
//! `issued_at_ms` is optional. Decoders ignore fields they do not know, so
//! new fields can be added without breaking running subscribers.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::now_ms;

/// Maximum payload size (64 KiB) accepted by the decoder
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024;

/// Errors that can occur during encoding/decoding
#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("Malformed envelope: {0}")]
    Malformed(String),

    #[error("Envelope command is empty")]
    EmptyCommand,

    #[error("Payload too large: {0} bytes (max: {MAX_PAYLOAD_SIZE})")]
    TooLarge(usize),
}

/// A single command as it travels over the channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub command: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at_ms: Option<u64>,
}

impl CommandEnvelope {
    /// Create an envelope carrying only the command identifier
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            issued_at_ms: None,
        }
    }

    /// Create an envelope stamped with the current time
    pub fn stamped(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            issued_at_ms: Some(now_ms()),
        }
    }

    /// Serialize to the wire representation
    pub fn to_bytes(&self) -> Result<Bytes, EnvelopeError> {
        if self.command.is_empty() {
            return Err(EnvelopeError::EmptyCommand);
        }

        let json = serde_json::to_vec(self).map_err(|e| EnvelopeError::Malformed(e.to_string()))?;
        Ok(Bytes::from(json))
    }

    /// Parse a received payload
    pub fn from_bytes(payload: &[u8]) -> Result<Self, EnvelopeError> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(EnvelopeError::TooLarge(payload.len()));
        }

        let value: serde_json::Value = serde_json::from_slice(payload)
            .map_err(|e| EnvelopeError::Malformed(e.to_string()))?;
        if !value.is_object() {
            return Err(EnvelopeError::Malformed("envelope is not a JSON object".into()));
        }

        let envelope: Self =
            serde_json::from_value(value).map_err(|e| EnvelopeError::Malformed(e.to_string()))?;

        if envelope.command.is_empty() {
            return Err(EnvelopeError::Malformed("command field is empty".into()));
        }

        Ok(envelope)
    }

    /// Milliseconds between issue and now, if the publisher stamped it
    pub fn age_ms(&self) -> Option<u64> {
        self.issued_at_ms.map(|issued| now_ms().saturating_sub(issued))
    }
}

/// Encode a bare command identifier into a payload
pub fn encode(command: &str) -> Result<Bytes, EnvelopeError> {
    CommandEnvelope::new(command).to_bytes()
}

/// Decode a payload into its envelope
pub fn decode(payload: &[u8]) -> Result<CommandEnvelope, EnvelopeError> {
    CommandEnvelope::from_bytes(payload)
}
