//! Transport trait abstraction for pluggable broker backends

use crate::TransportError;
use async_trait::async_trait;
use bytes::Bytes;

/// Inbound payloads of one subscription, in broker delivery order
#[async_trait]
pub trait MessageStream: Send {
    /// Wait for the next payload
    ///
    /// Returns `None` once the broker connection is gone.
    async fn next_payload(&mut self) -> Option<Bytes>;
}

/// An open connection to the broker, owned by exactly one process component
#[async_trait]
pub trait ChannelConnection: Send + Sync + 'static {
    /// The stream type produced by `subscribe`
    type Stream: MessageStream + 'static;

    /// Publish one payload to every current subscriber of `topic`
    ///
    /// Completes once the broker accepted the message, not once anyone
    /// received it.
    async fn publish(&self, topic: &str, payload: Bytes) -> Result<(), TransportError>;

    /// Turn this connection into a subscription on `topic`
    async fn subscribe(self, topic: &str) -> Result<Self::Stream, TransportError>;
}

/// Factory for creating broker connections
#[async_trait]
pub trait TransportConnector: Send + Sync {
    /// The connection type this connector produces
    type Connection: ChannelConnection;

    /// Attempt to connect, returning a connection on success
    async fn connect(&self) -> Result<Self::Connection, TransportError>;

    /// Human-readable name for this transport
    fn name(&self) -> &'static str;
}
