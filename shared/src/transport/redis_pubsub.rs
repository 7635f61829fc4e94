//! Redis PUBLISH/SUBSCRIBE transport
//!
//! Redis pub/sub is fire-and-forget: a subscriber that is offline when a
//! message is published never sees it.

use crate::transport::traits::{ChannelConnection, MessageStream, TransportConnector};
use crate::TransportError;
use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, Msg};
use std::pin::Pin;
use tracing::{debug, info};

/// Connector for a Redis broker at a given URL
pub struct RedisConnector {
    url: String,
}

impl RedisConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TransportConnector for RedisConnector {
    type Connection = RedisConnection;

    async fn connect(&self) -> Result<Self::Connection, TransportError> {
        let client = Client::open(self.url.as_str())
            .map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        info!(url = %self.url, "Connected to Redis");

        Ok(RedisConnection { client, conn })
    }

    fn name(&self) -> &'static str {
        "Redis"
    }
}

/// An open Redis connection
pub struct RedisConnection {
    client: Client,
    conn: MultiplexedConnection,
}

#[async_trait]
impl ChannelConnection for RedisConnection {
    type Stream = RedisMessageStream;

    async fn publish(&self, topic: &str, payload: Bytes) -> Result<(), TransportError> {
        // Multiplexed connections are cheap handles onto the same socket
        let mut conn = self.conn.clone();
        let receivers: i64 = conn
            .publish(topic, payload.as_ref())
            .await
            .map_err(|e| TransportError::publish(topic, e))?;

        debug!(topic, receivers, "Published to Redis");
        Ok(())
    }

    async fn subscribe(self, topic: &str) -> Result<Self::Stream, TransportError> {
        // A subscribed Redis connection can do nothing else, so it gets its own
        let mut pubsub = self
            .client
            .get_async_pubsub()
            .await
            .map_err(|e| TransportError::subscribe(topic, e))?;
        pubsub
            .subscribe(topic)
            .await
            .map_err(|e| TransportError::subscribe(topic, e))?;

        info!(topic, "Subscribed to Redis channel");

        Ok(RedisMessageStream {
            messages: Box::pin(pubsub.into_on_message()),
        })
    }
}

/// Messages delivered on a Redis subscription
pub struct RedisMessageStream {
    messages: Pin<Box<dyn Stream<Item = Msg> + Send>>,
}

#[async_trait]
impl MessageStream for RedisMessageStream {
    async fn next_payload(&mut self) -> Option<Bytes> {
        let msg = self.messages.next().await?;
        Some(Bytes::copy_from_slice(msg.get_payload_bytes()))
    }
}
