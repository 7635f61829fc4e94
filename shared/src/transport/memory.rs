//! In-process broker with the same fan-out semantics as Redis pub/sub
//!
//! Each topic is a `tokio::sync::broadcast` channel. Publishing with no
//! subscribers drops the message, and a subscriber that falls more than
//! `TOPIC_CAPACITY` messages behind loses the oldest ones.

use crate::transport::traits::{ChannelConnection, MessageStream, TransportConnector};
use crate::TransportError;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};

/// Buffered messages per subscriber before it starts lagging
pub const TOPIC_CAPACITY: usize = 256;

/// Shared in-memory broker; clones refer to the same topics
#[derive(Clone, Default)]
pub struct MemoryBroker {
    topics: Arc<RwLock<HashMap<String, broadcast::Sender<Bytes>>>>,
    offline: Arc<AtomicBool>,
}

impl MemoryBroker {
    /// Create a new empty broker
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse new connections and publishes while `offline` is set
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::SeqCst)
    }

    /// Drop every topic, ending all open subscriptions
    pub async fn disconnect_all(&self) {
        self.topics.write().await.clear();
    }

    /// Number of live subscriptions on a topic
    pub async fn subscriber_count(&self, topic: &str) -> usize {
        self.topics
            .read()
            .await
            .get(topic)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    async fn sender(&self, topic: &str) -> broadcast::Sender<Bytes> {
        if let Some(tx) = self.topics.read().await.get(topic) {
            return tx.clone();
        }

        let mut topics = self.topics.write().await;
        topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(TOPIC_CAPACITY).0)
            .clone()
    }
}

#[async_trait]
impl TransportConnector for MemoryBroker {
    type Connection = MemoryConnection;

    async fn connect(&self) -> Result<Self::Connection, TransportError> {
        if self.is_offline() {
            return Err(TransportError::Connect("memory broker is offline".into()));
        }

        Ok(MemoryConnection {
            broker: self.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "Memory"
    }
}

/// A connection to a `MemoryBroker`
pub struct MemoryConnection {
    broker: MemoryBroker,
}

#[async_trait]
impl ChannelConnection for MemoryConnection {
    type Stream = MemoryMessageStream;

    async fn publish(&self, topic: &str, payload: Bytes) -> Result<(), TransportError> {
        if self.broker.is_offline() {
            return Err(TransportError::publish(topic, "memory broker is offline"));
        }

        let tx = self.broker.sender(topic).await;
        // No receivers is not an error for a broadcast bus
        let receivers = tx.send(payload).unwrap_or(0);
        debug!(topic, receivers, "Published to memory broker");
        Ok(())
    }

    async fn subscribe(self, topic: &str) -> Result<Self::Stream, TransportError> {
        if self.broker.is_offline() {
            return Err(TransportError::subscribe(topic, "memory broker is offline"));
        }

        let rx = self.broker.sender(topic).await.subscribe();
        Ok(MemoryMessageStream {
            topic: topic.to_string(),
            rx,
        })
    }
}

/// Receiving side of a memory subscription
pub struct MemoryMessageStream {
    topic: String,
    rx: broadcast::Receiver<Bytes>,
}

#[async_trait]
impl MessageStream for MemoryMessageStream {
    async fn next_payload(&mut self) -> Option<Bytes> {
        loop {
            match self.rx.recv().await {
                Ok(payload) => return Some(payload),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(topic = %self.topic, skipped, "Subscriber lagged, messages dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
