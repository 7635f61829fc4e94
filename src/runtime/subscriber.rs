//! Subscriber runtime: owns one broker connection and feeds every received
//! envelope through the command dispatcher, one at a time

use super::config::{ReconnectPolicy, SubscriberConfig};
use crate::command::{CommandDispatcher, DispatchOutcome};
use orders_shared::{envelope, ChannelConnection, MessageStream, TransportConnector, TransportError};
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// The message stream a connector's connections subscribe into
pub type StreamOf<T> = <<T as TransportConnector>::Connection as ChannelConnection>::Stream;

/// Lifecycle of a subscriber's broker connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeState {
    Disconnected,
    Connected,
    Subscribed,
    Failed,
}

/// Events emitted by the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// Connection to the broker established
    Connected { transport: &'static str },
    /// Subscription registered, messages will now flow
    Subscribed { topic: String },
    /// A received command went through the dispatcher
    Dispatched(DispatchOutcome),
    /// A received payload could not be decoded and was dropped
    Malformed { reason: String },
    /// Broker connection lost while subscribed
    Disconnected,
    /// Connect or subscribe failed
    Failed { reason: String },
}

/// Per-process message counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    pub received: u64,
    pub dispatched: u64,
    pub unknown: u64,
    pub malformed: u64,
}

/// Connects, subscribes, and dispatches for a single subscriber process
pub struct SubscriberRuntime<T: TransportConnector> {
    config: SubscriberConfig,
    connector: T,
    dispatcher: CommandDispatcher,
    state: RuntimeState,
    stats: RuntimeStats,
    events: Option<mpsc::UnboundedSender<RuntimeEvent>>,
}

impl<T: TransportConnector> SubscriberRuntime<T> {
    /// Create a new runtime in the `Disconnected` state
    pub fn new(config: SubscriberConfig, connector: T, dispatcher: CommandDispatcher) -> Self {
        Self {
            config,
            connector,
            dispatcher,
            state: RuntimeState::Disconnected,
            stats: RuntimeStats::default(),
            events: None,
        }
    }

    pub fn state(&self) -> RuntimeState {
        self.state
    }

    #[cfg(test)]
    pub fn stats(&self) -> RuntimeStats {
        self.stats
    }

    pub fn subscriber_id(&self) -> &str {
        &self.config.subscriber_id
    }

    /// Receive runtime events from now on
    #[cfg(test)]
    pub fn events(&mut self) -> mpsc::UnboundedReceiver<RuntimeEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    fn emit(&self, event: RuntimeEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    fn fail(&mut self, error: TransportError) -> TransportError {
        self.state = RuntimeState::Failed;
        self.emit(RuntimeEvent::Failed {
            reason: error.to_string(),
        });
        error
    }

    /// Connect and subscribe, moving to `Subscribed` or `Failed`
    pub async fn start(&mut self) -> Result<StreamOf<T>, TransportError> {
        self.state = RuntimeState::Disconnected;

        let conn = match self.connector.connect().await {
            Ok(conn) => conn,
            Err(e) => return Err(self.fail(e)),
        };
        self.state = RuntimeState::Connected;
        info!(
            subscriber = %self.config.subscriber_id,
            "Connected via {}", self.connector.name()
        );
        self.emit(RuntimeEvent::Connected {
            transport: self.connector.name(),
        });

        let stream = match conn.subscribe(&self.config.topic).await {
            Ok(stream) => stream,
            Err(e) => return Err(self.fail(e)),
        };
        self.state = RuntimeState::Subscribed;
        info!(
            subscriber = %self.config.subscriber_id,
            profile = %self.config.profile,
            "Listening on topic '{}'", self.config.topic
        );
        self.emit(RuntimeEvent::Subscribed {
            topic: self.config.topic.clone(),
        });

        Ok(stream)
    }

    /// Decode one payload and dispatch it
    ///
    /// A payload that does not decode is dropped; the runtime stays in its
    /// current state.
    pub fn handle_payload(&mut self, payload: &[u8]) -> Option<DispatchOutcome> {
        self.stats.received += 1;

        let envelope = match envelope::decode(payload) {
            Ok(envelope) => envelope,
            Err(e) => {
                self.stats.malformed += 1;
                warn!(
                    subscriber = %self.config.subscriber_id,
                    "Dropping message: {}", e
                );
                self.emit(RuntimeEvent::Malformed {
                    reason: e.to_string(),
                });
                return None;
            }
        };

        if let Some(age_ms) = envelope.age_ms() {
            debug!(command = %envelope.command, age_ms, "Envelope received");
        }

        let outcome = self.dispatcher.dispatch(&envelope.command);
        self.stats.dispatched += 1;
        if !outcome.matched {
            self.stats.unknown += 1;
        }
        self.emit(RuntimeEvent::Dispatched(outcome.clone()));

        Some(outcome)
    }

    /// Run until `shutdown` resolves or the broker connection is lost
    /// under `ReconnectPolicy::FailFast`
    ///
    /// Returns the final counters on a clean shutdown. The subscription is
    /// dropped, and with it the broker connection, before returning.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<RuntimeStats, TransportError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut stream = match self.start().await {
            Ok(stream) => stream,
            Err(e) => {
                error!(subscriber = %self.config.subscriber_id, "Subscriber not operational: {}", e);
                return Err(e);
            }
        };

        loop {
            let next = tokio::select! {
                _ = &mut shutdown => None,
                payload = stream.next_payload() => Some(payload),
            };

            match next {
                None => break,
                Some(Some(payload)) => {
                    self.handle_payload(&payload);
                }
                Some(None) => {
                    warn!(subscriber = %self.config.subscriber_id, "Broker connection lost");
                    self.emit(RuntimeEvent::Disconnected);

                    let (initial, max) = match self.config.reconnect {
                        ReconnectPolicy::FailFast => {
                            error!(
                                subscriber = %self.config.subscriber_id,
                                "Subscriber not operational: {}", TransportError::Disconnected
                            );
                            return Err(self.fail(TransportError::Disconnected));
                        }
                        ReconnectPolicy::Backoff { initial, max } => (initial, max),
                    };

                    match self.reconnect(&mut shutdown, initial, max).await {
                        Some(resubscribed) => stream = resubscribed,
                        None => break,
                    }
                }
            }
        }

        drop(stream);
        self.state = RuntimeState::Disconnected;
        info!(
            subscriber = %self.config.subscriber_id,
            received = self.stats.received,
            dispatched = self.stats.dispatched,
            malformed = self.stats.malformed,
            "Subscriber stopped, connection released"
        );
        Ok(self.stats)
    }

    /// Retry `start` with exponential backoff
    ///
    /// Returns `None` if shutdown was requested while waiting or while an
    /// attempt was in flight.
    async fn reconnect<F>(
        &mut self,
        shutdown: &mut std::pin::Pin<&mut F>,
        initial: Duration,
        max: Duration,
    ) -> Option<StreamOf<T>>
    where
        F: Future<Output = ()>,
    {
        let mut delay = initial;

        loop {
            self.state = RuntimeState::Disconnected;
            info!(
                subscriber = %self.config.subscriber_id,
                "Reconnecting in {:?}", delay
            );

            tokio::select! {
                _ = shutdown.as_mut() => return None,
                _ = tokio::time::sleep(delay) => {}
            }

            let attempt = tokio::select! {
                _ = shutdown.as_mut() => return None,
                attempt = self.start() => attempt,
            };

            match attempt {
                Ok(stream) => return Some(stream),
                Err(e) => warn!(
                    subscriber = %self.config.subscriber_id,
                    "Reconnect attempt failed: {}", e
                ),
            }

            delay = std::cmp::min(delay * 2, max);
        }
    }
}
