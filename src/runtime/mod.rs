//! Subscriber runtime
//!
//! This module handles:
//! - Owning the broker connection for one subscriber process
//! - Connect/subscribe lifecycle and failure reporting
//! - The one-at-a-time receive and dispatch loop
//! - Reconnect policy on broker disconnect

mod config;
mod subscriber;

pub use config::SubscriberConfig;
pub use subscriber::SubscriberRuntime;

#[cfg(test)]
pub use config::ReconnectPolicy;
#[cfg(test)]
pub use subscriber::{RuntimeEvent, RuntimeStats};
