//! Orders publisher
//!
//! Accepts commands over HTTP and broadcasts each one, wrapped in a
//! command envelope, on the shared orders topic.

pub mod config;
pub mod ingress;
pub mod publisher;

pub use config::PublisherConfig;
pub use publisher::{extract_command, Ack, PublishError, Publisher, ValidationError};
