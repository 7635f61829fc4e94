//! Command dispatch for a subscriber process
//!
//! This module handles:
//! - The fixed per-process dispatch table
//! - Exact-match lookup with an unknown-command fallback
//! - The built-in handler vocabularies

mod dispatcher;
pub mod handlers;

pub use dispatcher::{CommandDispatcher, CommandResult, DispatchOutcome};
#[cfg(test)]
pub use dispatcher::DispatchTable;
pub use handlers::SubscriberProfile;
