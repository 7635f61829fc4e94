//! Command dispatcher - looks up a received command and runs its action

use super::handlers::{self, HandlerContext};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

/// Result of running a handler action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Command was recognised and its action ran
    Completed { message: String },
    /// Command is not in this subscriber's vocabulary
    Rejected { message: String },
}

impl CommandResult {
    pub fn message(&self) -> &str {
        match self {
            CommandResult::Completed { message } | CommandResult::Rejected { message } => message,
        }
    }
}

/// A handler action bound to one command identifier
pub type Action = Box<dyn Fn(&HandlerContext) -> CommandResult + Send + Sync>;

/// Errors building a dispatch table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Command '{0}' registered twice")]
    DuplicateCommand(String),

    #[error("Cannot register an empty command identifier")]
    EmptyCommand,
}

/// Fixed mapping from command identifier to action, plus the fallback
/// for identifiers that are not in the table
pub struct DispatchTable {
    entries: HashMap<String, Action>,
    unknown: Action,
}

impl DispatchTable {
    pub fn builder() -> DispatchTableBuilder {
        DispatchTableBuilder::default()
    }

    /// Registered identifiers, sorted
    pub fn commands(&self) -> Vec<&str> {
        let mut commands: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        commands.sort_unstable();
        commands
    }
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("commands", &self.commands())
            .finish()
    }
}

/// Collects entries for a `DispatchTable`
#[derive(Default)]
pub struct DispatchTableBuilder {
    entries: HashMap<String, Action>,
    unknown: Option<Action>,
    error: Option<DispatchError>,
}

impl DispatchTableBuilder {
    /// Bind `action` to `command`
    pub fn on<F>(mut self, command: impl Into<String>, action: F) -> Self
    where
        F: Fn(&HandlerContext) -> CommandResult + Send + Sync + 'static,
    {
        let command = command.into();
        if self.error.is_some() {
            return self;
        }

        if command.is_empty() {
            self.error = Some(DispatchError::EmptyCommand);
        } else if self.entries.contains_key(&command) {
            self.error = Some(DispatchError::DuplicateCommand(command));
        } else {
            self.entries.insert(command, Box::new(action));
        }
        self
    }

    /// Replace the default unknown-command action
    #[cfg(test)]
    pub fn unknown<F>(mut self, action: F) -> Self
    where
        F: Fn(&HandlerContext) -> CommandResult + Send + Sync + 'static,
    {
        self.unknown = Some(Box::new(action));
        self
    }

    /// Freeze the table
    pub fn build(self) -> Result<DispatchTable, DispatchError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let unknown: Action = match self.unknown {
            Some(action) => action,
            None => Box::new(handlers::unknown_command),
        };

        Ok(DispatchTable {
            entries: self.entries,
            unknown,
        })
    }
}

/// What happened to one dispatched command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub command: String,
    /// `true` when the command had its own entry in the table
    pub matched: bool,
    pub result: CommandResult,
}

/// Per-subscriber dispatcher over a fixed table
pub struct CommandDispatcher {
    subscriber_id: String,
    table: DispatchTable,
}

impl CommandDispatcher {
    /// Create a new command dispatcher
    pub fn new(subscriber_id: impl Into<String>, table: DispatchTable) -> Self {
        Self {
            subscriber_id: subscriber_id.into(),
            table,
        }
    }

    /// Run exactly one action for `command`
    ///
    /// Exact, case-sensitive lookup; anything not in the table goes to the
    /// unknown-command action.
    pub fn dispatch(&self, command: &str) -> DispatchOutcome {
        let ctx = HandlerContext {
            subscriber_id: self.subscriber_id.clone(),
            command: command.to_string(),
        };

        let (matched, result) = match self.table.entries.get(command) {
            Some(action) => (true, action(&ctx)),
            None => (false, (self.table.unknown)(&ctx)),
        };

        let message = result.message();
        match &result {
            CommandResult::Completed { .. } => {
                info!(subscriber = %ctx.subscriber_id, command, "{}", message);
            }
            CommandResult::Rejected { .. } => {
                warn!(subscriber = %ctx.subscriber_id, command, "{}", message);
            }
        }

        DispatchOutcome {
            command: command.to_string(),
            matched,
            result,
        }
    }
}
