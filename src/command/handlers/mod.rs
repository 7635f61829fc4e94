//! Command handlers and the built-in subscriber vocabularies

mod calculate;
mod date;
mod greeting;

pub use calculate::calculate;
pub use date::show_date;
pub use greeting::{say_goodbye, say_hello};

use super::dispatcher::{CommandResult, DispatchError, DispatchTable};
use std::fmt;
use std::str::FromStr;

/// Context passed to command handlers
#[derive(Debug, Clone)]
pub struct HandlerContext {
    pub subscriber_id: String,
    pub command: String,
}

/// Default action for commands outside the vocabulary. Never fails.
pub fn unknown_command(ctx: &HandlerContext) -> CommandResult {
    CommandResult::Rejected {
        message: format!("Unknown command: {}", ctx.command),
    }
}

/// Built-in vocabularies a subscriber process can run with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubscriberProfile {
    /// sayHello, showDate
    #[default]
    Greeter,
    /// sayGoodbye, calculate
    Calculator,
}

impl SubscriberProfile {
    /// Build this profile's fixed dispatch table
    pub fn dispatch_table(self) -> Result<DispatchTable, DispatchError> {
        let builder = DispatchTable::builder();
        let builder = match self {
            SubscriberProfile::Greeter => builder
                .on("sayHello", say_hello)
                .on("showDate", show_date),
            SubscriberProfile::Calculator => builder
                .on("sayGoodbye", say_goodbye)
                .on("calculate", calculate),
        };
        builder.build()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SubscriberProfile::Greeter => "greeter",
            SubscriberProfile::Calculator => "calculator",
        }
    }
}

impl fmt::Display for SubscriberProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriberProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "greeter" => Ok(SubscriberProfile::Greeter),
            "calculator" => Ok(SubscriberProfile::Calculator),
            other => Err(format!("unknown profile '{}', expected greeter or calculator", other)),
        }
    }
}
