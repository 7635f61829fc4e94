//! Greeting command handlers (hello, goodbye)

use super::HandlerContext;
use crate::command::CommandResult;

/// Handle sayHello
pub fn say_hello(_ctx: &HandlerContext) -> CommandResult {
    CommandResult::Completed {
        message: "Hello, World!".into(),
    }
}

/// Handle sayGoodbye
pub fn say_goodbye(_ctx: &HandlerContext) -> CommandResult {
    CommandResult::Completed {
        message: "Goodbye, see you later!".into(),
    }
}
