//! Calculation command handler

use super::HandlerContext;
use crate::command::CommandResult;

/// The fixed computation behind `calculate`
pub fn compute() -> i64 {
    2 + 2
}

/// Handle calculate
pub fn calculate(_ctx: &HandlerContext) -> CommandResult {
    CommandResult::Completed {
        message: format!("Calculation result is {}", compute()),
    }
}
