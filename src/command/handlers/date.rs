//! Date command handler

use super::HandlerContext;
use crate::command::CommandResult;
use chrono::Local;

/// Handle showDate - report the subscriber's local date and time
pub fn show_date(_ctx: &HandlerContext) -> CommandResult {
    let now = Local::now().format("%Y-%m-%d %H:%M:%S");

    CommandResult::Completed {
        message: format!("Current date is {}", now),
    }
}
