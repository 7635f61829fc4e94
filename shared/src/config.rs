//! Environment-driven configuration helpers
//!
//! Config structs take a lookup closure instead of reading `std::env`
//! directly so tests can feed them a fixed map.

use crate::ConfigError;

/// Read `var` through `lookup`, falling back to `default` when unset
///
/// A variable that is set but blank is rejected rather than defaulted.
pub fn read_var(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: &str,
) -> Result<String, ConfigError> {
    match lookup(var) {
        None => Ok(default.to_string()),
        Some(value) if value.trim().is_empty() => Err(ConfigError::Empty { var }),
        Some(value) => Ok(value.trim().to_string()),
    }
}

/// Lookup backed by the process environment
pub fn process_env(var: &str) -> Option<String> {
    std::env::var(var).ok()
}
