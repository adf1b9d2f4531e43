//! Environment helpers
//!
//! Every variable is read once at startup; blank values count as unset.

use std::str::FromStr;

/// Trimmed value of `key`, or `None` when unset or blank.
pub fn var_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Value of `key`, or `default` when unset or blank.
pub fn var_or(key: &str, default: &str) -> String {
    var_opt(key).unwrap_or_else(|| default.to_string())
}

/// Parse `key` into `T`. Unset yields `Ok(None)`; a value that does not parse is an error.
pub fn parse_var<T: FromStr>(key: &str) -> Result<Option<T>, String> {
    match var_opt(key) {
        None => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|_| format!("{key} has an invalid value {raw:?}")),
    }
}
