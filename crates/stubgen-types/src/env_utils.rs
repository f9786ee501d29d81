//! Environment variable parsing utilities.
//!
//! Every tunable in the workspace has an environment fallback. These helpers remove
//! the repeated `std::env::var(..).ok().and_then(..)` boilerplate.
//!
//! # Example
//!
//! ```
//! use stubgen_types::env_utils::{env_bool_or, env_var_or};
//!
//! let limit: usize = env_var_or("STUBGEN_TUPLE_LIMIT", 120);
//! let parallel = env_bool_or("STUBGEN_PARALLEL", true);
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable with a default value.
///
/// Returns the default if the variable is not set or cannot be parsed.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// Truthy values are "1", "true", "yes" and "on" (case-insensitive); anything else
/// set is false, unset yields `default`.
pub fn env_bool_or(key: &str, default: bool) -> bool {
    match std::env::var(key).ok() {
        Some(v) => matches!(
            v.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        None => default,
    }
}

/// String variable with a default. Empty values count as unset.
pub fn env_string_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default.to_string(),
    }
}
