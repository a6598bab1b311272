//! Environment variable helpers used by configuration loading.
//!
//! Every knob of a run (network, keys, addresses, timeouts) comes from the
//! environment, usually through a `.env` file. These helpers collapse the
//! usual `var().ok().and_then(parse)` chains.
//!
//! ```
//! use move_e2e_types::env_utils::{env_var_or, env_nonempty};
//!
//! let poll_ms: u64 = env_var_or("MOVE_E2E_POLL_INTERVAL_MS", 500);
//! let node_url: Option<String> = env_nonempty("MOVE_E2E_NODE_URL");
//! # let _ = (poll_ms, node_url);
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable with a default value.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// Read a string variable, treating unset and whitespace-only values alike.
pub fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
