//! Shared types for the move-e2e workspace.
//!
//! This crate holds the vocabulary both the transport layer and the harness
//! speak, so neither has to depend on the other:
//!
//! - [`address`] - address normalization and parsing
//! - [`function`] - entry/view function identifiers and argument encoding
//! - [`status`] - `vm_status` parsing and abort classification
//! - [`transaction`] - transaction outcomes, events, table item requests
//! - [`encoding`] - hex and BCS decoding of values returned by the node
//! - [`env_utils`] - typed environment variable helpers

pub mod address;
pub mod encoding;
pub mod env_utils;
pub mod function;
pub mod status;
pub mod transaction;

pub use function::{EntryFunctionCall, FunctionId, MoveArg, ViewCall};
pub use status::{AbortCategory, AbortStatus, ExpectedAbort, ModuleLocation, VmStatus};
pub use transaction::{ChainEvent, TableItemRequest, TransactionOutcome};

use std::time::Duration;

/// How long and how often to poll the node while a transaction is pending.
///
/// There is no retry here: a submitted transaction is awaited once, and the
/// only knob is the polling cadence plus an optional upper bound.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WaitConfig {
    /// Delay between two by-hash lookups.
    pub poll_interval: Duration,
    /// Upper bound on the total wait. `None` waits until the node answers.
    pub timeout: Option<Duration>,
}

impl WaitConfig {
    /// Create a WaitConfig from milliseconds / seconds; a zero timeout means unbounded.
    pub fn new(poll_interval_ms: u64, timeout_secs: u64) -> Self {
        Self {
            poll_interval: Duration::from_millis(poll_interval_ms),
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        }
    }

    /// Wait forever, polling at the default interval.
    pub fn unbounded() -> Self {
        Self {
            timeout: None,
            ..Self::default()
        }
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            timeout: Some(Duration::from_secs(60)),
        }
    }
}
