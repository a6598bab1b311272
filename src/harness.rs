//! Action-and-assertion harness.
//!
//! Every case goes through one of three entry points:
//!
//! - [`Harness::expect_success`]: the action must commit successfully.
//! - [`Harness::expect_failure_with_code`]: the action must commit with one
//!   specific abort. Success, a different abort, or any non-abort failure is
//!   reported as a failure of the case.
//! - [`Harness::view`] / [`Harness::view_first`]: read-only queries.
//!
//! There are no retries: each call is one submit and one wait. Errors from
//! the node itself ([`TransportError`]) are kept apart from contract aborts
//! and never satisfy an expected abort.

use move_core_types::account_address::AccountAddress;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

use move_e2e_transport::{LocalAccount, TransportError};
use move_e2e_types::address::is_framework_address;
use move_e2e_types::status::AbortCategory;
use move_e2e_types::{
    AbortStatus, ChainEvent, EntryFunctionCall, ExpectedAbort, TableItemRequest,
    TransactionOutcome, ViewCall,
};

use crate::chain::Chain;

/// Code the framework's `table` module aborts with when a key is missing.
pub const TABLE_ENTRY_NOT_FOUND: u64 = 0x6507;

/// Code the contract modules use for their access-control checks.
pub const ACCESS_DENIED: u64 = 0x1;

#[derive(Debug)]
pub enum HarnessError {
    /// The node could not be reached, answered with an error, or the wait timed out.
    Transport(TransportError),
    /// A call could not be constructed (bad identifier, bad argument).
    Build(String),
    /// The transaction committed with a failure where success was expected.
    TransactionFailed { function: String, vm_status: String },
    /// An abort was expected but the transaction succeeded.
    UnexpectedSuccess { function: String, expected: String },
    /// The transaction failed, but not with the expected abort.
    WrongFailure {
        function: String,
        expected: String,
        actual: String,
    },
    Assertion(String),
    /// A value an earlier step should have captured is missing.
    MissingContext(&'static str),
    Decode(String),
    StepTimeout {
        step: String,
        elapsed_ms: u128,
        limit_ms: u128,
    },
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::Transport(e) => write!(f, "transport error: {}", e),
            HarnessError::Build(msg) => write!(f, "cannot build call: {}", msg),
            HarnessError::TransactionFailed {
                function,
                vm_status,
            } => write!(f, "{} failed: {}", function, vm_status),
            HarnessError::UnexpectedSuccess { function, expected } => write!(
                f,
                "{} succeeded but was expected to abort with '{}'",
                function, expected
            ),
            HarnessError::WrongFailure {
                function,
                expected,
                actual,
            } => write!(
                f,
                "{} failed with '{}' instead of '{}'",
                function, actual, expected
            ),
            HarnessError::Assertion(msg) => write!(f, "assertion failed: {}", msg),
            HarnessError::MissingContext(what) => {
                write!(f, "missing {} (an earlier step should have captured it)", what)
            }
            HarnessError::Decode(msg) => write!(f, "cannot decode response: {}", msg),
            HarnessError::StepTimeout {
                step,
                elapsed_ms,
                limit_ms,
            } => write!(
                f,
                "step '{}' took {} ms, limit is {} ms",
                step, elapsed_ms, limit_ms
            ),
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HarnessError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TransportError> for HarnessError {
    fn from(e: TransportError) -> Self {
        HarnessError::Transport(e)
    }
}

impl HarnessError {
    pub fn is_transport(&self) -> bool {
        matches!(self, HarnessError::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;

/// Coarse reading of an abort, used for logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortKind {
    /// A contract module rejected the sender.
    AccessControl,
    /// The referenced entry (template, sale, table key) does not exist.
    InvalidReference,
    /// The sender does not hold enough of a token or coin.
    InsufficientBalance,
    Other,
}

impl AbortKind {
    pub fn classify(abort: &AbortStatus) -> Self {
        if abort.reason_name.as_deref() == Some("EINSUFFICIENT_BALANCE") {
            return AbortKind::InsufficientBalance;
        }
        let framework = is_framework_address(&abort.location.address.to_hex_literal());
        if framework && abort.location.module == "table" && abort.code == TABLE_ENTRY_NOT_FOUND {
            return AbortKind::InvalidReference;
        }
        if abort.category() == AbortCategory::NotFound {
            return AbortKind::InvalidReference;
        }
        if !framework && abort.code == ACCESS_DENIED {
            return AbortKind::AccessControl;
        }
        AbortKind::Other
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AbortKind::AccessControl => "access_control",
            AbortKind::InvalidReference => "invalid_reference",
            AbortKind::InsufficientBalance => "insufficient_balance",
            AbortKind::Other => "other",
        }
    }
}

impl fmt::Display for AbortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct Harness<C> {
    chain: C,
    step_timeout: Option<Duration>,
}

impl<C: Chain> Harness<C> {
    pub fn new(chain: C) -> Self {
        Self {
            chain,
            step_timeout: None,
        }
    }

    /// Soft limit applied by [`crate::scenario::Scenario::run`] to every step.
    pub fn with_step_timeout(mut self, limit: Option<Duration>) -> Self {
        self.step_timeout = limit;
        self
    }

    pub fn step_timeout(&self) -> Option<Duration> {
        self.step_timeout
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }

    /// One submit/await attempt, with no interpretation of the outcome.
    pub fn submit(
        &self,
        sender: &LocalAccount,
        call: &EntryFunctionCall,
    ) -> Result<TransactionOutcome> {
        debug!(
            function = %call.function,
            sender = %sender.address().to_hex_literal(),
            "submitting"
        );
        Ok(self.chain.submit_and_wait(sender, call)?)
    }

    pub fn expect_success(
        &self,
        sender: &LocalAccount,
        call: &EntryFunctionCall,
    ) -> Result<TransactionOutcome> {
        let outcome = self.submit(sender, call)?;
        if !outcome.success {
            warn!(function = %call.function, vm_status = %outcome.vm_status, "transaction failed");
            return Err(HarnessError::TransactionFailed {
                function: call.function.to_string(),
                vm_status: outcome.vm_status,
            });
        }
        Ok(outcome)
    }

    /// Submit and require the transaction to abort with `expected`.
    pub fn expect_failure_with_code(
        &self,
        sender: &LocalAccount,
        call: &EntryFunctionCall,
        expected: &ExpectedAbort,
    ) -> Result<AbortStatus> {
        let outcome = self.submit(sender, call)?;
        if outcome.success {
            return Err(HarnessError::UnexpectedSuccess {
                function: call.function.to_string(),
                expected: expected.to_string(),
            });
        }

        match outcome.abort_status() {
            Some(abort) if expected.matches(&abort) => {
                info!(
                    function = %call.function,
                    kind = %AbortKind::classify(&abort),
                    vm_status = %abort,
                    "aborted as expected"
                );
                Ok(abort)
            }
            _ => Err(HarnessError::WrongFailure {
                function: call.function.to_string(),
                expected: expected.to_string(),
                actual: outcome.vm_status,
            }),
        }
    }

    pub fn view(&self, call: &ViewCall) -> Result<Vec<Value>> {
        debug!(function = %call.function, "view");
        Ok(self.chain.view(call)?)
    }

    /// Decode the first returned value.
    pub fn view_first<T: DeserializeOwned>(&self, call: &ViewCall) -> Result<T> {
        let mut values = self.view(call)?;
        if values.is_empty() {
            return Err(HarnessError::Decode(format!(
                "{} returned no values",
                call.function
            )));
        }
        let first = values.swap_remove(0);
        serde_json::from_value(first)
            .map_err(|e| HarnessError::Decode(format!("{}: {}", call.function, e)))
    }

    /// Events of a committed, successful transaction. A missing or failed
    /// transaction is an error, never an empty list.
    pub fn transaction_events(&self, hash: &str) -> Result<Vec<ChainEvent>> {
        let tx = self
            .chain
            .transaction_by_hash(hash)?
            .ok_or_else(|| HarnessError::Decode(format!("transaction {} not found", hash)))?;
        let outcome = TransactionOutcome::from_json(&tx).ok_or_else(|| {
            HarnessError::Decode(format!("transaction {} is not committed", hash))
        })?;
        if !outcome.success {
            return Err(HarnessError::TransactionFailed {
                function: hash.to_string(),
                vm_status: outcome.vm_status,
            });
        }
        Ok(outcome.events)
    }

    pub fn account_resource(
        &self,
        address: &AccountAddress,
        resource_type: &str,
    ) -> Result<Option<Value>> {
        Ok(self.chain.account_resource(address, resource_type)?)
    }

    pub fn table_item(&self, handle: &str, request: &TableItemRequest) -> Result<Option<Value>> {
        Ok(self.chain.table_item(handle, request)?)
    }
}

/// Structural equality with a readable diff.
pub fn check_eq<T>(actual: T, expected: T, what: &str) -> Result<()>
where
    T: PartialEq + fmt::Debug,
{
    if actual == expected {
        Ok(())
    } else {
        Err(HarnessError::Assertion(format!(
            "{}: expected {:?}, got {:?}",
            what, expected, actual
        )))
    }
}

pub fn check(condition: bool, message: impl Into<String>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(HarnessError::Assertion(message.into()))
    }
}

/// Unwrap a value captured by an earlier step.
pub fn require<T>(value: Option<T>, what: &'static str) -> Result<T> {
    value.ok_or(HarnessError::MissingContext(what))
}
