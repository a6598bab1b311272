//! `vm_status` parsing and abort classification.
//!
//! The node reports a committed transaction's result as a free-form status
//! string. The shapes this harness relies on:
//!
//! ```text
//! Executed successfully
//! Move abort in 0x2de6…c28::drops: 0x1
//! Move abort in 0x1::table: 0x6507
//! Move abort in 0x3::token: EINSUFFICIENT_BALANCE(0x10005): Insufficient token balance
//! ```
//!
//! Abort codes follow the Move error convention: the upper bits carry a
//! category and the low 16 bits a module-specific reason.

use move_core_types::account_address::AccountAddress;
use serde::Serialize;
use std::fmt;

use crate::address::parse_address;

pub const EXECUTED_SUCCESSFULLY: &str = "Executed successfully";

const MOVE_ABORT_PREFIX: &str = "Move abort in ";

/// Errors raised while parsing a status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusParseError {
    /// The string is not a `Move abort in …` status.
    NotAnAbort(String),
    /// The module location is not `<address>::<module>`.
    BadLocation(String),
    /// The abort code is neither `0x…` hex nor decimal.
    BadCode(String),
}

impl fmt::Display for StatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusParseError::NotAnAbort(s) => write!(f, "not a Move abort status: {}", s),
            StatusParseError::BadLocation(s) => write!(f, "invalid abort location: {}", s),
            StatusParseError::BadCode(s) => write!(f, "invalid abort code: {}", s),
        }
    }
}

impl std::error::Error for StatusParseError {}

/// The module an abort was raised in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleLocation {
    pub address: AccountAddress,
    pub module: String,
}

impl ModuleLocation {
    pub fn new(address: AccountAddress, module: impl Into<String>) -> Self {
        Self {
            address,
            module: module.into(),
        }
    }

    /// Parse `0x3::token`.
    pub fn parse(s: &str) -> Result<Self, StatusParseError> {
        let (addr, module) = s
            .trim()
            .split_once("::")
            .ok_or_else(|| StatusParseError::BadLocation(s.to_string()))?;
        let address = parse_address(addr).ok_or_else(|| StatusParseError::BadLocation(s.to_string()))?;
        if module.is_empty() || module.contains("::") {
            return Err(StatusParseError::BadLocation(s.to_string()));
        }
        Ok(Self::new(address, module))
    }
}

impl fmt::Display for ModuleLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.address.to_hex_literal(), self.module)
    }
}

impl Serialize for ModuleLocation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Canonical Move error categories (`std::error`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AbortCategory {
    Uncategorized,
    InvalidArgument,
    OutOfRange,
    InvalidState,
    Unauthenticated,
    PermissionDenied,
    NotFound,
    Aborted,
    AlreadyExists,
    ResourceExhausted,
    Cancelled,
    Internal,
    NotImplemented,
    Unavailable,
    Unknown(u64),
}

impl AbortCategory {
    pub fn from_code(code: u64) -> Self {
        match code >> 16 {
            0x0 => AbortCategory::Uncategorized,
            0x1 => AbortCategory::InvalidArgument,
            0x2 => AbortCategory::OutOfRange,
            0x3 => AbortCategory::InvalidState,
            0x4 => AbortCategory::Unauthenticated,
            0x5 => AbortCategory::PermissionDenied,
            0x6 => AbortCategory::NotFound,
            0x7 => AbortCategory::Aborted,
            0x8 => AbortCategory::AlreadyExists,
            0x9 => AbortCategory::ResourceExhausted,
            0xA => AbortCategory::Cancelled,
            0xB => AbortCategory::Internal,
            0xC => AbortCategory::NotImplemented,
            0xD => AbortCategory::Unavailable,
            other => AbortCategory::Unknown(other),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AbortCategory::Uncategorized => "UNCATEGORIZED",
            AbortCategory::InvalidArgument => "INVALID_ARGUMENT",
            AbortCategory::OutOfRange => "OUT_OF_RANGE",
            AbortCategory::InvalidState => "INVALID_STATE",
            AbortCategory::Unauthenticated => "UNAUTHENTICATED",
            AbortCategory::PermissionDenied => "PERMISSION_DENIED",
            AbortCategory::NotFound => "NOT_FOUND",
            AbortCategory::Aborted => "ABORTED",
            AbortCategory::AlreadyExists => "ALREADY_EXISTS",
            AbortCategory::ResourceExhausted => "RESOURCE_EXHAUSTED",
            AbortCategory::Cancelled => "CANCELLED",
            AbortCategory::Internal => "INTERNAL",
            AbortCategory::NotImplemented => "NOT_IMPLEMENTED",
            AbortCategory::Unavailable => "UNAVAILABLE",
            AbortCategory::Unknown(_) => "UNKNOWN",
        }
    }
}

impl fmt::Display for AbortCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed `Move abort in <location>: <code>` status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbortStatus {
    pub location: ModuleLocation,
    pub code: u64,
    /// Symbolic reason when the module declares one, e.g. `EINSUFFICIENT_BALANCE`.
    pub reason_name: Option<String>,
    /// Human-readable description that follows the reason, when present.
    pub description: Option<String>,
    raw: String,
}

impl AbortStatus {
    pub fn parse(vm_status: &str) -> Result<Self, StatusParseError> {
        let body = vm_status
            .strip_prefix(MOVE_ABORT_PREFIX)
            .ok_or_else(|| StatusParseError::NotAnAbort(vm_status.to_string()))?;
        let (location, rest) = body
            .split_once(": ")
            .ok_or_else(|| StatusParseError::NotAnAbort(vm_status.to_string()))?;
        let location = ModuleLocation::parse(location)?;

        // Either `0x1` or `NAME(0x10005)` optionally followed by `: description`.
        let (head, description) = match rest.split_once(": ") {
            Some((h, d)) => (h, Some(d.to_string())),
            None => (rest, None),
        };
        let (reason_name, code_str) = match head.split_once('(') {
            Some((name, tail)) => {
                let code = tail
                    .strip_suffix(')')
                    .ok_or_else(|| StatusParseError::BadCode(head.to_string()))?;
                (Some(name.to_string()), code)
            }
            None => (None, head),
        };
        let code = parse_code(code_str)?;

        Ok(Self {
            location,
            code,
            reason_name,
            description,
            raw: vm_status.to_string(),
        })
    }

    /// The status string exactly as the node reported it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn category(&self) -> AbortCategory {
        AbortCategory::from_code(self.code)
    }
}

impl fmt::Display for AbortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_code(s: &str) -> Result<u64, StatusParseError> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => s.parse::<u64>().ok(),
    };
    parsed.ok_or_else(|| StatusParseError::BadCode(s.to_string()))
}

/// Coarse interpretation of a committed transaction's status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmStatus {
    Executed,
    Abort(AbortStatus),
    /// Any other failure (out of gas, type errors, …), kept verbatim.
    Other(String),
}

impl VmStatus {
    pub fn parse(vm_status: &str) -> Self {
        if vm_status == EXECUTED_SUCCESSFULLY {
            return VmStatus::Executed;
        }
        match AbortStatus::parse(vm_status) {
            Ok(abort) => VmStatus::Abort(abort),
            Err(_) => VmStatus::Other(vm_status.to_string()),
        }
    }
}

/// An abort a test case expects to observe.
///
/// Built either from a location and code, or from the exact status string.
/// Exact statuses also match when they differ only in address formatting;
/// the reason name and description must still be identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedAbort {
    pub location: ModuleLocation,
    pub code: u64,
    pub reason_name: Option<String>,
    exact: Option<ExactStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ExactStatus {
    raw: String,
    description: Option<String>,
}

impl ExpectedAbort {
    pub fn new(location: ModuleLocation, code: u64) -> Self {
        Self {
            location,
            code,
            reason_name: None,
            exact: None,
        }
    }

    pub fn in_module(address: AccountAddress, module: &str, code: u64) -> Self {
        Self::new(ModuleLocation::new(address, module), code)
    }

    /// Also require the symbolic reason, e.g. `EINSUFFICIENT_BALANCE`.
    pub fn with_reason(mut self, reason_name: impl Into<String>) -> Self {
        self.reason_name = Some(reason_name.into());
        self
    }

    pub fn exact(status: &str) -> Result<Self, StatusParseError> {
        let parsed = AbortStatus::parse(status)?;
        Ok(Self {
            location: parsed.location,
            code: parsed.code,
            reason_name: parsed.reason_name,
            exact: Some(ExactStatus {
                raw: status.to_string(),
                description: parsed.description,
            }),
        })
    }

    /// The status string this expectation corresponds to.
    pub fn expected_status(&self) -> String {
        match &self.exact {
            Some(exact) => exact.raw.clone(),
            None => match &self.reason_name {
                Some(name) => format!(
                    "{}{}: {}({:#x})",
                    MOVE_ABORT_PREFIX, self.location, name, self.code
                ),
                None => format!("{}{}: {:#x}", MOVE_ABORT_PREFIX, self.location, self.code),
            },
        }
    }

    pub fn matches(&self, actual: &AbortStatus) -> bool {
        if self.location != actual.location || self.code != actual.code {
            return false;
        }
        match &self.exact {
            Some(exact) => {
                self.reason_name == actual.reason_name && exact.description == actual.description
            }
            None => match &self.reason_name {
                Some(name) => actual.reason_name.as_deref() == Some(name.as_str()),
                None => true,
            },
        }
    }
}

impl fmt::Display for ExpectedAbort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expected_status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DROPS: &str = "0x2de6aea32fcb7ab2e33ab9a78df3b5f4ef5b718ef77475f96ed8a66f466afc28";

    #[test]
    fn test_parse_plain_abort() {
        let status = format!("Move abort in {}::drops: 0x2", DROPS);
        let abort = AbortStatus::parse(&status).unwrap();
        assert_eq!(abort.location.module, "drops");
        assert_eq!(abort.location.address.to_hex_literal(), DROPS);
        assert_eq!(abort.code, 2);
        assert_eq!(abort.reason_name, None);
        assert_eq!(abort.description, None);
        assert_eq!(abort.raw(), status);
    }

    #[test]
    fn test_parse_named_abort_with_description() {
        let abort = AbortStatus::parse(
            "Move abort in 0x3::token: EINSUFFICIENT_BALANCE(0x10005): Insufficient token balance",
        )
        .unwrap();
        assert_eq!(abort.location.to_string(), "0x3::token");
        assert_eq!(abort.code, 0x10005);
        assert_eq!(abort.reason_name.as_deref(), Some("EINSUFFICIENT_BALANCE"));
        assert_eq!(abort.description.as_deref(), Some("Insufficient token balance"));
        assert_eq!(abort.category(), AbortCategory::InvalidArgument);
    }

    #[test]
    fn test_categories() {
        let not_found = AbortStatus::parse(
            "Move abort in 0x3::token: EINSUFFICIENT_BALANCE(0x60005): Insufficient token balance",
        )
        .unwrap();
        assert_eq!(not_found.category(), AbortCategory::NotFound);

        let table = AbortStatus::parse("Move abort in 0x1::table: 0x6507").unwrap();
        assert_eq!(table.category(), AbortCategory::Uncategorized);
        assert_eq!(AbortCategory::from_code(0x5_0001).name(), "PERMISSION_DENIED");
        assert_eq!(AbortCategory::from_code(0xF_0000), AbortCategory::Unknown(0xF));
    }

    #[test]
    fn test_parse_rejects_non_aborts() {
        assert!(matches!(
            AbortStatus::parse(EXECUTED_SUCCESSFULLY),
            Err(StatusParseError::NotAnAbort(_))
        ));
        assert!(matches!(
            AbortStatus::parse("Move abort in nowhere: 0x1"),
            Err(StatusParseError::BadLocation(_))
        ));
        assert!(matches!(
            AbortStatus::parse("Move abort in 0x1::table: 0xzz"),
            Err(StatusParseError::BadCode(_))
        ));
    }

    #[test]
    fn test_vm_status_parse() {
        assert_eq!(VmStatus::parse(EXECUTED_SUCCESSFULLY), VmStatus::Executed);
        assert!(matches!(
            VmStatus::parse("Move abort in 0x1::table: 0x6507"),
            VmStatus::Abort(_)
        ));
        assert_eq!(
            VmStatus::parse("Out of gas"),
            VmStatus::Other("Out of gas".to_string())
        );
    }

    #[test]
    fn test_expected_abort_formats_like_node() {
        let addr = parse_address(DROPS).unwrap();
        let expected = ExpectedAbort::in_module(addr, "drops", 1);
        assert_eq!(
            expected.expected_status(),
            format!("Move abort in {}::drops: 0x1", DROPS)
        );
        let table = ExpectedAbort::in_module(parse_address("0x1").unwrap(), "table", 0x6507);
        assert_eq!(table.expected_status(), "Move abort in 0x1::table: 0x6507");
    }

    #[test]
    fn test_expected_abort_matching() {
        let addr = parse_address(DROPS).unwrap();
        let expected = ExpectedAbort::in_module(addr, "drops", 1);
        let same = AbortStatus::parse(&format!("Move abort in {}::drops: 0x1", DROPS)).unwrap();
        let other_code = AbortStatus::parse(&format!("Move abort in {}::drops: 0x2", DROPS)).unwrap();
        let other_module =
            AbortStatus::parse(&format!("Move abort in {}::minter: 0x1", DROPS)).unwrap();
        assert!(expected.matches(&same));
        assert!(!expected.matches(&other_code));
        assert!(!expected.matches(&other_module));
    }

    #[test]
    fn test_exact_expectation_tolerates_address_padding() {
        let expected = ExpectedAbort::exact(
            "Move abort in 0x3::token: EINSUFFICIENT_BALANCE(0x10005): Insufficient token balance",
        )
        .unwrap();
        let padded = AbortStatus::parse(
            "Move abort in 0x0000000000000000000000000000000000000000000000000000000000000003::token: EINSUFFICIENT_BALANCE(0x10005): Insufficient token balance",
        )
        .unwrap();
        assert!(expected.matches(&padded));

        let renamed = AbortStatus::parse("Move abort in 0x3::token: EOTHER(0x10005)").unwrap();
        assert!(!expected.matches(&renamed));
    }

    #[test]
    fn test_exact_expectation_requires_same_description() {
        let expected = ExpectedAbort::exact(
            "Move abort in 0x3::token: EINSUFFICIENT_BALANCE(0x10005): Insufficient token balance",
        )
        .unwrap();
        let reworded = AbortStatus::parse(
            "Move abort in 0x3::token: EINSUFFICIENT_BALANCE(0x10005): Something else",
        )
        .unwrap();
        assert!(!expected.matches(&reworded));

        let bare = AbortStatus::parse("Move abort in 0x3::token: EINSUFFICIENT_BALANCE(0x10005)").unwrap();
        assert!(!expected.matches(&bare));

        let plain = ExpectedAbort::exact("Move abort in 0x1::table: 0x6507").unwrap();
        let named = AbortStatus::parse("Move abort in 0x1::table: ENOT_FOUND(0x6507)").unwrap();
        assert!(!plain.matches(&named));
        assert!(plain.matches(&AbortStatus::parse("Move abort in 0x1::table: 0x6507").unwrap()));
    }

    #[test]
    fn test_reason_expectation_display_and_match() {
        let expected = ExpectedAbort::in_module(AccountAddress::from_hex_literal("0x3").unwrap(), "token", 0x60005)
            .with_reason("EINSUFFICIENT_BALANCE");
        assert_eq!(
            expected.expected_status(),
            "Move abort in 0x3::token: EINSUFFICIENT_BALANCE(0x60005)"
        );
        let actual = AbortStatus::parse(
            "Move abort in 0x3::token: EINSUFFICIENT_BALANCE(0x60005): Insufficient token balance",
        )
        .unwrap();
        assert!(expected.matches(&actual));
        assert_eq!(actual.category(), AbortCategory::NotFound);

        let wrong_code = AbortStatus::parse(
            "Move abort in 0x3::token: EINSUFFICIENT_BALANCE(0x10005): Insufficient token balance",
        )
        .unwrap();
        assert!(!expected.matches(&wrong_code));
    }
}
