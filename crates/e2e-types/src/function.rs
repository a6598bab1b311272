//! Function identifiers and argument encoding for entry and view calls.
//!
//! A [`FunctionId`] is the `<address>::<module>::<name>` triple the node
//! expects in both submission payloads and view requests. Arguments are kept
//! typed as [`MoveArg`] until the moment they are rendered to the JSON shape
//! the REST API accepts.

use anyhow::{anyhow, bail, Result};
use move_core_types::account_address::AccountAddress;
use move_core_types::identifier::Identifier;
use move_core_types::language_storage::ModuleId;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

use crate::address::parse_address;
use crate::encoding::hex_literal;

/// Fully-qualified Move function identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionId {
    module: ModuleId,
    name: Identifier,
}

impl FunctionId {
    pub fn new(address: AccountAddress, module: &str, name: &str) -> Result<Self> {
        let module_ident = Identifier::new(module)
            .map_err(|e| anyhow!("Invalid module name '{}': {}", module, e))?;
        let name_ident =
            Identifier::new(name).map_err(|e| anyhow!("Invalid function name '{}': {}", name, e))?;
        Ok(Self {
            module: ModuleId::new(address, module_ident),
            name: name_ident,
        })
    }

    /// Parse `0x1::coin::balance`-style strings.
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split("::").collect();
        if parts.len() != 3 {
            bail!("Function id '{}' must look like <address>::<module>::<name>", s);
        }
        let address =
            parse_address(parts[0]).ok_or_else(|| anyhow!("Invalid address in '{}'", s))?;
        Self::new(address, parts[1], parts[2])
    }

    pub fn address(&self) -> &AccountAddress {
        self.module.address()
    }

    pub fn module_name(&self) -> &str {
        self.module.name().as_str()
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// `<address>::<module>`, in the short address form abort statuses use.
    pub fn module_path(&self) -> String {
        format!("{}::{}", self.address().to_hex_literal(), self.module_name())
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module_path(), self.name())
    }
}

impl FromStr for FunctionId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A typed Move argument.
///
/// JSON rendering follows the REST API conventions: 64/128-bit integers are
/// decimal strings, smaller integers are numbers, byte vectors are hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveArg {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    Address(AccountAddress),
    String(String),
    Bytes(Vec<u8>),
    Vector(Vec<MoveArg>),
}

impl MoveArg {
    pub fn to_json(&self) -> Value {
        match self {
            MoveArg::Bool(b) => json!(b),
            MoveArg::U8(v) => json!(v),
            MoveArg::U16(v) => json!(v),
            MoveArg::U32(v) => json!(v),
            MoveArg::U64(v) => json!(v.to_string()),
            MoveArg::U128(v) => json!(v.to_string()),
            MoveArg::Address(a) => json!(a.to_hex_literal()),
            MoveArg::String(s) => json!(s),
            MoveArg::Bytes(b) => json!(hex_literal(b)),
            MoveArg::Vector(items) => Value::Array(items.iter().map(MoveArg::to_json).collect()),
        }
    }

    /// `vector<String>` from anything string-like.
    pub fn strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MoveArg::Vector(items.into_iter().map(|s| MoveArg::String(s.into())).collect())
    }
}

impl From<bool> for MoveArg {
    fn from(v: bool) -> Self {
        MoveArg::Bool(v)
    }
}

impl From<u8> for MoveArg {
    fn from(v: u8) -> Self {
        MoveArg::U8(v)
    }
}

impl From<u64> for MoveArg {
    fn from(v: u64) -> Self {
        MoveArg::U64(v)
    }
}

impl From<u128> for MoveArg {
    fn from(v: u128) -> Self {
        MoveArg::U128(v)
    }
}

impl From<AccountAddress> for MoveArg {
    fn from(v: AccountAddress) -> Self {
        MoveArg::Address(v)
    }
}

impl From<&str> for MoveArg {
    fn from(v: &str) -> Self {
        MoveArg::String(v.to_string())
    }
}

impl From<String> for MoveArg {
    fn from(v: String) -> Self {
        MoveArg::String(v)
    }
}

/// A state-mutating call: function, type arguments, ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFunctionCall {
    pub function: FunctionId,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<MoveArg>,
}

impl EntryFunctionCall {
    pub fn new(function: FunctionId) -> Self {
        Self {
            function,
            type_arguments: Vec::new(),
            arguments: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<MoveArg>) -> Self {
        self.arguments.push(arg.into());
        self
    }

    pub fn type_arg(mut self, type_tag: impl Into<String>) -> Self {
        self.type_arguments.push(type_tag.into());
        self
    }

    /// The `entry_function_payload` object used in submissions.
    pub fn payload_json(&self) -> Value {
        json!({
            "type": "entry_function_payload",
            "function": self.function.to_string(),
            "type_arguments": self.type_arguments,
            "arguments": self.arguments.iter().map(MoveArg::to_json).collect::<Vec<_>>(),
        })
    }
}

/// A read-only call against a `#[view]` function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewCall {
    pub function: FunctionId,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<MoveArg>,
}

impl ViewCall {
    pub fn new(function: FunctionId) -> Self {
        Self {
            function,
            type_arguments: Vec::new(),
            arguments: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<MoveArg>) -> Self {
        self.arguments.push(arg.into());
        self
    }

    pub fn type_arg(mut self, type_tag: impl Into<String>) -> Self {
        self.type_arguments.push(type_tag.into());
        self
    }

    /// Body for `POST /view`.
    pub fn request_json(&self) -> Value {
        json!({
            "function": self.function.to_string(),
            "type_arguments": self.type_arguments,
            "arguments": self.arguments.iter().map(MoveArg::to_json).collect::<Vec<_>>(),
        })
    }
}
