//! Typed clients for the deployed modules.
//!
//! Each client builds [`EntryFunctionCall`]s for its entry functions, leaving
//! the sender and the expected outcome to the caller, and decodes the values
//! its view functions return.
//!
//! [`EntryFunctionCall`]: move_e2e_types::EntryFunctionCall

use move_core_types::account_address::AccountAddress;

use move_e2e_types::FunctionId;

use crate::harness::HarnessError;

pub mod coin;
pub mod drops;
pub mod minter;
pub mod staking;
pub mod templates;
pub mod token;
pub mod unpacking;

pub use coin::Coin;
pub use drops::{Drops, SaleSpec};
pub use minter::Minter;
pub use staking::Staking;
pub use templates::{Template, TemplateKind, TemplateSpec, Templates};
pub use token::{TokenData, TokenReader};
pub use unpacking::Unpacking;

pub(crate) fn function_id(
    address: AccountAddress,
    module: &str,
    name: &str,
) -> Result<FunctionId, HarnessError> {
    FunctionId::new(address, module, name).map_err(|e| HarnessError::Build(e.to_string()))
}

/// u64 fields arrive as decimal strings; accept plain numbers too.
pub(crate) fn deserialize_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    let value = serde_json::Value::deserialize(deserializer)?;
    move_e2e_types::encoding::json_u64(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("expected a u64, got {}", value)))
}
