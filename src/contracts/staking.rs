//! `staking` module.

use move_core_types::account_address::AccountAddress;
use serde_json::Value;

use move_e2e_types::{EntryFunctionCall, MoveArg, ViewCall};

use super::function_id;
use crate::chain::Chain;
use crate::harness::{Harness, HarnessError};

pub const MODULE: &str = "staking";

#[derive(Debug, Clone, Copy)]
pub struct Staking {
    address: AccountAddress,
}

impl Staking {
    pub fn new(address: AccountAddress) -> Self {
        Self { address }
    }

    pub fn stake_tokens(&self, names: &[&str]) -> Result<EntryFunctionCall, HarnessError> {
        Ok(
            EntryFunctionCall::new(function_id(self.address, MODULE, "stake_tokens")?)
                .arg(MoveArg::strings(names.iter().copied())),
        )
    }

    pub fn unstake_tokens(&self, names: &[&str]) -> Result<EntryFunctionCall, HarnessError> {
        Ok(
            EntryFunctionCall::new(function_id(self.address, MODULE, "unstake_tokens")?)
                .arg(MoveArg::strings(names.iter().copied())),
        )
    }

    /// Staked token records of `owner`, oldest first.
    pub fn get_staked_tokens<C: Chain>(
        &self,
        harness: &Harness<C>,
        owner: AccountAddress,
    ) -> Result<Vec<Value>, HarnessError> {
        let call = ViewCall::new(function_id(self.address, MODULE, "get_staked_tokens")?).arg(owner);
        harness.view_first(&call)
    }
}

/// The `name` of each staked record.
pub fn staked_token_names(staked: &[Value]) -> Result<Vec<String>, HarnessError> {
    staked
        .iter()
        .map(|record| {
            record
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| HarnessError::Decode(format!("staked record without name: {}", record)))
        })
        .collect()
}
