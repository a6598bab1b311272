//! `unpacking` module: opens packs into pending tokens, then claims them.

use move_core_types::account_address::AccountAddress;
use serde_json::Value;

use move_e2e_types::encoding::json_u64;
use move_e2e_types::{EntryFunctionCall, ViewCall};

use super::function_id;
use crate::chain::Chain;
use crate::harness::{Harness, HarnessError};

pub const MODULE: &str = "unpacking";

#[derive(Debug, Clone, Copy)]
pub struct Unpacking {
    address: AccountAddress,
}

impl Unpacking {
    pub fn new(address: AccountAddress) -> Self {
        Self { address }
    }

    pub fn unpack(&self, pack_name: &str) -> Result<EntryFunctionCall, HarnessError> {
        Ok(EntryFunctionCall::new(function_id(self.address, MODULE, "unpack")?).arg(pack_name))
    }

    pub fn claim(&self) -> Result<EntryFunctionCall, HarnessError> {
        Ok(EntryFunctionCall::new(function_id(self.address, MODULE, "claim")?))
    }

    /// Template ids unpacked by `owner` and not yet claimed.
    pub fn get_unpacked_tokens<C: Chain>(
        &self,
        harness: &Harness<C>,
        owner: AccountAddress,
    ) -> Result<Vec<Value>, HarnessError> {
        let call =
            ViewCall::new(function_id(self.address, MODULE, "get_unpacked_tokens")?).arg(owner);
        harness.view_first(&call)
    }
}

pub fn template_ids(unpacked: &[Value]) -> Result<Vec<u64>, HarnessError> {
    unpacked
        .iter()
        .map(|v| {
            json_u64(v).ok_or_else(|| HarnessError::Decode(format!("not a template id: {}", v)))
        })
        .collect()
}
