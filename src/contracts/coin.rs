//! `sdm` coin module plus the framework balance view.

use move_core_types::account_address::AccountAddress;

use move_e2e_types::encoding::json_u64;
use move_e2e_types::{EntryFunctionCall, ViewCall};

use super::function_id;
use crate::chain::Chain;
use crate::harness::{Harness, HarnessError};

pub const MODULE: &str = "sdm";

#[derive(Debug, Clone)]
pub struct Coin {
    address: AccountAddress,
    coin_type: String,
}

impl Coin {
    pub fn new(address: AccountAddress, coin_type: impl Into<String>) -> Self {
        Self {
            address,
            coin_type: coin_type.into(),
        }
    }

    fn call(&self, name: &str) -> Result<EntryFunctionCall, HarnessError> {
        Ok(EntryFunctionCall::new(function_id(self.address, MODULE, name)?))
    }

    /// Create the sender's coin store.
    pub fn register(&self) -> Result<EntryFunctionCall, HarnessError> {
        self.call("register")
    }

    pub fn mint(&self, amount: u64) -> Result<EntryFunctionCall, HarnessError> {
        Ok(self.call("mint")?.arg(amount))
    }

    pub fn burn(&self, amount: u64) -> Result<EntryFunctionCall, HarnessError> {
        Ok(self.call("burn")?.arg(amount))
    }

    pub fn transfer(&self, to: AccountAddress, amount: u64) -> Result<EntryFunctionCall, HarnessError> {
        Ok(self.call("transfer")?.arg(to).arg(amount))
    }

    /// `0x1::coin::balance<T>(owner)`.
    pub fn balance<C: Chain>(
        &self,
        harness: &Harness<C>,
        owner: AccountAddress,
    ) -> Result<u64, HarnessError> {
        let call = ViewCall::new(function_id(AccountAddress::ONE, "coin", "balance")?)
            .type_arg(self.coin_type.as_str())
            .arg(owner);
        let values = harness.view(&call)?;
        values
            .first()
            .and_then(json_u64)
            .ok_or_else(|| HarnessError::Decode(format!("balance of {}: {:?}", self.coin_type, values)))
    }
}
