//! `drops` module: fixed-supply token sales.

use move_core_types::account_address::AccountAddress;
use serde_json::Value;

use move_e2e_types::encoding::json_u64_field;
use move_e2e_types::{EntryFunctionCall, ViewCall};

use super::function_id;
use crate::chain::Chain;
use crate::harness::{Harness, HarnessError};

pub const MODULE: &str = "drops";

/// Arguments of `create_sale`, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleSpec {
    pub name: String,
    pub description: String,
    pub start_time: u64,
    pub end_time: u64,
    pub count: u64,
    pub template_id: u64,
    pub price: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct Drops {
    address: AccountAddress,
}

impl Drops {
    pub fn new(address: AccountAddress) -> Self {
        Self { address }
    }

    fn call(&self, name: &str) -> Result<EntryFunctionCall, HarnessError> {
        Ok(EntryFunctionCall::new(function_id(self.address, MODULE, name)?))
    }

    pub fn create_sale(&self, spec: &SaleSpec) -> Result<EntryFunctionCall, HarnessError> {
        Ok(self
            .call("create_sale")?
            .arg(spec.name.as_str())
            .arg(spec.description.as_str())
            .arg(spec.start_time)
            .arg(spec.end_time)
            .arg(spec.count)
            .arg(spec.template_id)
            .arg(spec.price))
    }

    pub fn update_sale_name(&self, sale_id: u64, name: &str) -> Result<EntryFunctionCall, HarnessError> {
        Ok(self.call("update_sale_name")?.arg(sale_id).arg(name))
    }

    pub fn buy(&self, sale_id: u64) -> Result<EntryFunctionCall, HarnessError> {
        Ok(self.call("buy")?.arg(sale_id))
    }

    pub fn buy_multiple(&self, sale_id: u64, count: u64) -> Result<EntryFunctionCall, HarnessError> {
        Ok(self.call("buy_multiple")?.arg(sale_id).arg(count))
    }

    pub fn delete_sale(&self, sale_id: u64) -> Result<EntryFunctionCall, HarnessError> {
        Ok(self.call("delete_sale")?.arg(sale_id))
    }

    /// All live sales, in creation order.
    pub fn get_sales<C: Chain>(&self, harness: &Harness<C>) -> Result<Vec<Value>, HarnessError> {
        harness.view_first(&ViewCall::new(function_id(self.address, MODULE, "get_sales")?))
    }
}

pub fn sale_id(sale: &Value) -> Result<u64, HarnessError> {
    json_u64_field(sale, "id").ok_or_else(|| HarnessError::Decode(format!("sale without id: {}", sale)))
}
