//! `minter` module: mints tokens from templates.

use move_core_types::account_address::AccountAddress;

use move_e2e_types::{ChainEvent, EntryFunctionCall};

use super::function_id;
use crate::harness::HarnessError;

pub const MODULE: &str = "minter";

#[derive(Debug, Clone, Copy)]
pub struct Minter {
    address: AccountAddress,
}

impl Minter {
    pub fn new(address: AccountAddress) -> Self {
        Self { address }
    }

    pub fn mint_template(
        &self,
        to: AccountAddress,
        template_id: u64,
    ) -> Result<EntryFunctionCall, HarnessError> {
        Ok(
            EntryFunctionCall::new(function_id(self.address, MODULE, "mint_template")?)
                .arg(to)
                .arg(template_id),
        )
    }
}

/// Name of the freshly minted token: the first event carrying `data.name`.
pub fn minted_token_name(events: &[ChainEvent]) -> Result<String, HarnessError> {
    events
        .iter()
        .find_map(|e| e.data_str("name"))
        .map(str::to_string)
        .ok_or_else(|| HarnessError::Decode("mint emitted no event with a token name".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(type_tag: &str, data: serde_json::Value) -> ChainEvent {
        ChainEvent {
            type_tag: type_tag.into(),
            sequence_number: None,
            data,
        }
    }

    #[test]
    fn test_minted_token_name() {
        let events = vec![
            event("0x3::token::MintTokenEvent", json!({"amount": "1"})),
            event("0x3::token::DepositEvent", json!({"name": "#981"})),
        ];
        assert_eq!(minted_token_name(&events).unwrap(), "#981");
        assert!(minted_token_name(&[]).is_err());
    }

    #[test]
    fn test_mint_payload() {
        let addr = AccountAddress::from_hex_literal("0xcafe").unwrap();
        let call = Minter::new(addr).mint_template(addr, 355).unwrap();
        assert_eq!(
            call.payload_json()["arguments"],
            json!(["0xcafe", "355"])
        );
    }
}
