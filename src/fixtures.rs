//! Identities, addresses, and the constant inputs the suites use.

use move_core_types::account_address::AccountAddress;

use move_e2e_transport::LocalAccount;
use move_e2e_types::{ExpectedAbort, ModuleLocation};

use crate::contracts::drops::SaleSpec;
use crate::contracts::templates::TemplateSpec;
use crate::harness::{ACCESS_DENIED, TABLE_ENTRY_NOT_FOUND};

/// Template of a card pack; unpacking it yields five card tokens.
pub const CARD_PACK_TEMPLATE_ID: u64 = 355;
/// Template id the templates suite adds.
pub const TEST_TEMPLATE_ID: u64 = 1000;
/// Far outside the range of registered templates.
pub const UNKNOWN_TEMPLATE_ID: u64 = 100_000;

pub const COLLECTION_NAME: &str = "changelings";

pub const TOKENS_TO_STAKE: [&str; 2] = ["#212", "#213"];
/// `#0` is never owned by the dev identity.
pub const UNOWNED_TOKEN: &str = "#0";

/// Sale id no sale ever uses.
pub const UNKNOWN_SALE_ID: u64 = 0;

/// Number of tokens a pack unpacks into.
pub const TOKENS_PER_PACK: usize = 5;

pub const COIN_AMOUNT: u64 = 1000;

pub const INSUFFICIENT_BALANCE: &str = "EINSUFFICIENT_BALANCE";

/// `0x3::token` aborts with this when staking a token the sender lacks.
pub const TOKEN_WITHDRAW_INSUFFICIENT: u64 = 0x10005;
/// `0x3::token` aborts with this when unpacking a token the sender lacks.
pub const TOKEN_NOT_FOUND_INSUFFICIENT: u64 = 0x60005;

/// Sales abort with this for unknown ids and for buying past the supply.
pub const SALE_UNAVAILABLE: u64 = 0x2;

/// The two fixed identities plus the coin owner.
#[derive(Debug, Clone)]
pub struct Identities {
    /// Owns the contract account and may call every guarded entry function.
    pub dev: LocalAccount,
    /// Holds no rights on any module.
    pub unauthorized: LocalAccount,
    /// Owns the coin account. Only the coin suite needs it.
    pub coin_owner: Option<LocalAccount>,
}

#[derive(Debug, Clone)]
pub struct Fixtures {
    pub identities: Identities,
    pub contract_address: AccountAddress,
    pub coin_address: AccountAddress,
    pub coin_type: String,
    pub collection_creator: AccountAddress,
}

impl Fixtures {
    pub fn dev(&self) -> &LocalAccount {
        &self.identities.dev
    }

    pub fn unauthorized(&self) -> &LocalAccount {
        &self.identities.unauthorized
    }

    pub fn coin_owner(&self) -> Option<&LocalAccount> {
        self.identities.coin_owner.as_ref()
    }
}

pub fn test_template() -> TemplateSpec {
    TemplateSpec {
        template_id: TEST_TEMPLATE_ID,
        name: "New Test Template".to_string(),
        description: "New Test Description".to_string(),
        uri: "Some uri".to_string(),
        property_names: vec!["param1".into(), "param2".into(), "param3".into()],
        property_values: vec!["111".into(), "hello".into(), "some".into()],
    }
}

/// Four tokens of template 153 at price 1000, open from the start.
pub fn test_sale() -> SaleSpec {
    SaleSpec {
        name: "test".to_string(),
        description: "descr".to_string(),
        start_time: 0,
        end_time: 0,
        count: 4,
        template_id: 153,
        price: 1000,
    }
}

/// The guarded-entry abort of a contract module.
pub fn access_denied(address: AccountAddress, module: &str) -> ExpectedAbort {
    ExpectedAbort::in_module(address, module, ACCESS_DENIED)
}

/// `Move abort in 0x1::table: 0x6507`.
pub fn table_entry_missing() -> ExpectedAbort {
    ExpectedAbort::new(
        ModuleLocation::new(framework_address(1), "table"),
        TABLE_ENTRY_NOT_FOUND,
    )
}

/// `Move abort in 0x3::token: EINSUFFICIENT_BALANCE(<code>): …`.
pub fn insufficient_token_balance(code: u64) -> ExpectedAbort {
    ExpectedAbort::new(ModuleLocation::new(token_address(), "token"), code)
        .with_reason(INSUFFICIENT_BALANCE)
}

pub fn sale_unavailable(contract: AccountAddress) -> ExpectedAbort {
    ExpectedAbort::in_module(contract, "drops", SALE_UNAVAILABLE)
}

/// `0x3`, the legacy token framework.
pub fn token_address() -> AccountAddress {
    framework_address(3)
}

fn framework_address(last: u8) -> AccountAddress {
    let mut bytes = [0u8; AccountAddress::LENGTH];
    bytes[AccountAddress::LENGTH - 1] = last;
    AccountAddress::new(bytes)
}
