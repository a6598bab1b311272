//! Deterministic identities for offline tests.
//!
//! The dev identity owns the contract account and the coin owner owns the
//! coin account, mirroring a correctly configured deployment.

use move_core_types::account_address::AccountAddress;

use move_e2e::{Fixtures, Harness, Identities};
use move_e2e_transport::LocalAccount;

use super::mock::MockChain;

pub const DEV_KEY: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";
pub const UNAUTHORIZED_KEY: &str =
    "0x2222222222222222222222222222222222222222222222222222222222222222";
pub const COIN_OWNER_KEY: &str =
    "0x3333333333333333333333333333333333333333333333333333333333333333";

pub fn account(key: &str) -> LocalAccount {
    LocalAccount::from_private_key_hex(key).expect("valid test key")
}

pub fn collection_creator() -> AccountAddress {
    AccountAddress::from_hex_literal("0xc0ffee").expect("valid address")
}

pub fn test_fixtures() -> Fixtures {
    let dev = account(DEV_KEY);
    let coin_owner = account(COIN_OWNER_KEY);
    let contract_address = dev.address();
    let coin_address = coin_owner.address();
    Fixtures {
        identities: Identities {
            dev,
            unauthorized: account(UNAUTHORIZED_KEY),
            coin_owner: Some(coin_owner),
        },
        contract_address,
        coin_address,
        coin_type: format!("{}::sdm::SDM", coin_address.to_hex_literal()),
        collection_creator: collection_creator(),
    }
}

/// Fixtures plus a harness over a freshly seeded mock chain.
#[allow(dead_code)]
pub fn mock_harness() -> (Fixtures, Harness<MockChain>) {
    let fx = test_fixtures();
    let harness = Harness::new(MockChain::new(&fx));
    (fx, harness)
}
