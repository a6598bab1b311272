//! Network-dependent test utilities.
//!
//! Tests that talk to a real Aptos node are `#[ignore]`d, and additionally
//! skip themselves unless `RUN_NETWORK_TESTS` is set. Suite tests also need
//! both identity keys.

use move_e2e::config::{DEV_KEY_VAR, UNAUTHORIZED_KEY_VAR};
use move_e2e_types::env_utils::env_nonempty;

/// Environment variable to enable network tests.
pub const RUN_NETWORK_TESTS_VAR: &str = "RUN_NETWORK_TESTS";

/// Network tests run when `RUN_NETWORK_TESTS` is set to any non-blank value.
pub fn should_run_network_tests() -> bool {
    env_nonempty(RUN_NETWORK_TESTS_VAR).is_some()
}

/// Both identity keys are present in the environment (or `.env`).
pub fn identities_configured() -> bool {
    let _ = dotenv::dotenv();
    [DEV_KEY_VAR, UNAUTHORIZED_KEY_VAR]
        .iter()
        .all(|var| env_nonempty(var).is_some())
}

/// Macro to skip a test if network tests are not enabled.
#[macro_export]
macro_rules! skip_if_no_network {
    () => {
        if !$crate::common::network::should_run_network_tests() {
            eprintln!(
                "Skipping {}: {} not set",
                module_path!(),
                $crate::common::network::RUN_NETWORK_TESTS_VAR
            );
            return;
        }
    };
}

/// Macro to skip a test unless network tests are enabled and both
/// identity keys are configured.
#[macro_export]
macro_rules! skip_if_no_identities {
    () => {
        $crate::skip_if_no_network!();
        if !$crate::common::network::identities_configured() {
            eprintln!(
                "Skipping {}: {} and {} must be set",
                module_path!(),
                move_e2e::config::DEV_KEY_VAR,
                move_e2e::config::UNAUTHORIZED_KEY_VAR
            );
            return;
        }
    };
}
