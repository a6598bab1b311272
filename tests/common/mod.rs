#![allow(unused_imports)]
//! Shared test utilities for integration tests.
//!
//! # Modules
//!
//! - `assertions`: result and scenario-report assertions
//! - `fixtures`: deterministic identities and addresses
//! - `mock`: scripted in-memory `Chain` emulating the deployed modules
//! - `network`: gating for tests that talk to a real node

pub mod assertions;
pub mod fixtures;
pub mod mock;
pub mod network;

pub use assertions::{
    assert_all_passed, assert_err, assert_error_contains, assert_ok, assert_step_failed,
};
pub use fixtures::{mock_harness, test_fixtures};
pub use mock::MockChain;
