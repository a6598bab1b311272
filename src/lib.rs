//! Move E2E
//!
//! End-to-end checks for Move modules deployed on an Aptos network:
//!
//! - **Harness**: submit an entry function call, wait for it to commit, and
//!   assert success or one specific abort ([`harness`])
//! - **Scenarios**: ordered steps over a typed context ([`scenario`])
//! - **Contract clients**: call builders and view decoders per module ([`contracts`])
//! - **Suites**: one scenario per module ([`suites`])
//!
//! The node is reached through the [`chain::Chain`] trait, implemented for
//! the REST client in `move-e2e-transport`.

#![allow(clippy::result_large_err)]

pub mod chain;
pub mod config;
pub mod contracts;
pub mod doctor;
pub mod fixtures;
pub mod harness;
pub mod report;
pub mod scenario;
pub mod suites;

pub use chain::Chain;
pub use config::HarnessConfig;
pub use fixtures::{Fixtures, Identities};
pub use harness::{check, check_eq, require, AbortKind, Harness, HarnessError};
pub use report::RunReport;
pub use scenario::{Scenario, ScenarioReport, StepReport, StepStatus};
pub use suites::Suite;
