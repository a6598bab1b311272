//! Environment checks run by `move-e2e doctor`.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use move_e2e_transport::{LocalAccount, RestClient};

use crate::config::{HarnessConfig, SecretKey, COIN_KEY_VAR, DEV_KEY_VAR, UNAUTHORIZED_KEY_VAR};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoctorStatus {
    Pass,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorCheck {
    pub id: String,
    pub name: String,
    pub status: DoctorStatus,
    pub passed: bool,
    pub detail: String,
    pub remediation: Option<String>,
    pub duration_ms: u128,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorReport {
    pub ok: bool,
    pub passed: usize,
    pub failed: usize,
    pub network: String,
    pub node_url: String,
    pub checks: Vec<DoctorCheck>,
}

fn pass_check(id: &str, name: &str, detail: String, start: Instant) -> DoctorCheck {
    DoctorCheck {
        id: id.to_string(),
        name: name.to_string(),
        status: DoctorStatus::Pass,
        passed: true,
        detail,
        remediation: None,
        duration_ms: start.elapsed().as_millis(),
    }
}

fn fail_check(id: &str, name: &str, detail: String, remediation: &str, start: Instant) -> DoctorCheck {
    DoctorCheck {
        id: id.to_string(),
        name: name.to_string(),
        status: DoctorStatus::Fail,
        passed: false,
        detail,
        remediation: Some(remediation.to_string()),
        duration_ms: start.elapsed().as_millis(),
    }
}

fn identity_checks(
    client: &RestClient,
    node_ok: bool,
    var: &str,
    key: Option<&SecretKey>,
    required: bool,
) -> Vec<DoctorCheck> {
    let id = var.to_lowercase();
    let start = Instant::now();
    let Some(key) = key else {
        return if required {
            vec![fail_check(&id, var, "not set".into(), &format!("export {}=0x<private key>", var), start)]
        } else {
            vec![pass_check(&id, var, "not set (optional)".into(), start)]
        };
    };
    let account: LocalAccount = match key.account(var) {
        Ok(a) => a,
        Err(e) => {
            return vec![fail_check(
                &id,
                var,
                format!("{:#}", e),
                "use a 32-byte hex Ed25519 private key",
                start,
            )]
        }
    };
    let address = account.address().to_hex_literal();
    let mut checks = vec![pass_check(&id, var, address.clone(), start)];

    if node_ok {
        let start = Instant::now();
        let exists_id = format!("{}_account", id);
        let name = format!("{} account", var);
        checks.push(match client.account_exists(&account.address()) {
            Ok(true) => pass_check(&exists_id, &name, format!("{} exists on chain", address), start),
            Ok(false) => fail_check(
                &exists_id,
                &name,
                format!("{} is not on chain", address),
                "fund the account from the faucet",
                start,
            ),
            Err(e) => fail_check(&exists_id, &name, e.to_string(), "check node connectivity", start),
        });
    }
    checks
}

pub fn run_doctor(config: &HarnessConfig) -> DoctorReport {
    let client = config.rest_client();
    let mut checks = Vec::new();

    let start = Instant::now();
    let ledger = client.ledger_info();
    let node_ok = ledger.is_ok();
    match ledger {
        Ok(info) => {
            checks.push(pass_check(
                "node",
                "Node reachable",
                format!("ledger version {}", info.ledger_version),
                start,
            ));
            let start = Instant::now();
            checks.push(match config.network.expected_chain_id() {
                Some(expected) if expected != info.chain_id => fail_check(
                    "chain_id",
                    "Chain id",
                    format!("node reports {}, {} is {}", info.chain_id, config.network, expected),
                    "set MOVE_E2E_NETWORK or MOVE_E2E_NODE_URL consistently",
                    start,
                ),
                _ => pass_check("chain_id", "Chain id", info.chain_id.to_string(), start),
            });
        }
        Err(e) => checks.push(fail_check(
            "node",
            "Node reachable",
            e.to_string(),
            "check MOVE_E2E_NODE_URL and network access",
            start,
        )),
    }

    checks.extend(identity_checks(&client, node_ok, DEV_KEY_VAR, config.dev_key.as_ref(), true));
    checks.extend(identity_checks(
        &client,
        node_ok,
        UNAUTHORIZED_KEY_VAR,
        config.unauthorized_key.as_ref(),
        true,
    ));
    checks.extend(identity_checks(&client, node_ok, COIN_KEY_VAR, config.coin_key.as_ref(), false));

    let passed = checks.iter().filter(|c| c.passed).count();
    let failed = checks.len() - passed;
    DoctorReport {
        ok: failed == 0,
        passed,
        failed,
        network: config.network.to_string(),
        node_url: config.node_url.clone(),
        checks,
    }
}
