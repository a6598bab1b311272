//! Blocking client for the node's REST API (`/v1`).
//!
//! ## Endpoints used
//!
//! | Call | Endpoint |
//! |---|---|
//! | [`RestClient::ledger_info`] | `GET /` |
//! | [`RestClient::sequence_number`] | `GET /accounts/{addr}` |
//! | [`RestClient::estimate_gas_price`] | `GET /estimate_gas_price` |
//! | [`RestClient::submit`] | `POST /transactions/encode_submission`, `POST /transactions` |
//! | [`RestClient::transaction_by_hash`] | `GET /transactions/by_hash/{hash}` |
//! | [`RestClient::view`] | `POST /view` |
//! | [`RestClient::account_resource`] | `GET /accounts/{addr}/resource/{type}` |
//! | [`RestClient::table_item`] | `POST /tables/{handle}/item` |
//!
//! Submission never serializes a raw transaction locally: the node encodes
//! the signing message for the JSON request, we sign those bytes, and post
//! the same JSON back with the signature attached.
//!
//! ## Usage
//!
//! ```ignore
//! let client = RestClient::for_network(Network::Testnet);
//! let outcome = client.submit_and_wait(&account, &call)?;
//! ```

use move_core_types::account_address::AccountAddress;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use move_e2e_types::address::address_to_string;
use move_e2e_types::encoding::{hex_literal, json_u64, json_u64_field, parse_hex_bytes};
use move_e2e_types::env_utils::env_var_or;
use move_e2e_types::transaction::is_pending;
use move_e2e_types::{EntryFunctionCall, TableItemRequest, TransactionOutcome, ViewCall, WaitConfig};

use crate::account::LocalAccount;
use crate::error::TransportError;
use crate::network::Network;

pub type Result<T> = std::result::Result<T, TransportError>;

/// `error_code` the node uses for a missing table key.
pub const TABLE_ITEM_NOT_FOUND: &str = "table_item_not_found";

/// Gas and expiry settings applied to every submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasConfig {
    pub max_gas_amount: u64,
    /// Fixed price per gas unit. `None` asks the node for an estimate per submission.
    pub gas_unit_price: Option<u64>,
    /// Seconds from now until the transaction expires.
    pub expiration_secs: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            max_gas_amount: 200_000,
            gas_unit_price: None,
            expiration_secs: 60,
        }
    }
}

/// Subset of the ledger info returned by `GET /`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerInfo {
    pub chain_id: u8,
    pub ledger_version: u64,
    pub ledger_timestamp_usecs: u64,
}

#[derive(Clone)]
pub struct RestClient {
    base_url: String,
    agent: ureq::Agent,
    gas: GasConfig,
    wait: WaitConfig,
}

impl RestClient {
    /// Default request timeout in seconds (can be overridden by env).
    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Default connect timeout in seconds (can be overridden by env).
    const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

    fn default_timeouts() -> (Duration, Duration) {
        let timeout_secs = env_var_or("MOVE_E2E_HTTP_TIMEOUT_SECS", Self::DEFAULT_TIMEOUT_SECS);
        let connect_secs = env_var_or(
            "MOVE_E2E_CONNECT_TIMEOUT_SECS",
            Self::DEFAULT_CONNECT_TIMEOUT_SECS,
        );
        (
            Duration::from_secs(timeout_secs),
            Duration::from_secs(connect_secs),
        )
    }

    fn build_agent(timeout: Duration, connect_timeout: Duration) -> ureq::Agent {
        ureq::AgentBuilder::new()
            .timeout(timeout)
            .timeout_connect(connect_timeout)
            .build()
    }

    /// Create a client for a network's public fullnode.
    pub fn for_network(network: Network) -> Self {
        Self::new(network.default_rest_endpoint())
    }

    /// Create a client with a custom endpoint (e.g. `https://…/v1`).
    pub fn new(base_url: &str) -> Self {
        let (timeout, connect_timeout) = Self::default_timeouts();
        Self::with_timeouts(base_url, timeout, connect_timeout)
    }

    /// Create a client with explicit HTTP timeouts.
    pub fn with_timeouts(base_url: &str, timeout: Duration, connect_timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: Self::build_agent(timeout, connect_timeout),
            gas: GasConfig::default(),
            wait: WaitConfig::default(),
        }
    }

    pub fn with_gas(mut self, gas: GasConfig) -> Self {
        self.gas = gas;
        self
    }

    pub fn with_wait(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn wait_config(&self) -> WaitConfig {
        self.wait
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn read(url: &str, outcome: std::result::Result<ureq::Response, ureq::Error>) -> Result<Value> {
        match outcome {
            Ok(response) => response
                .into_json::<Value>()
                .map_err(|e| TransportError::decode(url, e)),
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                Err(TransportError::api(status, &body))
            }
            Err(ureq::Error::Transport(t)) => Err(TransportError::Request {
                url: url.to_string(),
                message: t.to_string(),
            }),
        }
    }

    fn get_json(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        debug!(%url, "GET");
        Self::read(&url, self.agent.get(&url).set("Accept", "application/json").call())
    }

    fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.url(path);
        debug!(%url, "POST");
        Self::read(
            &url,
            self.agent
                .post(&url)
                .set("Accept", "application/json")
                .send_json(body),
        )
    }

    /// Treat HTTP 404 as "absent" and everything else as an error.
    fn optional(result: Result<Value>) -> Result<Option<Value>> {
        match result {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn ledger_info(&self) -> Result<LedgerInfo> {
        let info = self.get_json("")?;
        let chain_id = info
            .get("chain_id")
            .and_then(json_u64)
            .and_then(|id| u8::try_from(id).ok())
            .ok_or_else(|| TransportError::decode("ledger info", "missing chain_id"))?;
        Ok(LedgerInfo {
            chain_id,
            ledger_version: json_u64_field(&info, "ledger_version").unwrap_or(0),
            ledger_timestamp_usecs: json_u64_field(&info, "ledger_timestamp").unwrap_or(0),
        })
    }

    pub fn sequence_number(&self, address: &AccountAddress) -> Result<u64> {
        let path = format!("accounts/{}", address_to_string(address));
        let account = self.get_json(&path)?;
        json_u64_field(&account, "sequence_number")
            .ok_or_else(|| TransportError::decode(path, "missing sequence_number"))
    }

    /// `Ok(false)` when the node has never seen the account.
    pub fn account_exists(&self, address: &AccountAddress) -> Result<bool> {
        let path = format!("accounts/{}", address_to_string(address));
        Ok(Self::optional(self.get_json(&path))?.is_some())
    }

    pub fn estimate_gas_price(&self) -> Result<u64> {
        let estimate = self.get_json("estimate_gas_price")?;
        json_u64_field(&estimate, "gas_estimate")
            .ok_or_else(|| TransportError::decode("estimate_gas_price", "missing gas_estimate"))
    }

    /// The `data` of a resource, or `None` when the account does not hold it.
    pub fn account_resource(
        &self,
        address: &AccountAddress,
        resource_type: &str,
    ) -> Result<Option<Value>> {
        let path = format!(
            "accounts/{}/resource/{}",
            address_to_string(address),
            resource_type
        );
        Ok(Self::optional(self.get_json(&path))?
            .map(|resource| resource.get("data").cloned().unwrap_or(Value::Null)))
    }

    /// A table value, or `None` when the node answers `table_item_not_found`.
    ///
    /// Any other 404 (unknown handle, pruned ledger) is an error.
    pub fn table_item(&self, handle: &str, request: &TableItemRequest) -> Result<Option<Value>> {
        let body = serde_json::to_value(request)
            .map_err(|e| TransportError::decode("table item request", e))?;
        match self.post_json(&format!("tables/{}/item", handle), &body) {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.error_code() == Some(TABLE_ITEM_NOT_FOUND) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn view(&self, call: &ViewCall) -> Result<Vec<Value>> {
        let values = self.post_json("view", &call.request_json())?;
        match values {
            Value::Array(items) => Ok(items),
            other => Err(TransportError::decode(
                format!("view {}", call.function),
                format!("expected a JSON array, got {}", other),
            )),
        }
    }

    /// Raw transaction JSON (pending or committed), `None` if the node does not know it yet.
    pub fn transaction_by_hash(&self, hash: &str) -> Result<Option<Value>> {
        Self::optional(self.get_json(&format!("transactions/by_hash/{}", hash)))
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Sign and submit an entry function call. Returns the transaction hash.
    pub fn submit(&self, account: &LocalAccount, call: &EntryFunctionCall) -> Result<String> {
        let sender = account.address();
        let sequence_number = self.sequence_number(&sender)?;
        let gas_unit_price = match self.gas.gas_unit_price {
            Some(price) => price,
            None => self.estimate_gas_price()?,
        };
        let expiration = (chrono::Utc::now().timestamp().max(0) as u64) + self.gas.expiration_secs;

        let mut request = json!({
            "sender": address_to_string(&sender),
            "sequence_number": sequence_number.to_string(),
            "max_gas_amount": self.gas.max_gas_amount.to_string(),
            "gas_unit_price": gas_unit_price.to_string(),
            "expiration_timestamp_secs": expiration.to_string(),
            "payload": call.payload_json(),
        });

        let encoded = self.post_json("transactions/encode_submission", &request)?;
        let message_hex = encoded.as_str().ok_or_else(|| {
            TransportError::decode("encode_submission", "expected a hex string")
        })?;
        let message = parse_hex_bytes(message_hex, "signing message")
            .map_err(|e| TransportError::Signing(e.to_string()))?;
        let signature = account.sign(&message);

        request["signature"] = json!({
            "type": "ed25519_signature",
            "public_key": account.public_key_hex(),
            "signature": hex_literal(&signature),
        });

        let pending = self.post_json("transactions", &request)?;
        let hash = pending
            .get("hash")
            .and_then(|h| h.as_str())
            .ok_or_else(|| TransportError::decode("submit transaction", "missing hash"))?
            .to_string();

        info!(
            function = %call.function,
            sender = %sender.to_hex_literal(),
            sequence_number,
            %hash,
            "submitted transaction"
        );
        Ok(hash)
    }

    /// Poll by hash until the transaction is committed.
    ///
    /// Bounded by the configured [`WaitConfig`]; an unbounded config blocks
    /// until the node answers.
    pub fn wait_for_transaction(&self, hash: &str) -> Result<TransactionOutcome> {
        let started = Instant::now();
        loop {
            if let Some(tx) = self.transaction_by_hash(hash)? {
                if !is_pending(&tx) {
                    let outcome = TransactionOutcome::from_json(&tx).ok_or_else(|| {
                        TransportError::decode(
                            format!("transaction {}", hash),
                            "committed transaction without success/vm_status",
                        )
                    })?;
                    info!(
                        %hash,
                        success = outcome.success,
                        vm_status = %outcome.vm_status,
                        "transaction committed"
                    );
                    return Ok(outcome);
                }
            }

            if let Some(limit) = self.wait.timeout {
                if started.elapsed() >= limit {
                    return Err(TransportError::WaitTimeout {
                        hash: hash.to_string(),
                        waited_ms: started.elapsed().as_millis(),
                    });
                }
            }
            debug!(%hash, "transaction pending");
            std::thread::sleep(self.wait.poll_interval);
        }
    }

    pub fn submit_and_wait(
        &self,
        account: &LocalAccount,
        call: &EntryFunctionCall,
    ) -> Result<TransactionOutcome> {
        let hash = self.submit(account, call)?;
        self.wait_for_transaction(&hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let testnet = RestClient::for_network(Network::Testnet);
        assert!(testnet.base_url().contains("testnet"));

        let custom = RestClient::new("https://node.example/v1/");
        assert_eq!(custom.base_url(), "https://node.example/v1");
    }

    #[test]
    fn test_url_joining() {
        let client = RestClient::new("https://node.example/v1");
        assert_eq!(client.url(""), "https://node.example/v1");
        assert_eq!(client.url("/view"), "https://node.example/v1/view");
        assert_eq!(
            client.url("transactions/by_hash/0xabc"),
            "https://node.example/v1/transactions/by_hash/0xabc"
        );
    }

    #[test]
    fn test_builders_keep_settings() {
        let wait = WaitConfig::new(50, 5);
        let gas = GasConfig {
            max_gas_amount: 10_000,
            gas_unit_price: Some(100),
            expiration_secs: 30,
        };
        let client = RestClient::new("http://127.0.0.1:8080/v1")
            .with_wait(wait)
            .with_gas(gas);
        assert_eq!(client.wait_config(), wait);
        assert_eq!(client.gas, gas);
    }

    #[test]
    fn test_optional_maps_404_to_none() {
        let missing = RestClient::optional(Err(TransportError::api(404, "{}")));
        assert_eq!(missing, Ok(None));
        let broken = RestClient::optional(Err(TransportError::api(500, "{}")));
        assert!(broken.is_err());
    }

    /// Run with: cargo test -p move-e2e-transport -- --ignored
    #[test]
    #[ignore = "requires network access to Aptos testnet"]
    fn test_testnet_ledger_info() {
        let client = RestClient::for_network(Network::Testnet);
        let info = client.ledger_info().expect("ledger info should load");
        assert_eq!(info.chain_id, 2);
        assert!(info.ledger_version > 0);
    }
}
