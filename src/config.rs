//! Harness configuration from the environment.
//!
//! Values come from `MOVE_E2E_*` variables, with a `.env` file in the working
//! directory loaded first when present. Keys are never logged.

use anyhow::{anyhow, Context, Result};
use move_core_types::account_address::AccountAddress;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

use move_e2e_transport::network::{endpoint_network_mismatch, resolve_rest_endpoint, NODE_URL_VAR};
use move_e2e_transport::{GasConfig, LocalAccount, Network, RestClient};
use move_e2e_types::address::parse_address;
use move_e2e_types::env_utils::{env_nonempty, env_var, env_var_or};
use move_e2e_types::WaitConfig;

use crate::fixtures::{Fixtures, Identities};

pub const NETWORK_VAR: &str = "MOVE_E2E_NETWORK";
pub const DEV_KEY_VAR: &str = "MOVE_E2E_DEV_KEY";
pub const UNAUTHORIZED_KEY_VAR: &str = "MOVE_E2E_UNAUTHORIZED_KEY";
pub const COIN_KEY_VAR: &str = "MOVE_E2E_COIN_KEY";
pub const CONTRACT_ADDRESS_VAR: &str = "MOVE_E2E_CONTRACT_ADDRESS";
pub const COIN_ADDRESS_VAR: &str = "MOVE_E2E_COIN_ADDRESS";
pub const COIN_TYPE_VAR: &str = "MOVE_E2E_COIN_TYPE";
pub const COLLECTION_CREATOR_VAR: &str = "MOVE_E2E_COLLECTION_CREATOR";

/// Account publishing `templates`, `minter`, `staking`, `unpacking` and `drops`.
pub const DEFAULT_CONTRACT_ADDRESS: &str =
    "0x2de6aea32fcb7ab2e33ab9a78df3b5f4ef5b718ef77475f96ed8a66f466afc28";
/// Account publishing the `sdm` coin module.
pub const DEFAULT_COIN_ADDRESS: &str =
    "0xa425c664477b9dafde9a85e6e24fc948538a4586dc7db9301fb9aba75a1abda1";
/// Creator of the `changelings` token collection.
pub const DEFAULT_COLLECTION_CREATOR: &str =
    "0x526b58b77d30bee6d9c7148cfba2cd5691cee3fe4e5e8b5c6db809679d42e83d";

/// A private key read from the environment. `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn account(&self, what: &str) -> Result<LocalAccount> {
        LocalAccount::from_private_key_hex(&self.0).with_context(|| format!("invalid {}", what))
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub network: Network,
    pub node_url: String,
    pub dev_key: Option<SecretKey>,
    pub unauthorized_key: Option<SecretKey>,
    pub coin_key: Option<SecretKey>,
    pub contract_address: AccountAddress,
    pub coin_address: AccountAddress,
    pub collection_creator: AccountAddress,
    /// Full coin type tag; defaults to `<coin_address>::sdm::SDM`.
    pub coin_type: String,
    pub wait: WaitConfig,
    pub step_timeout: Option<Duration>,
    pub gas: GasConfig,
}

fn address_var(key: &str, default: &str) -> Result<AccountAddress> {
    let raw = env_nonempty(key).unwrap_or_else(|| default.to_string());
    parse_address(&raw).ok_or_else(|| anyhow!("{} is not a valid address: {}", key, raw))
}

impl HarnessConfig {
    /// Load `.env` (if any), then read the configuration.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenv::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }
        Self::from_vars()
    }

    /// Read the configuration from the process environment only.
    pub fn from_vars() -> Result<Self> {
        let network: Network = match env_nonempty(NETWORK_VAR) {
            Some(raw) => raw.parse().with_context(|| format!("invalid {}", NETWORK_VAR))?,
            None => Network::Testnet,
        };
        let node_url = resolve_rest_endpoint(network, None);

        let contract_address = address_var(CONTRACT_ADDRESS_VAR, DEFAULT_CONTRACT_ADDRESS)?;
        let coin_address = address_var(COIN_ADDRESS_VAR, DEFAULT_COIN_ADDRESS)?;
        let collection_creator = address_var(COLLECTION_CREATOR_VAR, DEFAULT_COLLECTION_CREATOR)?;
        let coin_type = env_nonempty(COIN_TYPE_VAR)
            .unwrap_or_else(|| format!("{}::sdm::SDM", coin_address.to_hex_literal()));

        let wait = WaitConfig::new(
            env_var_or("MOVE_E2E_POLL_INTERVAL_MS", 500),
            env_var_or("MOVE_E2E_WAIT_TIMEOUT_SECS", 60),
        );
        let step_timeout_secs: u64 = env_var_or("MOVE_E2E_STEP_TIMEOUT_SECS", 0);
        let gas = GasConfig {
            max_gas_amount: env_var_or("MOVE_E2E_MAX_GAS", GasConfig::default().max_gas_amount),
            gas_unit_price: env_var("MOVE_E2E_GAS_PRICE"),
            ..GasConfig::default()
        };

        Ok(Self {
            network,
            node_url,
            dev_key: env_nonempty(DEV_KEY_VAR).map(SecretKey::new),
            unauthorized_key: env_nonempty(UNAUTHORIZED_KEY_VAR).map(SecretKey::new),
            coin_key: env_nonempty(COIN_KEY_VAR).map(SecretKey::new),
            contract_address,
            coin_address,
            collection_creator,
            coin_type,
            wait,
            step_timeout: (step_timeout_secs > 0).then(|| Duration::from_secs(step_timeout_secs)),
            gas,
        })
    }

    /// Switch network; the endpoint follows unless `node_url` is given.
    /// Switch networks. Without `node_url`, `MOVE_E2E_NODE_URL` still takes
    /// precedence over the network default; a URL that looks like another
    /// network is logged.
    pub fn with_network(mut self, network: Network, node_url: Option<&str>) -> Self {
        self.network = network;
        self.node_url = resolve_rest_endpoint(network, node_url);
        if let Some(inferred) = endpoint_network_mismatch(network, &self.node_url) {
            warn!(
                network = %network,
                endpoint = %self.node_url,
                endpoint_network = %inferred,
                "endpoint looks like {}; set --node-url or unset {}",
                inferred,
                NODE_URL_VAR
            );
        }
        self
    }

    pub fn with_node_url(mut self, node_url: &str) -> Self {
        self.node_url = resolve_rest_endpoint(self.network, Some(node_url));
        self
    }

    pub fn rest_client(&self) -> RestClient {
        RestClient::new(&self.node_url)
            .with_gas(self.gas)
            .with_wait(self.wait)
    }

    /// Identities are required to run any suite.
    pub fn has_identities(&self) -> bool {
        self.dev_key.is_some() && self.unauthorized_key.is_some()
    }

    pub fn identities(&self) -> Result<Identities> {
        let dev = self
            .dev_key
            .as_ref()
            .ok_or_else(|| anyhow!("{} is not set", DEV_KEY_VAR))?
            .account(DEV_KEY_VAR)?;
        let unauthorized = self
            .unauthorized_key
            .as_ref()
            .ok_or_else(|| anyhow!("{} is not set", UNAUTHORIZED_KEY_VAR))?
            .account(UNAUTHORIZED_KEY_VAR)?;
        let coin_owner = self
            .coin_key
            .as_ref()
            .map(|k| k.account(COIN_KEY_VAR))
            .transpose()?;

        if dev.address() != self.contract_address {
            warn!(
                dev = %dev.address().to_hex_literal(),
                contract = %self.contract_address.to_hex_literal(),
                "dev identity does not own the contract account; authorized calls will abort"
            );
        }
        if let Some(owner) = &coin_owner {
            if owner.address() != self.coin_address {
                warn!(
                    owner = %owner.address().to_hex_literal(),
                    coin = %self.coin_address.to_hex_literal(),
                    "coin identity does not own the coin account"
                );
            }
        }
        Ok(Identities {
            dev,
            unauthorized,
            coin_owner,
        })
    }

    pub fn fixtures(&self) -> Result<Fixtures> {
        Ok(Fixtures {
            identities: self.identities()?,
            contract_address: self.contract_address,
            coin_address: self.coin_address,
            coin_type: self.coin_type.clone(),
            collection_creator: self.collection_creator,
        })
    }
}
