use std::fmt;
use std::str::FromStr;

const MAINNET_REST: &str = "https://fullnode.mainnet.aptoslabs.com/v1";
const TESTNET_REST: &str = "https://fullnode.testnet.aptoslabs.com/v1";
const DEVNET_REST: &str = "https://fullnode.devnet.aptoslabs.com/v1";
const LOCAL_REST: &str = "http://127.0.0.1:8080/v1";

/// Environment variable overriding the REST endpoint for any network.
pub const NODE_URL_VAR: &str = "MOVE_E2E_NODE_URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
    Local,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Local => "local",
        }
    }

    pub fn default_rest_endpoint(&self) -> &'static str {
        match self {
            Network::Mainnet => MAINNET_REST,
            Network::Testnet => TESTNET_REST,
            Network::Devnet => DEVNET_REST,
            Network::Local => LOCAL_REST,
        }
    }

    /// Chain id the node should report. Devnet is reset regularly and has no fixed id.
    pub fn expected_chain_id(&self) -> Option<u8> {
        match self {
            Network::Mainnet => Some(1),
            Network::Testnet => Some(2),
            Network::Local => Some(4),
            Network::Devnet => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "local" | "localnet" | "localhost" => Ok(Network::Local),
            other => anyhow::bail!(
                "unknown network '{}' (expected mainnet, testnet, devnet or local)",
                other
            ),
        }
    }
}

pub fn infer_network_from_url(url: &str) -> Option<Network> {
    let lower = url.to_lowercase();
    if lower.contains("testnet") {
        Some(Network::Testnet)
    } else if lower.contains("devnet") {
        Some(Network::Devnet)
    } else if lower.contains("mainnet") {
        Some(Network::Mainnet)
    } else if lower.contains("127.0.0.1") || lower.contains("localhost") {
        Some(Network::Local)
    } else {
        None
    }
}

/// The network `url` points at, when it can be told and is not `network`.
pub fn endpoint_network_mismatch(network: Network, url: &str) -> Option<Network> {
    infer_network_from_url(url).filter(|inferred| *inferred != network)
}

/// Pick the REST endpoint: explicit override, then `MOVE_E2E_NODE_URL`, then
/// the network default. Trailing slashes are dropped.
pub fn resolve_rest_endpoint(network: Network, override_url: Option<&str>) -> String {
    let chosen = override_url
        .map(str::to_string)
        .filter(|u| !u.trim().is_empty())
        .or_else(|| move_e2e_types::env_utils::env_nonempty(NODE_URL_VAR))
        .unwrap_or_else(|| network.default_rest_endpoint().to_string());
    chosen.trim().trim_end_matches('/').to_string()
}
