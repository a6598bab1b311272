pub mod doctor;
pub mod list;
pub mod output;
pub mod run;

use anyhow::Result;
use move_e2e::HarnessConfig;

/// Flags shared by every subcommand.
pub struct GlobalOpts {
    pub network: Option<String>,
    pub node_url: Option<String>,
    pub json: bool,
}

impl GlobalOpts {
    /// Environment configuration with `--network` / `--node-url` applied.
    pub fn config(&self) -> Result<HarnessConfig> {
        let mut config = HarnessConfig::from_env()?;
        if let Some(network) = &self.network {
            config = config.with_network(network.parse()?, self.node_url.as_deref());
        } else if let Some(url) = &self.node_url {
            config = config.with_node_url(url);
        }
        Ok(config)
    }
}
