//! The end-to-end suites, one per deployed module.
//!
//! Each suite is a [`Scenario`] over its own context type. The context owns
//! the [`Fixtures`] plus whatever earlier steps capture for later ones, so
//! steps are plain functions with no shared global state.
//!
//! [`Scenario`]: crate::scenario::Scenario

use std::fmt;
use std::str::FromStr;

use crate::chain::Chain;
use crate::fixtures::Fixtures;
use crate::harness::Harness;
use crate::scenario::ScenarioReport;

pub mod coin;
pub mod drops;
pub mod mint;
pub mod staking;
pub mod templates;
pub mod unpacking;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suite {
    Templates,
    Mint,
    Staking,
    Unpacking,
    Drops,
    Coin,
}

impl Suite {
    /// Every suite, in the order they run.
    pub const ALL: [Suite; 6] = [
        Suite::Templates,
        Suite::Mint,
        Suite::Staking,
        Suite::Unpacking,
        Suite::Drops,
        Suite::Coin,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Suite::Templates => "templates",
            Suite::Mint => "mint",
            Suite::Staking => "staking",
            Suite::Unpacking => "unpacking",
            Suite::Drops => "drops",
            Suite::Coin => "coin",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Suite::Templates => "add_template access control and get_template contents",
            Suite::Mint => "mint_template, minted token data, access control, unknown template",
            Suite::Staking => "stake/unstake round trip and token ownership",
            Suite::Unpacking => "unpack a card pack, template kinds, claim",
            Suite::Drops => "sale lifecycle: create, rename, buy, oversell, delete",
            Suite::Coin => "sdm mint/burn access control, register, transfer",
        }
    }

    /// Step names in execution order.
    pub fn step_names(&self) -> Vec<&'static str> {
        match self {
            Suite::Templates => templates::STEPS.to_vec(),
            Suite::Mint => mint::STEPS.to_vec(),
            Suite::Staking => staking::STEPS.to_vec(),
            Suite::Unpacking => unpacking::STEPS.to_vec(),
            Suite::Drops => drops::STEPS.to_vec(),
            Suite::Coin => coin::STEPS.to_vec(),
        }
    }

    pub fn run<C: Chain>(&self, harness: &Harness<C>, fixtures: &Fixtures) -> ScenarioReport {
        match self {
            Suite::Templates => {
                templates::scenario().run(harness, templates::TemplatesCtx::new(fixtures))
            }
            Suite::Mint => mint::scenario().run(harness, mint::MintCtx::new(fixtures)),
            Suite::Staking => staking::scenario().run(harness, staking::StakingCtx::new(fixtures)),
            Suite::Unpacking => {
                unpacking::scenario().run(harness, unpacking::UnpackingCtx::new(fixtures))
            }
            Suite::Drops => drops::scenario().run(harness, drops::DropsCtx::new(fixtures)),
            Suite::Coin => {
                let scenario = coin::scenario();
                match fixtures.coin_owner() {
                    Some(owner) => scenario.run(harness, coin::CoinCtx::new(fixtures, owner.clone())),
                    None => scenario.report_skipped(coin::NO_COIN_OWNER),
                }
            }
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Suite {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let wanted = s.trim().to_lowercase();
        let wanted = match wanted.as_str() {
            "minter" => "mint",
            "sdm" => "coin",
            other => other,
        };
        Suite::ALL
            .iter()
            .copied()
            .find(|suite| suite.name() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Suite::ALL.iter().map(|s| s.name()).collect();
                anyhow::anyhow!("unknown suite '{}' (known: {})", s, known.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suite_names_round_trip() {
        for suite in Suite::ALL {
            assert_eq!(suite.name().parse::<Suite>().unwrap(), suite);
        }
        assert_eq!("minter".parse::<Suite>().unwrap(), Suite::Mint);
        assert_eq!("SDM".parse::<Suite>().unwrap(), Suite::Coin);
        assert!("bridge".parse::<Suite>().is_err());
    }

    #[test]
    fn test_step_names_are_unique_per_suite() {
        for suite in Suite::ALL {
            let names = suite.step_names();
            let mut dedup = names.clone();
            dedup.sort();
            dedup.dedup();
            assert_eq!(dedup.len(), names.len(), "{}", suite);
        }
    }
}
