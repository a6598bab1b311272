use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use move_e2e::Suite;

use super::GlobalOpts;

#[derive(Parser, Debug)]
#[command(about = "List suites and their steps")]
pub struct ListCmd {
    /// Only print suite names
    #[arg(long)]
    names_only: bool,
}

#[derive(Serialize)]
struct SuiteListing {
    name: &'static str,
    description: &'static str,
    steps: Vec<&'static str>,
}

impl ListCmd {
    pub fn execute(&self, opts: &GlobalOpts) -> Result<()> {
        let listings: Vec<SuiteListing> = Suite::ALL
            .iter()
            .map(|suite| SuiteListing {
                name: suite.name(),
                description: suite.description(),
                steps: suite.step_names(),
            })
            .collect();

        if opts.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&listings).context("serialize suite list")?
            );
            return Ok(());
        }
        for listing in &listings {
            if self.names_only {
                println!("{}", listing.name);
                continue;
            }
            println!("{}: {}", listing.name, listing.description);
            for (i, step) in listing.steps.iter().enumerate() {
                println!("  {:>2}. {}", i + 1, step);
            }
        }
        Ok(())
    }
}
