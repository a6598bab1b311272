use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use move_e2e::config::{DEV_KEY_VAR, UNAUTHORIZED_KEY_VAR};
use move_e2e::{Harness, RunReport, Suite};

use super::GlobalOpts;

#[derive(Parser, Debug)]
#[command(about = "Run suites against the network")]
pub struct RunCmd {
    /// Suites to run, in order (default: all)
    suites: Vec<String>,

    /// Stop after the first suite with a failing step
    #[arg(long)]
    fail_fast: bool,
}

impl RunCmd {
    fn selected(&self) -> Result<Vec<Suite>> {
        if self.suites.is_empty() {
            return Ok(Suite::ALL.to_vec());
        }
        let mut wanted = Vec::new();
        for raw in &self.suites {
            let suite: Suite = raw.parse()?;
            if !wanted.contains(&suite) {
                wanted.push(suite);
            }
        }
        // Suites share on-chain state; always run in declaration order.
        wanted.sort_by_key(|s| Suite::ALL.iter().position(|x| x == s));
        Ok(wanted)
    }

    pub fn execute(&self, opts: &GlobalOpts) -> Result<()> {
        let suites = self.selected()?;
        let config = opts.config()?;
        if !config.has_identities() {
            bail!(
                "{} and {} must be set to run suites (see `move-e2e doctor`)",
                DEV_KEY_VAR,
                UNAUTHORIZED_KEY_VAR
            );
        }
        let fixtures = config.fixtures().context("load fixtures")?;
        let harness = Harness::new(config.rest_client()).with_step_timeout(config.step_timeout);

        let mut report = RunReport::new(config.network.as_str(), &config.node_url);
        for suite in suites {
            info!(suite = %suite, "running suite");
            let result = suite.run(&harness, &fixtures);
            let failed = !result.ok();
            report.push(result);
            if failed && self.fail_fast {
                warn!(suite = %suite, "stopping after failing suite");
                break;
            }
        }

        if opts.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("serialize run report")?
            );
        } else {
            print!("{}", report.render_text());
        }

        if report.ok {
            Ok(())
        } else {
            Err(anyhow!("{} step(s) failed", report.failed))
        }
    }
}
