use anyhow::{anyhow, Context, Result};
use clap::Parser;

use move_e2e::doctor::{run_doctor, DoctorReport};

use super::GlobalOpts;

#[derive(Parser, Debug)]
#[command(about = "Validate the node endpoint and identities")]
pub struct DoctorCmd {}

fn print_report(report: &DoctorReport) {
    println!("move-e2e doctor");
    println!("  network: {}", report.network);
    println!("  node:    {}", report.node_url);
    println!();

    for check in &report.checks {
        let status = if check.passed { "PASS" } else { "FAIL" };
        println!("[{}] {}: {}", status, check.name, check.detail);
        if let Some(remediation) = &check.remediation {
            println!("      fix: {}", remediation);
        }
    }

    println!();
    println!("Summary: {} passed, {} failed", report.passed, report.failed);
}

impl DoctorCmd {
    pub fn execute(&self, opts: &GlobalOpts) -> Result<()> {
        let report = run_doctor(&opts.config()?);

        if opts.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("serialize doctor report")?
            );
        } else {
            print_report(&report);
        }

        if report.ok {
            Ok(())
        } else {
            Err(anyhow!("doctor found {} failing checks", report.failed))
        }
    }
}
