//! move-e2e: end-to-end checks for deployed Move modules on Aptos
//!
//! ## Example Usage
//!
//! ```bash
//! # List suites and their steps
//! move-e2e list
//!
//! # Check the node and the configured identities
//! move-e2e doctor
//!
//! # Run every suite, or a subset
//! move-e2e run
//! move-e2e run drops staking --fail-fast --json
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod e2e_cli;

use e2e_cli::{doctor::DoctorCmd, list::ListCmd, run::RunCmd, GlobalOpts};

#[derive(Parser)]
#[command(
    name = "move-e2e",
    author,
    version,
    about = "End-to-end tests for deployed Move modules",
    long_about = "Runs ordered scenarios against an Aptos node: each step submits a \
                  transaction or reads a view and asserts the result.\n\n\
                  Identities and addresses come from MOVE_E2E_* variables or a .env file."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Network to target: mainnet, testnet, devnet or local
    #[arg(long, global = true)]
    network: Option<String>,

    /// REST endpoint override (defaults to the network's fullnode)
    #[arg(long, global = true)]
    node_url: Option<String>,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List suites and their steps
    List(ListCmd),

    /// Run suites against the network
    Run(RunCmd),

    /// Validate the node endpoint and identities
    Doctor(DoctorCmd),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("move_e2e=debug,move_e2e_transport=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("move_e2e=info"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let Cli {
        command,
        network,
        node_url,
        json,
        verbose,
    } = Cli::parse();
    init_tracing(verbose);

    let opts = GlobalOpts {
        network,
        node_url,
        json,
    };
    let result = match command {
        Commands::List(cmd) => cmd.execute(&opts),
        Commands::Run(cmd) => cmd.execute(&opts),
        Commands::Doctor(cmd) => cmd.execute(&opts),
    };

    if let Err(err) = &result {
        eprint!("{}", e2e_cli::output::format_error(err, json));
        std::process::exit(1);
    }
    Ok(())
}
