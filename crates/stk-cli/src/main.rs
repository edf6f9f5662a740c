//! # stk CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stk_cli::account::{
    run_accounts, run_deposit, run_history, run_positions, run_summary, run_unlock, run_withdraw,
    AccountArgs, AmountArgs,
};
use stk_cli::config::load_config;
use stk_cli::epoch::{run_epoch, EpochArgs};
use stk_cli::scenario::{run_scenario_command, ScenarioArgs};
use stk_cli::state::StateDir;

/// Epoch-gated staking position ledger.
///
/// Deposits become positions that lock at the next epoch boundary. Unlock
/// requests consume the oldest locked positions first and settle after the
/// configured number of epochs.
#[derive(Parser, Debug)]
#[command(name = "stk", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML ledger configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the epoch clock and account ledgers.
    #[arg(long, global = true, default_value = ".stk")]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show or move the simulated epoch clock.
    Epoch(EpochArgs),

    /// Open a new position at the current epoch.
    Deposit(AmountArgs),

    /// Request an unlock, oldest locked positions first.
    Unlock(AmountArgs),

    /// Withdraw settled tokens (all or nothing).
    Withdraw(AmountArgs),

    /// Print an account's balance by category.
    Summary(AccountArgs),

    /// List an account's positions and their states.
    Positions(AccountArgs),

    /// Print an account's event log.
    History(AccountArgs),

    /// List stored accounts and their balances.
    Accounts,

    /// Replay a YAML scenario against an in-memory ledger.
    Scenario(ScenarioArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!(state_dir = %cli.state_dir.display(), "stk starting");

    let result = load_config(cli.config.as_deref()).and_then(|config| {
        let state = StateDir::new(&cli.state_dir);
        match &cli.command {
            Commands::Epoch(args) => run_epoch(args, &state),
            Commands::Deposit(args) => run_deposit(args, &state, config),
            Commands::Unlock(args) => run_unlock(args, &state, config),
            Commands::Withdraw(args) => run_withdraw(args, &state, config),
            Commands::Summary(args) => run_summary(args, &state, config),
            Commands::Positions(args) => run_positions(args, &state, config),
            Commands::History(args) => run_history(args, &state, config),
            Commands::Accounts => run_accounts(&state),
            Commands::Scenario(args) => run_scenario_command(args, config),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
