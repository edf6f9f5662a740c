//! # Epoch Subcommand
//!
//! Drives the file-backed simulated epoch clock. The ledger only ever reads
//! this value; advancing it is the harness's job.
//!
//! - `show`: Print the current epoch.
//! - `advance`: Move forward by one or more epochs.
//! - `set`: Jump to a later epoch. Moving backwards is refused.

use anyhow::Result;
use clap::{Args, Subcommand};

use stk_core::{Epoch, EpochSource, SimulatedEpochClock};

use crate::state::StateDir;

/// Arguments for the `stk epoch` subcommand.
#[derive(Args, Debug)]
pub struct EpochArgs {
    #[command(subcommand)]
    pub command: EpochCommand,
}

/// Epoch subcommands.
#[derive(Subcommand, Debug)]
pub enum EpochCommand {
    /// Print the current epoch.
    Show,

    /// Advance the clock.
    Advance {
        /// Number of epochs to advance by.
        #[arg(long, default_value_t = 1)]
        by: u64,
    },

    /// Jump to a specific epoch (must not be earlier than the current one).
    Set {
        /// Target epoch.
        epoch: u64,
    },
}

/// Execute the epoch subcommand.
pub fn run_epoch(args: &EpochArgs, state: &StateDir) -> Result<u8> {
    let clock = SimulatedEpochClock::new(state.load_epoch()?);

    match &args.command {
        EpochCommand::Show => {
            println!("epoch {}", clock.current_epoch());
            return Ok(0);
        }
        EpochCommand::Advance { by } => {
            clock.advance_by(*by);
        }
        EpochCommand::Set { epoch } => {
            clock.set(Epoch::new(*epoch))?;
        }
    }

    let epoch = clock.current_epoch();
    state.save_epoch(epoch)?;
    tracing::info!(%epoch, "epoch updated");
    println!("OK: epoch is now {epoch}");
    Ok(0)
}
