//! # stk-cli: Command-Line Harness for the Staking Ledger
//!
//! Provides the `stk` binary. The ledger crates never advance time or touch
//! files; this crate does both. It keeps a simulated epoch and one JSON
//! ledger per account in a state directory, and exposes each ledger
//! operation as a subcommand.
//!
//! ## Subcommands
//!
//! - `stk epoch show|advance|set`: the simulated epoch clock.
//! - `stk deposit`, `stk unlock`, `stk withdraw`: ledger mutations.
//! - `stk summary`, `stk positions`, `stk history`, `stk accounts`: read-only
//!   views.
//! - `stk scenario <file>`: replay a YAML script in memory.
//!
//! ```bash
//! stk deposit --account alice --amount 100
//! stk epoch advance
//! stk unlock --account alice --amount 40
//! stk epoch advance
//! stk withdraw --account alice --amount 40
//! stk summary --account alice
//! ```

pub mod account;
pub mod config;
pub mod epoch;
pub mod scenario;
pub mod state;
