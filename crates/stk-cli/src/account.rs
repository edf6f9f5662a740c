//! # Account Subcommands
//!
//! One subcommand per ledger operation, each run against the account's
//! persisted ledger at the epoch stored in the state directory.
//!
//! - `deposit`: Open a new position.
//! - `unlock`: Request an unlock, oldest positions first.
//! - `withdraw`: Withdraw settled tokens.
//! - `summary`: Print the four-category balance.
//! - `positions`: List positions with their current state.
//! - `history`: Print the ledger's event log.
//! - `accounts`: List every stored account with its balance.

use anyhow::{Context, Result};
use clap::Args;

use stk_core::{AccountId, Epoch};
use stk_ledger::{LedgerConfig, LedgerEvent, LedgerStore};

use crate::state::StateDir;

/// Account selector shared by the read-only subcommands.
#[derive(Args, Debug)]
pub struct AccountArgs {
    /// Account identifier.
    #[arg(long)]
    pub account: String,
}

/// Arguments for subcommands that move tokens.
#[derive(Args, Debug)]
pub struct AmountArgs {
    /// Account identifier.
    #[arg(long)]
    pub account: String,

    /// Token amount.
    #[arg(long)]
    pub amount: u64,
}

fn open(
    state: &StateDir,
    config: LedgerConfig,
    account: &str,
) -> Result<(AccountId, LedgerStore, Epoch)> {
    let account = AccountId::new(account).context("invalid --account")?;
    let store = state.load_store(config, &account)?;
    let epoch = state.load_epoch()?;
    Ok((account, store, epoch))
}

/// Execute `stk deposit`.
pub fn run_deposit(args: &AmountArgs, state: &StateDir, config: LedgerConfig) -> Result<u8> {
    let (account, store, epoch) = open(state, config, &args.account)?;
    let handle = store.deposit(&account, args.amount, epoch)?;
    state.save_account(&store, &account)?;
    println!(
        "OK: deposited {} for {account} at epoch {epoch} as position {handle}",
        args.amount
    );
    Ok(0)
}

/// Execute `stk unlock`.
///
/// Prints both the requested and the unlocked amount; a shortfall is not an
/// error.
pub fn run_unlock(args: &AmountArgs, state: &StateDir, config: LedgerConfig) -> Result<u8> {
    let (account, store, epoch) = open(state, config, &args.account)?;
    let unlocked = store.request_unlock(&account, args.amount, epoch)?;
    state.save_account(&store, &account)?;
    println!(
        "OK: unlock for {account} at epoch {epoch}: requested {}, unlocked {unlocked}",
        args.amount
    );
    if unlocked < args.amount {
        println!(
            "  {} not unlocked (no eligible locked positions)",
            args.amount - unlocked
        );
    }
    Ok(0)
}

/// Execute `stk withdraw`.
pub fn run_withdraw(args: &AmountArgs, state: &StateDir, config: LedgerConfig) -> Result<u8> {
    let (account, store, epoch) = open(state, config, &args.account)?;
    store.withdraw(&account, args.amount, epoch)?;
    state.save_account(&store, &account)?;
    println!(
        "OK: withdrew {} for {account} at epoch {epoch}",
        args.amount
    );
    Ok(0)
}

/// Execute `stk summary`.
pub fn run_summary(args: &AccountArgs, state: &StateDir, config: LedgerConfig) -> Result<u8> {
    let (account, store, epoch) = open(state, config, &args.account)?;
    let snapshot = store.summarize(&account, epoch);
    println!("Account: {account} (epoch {epoch})");
    println!("  Locking:      {}", snapshot.locking);
    println!("  Locked:       {}", snapshot.locked);
    println!("  Unlocking:    {}", snapshot.unlocking);
    println!("  Withdrawable: {}", snapshot.withdrawable);
    println!("  Total:        {}", snapshot.total());
    Ok(0)
}

/// Execute `stk positions`.
pub fn run_positions(args: &AccountArgs, state: &StateDir, config: LedgerConfig) -> Result<u8> {
    let (account, store, epoch) = open(state, config, &args.account)?;
    let Some(ledger) = store.snapshot_ledger(&account) else {
        println!("No positions for {account}.");
        return Ok(0);
    };

    println!("Positions for {account} (epoch {epoch}):");
    let duration = ledger.config().unlocking_duration;
    for position in ledger.positions() {
        let requested = position
            .unlock_requested_epoch()
            .map(|e| format!(", unlock requested at {e}"))
            .unwrap_or_default();
        println!(
            "  {} {:>12} {:<12} created at {}{requested}",
            position.handle(),
            position.amount(),
            position.state(epoch, duration).as_str(),
            position.created_epoch(),
        );
    }
    Ok(0)
}

/// Execute `stk history`.
pub fn run_history(args: &AccountArgs, state: &StateDir, config: LedgerConfig) -> Result<u8> {
    let (account, store, _) = open(state, config, &args.account)?;
    let events = store
        .snapshot_ledger(&account)
        .map(|ledger| ledger.events().to_vec())
        .unwrap_or_default();
    if events.is_empty() {
        println!("No history for {account}.");
        return Ok(0);
    }

    println!("History for {account} ({} events):", events.len());
    for (i, event) in events.iter().enumerate() {
        let line = match event {
            LedgerEvent::Deposited {
                handle,
                amount,
                epoch,
            } => format!("epoch {epoch}: deposited {amount} as {handle}"),
            LedgerEvent::UnlockRequested {
                handle,
                amount,
                epoch,
            } => format!("epoch {epoch}: unlock requested for {handle} ({amount})"),
            LedgerEvent::Split {
                from,
                into,
                unlocked,
                remaining,
                epoch,
            } => format!(
                "epoch {epoch}: split {from} into {into} ({unlocked} unlocking, {remaining} kept)"
            ),
            LedgerEvent::Withdrawn { amount, epoch } => {
                format!("epoch {epoch}: withdrew {amount}")
            }
        };
        println!("  [{i}] {line}");
    }
    Ok(0)
}

/// Execute `stk accounts`.
pub fn run_accounts(state: &StateDir) -> Result<u8> {
    let accounts = state.list_accounts()?;
    if accounts.is_empty() {
        println!("No accounts in {}.", state.root().display());
        return Ok(0);
    }
    let epoch = state.load_epoch()?;
    println!("{} accounts (epoch {epoch}):", accounts.len());
    for account in &accounts {
        if let Some(ledger) = state.load_account(account)? {
            println!("  {account}: {}", ledger.summarize(epoch));
        }
    }
    Ok(0)
}
