//! # Scenario Runner
//!
//! Replays a YAML script of ledger operations against an in-memory
//! [`LedgerStore`] driven by a [`SimulatedEpochClock`]. Nothing is read from
//! or written to the state directory.
//!
//! ```yaml
//! name: partial unlock
//! config:
//!   unlocking_duration: 1
//! steps:
//!   - action: deposit
//!     account: alice
//!     amount: 100
//!   - action: advance
//!   - action: unlock
//!     account: alice
//!     amount: 30
//!     expect_unlocked: 30
//!   - action: expect
//!     account: alice
//!     locked: 70
//!     unlocking: 30
//! ```
//!
//! After every step the runner checks token conservation for each account:
//! deposits minus withdrawals must equal the summarized total. A failing
//! step aborts the run with its index and action.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Deserialize;

use stk_core::{AccountId, Epoch, EpochSource, SimulatedEpochClock};
use stk_ledger::{BalanceSnapshot, LedgerConfig, LedgerError, LedgerStore};

/// A scripted sequence of ledger operations.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Human-readable name, echoed in the report.
    pub name: String,
    /// Ledger configuration. Falls back to the CLI configuration if absent.
    #[serde(default)]
    pub config: Option<LedgerConfig>,
    /// Epoch the simulated clock starts at.
    #[serde(default)]
    pub start_epoch: Epoch,
    /// The operations to run, in order.
    pub steps: Vec<Step>,
}

/// One scripted operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Deposit into `account` at the current epoch.
    Deposit {
        account: String,
        amount: u64,
        #[serde(default)]
        expect_error: Option<String>,
    },
    /// Request an unlock for `account` at the current epoch.
    Unlock {
        account: String,
        amount: u64,
        #[serde(default)]
        expect_unlocked: Option<u64>,
        #[serde(default)]
        expect_error: Option<String>,
    },
    /// Withdraw from `account` at the current epoch.
    Withdraw {
        account: String,
        amount: u64,
        #[serde(default)]
        expect_error: Option<String>,
    },
    /// Advance the clock.
    Advance {
        #[serde(default = "one")]
        epochs: u64,
    },
    /// Assert `account`'s balance snapshot at the current epoch.
    Expect {
        account: String,
        #[serde(default)]
        locking: u64,
        #[serde(default)]
        locked: u64,
        #[serde(default)]
        unlocking: u64,
        #[serde(default)]
        withdrawable: u64,
    },
}

fn one() -> u64 {
    1
}

impl Step {
    /// The step's `action` tag.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Deposit { .. } => "deposit",
            Self::Unlock { .. } => "unlock",
            Self::Withdraw { .. } => "withdraw",
            Self::Advance { .. } => "advance",
            Self::Expect { .. } => "expect",
        }
    }
}

/// Outcome of a successful scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    /// Scenario name.
    pub name: String,
    /// Number of steps executed.
    pub steps: usize,
    /// Clock value after the last step.
    pub final_epoch: Epoch,
    /// Final snapshot of every account touched, sorted by account.
    pub balances: Vec<(AccountId, BalanceSnapshot)>,
}

/// Lifetime token flows of one account. Repeated deposit and withdrawal
/// cycles can move more than `u64::MAX` in total.
#[derive(Debug, Default, Clone, Copy)]
struct Flows {
    deposited: u128,
    withdrawn: u128,
}

/// Parse a scenario file.
pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse scenario {}", path.display()))
}

/// Run `scenario`, using `fallback_config` when it carries no config of its
/// own.
pub fn run_scenario(scenario: &Scenario, fallback_config: LedgerConfig) -> Result<ScenarioReport> {
    let config = scenario.config.unwrap_or(fallback_config);
    config.validate().context("invalid scenario configuration")?;

    let store = LedgerStore::new(config);
    let clock = SimulatedEpochClock::new(scenario.start_epoch);
    let mut flows: BTreeMap<AccountId, Flows> = BTreeMap::new();

    for (index, step) in scenario.steps.iter().enumerate() {
        let epoch = clock.current_epoch();
        tracing::debug!(index, action = step.action(), %epoch, "scenario step");
        run_step(&store, &clock, &mut flows, step)
            .with_context(|| format!("step {index} ({}) at epoch {epoch}", step.action()))?;
        check_conservation(&store, &flows, clock.current_epoch())
            .with_context(|| format!("after step {index} ({})", step.action()))?;
    }

    let final_epoch = clock.current_epoch();
    let balances = store
        .accounts()
        .into_iter()
        .map(|account| {
            let snapshot = store.summarize(&account, final_epoch);
            (account, snapshot)
        })
        .collect();

    Ok(ScenarioReport {
        name: scenario.name.clone(),
        steps: scenario.steps.len(),
        final_epoch,
        balances,
    })
}

fn run_step(
    store: &LedgerStore,
    clock: &SimulatedEpochClock,
    flows: &mut BTreeMap<AccountId, Flows>,
    step: &Step,
) -> Result<()> {
    let epoch = clock.current_epoch();
    match step {
        Step::Deposit {
            account,
            amount,
            expect_error,
        } => {
            let account = AccountId::new(account.as_str())?;
            let result = store.deposit(&account, *amount, epoch);
            if check_outcome(&result, expect_error.as_deref())? {
                flows.entry(account).or_default().deposited += u128::from(*amount);
            }
        }
        Step::Unlock {
            account,
            amount,
            expect_unlocked,
            expect_error,
        } => {
            let account = AccountId::new(account.as_str())?;
            let result = store.request_unlock(&account, *amount, epoch);
            if check_outcome(&result, expect_error.as_deref())? {
                if let (Ok(unlocked), Some(expected)) = (&result, expect_unlocked) {
                    if unlocked != expected {
                        bail!("expected {expected} unlocked, got {unlocked}");
                    }
                }
            }
        }
        Step::Withdraw {
            account,
            amount,
            expect_error,
        } => {
            let account = AccountId::new(account.as_str())?;
            let result = store.withdraw(&account, *amount, epoch);
            if check_outcome(&result, expect_error.as_deref())? {
                flows.entry(account).or_default().withdrawn += u128::from(*amount);
            }
        }
        Step::Advance { epochs } => {
            clock.advance_by(*epochs);
        }
        Step::Expect {
            account,
            locking,
            locked,
            unlocking,
            withdrawable,
        } => {
            let account = AccountId::new(account.as_str())?;
            let expected = BalanceSnapshot {
                locking: *locking,
                locked: *locked,
                unlocking: *unlocking,
                withdrawable: *withdrawable,
            };
            let actual = store.summarize(&account, epoch);
            if actual != expected {
                bail!("{account}: expected {expected}, got {actual}");
            }
        }
    }
    Ok(())
}

/// Compare an operation result against the expected error kind. Returns
/// whether the operation succeeded.
fn check_outcome<T>(result: &Result<T, LedgerError>, expect_error: Option<&str>) -> Result<bool> {
    match (result, expect_error) {
        (Ok(_), None) => Ok(true),
        (Ok(_), Some(kind)) => bail!("expected {kind} error, but the operation succeeded"),
        (Err(e), None) => bail!("unexpected {} error: {e}", e.kind()),
        (Err(e), Some(kind)) if e.kind() == kind => Ok(false),
        (Err(e), Some(kind)) => bail!("expected {kind} error, got {}: {e}", e.kind()),
    }
}

fn check_conservation(
    store: &LedgerStore,
    flows: &BTreeMap<AccountId, Flows>,
    epoch: Epoch,
) -> Result<()> {
    for (account, flow) in flows {
        let total = store.summarize(account, epoch).total();
        let expected = flow.deposited.checked_sub(flow.withdrawn);
        if expected != Some(u128::from(total)) {
            bail!(
                "{account}: conservation violated (deposited {}, withdrawn {}, held {total})",
                flow.deposited,
                flow.withdrawn
            );
        }
    }
    Ok(())
}

/// Arguments for the `stk scenario` subcommand.
#[derive(Args, Debug)]
pub struct ScenarioArgs {
    /// Path to the scenario YAML file.
    pub file: PathBuf,
}

/// Execute `stk scenario`.
pub fn run_scenario_command(args: &ScenarioArgs, config: LedgerConfig) -> Result<u8> {
    let scenario = load_scenario(&args.file)?;
    let report = run_scenario(&scenario, config)
        .with_context(|| format!("scenario '{}' failed", scenario.name))?;

    for (account, snapshot) in &report.balances {
        println!("  {account}: {snapshot}");
    }
    println!(
        "OK: scenario '{}' passed ({} steps, final epoch {})",
        report.name, report.steps, report.final_epoch
    );
    Ok(0)
}
