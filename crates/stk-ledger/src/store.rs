//! # Ledger Store
//!
//! Thread-safe collection of position ledgers keyed by [`AccountId`].
//!
//! ## Concurrency
//!
//! Each account's ledger sits behind its own `parking_lot::RwLock`. A
//! mutation holds that account's write lock for the whole
//! validate-plan-apply sequence, so an unlock scan and its split can never
//! interleave with a deposit on the same account, and a reader sees either
//! the state before a mutation or the state after it.
//!
//! The outer map lock is held only long enough to find or insert an
//! account's entry, so operations on different accounts proceed in
//! parallel. Locks are never held across I/O; `parking_lot` locks are not
//! poisoned by a panicking writer.
//!
//! ## Logging
//!
//! Each ledger call runs inside a `ledger` span carrying the `account`
//! field, so the ledger's own `debug!` events are attributed to an account.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use stk_core::{AccountId, Epoch};

use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::ledger::PositionLedger;
use crate::position::{PositionHandle, PositionState};
use crate::summary::BalanceSnapshot;

type SharedLedger = Arc<RwLock<PositionLedger>>;

/// Position ledgers for many accounts. Cloning shares the same storage.
#[derive(Debug, Clone, Default)]
pub struct LedgerStore {
    config: LedgerConfig,
    ledgers: Arc<RwLock<HashMap<AccountId, SharedLedger>>>,
}

impl LedgerStore {
    /// Create an empty store whose new ledgers use `config`.
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            ledgers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The configuration applied to newly created ledgers.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Open a position for `account`, creating its ledger on first use.
    pub fn deposit(
        &self,
        account: &AccountId,
        amount: u64,
        current_epoch: Epoch,
    ) -> Result<PositionHandle, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount {
                operation: "deposit",
            });
        }
        let _span = tracing::debug_span!("ledger", %account).entered();
        let ledger = self.ledger_or_create(account);
        let handle = ledger.write().deposit(amount, current_epoch)?;
        tracing::info!(%account, %handle, amount, epoch = %current_epoch, "deposit");
        Ok(handle)
    }

    /// Mark up to `amount` of `account`'s tokens for unlocking.
    ///
    /// An unknown account has nothing eligible, so the result is `Ok(0)`.
    pub fn request_unlock(
        &self,
        account: &AccountId,
        amount: u64,
        current_epoch: Epoch,
    ) -> Result<u64, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount {
                operation: "request_unlock",
            });
        }
        let Some(ledger) = self.ledger(account) else {
            return Ok(0);
        };
        let _span = tracing::debug_span!("ledger", %account).entered();
        let unlocked = ledger.write().request_unlock(amount, current_epoch)?;
        tracing::info!(
            %account,
            requested = amount,
            unlocked,
            epoch = %current_epoch,
            "unlock request"
        );
        Ok(unlocked)
    }

    /// Withdraw `amount` settled tokens from `account`, all or nothing.
    pub fn withdraw(
        &self,
        account: &AccountId,
        amount: u64,
        current_epoch: Epoch,
    ) -> Result<(), LedgerError> {
        if amount == 0 {
            return Ok(());
        }
        let Some(ledger) = self.ledger(account) else {
            return Err(LedgerError::InsufficientWithdrawable {
                requested: amount,
                available: 0,
            });
        };
        let _span = tracing::debug_span!("ledger", %account).entered();
        ledger.write().withdraw(amount, current_epoch)?;
        tracing::info!(%account, amount, epoch = %current_epoch, "withdraw");
        Ok(())
    }

    /// Balance snapshot of `account` at `current_epoch`. Unknown accounts
    /// report all zeros.
    pub fn summarize(&self, account: &AccountId, current_epoch: Epoch) -> BalanceSnapshot {
        match self.ledger(account) {
            Some(ledger) => {
                let snapshot = ledger.read().summarize(current_epoch);
                snapshot
            }
            None => BalanceSnapshot::default(),
        }
    }

    /// State of one of `account`'s positions at `current_epoch`.
    pub fn position_state(
        &self,
        account: &AccountId,
        handle: PositionHandle,
        current_epoch: Epoch,
    ) -> Result<PositionState, LedgerError> {
        let ledger = self
            .ledger(account)
            .ok_or(LedgerError::PositionNotFound(handle))?;
        let state = ledger.read().position_state(handle, current_epoch);
        state
    }

    /// A consistent copy of `account`'s ledger, for persistence.
    pub fn snapshot_ledger(&self, account: &AccountId) -> Option<PositionLedger> {
        let ledger = self.ledger(account)?;
        let copy = ledger.read().clone();
        Some(copy)
    }

    /// Install a previously persisted ledger for `account`, returning the
    /// ledger it replaced.
    pub fn restore(&self, account: AccountId, ledger: PositionLedger) -> Option<PositionLedger> {
        let previous = self
            .ledgers
            .write()
            .insert(account, Arc::new(RwLock::new(ledger)))?;
        let replaced = previous.read().clone();
        Some(replaced)
    }

    /// All accounts with a ledger, sorted.
    pub fn accounts(&self) -> Vec<AccountId> {
        let mut accounts: Vec<AccountId> = self.ledgers.read().keys().cloned().collect();
        accounts.sort();
        accounts
    }

    fn ledger(&self, account: &AccountId) -> Option<SharedLedger> {
        self.ledgers.read().get(account).cloned()
    }

    fn ledger_or_create(&self, account: &AccountId) -> SharedLedger {
        if let Some(ledger) = self.ledger(account) {
            return ledger;
        }
        let config = self.config;
        Arc::clone(
            self.ledgers
                .write()
                .entry(account.clone())
                .or_insert_with(|| Arc::new(RwLock::new(PositionLedger::new(config)))),
        )
    }
}
