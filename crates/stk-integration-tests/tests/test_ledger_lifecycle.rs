//! # Position Ledger Lifecycle
//!
//! End-to-end walks through deposit, lock, unlock and withdrawal across
//! epochs, driven by a simulated epoch clock.

use stk_core::{AccountId, EpochSource, SimulatedEpochClock};
use stk_ledger::{
    BalanceSnapshot, LedgerConfig, LedgerError, LedgerEvent, LedgerStore, PositionLedger,
    PositionState,
};

fn snapshot(locking: u64, locked: u64, unlocking: u64, withdrawable: u64) -> BalanceSnapshot {
    BalanceSnapshot {
        locking,
        locked,
        unlocking,
        withdrawable,
    }
}

#[test]
fn deposit_unlock_settle_sequence() {
    let clock = SimulatedEpochClock::default();
    let mut ledger = PositionLedger::default();

    ledger.deposit(100, clock.current_epoch()).unwrap();
    assert_eq!(ledger.summarize(clock.current_epoch()), snapshot(100, 0, 0, 0));

    // Still locking: nothing is eligible in the deposit epoch.
    assert_eq!(ledger.request_unlock(50, clock.current_epoch()), Ok(0));
    assert_eq!(ledger.summarize(clock.current_epoch()), snapshot(100, 0, 0, 0));

    clock.advance();
    assert_eq!(ledger.summarize(clock.current_epoch()), snapshot(0, 100, 0, 0));

    assert_eq!(ledger.request_unlock(50, clock.current_epoch()), Ok(50));
    assert_eq!(ledger.summarize(clock.current_epoch()), snapshot(0, 50, 50, 0));

    clock.advance();
    assert_eq!(ledger.summarize(clock.current_epoch()), snapshot(0, 50, 0, 50));
}

#[test]
fn older_position_unlocks_fully_before_newer_splits() {
    let clock = SimulatedEpochClock::default();
    let mut ledger = PositionLedger::default();

    let older = ledger.deposit(100, clock.current_epoch()).unwrap();
    clock.advance();
    let newer = ledger.deposit(100, clock.current_epoch()).unwrap();
    clock.advance();

    assert_eq!(ledger.request_unlock(150, clock.current_epoch()), Ok(150));
    let now = clock.current_epoch();

    assert_eq!(ledger.position_state(older, now), Ok(PositionState::Unlocking));
    assert_eq!(ledger.position(older).unwrap().amount(), 100);
    assert_eq!(ledger.position_state(newer, now), Ok(PositionState::Locked));
    assert_eq!(ledger.position(newer).unwrap().amount(), 50);

    let amounts: Vec<u64> = ledger.positions().iter().map(|p| p.amount()).collect();
    assert_eq!(amounts, vec![100, 50, 50]);
    assert_eq!(ledger.summarize(now), snapshot(0, 50, 150, 0));

    assert!(matches!(
        ledger.events().last(),
        Some(LedgerEvent::UnlockRequested { amount: 50, .. })
    ));
}

#[test]
fn withdraw_is_all_or_nothing() {
    let clock = SimulatedEpochClock::default();
    let mut ledger = PositionLedger::default();
    ledger.deposit(80, clock.current_epoch()).unwrap();
    clock.advance();
    ledger.request_unlock(30, clock.current_epoch()).unwrap();
    clock.advance();

    let before = ledger.clone();
    assert_eq!(
        ledger.withdraw(31, clock.current_epoch()),
        Err(LedgerError::InsufficientWithdrawable {
            requested: 31,
            available: 30,
        })
    );
    assert_eq!(ledger, before);

    ledger.withdraw(30, clock.current_epoch()).unwrap();
    assert_eq!(ledger.summarize(clock.current_epoch()), snapshot(0, 50, 0, 0));
    assert_eq!(ledger.len(), 1);
}

#[test]
fn second_unlock_does_not_touch_already_requested_positions() {
    let clock = SimulatedEpochClock::default();
    let mut ledger = PositionLedger::default();
    ledger.deposit(40, clock.current_epoch()).unwrap();
    ledger.deposit(40, clock.current_epoch()).unwrap();
    clock.advance();

    assert_eq!(ledger.request_unlock(40, clock.current_epoch()), Ok(40));
    assert_eq!(ledger.request_unlock(100, clock.current_epoch()), Ok(40));
    assert_eq!(ledger.request_unlock(1, clock.current_epoch()), Ok(0));
    assert_eq!(ledger.summarize(clock.current_epoch()), snapshot(0, 0, 80, 0));
}

#[test]
fn store_runs_the_same_lifecycle_per_account() {
    let clock = SimulatedEpochClock::default();
    let store = LedgerStore::new(LedgerConfig::default());
    let alice = AccountId::new("alice").unwrap();
    let bob = AccountId::new("bob").unwrap();

    store.deposit(&alice, 100, clock.current_epoch()).unwrap();
    store.deposit(&bob, 100, clock.current_epoch()).unwrap();
    clock.advance();
    store.request_unlock(&alice, 100, clock.current_epoch()).unwrap();
    clock.advance();

    store.withdraw(&alice, 100, clock.current_epoch()).unwrap();
    assert_eq!(
        store.withdraw(&bob, 1, clock.current_epoch()),
        Err(LedgerError::InsufficientWithdrawable {
            requested: 1,
            available: 0,
        })
    );
    assert_eq!(store.summarize(&alice, clock.current_epoch()).total(), 0);
    assert_eq!(store.summarize(&bob, clock.current_epoch()), snapshot(0, 100, 0, 0));
}

#[test]
fn persisted_ledger_resumes_handles_and_history() {
    let clock = SimulatedEpochClock::default();
    let mut ledger = PositionLedger::default();
    ledger.deposit(10, clock.current_epoch()).unwrap();
    clock.advance();
    ledger.request_unlock(5, clock.current_epoch()).unwrap();

    let json = serde_json::to_string(&ledger).unwrap();
    let mut restored: PositionLedger = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, ledger);

    let handle = restored.deposit(1, clock.current_epoch()).unwrap();
    assert_eq!(handle.get(), 3);
    assert_eq!(restored.events().len(), ledger.events().len() + 1);
}
