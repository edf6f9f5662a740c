//! # Ledger Store Concurrency
//!
//! Many threads driving one store. Mutations on an account are serialized,
//! so totals come out exact.

use std::thread;

use stk_core::{AccountId, Epoch};
use stk_ledger::{LedgerConfig, LedgerStore};

#[test]
fn concurrent_deposits_on_one_account_are_all_recorded() {
    let store = LedgerStore::new(LedgerConfig::default());
    let account = AccountId::new("shared").unwrap();

    thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..100 {
                    store.deposit(&account, 1, Epoch::new(0)).unwrap();
                }
            });
        }
    });

    let ledger = store.snapshot_ledger(&account).unwrap();
    assert_eq!(ledger.len(), 800);
    assert_eq!(ledger.total(), 800);
    let mut handles: Vec<u64> = ledger.positions().iter().map(|p| p.handle().get()).collect();
    handles.sort_unstable();
    handles.dedup();
    assert_eq!(handles.len(), 800);
}

#[test]
fn concurrent_unlocks_never_over_unlock() {
    let store = LedgerStore::default();
    let account = AccountId::new("contended").unwrap();
    for _ in 0..10 {
        store.deposit(&account, 100, Epoch::new(0)).unwrap();
    }

    let (store_ref, account_ref) = (&store, &account);
    let unlocked: u64 = thread::scope(|s| {
        let workers: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(move || {
                    store_ref
                        .request_unlock(account_ref, 175, Epoch::new(1))
                        .unwrap()
                })
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).sum()
    });

    assert_eq!(unlocked, 1_000);
    let summary = store.summarize(&account, Epoch::new(1));
    assert_eq!(summary.unlocking, 1_000);
    assert_eq!(summary.total(), 1_000);
}

#[test]
fn readers_see_consistent_snapshots_during_writes() {
    let store = LedgerStore::default();
    let account = AccountId::new("observed").unwrap();

    thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..500 {
                store.deposit(&account, 2, Epoch::new(0)).unwrap();
            }
        });
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..500 {
                    let total = store.summarize(&account, Epoch::new(0)).total();
                    assert_eq!(total % 2, 0);
                    assert!(total <= 1_000);
                }
            });
        }
    });

    assert_eq!(store.summarize(&account, Epoch::new(1)).locked, 1_000);
}

#[test]
fn accounts_progress_independently() {
    let store = LedgerStore::default();
    let accounts: Vec<AccountId> = (0..16)
        .map(|i| AccountId::new(format!("acct-{i}")).unwrap())
        .collect();

    thread::scope(|s| {
        for account in &accounts {
            let store = store.clone();
            s.spawn(move || {
                store.deposit(account, 50, Epoch::new(0)).unwrap();
                store.request_unlock(account, 20, Epoch::new(1)).unwrap();
                store.withdraw(account, 20, Epoch::new(2)).unwrap();
            });
        }
    });

    assert_eq!(store.accounts().len(), 16);
    for account in &accounts {
        let summary = store.summarize(account, Epoch::new(2));
        assert_eq!(summary.locked, 30);
        assert_eq!(summary.total(), 30);
    }
}
