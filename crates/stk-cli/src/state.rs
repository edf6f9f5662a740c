//! # Local State Directory
//!
//! The CLI persists the simulated epoch and every account ledger as pretty
//! JSON under a state directory (default `.stk/`):
//!
//! ```text
//! .stk/
//! ├── epoch.json
//! └── accounts/
//!     ├── alice.json
//!     └── bob.json
//! ```
//!
//! The ledger itself knows nothing about files. This module is the account
//! storage collaborator: it loads ledgers into a [`LedgerStore`] and writes
//! them back after each mutation.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stk_core::{AccountId, Epoch};
use stk_ledger::{LedgerConfig, LedgerStore, PositionLedger};

/// Persisted epoch clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochRecord {
    /// Current simulated epoch.
    pub epoch: Epoch,
    /// When the epoch was last changed.
    pub updated_at: DateTime<Utc>,
}

/// Persisted account ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Owner of the ledger.
    pub account: AccountId,
    /// The ledger, including its event log.
    pub ledger: PositionLedger,
    /// When the ledger was last written.
    pub updated_at: DateTime<Utc>,
}

/// Handle on a state directory.
#[derive(Debug, Clone)]
pub struct StateDir {
    root: PathBuf,
}

impl StateDir {
    /// Use `root` as the state directory. Nothing is created until the first
    /// write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The state directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn epoch_file(&self) -> PathBuf {
        self.root.join("epoch.json")
    }

    fn accounts_dir(&self) -> PathBuf {
        self.root.join("accounts")
    }

    /// Path of the file holding `account`'s ledger.
    ///
    /// Account identifiers are opaque to the ledger, but only file-safe ones
    /// can be stored here.
    pub fn account_file(&self, account: &AccountId) -> Result<PathBuf> {
        let name = account.as_str();
        let file_safe = !name.starts_with('.')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !file_safe {
            bail!(
                "account ID {name:?} cannot be stored locally \
                 (use ASCII letters, digits, '-', '_' or '.', not starting with '.')"
            );
        }
        Ok(self.accounts_dir().join(format!("{name}.json")))
    }

    /// Read the current epoch. A missing epoch file means genesis.
    pub fn load_epoch(&self) -> Result<Epoch> {
        let path = self.epoch_file();
        if !path.exists() {
            return Ok(Epoch::GENESIS);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let record: EpochRecord = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(record.epoch)
    }

    /// Persist `epoch` as the current epoch.
    pub fn save_epoch(&self, epoch: Epoch) -> Result<()> {
        std::fs::create_dir_all(&self.root).context("failed to create state directory")?;
        let record = EpochRecord {
            epoch,
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&record)?;
        std::fs::write(self.epoch_file(), json).context("failed to write epoch file")?;
        Ok(())
    }

    /// Load `account`'s ledger, if one has been stored.
    pub fn load_account(&self, account: &AccountId) -> Result<Option<PositionLedger>> {
        let path = self.account_file(account)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let record: AccountRecord = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        if &record.account != account {
            bail!(
                "account file {} belongs to {}, not {account}",
                path.display(),
                record.account
            );
        }
        Ok(Some(record.ledger))
    }

    /// Build a store holding `account`'s persisted ledger, if any.
    pub fn load_store(&self, config: LedgerConfig, account: &AccountId) -> Result<LedgerStore> {
        let store = LedgerStore::new(config);
        if let Some(ledger) = self.load_account(account)? {
            store.restore(account.clone(), ledger);
        }
        Ok(store)
    }

    /// Write `account`'s ledger from `store` back to disk.
    pub fn save_account(&self, store: &LedgerStore, account: &AccountId) -> Result<()> {
        let Some(ledger) = store.snapshot_ledger(account) else {
            return Ok(());
        };
        let path = self.account_file(account)?;
        std::fs::create_dir_all(self.accounts_dir())
            .context("failed to create accounts directory")?;
        let record = AccountRecord {
            account: account.clone(),
            ledger,
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&record)?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Every account with a stored ledger, sorted by identifier.
    pub fn list_accounts(&self) -> Result<Vec<AccountId>> {
        let dir = self.accounts_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut accounts = Vec::new();
        for entry in std::fs::read_dir(&dir)?.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let parsed = std::fs::read_to_string(&path)
                .map_err(anyhow::Error::from)
                .and_then(|content| {
                    serde_json::from_str::<AccountRecord>(&content).map_err(anyhow::Error::from)
                });
            match parsed {
                Ok(record) => accounts.push(record.account),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable account file")
                }
            }
        }
        accounts.sort();
        Ok(accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(name: &str) -> AccountId {
        AccountId::new(name).unwrap()
    }

    #[test]
    fn missing_epoch_file_is_genesis() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateDir::new(dir.path().join("state"));
        assert_eq!(state.load_epoch().unwrap(), Epoch::GENESIS);
    }

    #[test]
    fn epoch_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateDir::new(dir.path());
        state.save_epoch(Epoch::new(12)).unwrap();
        assert_eq!(state.load_epoch().unwrap(), Epoch::new(12));
    }

    #[test]
    fn account_roundtrip_through_store() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateDir::new(dir.path());
        let alice = account("alice");

        let store = state.load_store(LedgerConfig::default(), &alice).unwrap();
        store.deposit(&alice, 100, Epoch::new(0)).unwrap();
        state.save_account(&store, &alice).unwrap();

        let reloaded = state.load_store(LedgerConfig::default(), &alice).unwrap();
        assert_eq!(reloaded.summarize(&alice, Epoch::new(1)).locked, 100);
        assert_eq!(state.list_accounts().unwrap(), vec![alice]);
    }

    #[test]
    fn unsafe_account_names_rejected() {
        let state = StateDir::new("/tmp/unused");
        assert!(state.account_file(&account("../escape")).is_err());
        assert!(state.account_file(&account(".hidden")).is_err());
        assert!(state.account_file(&account("a/b")).is_err());
        assert!(state.account_file(&account("wallet-01_main.v2")).is_ok());
    }

    #[test]
    fn mismatched_account_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateDir::new(dir.path());
        let alice = account("alice");
        let store = LedgerStore::default();
        store.deposit(&alice, 1, Epoch::new(0)).unwrap();
        state.save_account(&store, &alice).unwrap();

        let bob_path = state.account_file(&account("bob")).unwrap();
        std::fs::copy(state.account_file(&alice).unwrap(), &bob_path).unwrap();
        let err = state.load_account(&account("bob")).unwrap_err();
        assert!(err.to_string().contains("belongs to alice"));
    }

    #[test]
    fn list_accounts_skips_unreadable_entries() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateDir::new(dir.path());
        let alice = account("alice");
        let store = LedgerStore::default();
        store.deposit(&alice, 1, Epoch::new(0)).unwrap();
        state.save_account(&store, &alice).unwrap();

        let accounts_dir = dir.path().join("accounts");
        std::fs::write(accounts_dir.join("garbled.json"), "not json").unwrap();
        // A directory named like an account file cannot be read as one.
        std::fs::create_dir(accounts_dir.join("folder.json")).unwrap();

        assert_eq!(state.list_accounts().unwrap(), vec![alice]);
    }

    #[test]
    fn list_accounts_empty_without_directory() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateDir::new(dir.path().join("nothing"));
        assert!(state.list_accounts().unwrap().is_empty());
    }
}
