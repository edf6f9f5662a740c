//! # Ledger Configuration
//!
//! Tunables shared by every ledger created through a [`LedgerStore`].
//! Defaults reproduce the one-epoch settlement delay with no cap on the
//! number of positions per account.
//!
//! [`LedgerStore`]: crate::store::LedgerStore

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of epochs an unlock request takes to settle.
pub const DEFAULT_UNLOCKING_DURATION: u64 = 1;

/// Configuration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The settlement delay must be at least one epoch.
    #[error("unlocking_duration must be at least 1 epoch")]
    ZeroUnlockingDuration,

    /// A position cap of zero would reject every deposit.
    #[error("max_positions must be at least 1 when set")]
    ZeroMaxPositions,
}

/// Ledger tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    /// Epochs between an unlock request and the tokens becoming withdrawable.
    pub unlocking_duration: u64,
    /// Maximum number of live positions per account, if capped.
    pub max_positions: Option<usize>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            unlocking_duration: DEFAULT_UNLOCKING_DURATION,
            max_positions: None,
        }
    }
}

impl LedgerConfig {
    /// Check the configuration for values the ledger cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unlocking_duration == 0 {
            return Err(ConfigError::ZeroUnlockingDuration);
        }
        if self.max_positions == Some(0) {
            return Err(ConfigError::ZeroMaxPositions);
        }
        Ok(())
    }
}
