//! # Configuration Loading
//!
//! Reads [`LedgerConfig`] from a YAML file given with `--config`. Without a
//! file the defaults apply: a one-epoch settlement delay and no position cap.
//!
//! ```yaml
//! unlocking_duration: 1
//! max_positions: 64
//! ```
//!
//! The configuration applies to ledgers created by this invocation. A ledger
//! loaded from the state directory keeps the configuration it was created
//! with.

use std::path::Path;

use anyhow::{Context, Result};

use stk_ledger::LedgerConfig;

/// Load and validate the ledger configuration.
pub fn load_config(path: Option<&Path>) -> Result<LedgerConfig> {
    let config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_yaml::from_str::<LedgerConfig>(&content)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => LedgerConfig::default(),
    };
    config.validate().context("invalid ledger configuration")?;
    tracing::debug!(?config, "ledger configuration loaded");
    Ok(config)
}
