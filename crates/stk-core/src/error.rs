//! # Validation Errors
//!
//! Failures when constructing or moving core primitives. Ledger-specific
//! failures live in `stk-ledger`.

use thiserror::Error;

use crate::epoch::Epoch;

/// Validation errors for domain primitive newtypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Account identifier is empty or whitespace-only.
    #[error("invalid account ID: must be non-empty")]
    EmptyAccountId,

    /// Account identifier exceeds the maximum length.
    #[error("invalid account ID: {len} characters exceeds the maximum of {max}")]
    AccountIdTooLong {
        /// Length of the rejected identifier.
        len: usize,
        /// Maximum permitted length.
        max: usize,
    },

    /// An epoch source was asked to move backwards.
    #[error("epoch regression: cannot move from {current} back to {requested}")]
    EpochRegression {
        /// The epoch the source currently reports.
        current: Epoch,
        /// The earlier epoch that was requested.
        requested: Epoch,
    },
}
