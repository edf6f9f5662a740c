//! # stk-ledger: Epoch-Gated Position Ledger
//!
//! Tracks, per account, a FIFO-ordered sequence of token positions. Each
//! position progresses independently through four states as the epoch
//! advances, with a one-epoch settlement delay at every gate:
//!
//! ```text
//! deposit ──▶ LOCKING ──(epoch passes)──▶ LOCKED ──request_unlock()──▶ UNLOCKING
//!                                                                         │
//!                                                                (epoch passes)
//!                                                                         │
//!                                                                         ▼
//!                                              withdraw() ◀────────── WITHDRAWABLE
//! ```
//!
//! State is derived, never stored: a [`Position`] records its creation epoch
//! and its optional unlock-request epoch, and [`Position::state`] classifies
//! it against the epoch the caller supplies.
//!
//! ## Modules
//!
//! - **Position** (`position.rs`): the atomic unit of locked value and the
//!   state classification.
//! - **Ledger** (`ledger.rs`): one account's ordered positions with deposit,
//!   unlock-request, and withdraw, plus an append-only event log.
//! - **Selector** (`selector.rs`): the FIFO unlock policy, expressed as a
//!   pure plan over a position slice.
//! - **Summary** (`summary.rs`): the pure four-category balance snapshot.
//! - **Store** (`store.rs`): ledgers keyed by account with a write lock per
//!   account, so FIFO scans and splits never interleave.
//! - **Config** (`config.rs`): settlement delay and position cap.
//!
//! ## Legacy Behaviour
//!
//! An unlock request never touches a position that is still locking. The
//! slice of the request that such a position would have covered is not
//! deferred or retried; the caller sees it only as a smaller return value
//! from [`PositionLedger::request_unlock`].

pub mod config;
pub mod error;
pub mod ledger;
pub mod position;
pub mod selector;
pub mod store;
pub mod summary;

pub use config::{ConfigError, LedgerConfig};
pub use error::LedgerError;
pub use ledger::{LedgerEvent, PositionLedger};
pub use position::{Position, PositionHandle, PositionState};
pub use selector::{plan_unlock, UnlockMark, UnlockPlan};
pub use store::LedgerStore;
pub use summary::{summarize, BalanceSnapshot};
