#![deny(missing_docs)]

//! # stk-core: Foundational Types for the Staking Ledger
//!
//! This crate defines the primitives every other crate in the workspace
//! depends on. It has no internal crate dependencies, only `serde` and
//! `thiserror` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** An [`Epoch`] is not a bare
//!    `u64` and an [`AccountId`] is not a bare `String`. You cannot pass a
//!    token amount where an epoch is expected.
//!
//! 2. **The epoch is read, never written.** The [`EpochSource`] trait is the
//!    only seam through which the ledger learns the time. Ledger operations
//!    take the epoch as a parameter; nothing reads ambient global state.
//!
//! 3. **Structured errors.** [`ValidationError`] is a `thiserror` enum; no
//!    `Box<dyn Error>`, no `.unwrap()` outside tests.

pub mod epoch;
pub mod error;
pub mod identity;

// Re-export primary types at crate root for ergonomic imports.
pub use epoch::{Epoch, EpochSource, SimulatedEpochClock};
pub use error::ValidationError;
pub use identity::AccountId;
