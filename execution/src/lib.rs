//! Bullseye execution layer.
//!
//! This crate contains the deterministic transaction execution logic (`Layer`) for the wagering
//! engine: reserve accounting, the commit/reveal bet lifecycle, quick bets and house controls.
//!
//! ## Determinism requirements
//! - Do not use wall-clock time inside execution; use the block [`Beacon`](bullseye_types::Beacon).
//! - Do not use non-deterministic randomness; only derive randomness from beacon entropy and
//!   player secrets.
//! - Avoid iteration order of hash-based collections influencing outputs.
//!
//! ## Solvency
//! After every transaction `reserved_liability <= total_balance`, and `reserved_liability` equals
//! the sum of `reserved` over unresolved bets. Handlers validate before writing, so a rejected
//! instruction changes nothing but the sender's nonce.
//!
//! ## Minimal execution pipeline (example)
//! ```rust,ignore
//! use bullseye_execution::{mocks::create_beacon, state_transition::execute_state_transition, Memory};
//!
//! # async fn example(transactions: Vec<bullseye_types::Transaction>) -> anyhow::Result<()> {
//! let mut state = Memory::default();
//! // Height must be exactly `state_height + 1`.
//! let result = execute_state_transition(&mut state, create_beacon(1), transactions).await?;
//! # Ok(())
//! # }
//! ```

pub mod outcome;
pub mod query;
pub mod randomness;
pub mod state_transition;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

mod layer;

mod state;

#[cfg(test)]
mod scenario_tests;

pub use layer::Layer;
pub use state::{nonce, Memory, PrepareError, State, Status};
