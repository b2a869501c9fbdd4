//! House domain types.
//!
//! Defines the treasury, bet slot, stats and error types used by the execution layer and
//! simulator.

mod bet;
mod constants;
mod error;
mod state;
mod stats;
mod treasury;

pub use bet::*;
pub use constants::*;
pub use error::*;
pub use state::*;
pub use stats::*;
pub use treasury::*;
