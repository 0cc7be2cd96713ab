//! Plans the ordered blockchain actions (token unlocks, ether wrapping and
//! the order itself) a user has to sign to execute a trade.
//!
//! Plans are computed from a wallet snapshot and are only valid for it:
//! the executor is expected to re-plan after each confirmed step.

mod models;
pub mod planner;

pub use models::*;
pub use planner::*;
