//! Execution model: fees, fills, and the stop-loss/take-profit sweep (spec §4.4).

pub mod broker;
pub mod cost;

pub use broker::{enter_long, enter_short, exit_position, trigger_sweep};
pub use cost::{share_quantity, FeeModel};
