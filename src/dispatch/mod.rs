//! Online order handling.
//!
//! - [`add_order`] — draws an unused location from the network, appends it
//!   to the target set and grows the distance matrix by one row and column
//! - [`Planner`] — owns the target set and matrix as one locked resource and
//!   runs cold and hot-started optimizations against it

mod insertion;
mod planner;

pub use insertion::add_order;
pub use planner::{Planner, PlannerConfig};
