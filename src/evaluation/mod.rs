//! Route evaluation.
//!
//! - [`route_cost`] — total length of the closed tour; the annealing objective
//! - [`Convergence`] — summary of a best-cost history

mod convergence;
mod cost;

pub use convergence::Convergence;
pub use cost::route_cost;
