//! Simulated annealing over delivery routes.
//!
//! A single-solution trajectory search: a random pairwise swap is proposed
//! every iteration and accepted by the Metropolis criterion under a
//! geometrically cooling temperature. Supplying a seed route turns a run
//! into a hot start that refines an existing solution.
//!
//! - [`Annealer`] — the generic loop over any [`AnnealingProblem`]
//! - [`TourProblem`] — the delivery-route problem (swap neighborhood, closed-tour cost)
//! - [`optimize`] — the entry point used by callers and the planner
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod config;
mod runner;
mod tour;
mod types;

pub use config::AnnealingConfig;
pub use runner::{Annealer, AnnealingResult};
pub use tour::{optimize, optimize_with_cancel, RouteOptimization, TourProblem};
pub use types::AnnealingProblem;
