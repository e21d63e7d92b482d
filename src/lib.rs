//! # u-delivery
//!
//! Last-mile delivery routing on a road network: a depot plus a set of
//! delivery targets is ordered by simulated annealing, and new orders can be
//! folded into an existing route with a cheap hot-started search.
//!
//! ## Modules
//!
//! - [`models`] — Target set, route helpers, map markers
//! - [`network`] — Road-network oracle trait and an in-memory graph implementation
//! - [`distance`] — Growable travel-cost matrix with a traffic model
//! - [`evaluation`] — Route cost (the annealing objective) and convergence statistics
//! - [`annealing`] — Simulated annealing runner and the tour optimizer built on it
//! - [`dispatch`] — Dynamic order insertion and the session [`Planner`](dispatch::Planner)
//!
//! ## Example
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use u_delivery::annealing::{optimize, AnnealingConfig};
//! use u_delivery::distance::{DistanceMatrix, TrafficModel};
//! use u_delivery::models::TargetSet;
//! use u_delivery::network::GraphNetwork;
//!
//! let mut network = GraphNetwork::new();
//! for id in 0..4u64 {
//!     network.add_location(id);
//! }
//! for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
//!     network.add_two_way_road(&a, &b, 100.0).unwrap();
//! }
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let targets = TargetSet::new(0, vec![1, 2, 3]).unwrap();
//! let matrix = DistanceMatrix::build(&targets, &network, TrafficModel::Free, &mut rng).unwrap();
//! let result = optimize(&matrix, None, &AnnealingConfig::default(), &mut rng).unwrap();
//! assert_eq!(result.best.len(), 3);
//! assert!((result.best_cost - 400.0).abs() < 1e-9);
//! ```

pub mod annealing;
pub mod dispatch;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod network;

pub use error::DeliveryError;
