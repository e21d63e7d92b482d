//! Travel-cost matrices.
//!
//! Provides a dense, growable cost matrix over a target set, filled from a
//! [`RoadNetwork`](crate::network::RoadNetwork) and perturbed by a traffic
//! model.

mod matrix;
mod traffic;

pub use matrix::{is_unreachable_cost, DistanceMatrix, UNREACHABLE};
pub use traffic::TrafficModel;
