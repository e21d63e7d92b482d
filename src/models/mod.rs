//! Domain model types for delivery routing.
//!
//! The target set holds the depot at index 0 followed by orders in the order
//! they were accepted. Routes are permutations of the order indices; the
//! depot is implicit at both ends.

mod marker;
mod route;
mod targets;

pub use marker::{Marker, MarkerKind};
pub use route::{closed_tour, identity_route, validate_route, DEPOT};
pub use targets::TargetSet;
