//! Error type for delivery planning operations.

use std::fmt;

/// Errors surfaced by matrix construction, optimization and planning.
///
/// Unreachable location pairs are deliberately absent: they are folded into
/// the distance matrix as [`UNREACHABLE`](crate::distance::UNREACHABLE) so
/// that routes crossing them can still be compared.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryError {
    /// The road network holds fewer usable locations than the depot plus
    /// the requested number of orders.
    InsufficientLocations {
        /// Locations available in the network.
        available: usize,
        /// Locations needed (orders + depot).
        requested: usize,
    },
    /// A route is not a permutation of the order indices `1..N`.
    InvalidRoute(String),
    /// A configuration value is out of range.
    InvalidConfig(String),
    /// The target set and the distance matrix have drifted apart.
    DimensionMismatch {
        /// Number of targets.
        targets: usize,
        /// Matrix dimension.
        matrix: usize,
    },
    /// A location is not part of the road network.
    UnknownLocation(String),
    /// The operation observed its cancellation flag.
    Cancelled,
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryError::InsufficientLocations {
                available,
                requested,
            } => write!(
                f,
                "not enough locations on the map: {available} available, {requested} requested"
            ),
            DeliveryError::InvalidRoute(msg) => write!(f, "invalid route: {msg}"),
            DeliveryError::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            DeliveryError::DimensionMismatch { targets, matrix } => write!(
                f,
                "target set has {targets} entries but distance matrix is {matrix}x{matrix}"
            ),
            DeliveryError::UnknownLocation(loc) => write!(f, "unknown location: {loc}"),
            DeliveryError::Cancelled => write!(f, "operation cancelled"),
        }
    }
}

impl std::error::Error for DeliveryError {}
