//! Map markers for the presentation layer.

use serde::{Deserialize, Serialize};

/// Whether a marker is the depot or an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    /// The start/end of every route.
    Depot,
    /// A delivery target.
    Order,
}

/// A target location ready to be drawn on a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker<L> {
    /// Index in the target set.
    pub index: usize,
    /// Depot or order.
    pub kind: MarkerKind,
    /// The underlying location identifier.
    pub location: L,
    /// Planar `(x, y)` position, when the network knows it.
    pub coordinates: Option<(f64, f64)>,
}
