//! Road-network oracle trait.

use std::fmt::Debug;
use std::hash::Hash;

/// Answers routing queries over a road network.
///
/// Missing paths are reported as `None`, never as a panic; the distance
/// matrix turns them into the unreachable sentinel cost.
///
/// # Examples
///
/// ```
/// use u_delivery::network::RoadNetwork;
///
/// /// Locations on a line; travel cost is the absolute difference.
/// struct Line(Vec<i64>);
///
/// impl RoadNetwork for Line {
///     type Location = i64;
///
///     fn shortest_path_length(&self, from: &i64, to: &i64) -> Option<f64> {
///         Some((from - to).abs() as f64)
///     }
///
///     fn shortest_path(&self, from: &i64, to: &i64) -> Option<Vec<i64>> {
///         Some(vec![*from, *to])
///     }
///
///     fn all_locations(&self) -> Vec<i64> {
///         self.0.clone()
///     }
/// }
///
/// let line = Line(vec![0, 5, 9]);
/// assert_eq!(line.shortest_path_length(&0, &9), Some(9.0));
/// assert_eq!(line.coordinates(&5), None);
/// ```
pub trait RoadNetwork: Send + Sync {
    /// Opaque identifier of a point on the network.
    type Location: Clone + Eq + Hash + Debug + Send + Sync;

    /// Length of the shortest path from `from` to `to`, or `None` if no
    /// path exists.
    fn shortest_path_length(&self, from: &Self::Location, to: &Self::Location) -> Option<f64>;

    /// The locations along the shortest path, both endpoints included.
    fn shortest_path(
        &self,
        from: &Self::Location,
        to: &Self::Location,
    ) -> Option<Vec<Self::Location>>;

    /// Every location orders may be placed at.
    fn all_locations(&self) -> Vec<Self::Location>;

    /// Planar `(x, y)` position of a location, used only for drawing.
    fn coordinates(&self, _location: &Self::Location) -> Option<(f64, f64)> {
        None
    }
}
