//! Closed-tour cost.

use crate::distance::DistanceMatrix;
use crate::models::DEPOT;

/// Computes the cost of `depot → route[0] → ... → route[n-1] → depot`.
///
/// This is the single definition of route cost: the optimizer minimizes it
/// and reported costs are computed with it. An empty route costs 0.
///
/// # Examples
///
/// ```
/// use u_delivery::distance::DistanceMatrix;
/// use u_delivery::evaluation::route_cost;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 1.0, 9.0],
///     vec![9.0, 0.0, 2.0],
///     vec![3.0, 9.0, 0.0],
/// ])
/// .unwrap();
/// assert_eq!(route_cost(&[1, 2], &dm), 6.0);
/// assert_eq!(route_cost(&[2, 1], &dm), 27.0);
/// ```
pub fn route_cost(route: &[usize], matrix: &DistanceMatrix) -> f64 {
    let (Some(&first), Some(&last)) = (route.first(), route.last()) else {
        return 0.0;
    };
    let mut cost = matrix.get(DEPOT, first);
    for w in route.windows(2) {
        cost += matrix.get(w[0], w[1]);
    }
    cost + matrix.get(last, DEPOT)
}
