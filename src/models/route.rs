//! Route helpers.
//!
//! A route is a plain `Vec<usize>` of order indices. These helpers build and
//! check routes against the size of the target set they index into.

use crate::error::DeliveryError;

/// Index of the depot in every location-indexed structure.
pub const DEPOT: usize = 0;

/// Returns the orders `1..num_targets` in acceptance order.
///
/// # Examples
///
/// ```
/// use u_delivery::models::identity_route;
///
/// assert_eq!(identity_route(4), vec![1, 2, 3]);
/// assert!(identity_route(1).is_empty());
/// ```
pub fn identity_route(num_targets: usize) -> Vec<usize> {
    (1..num_targets).collect()
}

/// Wraps a route with the depot at both ends: `[0, r0, r1, ..., 0]`.
pub fn closed_tour(route: &[usize]) -> Vec<usize> {
    let mut tour = Vec::with_capacity(route.len() + 2);
    tour.push(DEPOT);
    tour.extend_from_slice(route);
    tour.push(DEPOT);
    tour
}

/// Checks that `route` visits every order `1..num_targets` exactly once.
///
/// # Examples
///
/// ```
/// use u_delivery::models::validate_route;
///
/// assert!(validate_route(&[2, 1, 3], 4).is_ok());
/// assert!(validate_route(&[0, 1, 2], 4).is_err());
/// assert!(validate_route(&[1, 1, 2], 4).is_err());
/// ```
pub fn validate_route(route: &[usize], num_targets: usize) -> Result<(), DeliveryError> {
    let orders = num_targets.saturating_sub(1);
    if route.len() != orders {
        return Err(DeliveryError::InvalidRoute(format!(
            "expected {orders} orders, got {}",
            route.len()
        )));
    }

    let mut seen = vec![false; num_targets];
    for &idx in route {
        if idx == DEPOT || idx >= num_targets {
            return Err(DeliveryError::InvalidRoute(format!(
                "index {idx} is not an order index in 1..{num_targets}"
            )));
        }
        if seen[idx] {
            return Err(DeliveryError::InvalidRoute(format!(
                "order {idx} is visited twice"
            )));
        }
        seen[idx] = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_tour() {
        assert_eq!(closed_tour(&[3, 1, 2]), vec![0, 3, 1, 2, 0]);
        assert_eq!(closed_tour(&[]), vec![0, 0]);
    }

    #[test]
    fn test_validate_accepts_permutation() {
        assert!(validate_route(&[4, 2, 1, 3], 5).is_ok());
        assert!(validate_route(&[], 1).is_ok());
    }

    #[test]
    fn test_validate_wrong_length() {
        let err = validate_route(&[1, 2], 4).unwrap_err();
        assert!(matches!(err, DeliveryError::InvalidRoute(_)));
    }

    #[test]
    fn test_validate_rejects_depot_and_out_of_range() {
        assert!(validate_route(&[0, 1], 3).is_err());
        assert!(validate_route(&[1, 3], 3).is_err());
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        assert!(validate_route(&[2, 2, 1], 4).is_err());
    }
}
