//! Target set: the depot followed by accepted orders.

use serde::{Deserialize, Serialize};

use crate::error::DeliveryError;

/// Ordered set of locations to visit.
///
/// Index 0 is the depot; indices `1..len()` are orders in the order they
/// were accepted. The set only ever grows by appending, so an index handed
/// out once keeps referring to the same location.
///
/// # Examples
///
/// ```
/// use u_delivery::models::TargetSet;
///
/// let targets = TargetSet::new("depot", vec!["a", "b"]).unwrap();
/// assert_eq!(targets.len(), 3);
/// assert_eq!(*targets.depot(), "depot");
/// assert_eq!(targets.orders(), &["a", "b"]);
/// assert!(TargetSet::new("depot", vec!["a", "a"]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSet<L> {
    locations: Vec<L>,
}

impl<L: Clone + PartialEq + std::fmt::Debug> TargetSet<L> {
    /// Creates a target set from a depot and its initial orders.
    ///
    /// Fails if any location appears twice.
    pub fn new(depot: L, orders: Vec<L>) -> Result<Self, DeliveryError> {
        let mut locations = Vec::with_capacity(orders.len() + 1);
        locations.push(depot);
        for order in orders {
            if locations.contains(&order) {
                return Err(DeliveryError::InvalidConfig(format!(
                    "location {order:?} appears twice in the target set"
                )));
            }
            locations.push(order);
        }
        Ok(Self { locations })
    }

    /// The depot location.
    pub fn depot(&self) -> &L {
        &self.locations[0]
    }

    /// Order locations (everything after the depot).
    pub fn orders(&self) -> &[L] {
        &self.locations[1..]
    }

    /// Location at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&L> {
        self.locations.get(index)
    }

    /// All locations, depot first.
    pub fn as_slice(&self) -> &[L] {
        &self.locations
    }

    /// Number of targets including the depot.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Always `false`: the depot is present from construction.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Number of orders (excluding the depot).
    pub fn num_orders(&self) -> usize {
        self.locations.len() - 1
    }

    /// Returns `true` if `location` is the depot or an order.
    pub fn contains(&self, location: &L) -> bool {
        self.locations.contains(location)
    }

    /// Index of `location` in the set.
    pub fn index_of(&self, location: &L) -> Option<usize> {
        self.locations.iter().position(|l| l == location)
    }

    /// Appends a new order and returns its index.
    ///
    /// Returns `None` without modifying the set if the location is already
    /// present.
    pub(crate) fn push(&mut self, location: L) -> Option<usize> {
        if self.contains(&location) {
            return None;
        }
        self.locations.push(location);
        Some(self.locations.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depot_is_index_zero() {
        let t = TargetSet::new(10u32, vec![20, 30]).expect("valid");
        assert_eq!(*t.depot(), 10);
        assert_eq!(t.get(0), Some(&10));
        assert_eq!(t.index_of(&30), Some(2));
        assert_eq!(t.num_orders(), 2);
    }

    #[test]
    fn test_depot_only() {
        let t = TargetSet::new(1u32, vec![]).expect("valid");
        assert_eq!(t.len(), 1);
        assert!(t.orders().is_empty());
        assert!(!t.is_empty());
    }

    #[test]
    fn test_duplicate_with_depot_rejected() {
        assert!(TargetSet::new(1u32, vec![2, 1]).is_err());
    }

    #[test]
    fn test_push_appends() {
        let mut t = TargetSet::new(1u32, vec![2]).expect("valid");
        assert_eq!(t.push(5), Some(2));
        assert_eq!(t.as_slice(), &[1, 2, 5]);
    }

    #[test]
    fn test_push_existing_is_noop() {
        let mut t = TargetSet::new(1u32, vec![2]).expect("valid");
        assert_eq!(t.push(2), None);
        assert_eq!(t.len(), 2);
    }
}
