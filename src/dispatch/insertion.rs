//! Dynamic order insertion.

use std::collections::HashSet;

use rand::Rng;

use crate::distance::{DistanceMatrix, TrafficModel};
use crate::error::DeliveryError;
use crate::models::TargetSet;
use crate::network::RoadNetwork;

/// Adds one new order drawn uniformly from the network locations not yet
/// in `targets`, and extends `matrix` to cover it.
///
/// Returns the new order's index, or `None` when every network location is
/// already a target; in that case neither argument is modified.
///
/// # Examples
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use u_delivery::dispatch::add_order;
/// use u_delivery::distance::{DistanceMatrix, TrafficModel};
/// use u_delivery::models::TargetSet;
/// use u_delivery::network::GraphNetwork;
///
/// let mut network = GraphNetwork::new();
/// network.add_location(1u32);
/// network.add_location(2u32);
/// network.add_two_way_road(&1, &2, 40.0).unwrap();
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let mut targets = TargetSet::new(1, vec![]).unwrap();
/// let mut matrix = DistanceMatrix::build(&targets, &network, TrafficModel::Free, &mut rng).unwrap();
///
/// let idx = add_order(&mut targets, &mut matrix, &network, TrafficModel::Free, &mut rng).unwrap();
/// assert_eq!(idx, Some(1));
/// assert_eq!(matrix.get(0, 1), 40.0);
///
/// let none = add_order(&mut targets, &mut matrix, &network, TrafficModel::Free, &mut rng).unwrap();
/// assert_eq!(none, None);
/// assert_eq!(matrix.size(), 2);
/// ```
pub fn add_order<N, R>(
    targets: &mut TargetSet<N::Location>,
    matrix: &mut DistanceMatrix,
    network: &N,
    traffic: TrafficModel,
    rng: &mut R,
) -> Result<Option<usize>, DeliveryError>
where
    N: RoadNetwork,
    R: Rng,
{
    if targets.len() != matrix.size() {
        return Err(DeliveryError::DimensionMismatch {
            targets: targets.len(),
            matrix: matrix.size(),
        });
    }
    traffic.validate()?;

    let taken: HashSet<&N::Location> = targets.as_slice().iter().collect();
    let mut candidates: Vec<N::Location> = network
        .all_locations()
        .into_iter()
        .filter(|loc| !taken.contains(loc))
        .collect();
    drop(taken);

    if candidates.is_empty() {
        log::info!("no free locations left for a new order");
        return Ok(None);
    }

    let pick = rng.random_range(0..candidates.len());
    let location = candidates.swap_remove(pick);
    log::debug!("new order at {location:?}");

    let Some(new_idx) = targets.push(location) else {
        return Ok(None);
    };
    matrix.extend(targets, network, traffic, rng)?;
    Ok(Some(new_idx))
}
