//! Delivery planning session.

use std::sync::atomic::AtomicBool;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::insertion::add_order;
use crate::annealing::{optimize_with_cancel, AnnealingConfig, RouteOptimization};
use crate::distance::{DistanceMatrix, TrafficModel};
use crate::error::DeliveryError;
use crate::evaluation::Convergence;
use crate::models::{
    closed_tour, identity_route, validate_route, Marker, MarkerKind, TargetSet, DEPOT,
};
use crate::network::RoadNetwork;

/// Configuration for a [`Planner`] session.
///
/// # Examples
///
/// ```
/// use u_delivery::dispatch::PlannerConfig;
/// use u_delivery::distance::TrafficModel;
///
/// let config = PlannerConfig::default()
///     .with_num_orders(5)
///     .with_insertion_traffic(TrafficModel::Fixed(1.2));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Orders drawn at initialization (the depot comes on top).
    pub num_orders: usize,

    /// Traffic applied when the full matrix is built.
    pub build_traffic: TrafficModel,

    /// Traffic applied to the row and column of an inserted order.
    pub insertion_traffic: TrafficModel,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            num_orders: 10,
            build_traffic: TrafficModel::default(),
            insertion_traffic: TrafficModel::default(),
        }
    }
}

impl PlannerConfig {
    pub fn with_num_orders(mut self, n: usize) -> Self {
        self.num_orders = n;
        self
    }

    pub fn with_build_traffic(mut self, traffic: TrafficModel) -> Self {
        self.build_traffic = traffic;
        self
    }

    pub fn with_insertion_traffic(mut self, traffic: TrafficModel) -> Self {
        self.insertion_traffic = traffic;
        self
    }

    /// Validates both traffic models.
    pub fn validate(&self) -> Result<(), DeliveryError> {
        self.build_traffic.validate()?;
        self.insertion_traffic.validate()
    }
}

struct PlanState<L> {
    targets: TargetSet<L>,
    matrix: DistanceMatrix,
    best: Option<RouteOptimization>,
    history: Vec<f64>,
}

/// A delivery planning session over one road network.
///
/// The target set, the distance matrix and the last best route live behind
/// a single mutex: reading the matrix, inserting an order and running a
/// search each hold it for their whole duration, so an insertion can never
/// interleave with an optimization over the same snapshot.
///
/// # Examples
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use u_delivery::annealing::AnnealingConfig;
/// use u_delivery::dispatch::{Planner, PlannerConfig};
/// use u_delivery::network::GraphNetwork;
///
/// let mut network = GraphNetwork::new();
/// for id in 0..8u32 {
///     network.add_location_at(id, id as f64, 0.0);
/// }
/// for id in 0..7u32 {
///     network.add_two_way_road(&id, &(id + 1), 1.0).unwrap();
/// }
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let config = PlannerConfig::default().with_num_orders(4);
/// let planner = Planner::initialize(network, config, &mut rng).unwrap();
///
/// let cold = planner.optimize(&AnnealingConfig::default(), &mut rng).unwrap();
/// assert_eq!(cold.best.len(), 4);
///
/// let idx = planner.add_order(&mut rng).unwrap().unwrap();
/// let hot = planner.reoptimize(idx, &AnnealingConfig::hot_start(), &mut rng).unwrap();
/// assert_eq!(hot.best.len(), 5);
/// assert_eq!(planner.stop_count(), 6);
/// ```
pub struct Planner<N: RoadNetwork> {
    network: N,
    config: PlannerConfig,
    state: Mutex<PlanState<N::Location>>,
}

impl<N: RoadNetwork> Planner<N> {
    /// Starts a session on `network` with a random depot and
    /// `config.num_orders` distinct random orders, then builds the matrix.
    pub fn initialize<R: Rng>(
        network: N,
        config: PlannerConfig,
        rng: &mut R,
    ) -> Result<Self, DeliveryError> {
        config.validate()?;
        let mut pool = network.all_locations();
        let requested = config.num_orders + 1;
        if pool.len() < requested {
            return Err(DeliveryError::InsufficientLocations {
                available: pool.len(),
                requested,
            });
        }

        let depot = pool.swap_remove(rng.random_range(0..pool.len()));
        let orders: Vec<N::Location> =
            rand::seq::index::sample(rng, pool.len(), config.num_orders)
                .into_iter()
                .map(|i| pool[i].clone())
                .collect();
        log::info!(
            "planning from depot {depot:?} with {} orders",
            orders.len()
        );

        let targets = TargetSet::new(depot, orders)?;
        Self::with_targets(network, targets, config, rng)
    }

    /// Starts a session on a fixed target set.
    pub fn with_targets<R: Rng>(
        network: N,
        targets: TargetSet<N::Location>,
        config: PlannerConfig,
        rng: &mut R,
    ) -> Result<Self, DeliveryError> {
        config.validate()?;
        let matrix = DistanceMatrix::build(&targets, &network, config.build_traffic, rng)?;
        Ok(Self {
            network,
            config,
            state: Mutex::new(PlanState {
                targets,
                matrix,
                best: None,
                history: Vec::new(),
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, PlanState<N::Location>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The road network.
    pub fn network(&self) -> &N {
        &self.network
    }

    /// The session configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Snapshot of the current target set.
    pub fn targets(&self) -> TargetSet<N::Location> {
        self.lock().targets.clone()
    }

    /// Snapshot of the current distance matrix.
    pub fn matrix(&self) -> DistanceMatrix {
        self.lock().matrix.clone()
    }

    /// Runs a cold-start search over all current orders.
    ///
    /// Replaces the session history with this run's history.
    pub fn optimize<R: Rng>(
        &self,
        config: &AnnealingConfig,
        rng: &mut R,
    ) -> Result<RouteOptimization, DeliveryError> {
        self.optimize_with_cancel(config, rng, None)
    }

    /// Cold-start search that stops early once `cancel` is set.
    pub fn optimize_with_cancel<R: Rng>(
        &self,
        config: &AnnealingConfig,
        rng: &mut R,
        cancel: Option<&AtomicBool>,
    ) -> Result<RouteOptimization, DeliveryError> {
        let mut state = self.lock();
        let result = optimize_with_cancel(&state.matrix, None, config, rng, cancel)?;
        state.history = result.history.clone();
        state.best = Some(result.clone());
        Ok(result)
    }

    /// Inserts a new order drawn from the unused network locations.
    ///
    /// Returns `None` when the network has no free location left.
    pub fn add_order<R: Rng>(&self, rng: &mut R) -> Result<Option<usize>, DeliveryError> {
        let mut guard = self.lock();
        let state = &mut *guard;
        add_order(
            &mut state.targets,
            &mut state.matrix,
            &self.network,
            self.config.insertion_traffic,
            rng,
        )
    }

    /// Hot-starts a search from the last best route, extended by every order
    /// accepted since that search in acceptance order.
    ///
    /// `new_index` must name an accepted order. Without a previous best
    /// route the orders are seeded in acceptance order. The run's history is
    /// appended to the session history.
    pub fn reoptimize<R: Rng>(
        &self,
        new_index: usize,
        config: &AnnealingConfig,
        rng: &mut R,
    ) -> Result<RouteOptimization, DeliveryError> {
        self.reoptimize_with_cancel(new_index, config, rng, None)
    }

    /// Hot-start search that stops early once `cancel` is set.
    pub fn reoptimize_with_cancel<R: Rng>(
        &self,
        new_index: usize,
        config: &AnnealingConfig,
        rng: &mut R,
        cancel: Option<&AtomicBool>,
    ) -> Result<RouteOptimization, DeliveryError> {
        let mut state = self.lock();
        Self::reoptimize_locked(&mut state, new_index, config, rng, cancel)
    }

    /// Inserts an order and hot-starts a search that includes it, holding
    /// the session lock across both steps.
    ///
    /// Returns `None`, leaving the session unchanged, when no free location
    /// remains.
    pub fn insert_and_reoptimize<R: Rng>(
        &self,
        config: &AnnealingConfig,
        rng: &mut R,
    ) -> Result<Option<RouteOptimization>, DeliveryError> {
        let mut guard = self.lock();
        let state = &mut *guard;
        let inserted = add_order(
            &mut state.targets,
            &mut state.matrix,
            &self.network,
            self.config.insertion_traffic,
            rng,
        )?;
        match inserted {
            Some(idx) => Self::reoptimize_locked(state, idx, config, rng, None).map(Some),
            None => Ok(None),
        }
    }

    fn reoptimize_locked<R: Rng>(
        state: &mut PlanState<N::Location>,
        new_index: usize,
        config: &AnnealingConfig,
        rng: &mut R,
        cancel: Option<&AtomicBool>,
    ) -> Result<RouteOptimization, DeliveryError> {
        let n = state.targets.len();
        if new_index == DEPOT || new_index >= n {
            return Err(DeliveryError::InvalidRoute(format!(
                "order index {new_index} outside 1..{n}"
            )));
        }
        let seed = match &state.best {
            Some(prev) => {
                let mut seed = prev.best.clone();
                seed.extend(prev.best.len() + 1..n);
                seed
            }
            None => identity_route(n),
        };
        let result =
            optimize_with_cancel(&state.matrix, Some(seed.as_slice()), config, rng, cancel)?;
        state.history.extend_from_slice(&result.history);
        state.best = Some(result.clone());
        Ok(result)
    }

    /// The last best route, if a search has run.
    pub fn best_route(&self) -> Option<Vec<usize>> {
        self.lock().best.as_ref().map(|r| r.best.clone())
    }

    /// Cost of the last best route, if a search has run.
    pub fn best_cost(&self) -> Option<f64> {
        self.lock().best.as_ref().map(|r| r.best_cost)
    }

    /// Best-cost history across the cold start and every hot start since.
    pub fn history(&self) -> Vec<f64> {
        self.lock().history.clone()
    }

    /// Convergence summary of the session history.
    pub fn convergence(&self) -> Option<Convergence> {
        Convergence::from_history(&self.lock().history)
    }

    /// Number of stops on the last best route, depot included.
    ///
    /// Before the first search this is every target. Orders inserted after
    /// the last search are not counted until a hot start folds them in.
    pub fn stop_count(&self) -> usize {
        let state = self.lock();
        match &state.best {
            Some(r) => r.best.len() + 1,
            None => state.targets.len(),
        }
    }

    /// Depot and order markers for drawing on a map.
    pub fn markers(&self) -> Vec<Marker<N::Location>> {
        let state = self.lock();
        state
            .targets
            .as_slice()
            .iter()
            .enumerate()
            .map(|(index, location)| Marker {
                index,
                kind: if index == 0 {
                    MarkerKind::Depot
                } else {
                    MarkerKind::Order
                },
                location: location.clone(),
                coordinates: self.network.coordinates(location),
            })
            .collect()
    }

    /// Locations of the closed tour `depot → route → depot`.
    pub fn route_locations(&self, route: &[usize]) -> Result<Vec<N::Location>, DeliveryError> {
        let state = self.lock();
        validate_route(route, state.targets.len())?;
        Ok(closed_tour(route)
            .into_iter()
            .map(|i| state.targets.as_slice()[i].clone())
            .collect())
    }

    /// Road paths for every leg of the closed tour.
    ///
    /// Legs without a path are skipped.
    pub fn route_paths(&self, route: &[usize]) -> Result<Vec<Vec<N::Location>>, DeliveryError> {
        let stops = self.route_locations(route)?;
        Ok(stops
            .windows(2)
            .filter_map(|leg| self.network.shortest_path(&leg[0], &leg[1]))
            .collect())
    }

    /// The closed tour as a coordinate polyline following the roads.
    ///
    /// Locations without known coordinates are left out.
    pub fn route_coordinates(&self, route: &[usize]) -> Result<Vec<(f64, f64)>, DeliveryError> {
        Ok(self
            .route_paths(route)?
            .iter()
            .flatten()
            .filter_map(|loc| self.network.coordinates(loc))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::route_cost;
    use crate::network::GraphNetwork;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Two-way line 0 - 1 - ... - (n-1) with unit-length segments.
    fn line_network(n: u32) -> GraphNetwork<u32> {
        let mut g = GraphNetwork::new();
        for id in 0..n {
            g.add_location_at(id, id as f64, 0.0);
        }
        for id in 0..n - 1 {
            g.add_two_way_road(&id, &(id + 1), 1.0).expect("known");
        }
        g
    }

    fn free_config(num_orders: usize) -> PlannerConfig {
        PlannerConfig::default()
            .with_num_orders(num_orders)
            .with_build_traffic(TrafficModel::Free)
            .with_insertion_traffic(TrafficModel::Free)
    }

    #[test]
    fn test_initialize_distinct_targets() {
        let mut rng = StdRng::seed_from_u64(4);
        let planner = Planner::initialize(line_network(20), free_config(10), &mut rng)
            .expect("enough locations");
        let targets = planner.targets();
        assert_eq!(targets.len(), 11);
        let mut ids = targets.as_slice().to_vec();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 11);
        assert_eq!(planner.matrix().size(), 11);
    }

    #[test]
    fn test_initialize_insufficient_locations() {
        let mut rng = StdRng::seed_from_u64(4);
        let err = Planner::initialize(line_network(5), free_config(10), &mut rng)
            .err()
            .expect("too few locations");
        assert_eq!(
            err,
            DeliveryError::InsufficientLocations {
                available: 5,
                requested: 11
            }
        );
    }

    #[test]
    fn test_cold_then_hot_start() {
        let mut rng = StdRng::seed_from_u64(9);
        let planner =
            Planner::initialize(line_network(12), free_config(5), &mut rng).expect("valid");

        let cold = planner
            .optimize(&AnnealingConfig::default(), &mut rng)
            .expect("valid");
        assert_eq!(planner.history(), cold.history);

        let idx = planner.add_order(&mut rng).expect("valid").expect("free");
        assert_eq!(idx, 6);

        let mut seed = cold.best.clone();
        seed.push(idx);
        let seed_cost = route_cost(&seed, &planner.matrix());

        let hot = planner
            .reoptimize(idx, &AnnealingConfig::hot_start(), &mut rng)
            .expect("valid");
        assert!(hot.best_cost <= seed_cost);
        assert!(validate_route(&hot.best, 7).is_ok());
        assert_eq!(planner.best_route(), Some(hot.best.clone()));
        assert_eq!(
            planner.history().len(),
            cold.history.len() + hot.history.len()
        );
    }

    #[test]
    fn test_reoptimize_folds_in_every_pending_order() {
        let mut rng = StdRng::seed_from_u64(13);
        let planner =
            Planner::initialize(line_network(15), free_config(4), &mut rng).expect("valid");
        planner
            .optimize(&AnnealingConfig::default(), &mut rng)
            .expect("valid");
        assert_eq!(planner.stop_count(), 5);

        let a = planner.add_order(&mut rng).expect("valid").expect("free");
        let b = planner.add_order(&mut rng).expect("valid").expect("free");
        assert_eq!((a, b), (5, 6));
        assert_eq!(planner.stop_count(), 5);

        let hot = planner
            .reoptimize(b, &AnnealingConfig::hot_start(), &mut rng)
            .expect("valid");
        assert!(validate_route(&hot.best, 7).is_ok());
        assert!(hot.best.contains(&a));
        assert_eq!(planner.stop_count(), 7);
    }

    #[test]
    fn test_reoptimize_rejects_unknown_index() {
        let mut rng = StdRng::seed_from_u64(13);
        let planner =
            Planner::initialize(line_network(8), free_config(3), &mut rng).expect("valid");
        for idx in [0, 4] {
            let err = planner
                .reoptimize(idx, &AnnealingConfig::hot_start(), &mut rng)
                .unwrap_err();
            assert!(matches!(err, DeliveryError::InvalidRoute(_)));
        }
    }

    #[test]
    fn test_concurrent_insertions_during_hot_start() {
        let mut rng = StdRng::seed_from_u64(21);
        let planner =
            Planner::initialize(line_network(30), free_config(5), &mut rng).expect("valid");
        planner
            .optimize(&AnnealingConfig::default(), &mut rng)
            .expect("valid");

        std::thread::scope(|scope| {
            scope.spawn(|| {
                let mut rng = StdRng::seed_from_u64(99);
                for _ in 0..5 {
                    planner.add_order(&mut rng).expect("valid").expect("free");
                }
            });
            let mut rng = StdRng::seed_from_u64(7);
            for _ in 0..5 {
                let hot = planner
                    .insert_and_reoptimize(&AnnealingConfig::interactive_hot_start(), &mut rng)
                    .expect("valid")
                    .expect("free");
                assert!(validate_route(&hot.best, hot.best.len() + 1).is_ok());
            }
        });

        assert_eq!(planner.targets().len(), 16);
        let last = planner.targets().len() - 1;
        let hot = planner
            .reoptimize(last, &AnnealingConfig::hot_start(), &mut rng)
            .expect("valid");
        assert!(validate_route(&hot.best, 16).is_ok());
    }

    #[test]
    fn test_reoptimize_without_previous_best() {
        let mut rng = StdRng::seed_from_u64(2);
        let planner =
            Planner::initialize(line_network(8), free_config(3), &mut rng).expect("valid");
        let idx = planner.add_order(&mut rng).expect("valid").expect("free");
        let result = planner
            .reoptimize(idx, &AnnealingConfig::hot_start(), &mut rng)
            .expect("valid");
        assert_eq!(result.best.len(), 4);
    }

    #[test]
    fn test_insert_exhausts_pool() {
        let mut rng = StdRng::seed_from_u64(2);
        let planner =
            Planner::initialize(line_network(4), free_config(3), &mut rng).expect("valid");
        planner
            .optimize(&AnnealingConfig::default(), &mut rng)
            .expect("valid");
        let result = planner
            .insert_and_reoptimize(&AnnealingConfig::hot_start(), &mut rng)
            .expect("valid");
        assert!(result.is_none());
        assert_eq!(planner.matrix().size(), 4);
    }

    #[test]
    fn test_line_optimum() {
        let targets = TargetSet::new(0u32, vec![3, 1, 2]).expect("valid");
        let mut rng = StdRng::seed_from_u64(5);
        let planner =
            Planner::with_targets(line_network(4), targets, free_config(3), &mut rng)
                .expect("valid");
        let result = planner
            .optimize(&AnnealingConfig::default(), &mut rng)
            .expect("valid");
        // out to 3 and back: 6 on any monotone order
        assert!((result.best_cost - 6.0).abs() < 1e-10);
        let convergence = planner.convergence().expect("ran");
        assert!((convergence.final_cost - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_markers_and_geometry() {
        let targets = TargetSet::new(0u32, vec![2]).expect("valid");
        let mut rng = StdRng::seed_from_u64(5);
        let planner =
            Planner::with_targets(line_network(3), targets, free_config(1), &mut rng)
                .expect("valid");

        let markers = planner.markers();
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].kind, MarkerKind::Depot);
        assert_eq!(markers[1].kind, MarkerKind::Order);
        assert_eq!(markers[1].coordinates, Some((2.0, 0.0)));

        assert_eq!(planner.route_locations(&[1]).expect("valid"), vec![0, 2, 0]);
        let paths = planner.route_paths(&[1]).expect("valid");
        assert_eq!(paths, vec![vec![0, 1, 2], vec![2, 1, 0]]);
        let coords = planner.route_coordinates(&[1]).expect("valid");
        assert_eq!(coords.len(), 6);
        assert_eq!(coords[0], (0.0, 0.0));
        assert_eq!(coords[2], (2.0, 0.0));
    }

    #[test]
    fn test_route_locations_rejects_bad_route() {
        let targets = TargetSet::new(0u32, vec![1, 2]).expect("valid");
        let mut rng = StdRng::seed_from_u64(5);
        let planner =
            Planner::with_targets(line_network(3), targets, free_config(2), &mut rng)
                .expect("valid");
        assert!(planner.route_locations(&[1]).is_err());
    }

    #[test]
    fn test_cancelled_optimization() {
        let mut rng = StdRng::seed_from_u64(5);
        let planner =
            Planner::initialize(line_network(10), free_config(6), &mut rng).expect("valid");
        let cancel = AtomicBool::new(true);
        let result = planner
            .optimize_with_cancel(&AnnealingConfig::default(), &mut rng, Some(&cancel))
            .expect("valid");
        assert!(result.cancelled);
        assert!(planner.history().is_empty());
    }

    #[test]
    fn test_planner_is_shareable() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<Planner<GraphNetwork<u32>>>();
    }
}
