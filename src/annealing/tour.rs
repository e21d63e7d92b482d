//! Delivery-route annealing: swap neighborhood over a closed tour.

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use super::config::AnnealingConfig;
use super::runner::{Annealer, AnnealingResult};
use super::types::AnnealingProblem;
use crate::distance::{is_unreachable_cost, DistanceMatrix};
use crate::error::DeliveryError;
use crate::evaluation::route_cost;
use crate::models::{identity_route, validate_route};

/// Outcome of optimizing a delivery route.
pub type RouteOptimization = AnnealingResult<Vec<usize>>;

/// Visiting-order problem over a distance matrix.
///
/// Solutions are permutations of the order indices `1..N`; the neighbor
/// move swaps two distinct positions.
pub struct TourProblem<'a> {
    matrix: &'a DistanceMatrix,
}

impl<'a> TourProblem<'a> {
    /// Creates a problem over `matrix` (index 0 is the depot).
    pub fn new(matrix: &'a DistanceMatrix) -> Self {
        Self { matrix }
    }

    /// Number of orders to visit.
    pub fn num_orders(&self) -> usize {
        self.matrix.size().saturating_sub(1)
    }
}

impl AnnealingProblem for TourProblem<'_> {
    type Solution = Vec<usize>;

    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
        let mut route = identity_route(self.matrix.size());
        route.shuffle(rng);
        route
    }

    fn cost(&self, route: &Vec<usize>) -> f64 {
        route_cost(route, self.matrix)
    }

    fn neighbor<R: Rng>(&self, route: &Vec<usize>, rng: &mut R) -> Vec<usize> {
        let mut next = route.clone();
        let n = next.len();
        if n < 2 {
            return next;
        }
        let i = rng.random_range(0..n);
        let mut j = rng.random_range(0..n - 1);
        if j >= i {
            j += 1;
        }
        next.swap(i, j);
        next
    }
}

/// Finds a low-cost visiting order for the orders in `matrix`.
///
/// With `seed_route` the search starts from that route (a hot start);
/// otherwise from a uniformly random permutation drawn from `rng`. Fewer
/// than two orders leave nothing to search: the trivial route is returned
/// with an empty history.
///
/// # Examples
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use u_delivery::annealing::{optimize, AnnealingConfig};
/// use u_delivery::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 1.0, 5.0, 5.0],
///     vec![5.0, 0.0, 1.0, 5.0],
///     vec![5.0, 5.0, 0.0, 1.0],
///     vec![1.0, 5.0, 5.0, 0.0],
/// ])
/// .unwrap();
/// let mut rng = StdRng::seed_from_u64(42);
/// let seed = [3, 2, 1];
/// let result = optimize(&dm, Some(&seed[..]), &AnnealingConfig::default(), &mut rng).unwrap();
/// assert_eq!(result.best, vec![1, 2, 3]);
/// assert_eq!(result.best_cost, 4.0);
/// ```
pub fn optimize<R: Rng>(
    matrix: &DistanceMatrix,
    seed_route: Option<&[usize]>,
    config: &AnnealingConfig,
    rng: &mut R,
) -> Result<RouteOptimization, DeliveryError> {
    optimize_with_cancel(matrix, seed_route, config, rng, None)
}

/// Like [`optimize`], checking `cancel` at every iteration boundary.
pub fn optimize_with_cancel<R: Rng>(
    matrix: &DistanceMatrix,
    seed_route: Option<&[usize]>,
    config: &AnnealingConfig,
    rng: &mut R,
    cancel: Option<&AtomicBool>,
) -> Result<RouteOptimization, DeliveryError> {
    config.validate()?;
    if let Some(seed) = seed_route {
        validate_route(seed, matrix.size())?;
    }

    let problem = TourProblem::new(matrix);
    if problem.num_orders() < 2 {
        let best = seed_route
            .map(<[usize]>::to_vec)
            .unwrap_or_else(|| identity_route(matrix.size()));
        let best_cost = route_cost(&best, matrix);
        return Ok(AnnealingResult {
            best,
            best_cost,
            history: Vec::new(),
            iterations: 0,
            accepted_moves: 0,
            improving_moves: 0,
            final_temperature: config.initial_temperature,
            cancelled: false,
            elapsed: Duration::ZERO,
        });
    }

    log::debug!(
        "annealing {} orders ({} start, T0={}, rate={}, max_iter={})",
        problem.num_orders(),
        if seed_route.is_some() { "hot" } else { "cold" },
        config.initial_temperature,
        config.cooling_rate,
        config.max_iterations
    );

    let result = Annealer::run_with_cancel(
        &problem,
        seed_route.map(<[usize]>::to_vec),
        config,
        rng,
        cancel,
    );

    log::info!(
        "best route cost {:.2} after {} iterations in {:?}",
        result.best_cost,
        result.iterations,
        result.elapsed
    );
    if is_unreachable_cost(result.best_cost) {
        log::warn!("best route still crosses an unreachable target pair");
    }
    Ok(result)
}
