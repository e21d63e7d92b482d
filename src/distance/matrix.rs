//! Dense, growable travel-cost matrix.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::Rng;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::TrafficModel;
use crate::error::DeliveryError;
use crate::models::TargetSet;
use crate::network::RoadNetwork;

/// Cost stored for a pair with no path between them.
///
/// Large but finite, so route costs stay comparable and a route through an
/// unreachable pair is always dominated by one that avoids it.
pub const UNREACHABLE: f64 = 1e9;

/// Returns `true` if `cost` includes at least one unreachable leg.
pub fn is_unreachable_cost(cost: f64) -> bool {
    cost >= UNREACHABLE
}

/// A dense n×n travel-cost matrix stored in row-major order.
///
/// `get(i, j)` is the cost of travelling from target `i` to target `j`. The
/// matrix is generally asymmetric and its diagonal is never read by the
/// optimizer.
///
/// # Examples
///
/// ```
/// use u_delivery::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 5.0, 8.0],
///     vec![6.0, 0.0, 2.0],
///     vec![8.0, 3.0, 0.0],
/// ])
/// .unwrap();
/// assert_eq!(dm.get(1, 2), 2.0);
/// assert_eq!(dm.size(), 3);
/// assert!(!dm.is_symmetric(1e-10));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

/// Unchecked wire form; goes through [`DistanceMatrix::from_data`].
#[derive(Deserialize)]
struct RawMatrix {
    data: Vec<f64>,
    size: usize,
}

impl TryFrom<RawMatrix> for DistanceMatrix {
    type Error = String;

    fn try_from(raw: RawMatrix) -> Result<Self, Self::Error> {
        let (size, len) = (raw.size, raw.data.len());
        Self::from_data(size, raw.data)
            .ok_or_else(|| format!("matrix of size {size} needs {} entries, got {len}", size * size))
    }
}

impl DistanceMatrix {
    /// Creates a matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Creates a zero matrix with room to grow to `capacity` targets
    /// without reallocating.
    pub fn with_capacity(size: usize, capacity: usize) -> Self {
        let mut data = Vec::with_capacity(capacity.max(size).pow(2));
        data.resize(size * size, 0.0);
        Self { data, size }
    }

    /// Creates a matrix from an explicit row-major n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Creates a matrix from square rows.
    ///
    /// Returns `None` if any row length differs from the number of rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|r| r.len() != size) {
            return None;
        }
        Some(Self {
            data: rows.concat(),
            size,
        })
    }

    /// Builds the matrix for `targets` by querying `network` for every
    /// ordered pair.
    ///
    /// Each off-diagonal entry is the shortest-path length times a factor
    /// drawn from `traffic`. Pairs without a path get [`UNREACHABLE`].
    /// Factors are drawn in row-major order, so the result depends only on
    /// the RNG stream.
    pub fn build<N, R>(
        targets: &TargetSet<N::Location>,
        network: &N,
        traffic: TrafficModel,
        rng: &mut R,
    ) -> Result<Self, DeliveryError>
    where
        N: RoadNetwork,
        R: Rng,
    {
        Self::build_with_cancel(targets, network, traffic, rng, None)
    }

    /// Builds the matrix, checking `cancel` before each row of queries.
    pub fn build_with_cancel<N, R>(
        targets: &TargetSet<N::Location>,
        network: &N,
        traffic: TrafficModel,
        rng: &mut R,
        cancel: Option<&AtomicBool>,
    ) -> Result<Self, DeliveryError>
    where
        N: RoadNetwork,
        R: Rng,
    {
        traffic.validate()?;
        let locations = targets.as_slice();
        let n = locations.len();
        log::debug!("querying {} target pairs for the distance matrix", n * n.saturating_sub(1));

        let lengths = query_lengths(locations, network, cancel).ok_or(DeliveryError::Cancelled)?;

        let mut dm = Self::new(n);
        for (i, row) in lengths.into_iter().enumerate() {
            for (j, length) in row.into_iter().enumerate() {
                if i != j {
                    dm.set(i, j, apply_traffic(length, traffic, rng));
                }
            }
        }

        let unreachable = dm.unreachable_pairs().len();
        if unreachable > 0 {
            log::warn!("distance matrix has {unreachable} unreachable target pairs");
        }
        log::debug!("distance matrix ready: {n}x{n}");
        Ok(dm)
    }

    /// Grows the matrix by one row and column for the target just appended
    /// to `targets`, returning its index.
    ///
    /// Existing entries are copied unchanged; only the 2N entries involving
    /// the new target are queried and perturbed by `traffic`.
    pub fn extend<N, R>(
        &mut self,
        targets: &TargetSet<N::Location>,
        network: &N,
        traffic: TrafficModel,
        rng: &mut R,
    ) -> Result<usize, DeliveryError>
    where
        N: RoadNetwork,
        R: Rng,
    {
        if targets.len() != self.size + 1 {
            return Err(DeliveryError::DimensionMismatch {
                targets: targets.len(),
                matrix: self.size,
            });
        }
        traffic.validate()?;

        let new_idx = self.size;
        self.grow();

        let locations = targets.as_slice();
        let new_loc = &locations[new_idx];
        for (i, loc) in locations[..new_idx].iter().enumerate() {
            let to = network.shortest_path_length(loc, new_loc);
            let from = network.shortest_path_length(new_loc, loc);
            self.set(i, new_idx, apply_traffic(to, traffic, rng));
            self.set(new_idx, i, apply_traffic(from, traffic, rng));
        }

        log::debug!("distance matrix extended to {0}x{0}", self.size);
        Ok(new_idx)
    }

    /// Adds an empty last row and column, keeping the existing block.
    fn grow(&mut self) {
        let old = self.size;
        let new = old + 1;
        let mut data = Vec::with_capacity(self.data.capacity().max(new * new));
        for row in self.data.chunks_exact(old.max(1)).take(old) {
            data.extend_from_slice(row);
            data.push(0.0);
        }
        data.resize(new * new, 0.0);
        self.data = data;
        self.size = new;
    }

    /// Returns the cost from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the cost from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, cost: f64) {
        self.data[from * self.size + to] = cost;
    }

    /// Row `from` as a slice.
    pub fn row(&self, from: usize) -> &[f64] {
        &self.data[from * self.size..(from + 1) * self.size]
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Off-diagonal `(from, to)` pairs holding the unreachable sentinel.
    pub fn unreachable_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for i in 0..self.size {
            for j in 0..self.size {
                if i != j && is_unreachable_cost(self.get(i, j)) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }
}

fn apply_traffic<R: Rng>(length: Option<f64>, traffic: TrafficModel, rng: &mut R) -> f64 {
    match length {
        Some(len) => len * traffic.factor(rng),
        None => UNREACHABLE,
    }
}

fn query_row<N: RoadNetwork>(locations: &[N::Location], network: &N, i: usize) -> Vec<Option<f64>> {
    locations
        .iter()
        .enumerate()
        .map(|(j, to)| {
            if i == j {
                None
            } else {
                network.shortest_path_length(&locations[i], to)
            }
        })
        .collect()
}

fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
}

/// Shortest-path lengths for every ordered pair, or `None` if cancelled.
#[cfg(not(feature = "parallel"))]
fn query_lengths<N: RoadNetwork>(
    locations: &[N::Location],
    network: &N,
    cancel: Option<&AtomicBool>,
) -> Option<Vec<Vec<Option<f64>>>> {
    (0..locations.len())
        .map(|i| {
            if is_cancelled(cancel) {
                None
            } else {
                Some(query_row(locations, network, i))
            }
        })
        .collect()
}

/// Shortest-path lengths for every ordered pair, or `None` if cancelled.
///
/// Rows are dispatched across the rayon pool; each row writes only its own
/// slot, and the collect is the barrier before traffic is applied.
#[cfg(feature = "parallel")]
fn query_lengths<N: RoadNetwork>(
    locations: &[N::Location],
    network: &N,
    cancel: Option<&AtomicBool>,
) -> Option<Vec<Vec<Option<f64>>>> {
    (0..locations.len())
        .into_par_iter()
        .map(|i| {
            if is_cancelled(cancel) {
                None
            } else {
                Some(query_row(locations, network, i))
            }
        })
        .collect()
}
