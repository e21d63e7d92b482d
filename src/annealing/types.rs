//! Core trait for simulated annealing.

use rand::Rng;

/// Defines a problem the [`Annealer`](super::Annealer) can minimize.
///
/// The implementor supplies a starting point, the energy function, and a
/// move operator; the annealer owns temperature, acceptance and bookkeeping.
pub trait AnnealingProblem {
    /// The solution representation type.
    type Solution: Clone;

    /// Creates a random starting solution for a cold start.
    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Self::Solution;

    /// Computes the cost of a solution. Lower is better.
    fn cost(&self, solution: &Self::Solution) -> f64;

    /// Generates a neighbor of the current solution.
    fn neighbor<R: Rng>(&self, solution: &Self::Solution, rng: &mut R) -> Self::Solution;
}
