//! Annealing execution loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::AnnealingConfig;
use super::types::AnnealingProblem;

/// Result of a simulated annealing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnealingResult<S> {
    /// The best solution found.
    pub best: S,

    /// Cost of the best solution.
    pub best_cost: f64,

    /// Best cost after every completed iteration; non-increasing.
    pub history: Vec<f64>,

    /// Number of completed iterations.
    pub iterations: usize,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of strictly improving moves.
    pub improving_moves: usize,

    /// Temperature when the loop stopped.
    pub final_temperature: f64,

    /// Whether the run stopped on its cancellation flag.
    pub cancelled: bool,

    /// Wall-clock time spent in the loop.
    pub elapsed: Duration,
}

/// Executes simulated annealing.
pub struct Annealer;

impl Annealer {
    /// Runs annealing from `initial`, or from a random solution if `None`.
    pub fn run<P, R>(
        problem: &P,
        initial: Option<P::Solution>,
        config: &AnnealingConfig,
        rng: &mut R,
    ) -> AnnealingResult<P::Solution>
    where
        P: AnnealingProblem,
        R: Rng,
    {
        Self::run_with_cancel(problem, initial, config, rng, None)
    }

    /// Runs annealing, checking `cancel` before every iteration.
    ///
    /// The configuration is assumed valid; see [`AnnealingConfig::validate`].
    pub fn run_with_cancel<P, R>(
        problem: &P,
        initial: Option<P::Solution>,
        config: &AnnealingConfig,
        rng: &mut R,
        cancel: Option<&AtomicBool>,
    ) -> AnnealingResult<P::Solution>
    where
        P: AnnealingProblem,
        R: Rng,
    {
        let start = Instant::now();

        let mut current = match initial {
            Some(solution) => solution,
            None => problem.initial_solution(rng),
        };
        let mut current_cost = problem.cost(&current);
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let mut temperature = config.initial_temperature;
        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut cancelled = false;
        let mut history = Vec::with_capacity(config.max_iterations.min(expected_steps(config)));

        while temperature >= config.min_temperature && iterations < config.max_iterations {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                cancelled = true;
                break;
            }

            let neighbor = problem.neighbor(&current, rng);
            let neighbor_cost = problem.cost(&neighbor);
            let delta = neighbor_cost - current_cost;

            // Metropolis acceptance criterion
            let accept = if delta < 0.0 {
                improving_moves += 1;
                true
            } else {
                rng.random::<f64>() < (-delta / temperature).exp()
            };

            if accept {
                current = neighbor;
                current_cost = neighbor_cost;
                accepted_moves += 1;

                if current_cost < best_cost {
                    best = current.clone();
                    best_cost = current_cost;
                }
            }

            history.push(best_cost);
            iterations += 1;
            temperature *= config.cooling_rate;
        }

        AnnealingResult {
            best,
            best_cost,
            history,
            iterations,
            accepted_moves,
            improving_moves,
            final_temperature: temperature,
            cancelled,
            elapsed: start.elapsed(),
        }
    }
}

/// Number of cooling steps until the temperature floor is crossed.
fn expected_steps(config: &AnnealingConfig) -> usize {
    let steps = (config.min_temperature / config.initial_temperature).ln() / config.cooling_rate.ln();
    if steps.is_finite() && steps >= 0.0 {
        steps as usize + 1
    } else {
        0
    }
}
