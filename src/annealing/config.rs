//! Annealing schedule configuration.

use serde::{Deserialize, Serialize};

use crate::error::DeliveryError;

/// Configuration for a simulated annealing run.
///
/// The temperature decays geometrically, `T_{k+1} = cooling_rate * T_k`,
/// and the run stops once it falls below `min_temperature` or after
/// `max_iterations`. With the defaults the temperature floor ends the run
/// after about 1380 iterations, regardless of problem size.
///
/// # Examples
///
/// ```
/// use u_delivery::annealing::AnnealingConfig;
///
/// let config = AnnealingConfig::default()
///     .with_initial_temperature(500.0)
///     .with_cooling_rate(0.99)
///     .with_max_iterations(2000);
/// assert!(config.validate().is_ok());
///
/// let hot = AnnealingConfig::hot_start();
/// assert_eq!(hot.initial_temperature, 200.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingConfig {
    /// Starting temperature. Higher values accept more uphill moves early.
    pub initial_temperature: f64,

    /// Per-iteration multiplicative decay in (0, 1).
    pub cooling_rate: f64,

    /// Hard iteration budget.
    pub max_iterations: usize,

    /// Absolute temperature below which the run stops.
    pub min_temperature: f64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            cooling_rate: 0.995,
            max_iterations: 5000,
            min_temperature: 1.0,
        }
    }
}

impl AnnealingConfig {
    /// Schedule for refining an existing route after an order is inserted.
    pub fn hot_start() -> Self {
        Self {
            initial_temperature: 200.0,
            max_iterations: 3000,
            ..Self::default()
        }
    }

    /// Hot-start schedule with a tighter budget for interactive use.
    pub fn interactive_hot_start() -> Self {
        Self {
            max_iterations: 1000,
            ..Self::hot_start()
        }
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), DeliveryError> {
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return Err(DeliveryError::InvalidConfig(format!(
                "initial_temperature must be positive, got {}",
                self.initial_temperature
            )));
        }
        if !(self.min_temperature.is_finite() && self.min_temperature > 0.0) {
            return Err(DeliveryError::InvalidConfig(format!(
                "min_temperature must be positive, got {}",
                self.min_temperature
            )));
        }
        if self.min_temperature > self.initial_temperature {
            return Err(DeliveryError::InvalidConfig(
                "min_temperature must not exceed initial_temperature".into(),
            ));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(DeliveryError::InvalidConfig(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        if self.max_iterations == 0 {
            return Err(DeliveryError::InvalidConfig(
                "max_iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
