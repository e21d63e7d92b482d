//! Static traffic model applied to road lengths.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::DeliveryError;

/// Multiplicative congestion factor applied once per matrix entry.
///
/// Each directed entry gets its own factor, so `i → j` and `j → i` differ
/// even on a symmetric road network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TrafficModel {
    /// No congestion: factor 1.
    Free,
    /// The same factor for every entry.
    Fixed(f64),
    /// A factor drawn uniformly from `[min, max]` per entry.
    Uniform {
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
    },
}

impl Default for TrafficModel {
    fn default() -> Self {
        TrafficModel::Uniform { min: 1.0, max: 1.2 }
    }
}

impl TrafficModel {
    /// Draws the factor for one matrix entry.
    ///
    /// Only `Uniform` consumes randomness.
    pub fn factor<R: Rng>(&self, rng: &mut R) -> f64 {
        match *self {
            TrafficModel::Free => 1.0,
            TrafficModel::Fixed(f) => f,
            TrafficModel::Uniform { min, max } => rng.random_range(min..=max),
        }
    }

    /// Validates the factors: finite, at least 1, and `min <= max`.
    pub fn validate(&self) -> Result<(), DeliveryError> {
        let check = |f: f64| {
            if !f.is_finite() || f < 1.0 {
                Err(DeliveryError::InvalidConfig(format!(
                    "traffic factor must be finite and >= 1, got {f}"
                )))
            } else {
                Ok(())
            }
        };
        match *self {
            TrafficModel::Free => Ok(()),
            TrafficModel::Fixed(f) => check(f),
            TrafficModel::Uniform { min, max } => {
                check(min)?;
                check(max)?;
                if min > max {
                    return Err(DeliveryError::InvalidConfig(format!(
                        "traffic range is empty: [{min}, {max}]"
                    )));
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_range() {
        assert_eq!(
            TrafficModel::default(),
            TrafficModel::Uniform { min: 1.0, max: 1.2 }
        );
    }

    #[test]
    fn test_uniform_factor_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let model = TrafficModel::default();
        for _ in 0..1000 {
            let f = model.factor(&mut rng);
            assert!((1.0..=1.2).contains(&f), "factor {f} out of range");
        }
    }

    #[test]
    fn test_fixed_and_free() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(TrafficModel::Fixed(1.2).factor(&mut rng), 1.2);
        assert_eq!(TrafficModel::Free.factor(&mut rng), 1.0);
    }

    #[test]
    fn test_validate() {
        assert!(TrafficModel::default().validate().is_ok());
        assert!(TrafficModel::Fixed(1.2).validate().is_ok());
        assert!(TrafficModel::Fixed(0.5).validate().is_err());
        assert!(TrafficModel::Fixed(f64::NAN).validate().is_err());
        assert!(TrafficModel::Uniform { min: 1.3, max: 1.1 }
            .validate()
            .is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&TrafficModel::default()).expect("serialize");
        let back: TrafficModel = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, TrafficModel::default());
    }
}
