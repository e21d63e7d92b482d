//! Convergence statistics over a best-cost history.

use serde::{Deserialize, Serialize};

/// How far a search improved on its starting point.
///
/// # Examples
///
/// ```
/// use u_delivery::evaluation::Convergence;
///
/// let c = Convergence::from_history(&[200.0, 150.0, 150.0, 100.0]).unwrap();
/// assert_eq!(c.iterations, 4);
/// assert!((c.improvement_percent - 50.0).abs() < 1e-10);
/// assert!((c.saving - 100.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Convergence {
    /// First recorded best cost.
    pub initial_cost: f64,
    /// Last recorded best cost.
    pub final_cost: f64,
    /// `initial_cost - final_cost`.
    pub saving: f64,
    /// Saving as a percentage of the initial cost; 0 when the initial cost is 0.
    pub improvement_percent: f64,
    /// Number of recorded iterations.
    pub iterations: usize,
}

impl Convergence {
    /// Summarizes a history. Returns `None` for an empty history.
    pub fn from_history(history: &[f64]) -> Option<Self> {
        let initial_cost = *history.first()?;
        let final_cost = *history.last()?;
        let saving = initial_cost - final_cost;
        let improvement_percent = if initial_cost > 0.0 {
            saving / initial_cost * 100.0
        } else {
            0.0
        };
        Some(Self {
            initial_cost,
            final_cost,
            saving,
            improvement_percent,
            iterations: history.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history() {
        assert!(Convergence::from_history(&[]).is_none());
    }

    #[test]
    fn test_no_improvement() {
        let c = Convergence::from_history(&[10.0, 10.0]).expect("non-empty");
        assert_eq!(c.saving, 0.0);
        assert_eq!(c.improvement_percent, 0.0);
    }

    #[test]
    fn test_zero_initial_cost() {
        let c = Convergence::from_history(&[0.0]).expect("non-empty");
        assert_eq!(c.improvement_percent, 0.0);
        assert_eq!(c.iterations, 1);
    }
}
