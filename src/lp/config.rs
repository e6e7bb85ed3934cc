//! Relaxation solver configuration.

/// Configuration for the bounded-variable simplex.
///
/// # Examples
///
/// ```
/// use u_knapsack::lp::LpConfig;
///
/// let config = LpConfig::default()
///     .with_tolerance(1e-7)
///     .with_max_iterations(10_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LpConfig {
    /// Feasibility and optimality tolerance.
    pub tolerance: f64,

    /// Pivot budget per solve. 0 = automatic (`50 · (rows + columns) + 1000`).
    pub max_iterations: usize,
}

impl Default for LpConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 0,
        }
    }
}

impl LpConfig {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Pivot budget for a tableau of the given shape.
    pub(crate) fn iteration_budget(&self, rows: usize, cols: usize) -> usize {
        if self.max_iterations > 0 {
            self.max_iterations
        } else {
            50 * (rows + cols) + 1000
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.tolerance > 0.0 && self.tolerance < 0.5) {
            return Err(format!(
                "tolerance must be in (0, 0.5), got {}",
                self.tolerance
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LpConfig::default();
        assert!((config.tolerance - 1e-6).abs() < 1e-15);
        assert_eq!(config.max_iterations, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_iteration_budget() {
        assert_eq!(LpConfig::default().iteration_budget(12, 32), 50 * 44 + 1000);
        assert_eq!(
            LpConfig::default()
                .with_max_iterations(7)
                .iteration_budget(12, 32),
            7
        );
    }

    #[test]
    fn test_validate_bad_tolerance() {
        assert!(LpConfig::default().with_tolerance(0.0).validate().is_err());
        assert!(LpConfig::default().with_tolerance(f64::NAN).validate().is_err());
        assert!(LpConfig::default().with_tolerance(0.7).validate().is_err());
    }
}
