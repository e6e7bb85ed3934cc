//! Branch-and-bound configuration.

use crate::lp::LpConfig;

/// Configuration for the branch-and-bound driver.
///
/// # Examples
///
/// ```
/// use u_knapsack::bnb::BnbConfig;
///
/// let config = BnbConfig::default()
///     .with_time_limit_ms(5_000)
///     .with_node_limit(100_000)
///     .with_rounding_heuristic(false);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BnbConfig {
    /// Integrality and pruning tolerance.
    pub tolerance: f64,

    /// Maximum number of expanded nodes. 0 = no limit.
    pub node_limit: usize,

    /// Wall-clock budget in milliseconds. 0 = no limit.
    pub time_limit_ms: u64,

    /// Maximum number of open nodes kept in the worklist. Reaching it stops
    /// the search like any other budget. 0 = no limit.
    pub worklist_limit: usize,

    /// Round each fractional relaxation into a feasible assignment.
    pub rounding_heuristic: bool,

    /// Bound the search with the surrogate (aggregated-capacity) knapsack
    /// and seed the incumbent from it.
    pub surrogate_bound: bool,

    /// Largest surrogate table, in `parts × (capacity + 1)` cells.
    pub surrogate_cell_limit: u64,

    /// Largest aggregated capacity the surrogate is attempted for.
    pub surrogate_max_capacity: i64,

    /// Expand nodes concurrently (requires the `parallel` feature).
    pub parallel: bool,

    /// Nodes expanded per parallel round.
    pub batch_size: usize,

    /// Relaxation solver settings.
    pub lp: LpConfig,
}

impl Default for BnbConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            node_limit: 0,
            time_limit_ms: 0,
            worklist_limit: 1_000_000,
            rounding_heuristic: true,
            surrogate_bound: true,
            surrogate_cell_limit: 1 << 28,
            surrogate_max_capacity: 1 << 22,
            parallel: false,
            batch_size: 8,
            lp: LpConfig::default(),
        }
    }
}

impl BnbConfig {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_node_limit(mut self, n: usize) -> Self {
        self.node_limit = n;
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    pub fn with_worklist_limit(mut self, n: usize) -> Self {
        self.worklist_limit = n;
        self
    }

    pub fn with_rounding_heuristic(mut self, enabled: bool) -> Self {
        self.rounding_heuristic = enabled;
        self
    }

    pub fn with_surrogate_bound(mut self, enabled: bool) -> Self {
        self.surrogate_bound = enabled;
        self
    }

    pub fn with_surrogate_cell_limit(mut self, cells: u64) -> Self {
        self.surrogate_cell_limit = cells;
        self
    }

    pub fn with_surrogate_max_capacity(mut self, capacity: i64) -> Self {
        self.surrogate_max_capacity = capacity;
        self
    }

    /// Enables or disables parallel node expansion.
    ///
    /// Without the `parallel` feature the flag is accepted and ignored.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_batch_size(mut self, n: usize) -> Self {
        self.batch_size = n;
        self
    }

    pub fn with_lp(mut self, lp: LpConfig) -> Self {
        self.lp = lp;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.tolerance > 0.0 && self.tolerance < 0.5) {
            return Err(format!(
                "tolerance must be in (0, 0.5), got {}",
                self.tolerance
            ));
        }
        if self.batch_size == 0 {
            return Err("batch_size must be at least 1".into());
        }
        if self.surrogate_max_capacity < 0 {
            return Err(format!(
                "surrogate_max_capacity must be non-negative, got {}",
                self.surrogate_max_capacity
            ));
        }
        self.lp.validate().map_err(|e| format!("lp: {e}"))
    }
}
