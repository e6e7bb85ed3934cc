//! Search outcome vocabulary.

use std::fmt;

/// How the search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolveStatus {
    /// The incumbent is proven optimal.
    Optimal,
    /// No feasible assignment exists. Never produced for a validated
    /// problem, since the empty assignment is always feasible.
    Infeasible,
    /// A time, node or cancellation budget stopped the search; the
    /// incumbent is feasible but not proven optimal.
    TimedOut,
    /// The search completed but dropped at least one subproblem after
    /// repeated numerical trouble, so optimality is not guaranteed.
    Degraded,
}

impl SolveStatus {
    /// Whether optimality was proven.
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "Optimal",
            SolveStatus::Infeasible => "Infeasible",
            SolveStatus::TimedOut => "TimedOut",
            SolveStatus::Degraded => "Degraded",
        };
        f.write_str(s)
    }
}

/// Counters collected during one search.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Nodes popped and expanded.
    pub nodes_explored: usize,

    /// Nodes (or children) discarded by the bound test.
    pub nodes_pruned: usize,

    /// Nodes (or children) whose relaxation was infeasible.
    pub nodes_infeasible: usize,

    /// Subproblems dropped after the relaxation failed twice.
    pub nodes_dropped: usize,

    /// Times the incumbent improved, including the initial seed.
    pub incumbent_updates: usize,

    /// Largest worklist size seen.
    pub max_worklist: usize,

    /// Best bound on the optimum at termination. Equals the incumbent
    /// objective when the search completed.
    pub best_bound: f64,

    /// Upper bound from the surrogate knapsack, if it was computed.
    pub surrogate_bound: Option<f64>,

    /// Wall-clock time in milliseconds.
    pub elapsed_ms: u64,
}
