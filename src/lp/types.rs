//! Relaxation inputs, outputs and the solver seam.

use crate::error::LpError;
use crate::model::Problem;

/// Pivoting rule for choosing the entering column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PivotRule {
    /// Largest positive reduced cost. Fast in practice.
    #[default]
    Dantzig,
    /// Smallest eligible index (Bland 1977). Never cycles.
    Bland,
}

/// Dense per-variable bounds of a subproblem.
///
/// Starts from the problem's implicit bounds; branching only ever tightens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarBounds {
    pub lower: Vec<i64>,
    pub upper: Vec<i64>,
}

impl VarBounds {
    /// `0 ≤ x_j ≤ implicit_upper(j)` for every variable.
    pub fn implicit(problem: &Problem) -> Self {
        let n = problem.num_vars();
        Self {
            lower: vec![0; n],
            upper: (0..n).map(|j| problem.implicit_upper(j)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    pub fn tighten_lower(&mut self, j: usize, value: i64) {
        self.lower[j] = self.lower[j].max(value);
    }

    pub fn tighten_upper(&mut self, j: usize, value: i64) {
        self.upper[j] = self.upper[j].min(value);
    }

    /// Whether some variable has `lower > upper`.
    pub fn is_contradictory(&self) -> bool {
        self.lower.iter().zip(&self.upper).any(|(lo, up)| lo > up)
    }
}

/// Outcome of a relaxation solve.
#[derive(Debug, Clone, PartialEq)]
pub enum Relaxation {
    /// Optimal continuous solution.
    Optimal { objective: f64, values: Vec<f64> },
    /// The bounds admit no feasible point.
    Infeasible,
}

impl Relaxation {
    pub fn objective(&self) -> Option<f64> {
        match self {
            Relaxation::Optimal { objective, .. } => Some(*objective),
            Relaxation::Infeasible => None,
        }
    }
}

/// Solves the continuous relaxation of a bounded subproblem.
///
/// The branch-and-bound driver only talks to this trait, so another LP
/// backend can be plugged in without touching the search.
pub trait RelaxationSolver: Send + Sync {
    /// Maximizes `Σ utility · x` over the problem's container and pool rows
    /// with `bounds.lower ≤ x ≤ bounds.upper`, `x` real-valued.
    fn solve(
        &self,
        problem: &Problem,
        bounds: &VarBounds,
        rule: PivotRule,
    ) -> Result<Relaxation, LpError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Container, Item};

    #[test]
    fn test_implicit_bounds_and_tightening() {
        let p = Problem::new(
            vec![Item::new("a", 3, 5.0, 4)],
            vec![Container::new(7), Container::new(4)],
        )
        .unwrap();
        let mut b = VarBounds::implicit(&p);
        assert_eq!(b.lower, vec![0, 0]);
        assert_eq!(b.upper, vec![2, 1]);

        b.tighten_upper(0, 5);
        assert_eq!(b.upper[0], 2);
        b.tighten_lower(1, 1);
        assert!(!b.is_contradictory());
        b.tighten_upper(1, 0);
        assert!(b.is_contradictory());
    }

    #[test]
    fn test_relaxation_objective() {
        let r = Relaxation::Optimal {
            objective: 3.0,
            values: vec![1.0],
        };
        assert_eq!(r.objective(), Some(3.0));
        assert_eq!(Relaxation::Infeasible.objective(), None);
    }
}
