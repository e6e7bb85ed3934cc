//! Bounded-variable primal simplex on a dense tableau.
//!
//! Variable upper bounds are kept out of the constraint matrix: a column
//! whose ratio test is limited by its own bound is complemented
//! (`x' = u - x`) instead of pivoted, and a basic variable that would be
//! driven past its bound leaves the basis at that bound.

use super::config::LpConfig;
use super::types::{PivotRule, Relaxation, RelaxationSolver, VarBounds};
use crate::error::LpError;
use crate::model::{Problem, VarId};

/// Ratio-test values closer than this are treated as ties.
const RATIO_TIE: f64 = 1e-12;

/// Smallest column entry the ratio test pivots on. Kept well below the
/// optimality tolerance: after a pivot on a heavy item, entries of order
/// `1 / weight` are genuine.
const PIVOT_TOL: f64 = 1e-9;

/// Bounded-variable simplex for the knapsack relaxation.
///
/// The tableau has one row per container and one row per item pool, plus a
/// slack per row. Non-zero lower bounds are shifted out of the problem; a
/// row whose shifted right-hand side goes negative gets an artificial
/// variable and is handled by a phase-1 pass.
///
/// # Examples
///
/// ```
/// use u_knapsack::lp::{BoundedSimplex, PivotRule, Relaxation, RelaxationSolver, VarBounds};
/// use u_knapsack::model::{Container, Item, Problem};
///
/// let problem = Problem::new(
///     vec![Item::new("a", 3, 5.0, 4), Item::new("b", 2, 3.0, 10)],
///     vec![Container::new(7)],
/// )
/// .unwrap();
///
/// let lp = BoundedSimplex::default();
/// let bounds = VarBounds::implicit(&problem);
/// let relaxation = lp.solve(&problem, &bounds, PivotRule::Dantzig).unwrap();
/// // two units of "a" fill 6, half a unit of "b" fills the rest
/// assert!((relaxation.objective().unwrap() - 11.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BoundedSimplex {
    config: LpConfig,
}

impl BoundedSimplex {
    pub fn new(config: LpConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LpConfig {
        &self.config
    }
}

impl RelaxationSolver for BoundedSimplex {
    fn solve(
        &self,
        problem: &Problem,
        bounds: &VarBounds,
        rule: PivotRule,
    ) -> Result<Relaxation, LpError> {
        if bounds.is_contradictory() {
            return Ok(Relaxation::Infeasible);
        }

        let eps = self.config.tolerance;
        let nv = problem.num_vars();
        let m = problem.num_containers();
        let nr = m + problem.num_items();

        let lower: Vec<f64> = bounds.lower.iter().map(|&v| v as f64).collect();
        let span: Vec<f64> = bounds
            .lower
            .iter()
            .zip(&bounds.upper)
            .map(|(&lo, &up)| (up - lo) as f64)
            .collect();

        // Right-hand side after shifting every variable by its lower bound.
        let mut rhs: Vec<f64> = problem
            .containers()
            .iter()
            .map(|c| c.capacity as f64)
            .chain(problem.items().iter().map(|item| item.max_count as f64))
            .collect();
        for (j, &lo) in lower.iter().enumerate() {
            if lo != 0.0 {
                let VarId { item, container } = problem.var_id(j);
                rhs[container] -= problem.weight(j) as f64 * lo;
                rhs[m + item] -= lo;
            }
        }

        let artificial_rows: Vec<usize> = (0..nr).filter(|&r| rhs[r] < -eps).collect();
        let ncol = nv + nr + artificial_rows.len();
        let mut tableau = Tableau::new(
            nr,
            ncol,
            eps,
            self.config.iteration_budget(nr, ncol),
            rule,
        );

        for j in 0..nv {
            let VarId { item, container } = problem.var_id(j);
            tableau.set(container, j, problem.weight(j) as f64);
            tableau.set(m + item, j, 1.0);
            tableau.upper[j] = span[j];
        }
        for r in 0..nr {
            tableau.set(r, nv + r, 1.0);
            tableau.basis[r] = nv + r;
        }
        for (a, &r) in artificial_rows.iter().enumerate() {
            tableau.negate_row(r);
            rhs[r] = -rhs[r];
            let col = nv + nr + a;
            tableau.set(r, col, 1.0);
            tableau.basis[r] = col;
        }
        for value in rhs.iter_mut() {
            // only rows within tolerance of zero are left negative here
            if *value < 0.0 {
                *value = 0.0;
            }
        }
        tableau.rhs = rhs;
        for r in 0..nr {
            let b = tableau.basis[r];
            tableau.is_basic[b] = true;
        }

        if !artificial_rows.is_empty() {
            let cost: Vec<f64> = (0..ncol)
                .map(|c| if c >= nv + nr { -1.0 } else { 0.0 })
                .collect();
            tableau.optimize(&cost, ncol)?;

            let infeasibility: f64 = (0..nr)
                .filter(|&r| tableau.basis[r] >= nv + nr)
                .map(|r| tableau.rhs[r])
                .sum();
            if infeasibility > eps * nr.max(1) as f64 {
                return Ok(Relaxation::Infeasible);
            }
            // pin the artificials at zero for phase 2
            for c in nv + nr..ncol {
                tableau.upper[c] = 0.0;
            }
        }

        let cost: Vec<f64> = (0..ncol)
            .map(|c| if c < nv { problem.utility(c) } else { 0.0 })
            .collect();
        tableau.optimize(&cost, nv + nr)?;

        let mut level = vec![0.0; ncol];
        for r in 0..nr {
            level[tableau.basis[r]] = tableau.rhs[r];
        }
        let values: Vec<f64> = (0..nv)
            .map(|j| {
                let v = if tableau.flipped[j] {
                    tableau.upper[j] - level[j]
                } else {
                    level[j]
                };
                lower[j] + v.clamp(0.0, span[j])
            })
            .collect();
        let objective = problem.objective(&values);

        Ok(Relaxation::Optimal { objective, values })
    }
}

/// Dense simplex tableau in row-major order.
struct Tableau {
    rows: usize,
    cols: usize,
    a: Vec<f64>,
    rhs: Vec<f64>,
    /// Per-column upper bound of the (shifted) variable; infinite for slacks.
    upper: Vec<f64>,
    reduced: Vec<f64>,
    basis: Vec<usize>,
    is_basic: Vec<bool>,
    /// Column currently complemented (`x' = upper - x`).
    flipped: Vec<bool>,
    eps: f64,
    rule: PivotRule,
    iterations: usize,
    max_iterations: usize,
}

impl Tableau {
    fn new(rows: usize, cols: usize, eps: f64, max_iterations: usize, rule: PivotRule) -> Self {
        Self {
            rows,
            cols,
            a: vec![0.0; rows * cols],
            rhs: vec![0.0; rows],
            upper: vec![f64::INFINITY; cols],
            reduced: vec![0.0; cols],
            basis: vec![0; rows],
            is_basic: vec![false; cols],
            flipped: vec![false; cols],
            eps,
            rule,
            iterations: 0,
            max_iterations,
        }
    }

    #[inline]
    fn at(&self, r: usize, c: usize) -> f64 {
        self.a[r * self.cols + c]
    }

    #[inline]
    fn set(&mut self, r: usize, c: usize, value: f64) {
        self.a[r * self.cols + c] = value;
    }

    fn negate_row(&mut self, r: usize) {
        for value in &mut self.a[r * self.cols..(r + 1) * self.cols] {
            *value = -*value;
        }
    }

    /// Complements column `j` around its upper bound.
    fn flip(&mut self, j: usize) {
        let u = self.upper[j];
        for r in 0..self.rows {
            let idx = r * self.cols + j;
            self.rhs[r] -= self.a[idx] * u;
            self.a[idx] = -self.a[idx];
        }
        self.reduced[j] = -self.reduced[j];
        self.flipped[j] = !self.flipped[j];
    }

    fn instability(&self) -> LpError {
        LpError::NumericalInstability {
            iterations: self.iterations,
        }
    }

    /// Maximizes `cost · x` from the current basis. Only columns below
    /// `priced` may enter.
    fn optimize(&mut self, cost: &[f64], priced: usize) -> Result<(), LpError> {
        let signed: Vec<f64> = cost
            .iter()
            .zip(&self.flipped)
            .map(|(&c, &flipped)| if flipped { -c } else { c })
            .collect();
        for j in 0..self.cols {
            self.reduced[j] = 0.0;
            if self.is_basic[j] || j >= priced {
                continue;
            }
            let mut d = signed[j];
            for r in 0..self.rows {
                d -= signed[self.basis[r]] * self.at(r, j);
            }
            self.reduced[j] = d;
        }

        loop {
            self.iterations += 1;
            if self.iterations > self.max_iterations {
                return Err(self.instability());
            }

            let Some(q) = self.entering(priced) else {
                return Ok(());
            };

            // Ratio test. `None` means the entering column hits its own bound.
            let mut theta = self.upper[q];
            let mut leave: Option<(usize, bool)> = None;
            let mut leave_alpha = 0.0;
            for r in 0..self.rows {
                let alpha = self.at(r, q);
                let basic = self.basis[r];
                let (ratio, to_upper) = if alpha > PIVOT_TOL {
                    (self.rhs[r] / alpha, false)
                } else if alpha < -PIVOT_TOL && self.upper[basic].is_finite() {
                    ((self.upper[basic] - self.rhs[r]) / -alpha, true)
                } else {
                    continue;
                };
                let ratio = ratio.max(0.0);

                let better = if ratio < theta - RATIO_TIE {
                    true
                } else if let Some((p, _)) = leave {
                    (ratio - theta).abs() <= RATIO_TIE
                        && match self.rule {
                            PivotRule::Bland => basic < self.basis[p],
                            PivotRule::Dantzig => alpha.abs() > leave_alpha,
                        }
                } else {
                    false
                };
                if better {
                    theta = ratio;
                    leave = Some((r, to_upper));
                    leave_alpha = alpha.abs();
                }
            }

            if theta.is_infinite() {
                return Err(self.instability());
            }

            match leave {
                None => self.flip(q),
                Some((p, to_upper)) => {
                    let leaving = self.basis[p];
                    self.pivot(p, q);
                    if to_upper {
                        self.flip(leaving);
                    }
                    if leaving >= priced {
                        self.reduced[leaving] = 0.0;
                    }
                }
            }
        }
    }

    fn entering(&self, priced: usize) -> Option<usize> {
        let mut best = self.eps;
        let mut entering = None;
        for j in 0..priced {
            if self.is_basic[j] || self.reduced[j] <= best {
                continue;
            }
            entering = Some(j);
            if self.rule == PivotRule::Bland {
                break;
            }
            best = self.reduced[j];
        }
        entering
    }

    fn pivot(&mut self, p: usize, q: usize) {
        let cols = self.cols;
        let alpha = self.at(p, q);
        for value in &mut self.a[p * cols..(p + 1) * cols] {
            *value /= alpha;
        }
        self.rhs[p] /= alpha;

        let pivot_row = self.a[p * cols..(p + 1) * cols].to_vec();
        let pivot_rhs = self.rhs[p];
        for r in 0..self.rows {
            if r == p {
                continue;
            }
            let f = self.at(r, q);
            if f == 0.0 {
                continue;
            }
            for (value, &pv) in self.a[r * cols..(r + 1) * cols].iter_mut().zip(&pivot_row) {
                *value -= f * pv;
            }
            self.rhs[r] -= f * pivot_rhs;
        }

        let dq = self.reduced[q];
        for (d, &pv) in self.reduced.iter_mut().zip(&pivot_row) {
            *d -= dq * pv;
        }
        self.reduced[q] = 0.0;

        let leaving = self.basis[p];
        self.basis[p] = q;
        self.is_basic[q] = true;
        self.is_basic[leaving] = false;
    }
}
