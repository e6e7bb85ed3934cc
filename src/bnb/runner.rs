//! Best-first branch-and-bound loop.

use super::config::BnbConfig;
use super::heuristic;
use super::node::{Node, Override, Solved};
use super::surrogate;
use super::types::{SearchStats, SolveStatus};
use crate::error::KnapsackError;
use crate::lp::{BoundedSimplex, PivotRule, Relaxation, RelaxationSolver, VarBounds};
use crate::model::Problem;
use log::{debug, info, trace, warn};
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "parallel")]
use std::sync::Mutex;

/// Result of a branch-and-bound run.
#[derive(Debug, Clone)]
pub struct BnbResult {
    /// Incumbent assignment, one value per variable (item-major).
    pub values: Vec<f64>,

    /// Objective of the incumbent.
    pub objective: f64,

    /// How the search ended.
    pub status: SolveStatus,

    /// Search counters.
    pub stats: SearchStats,
}

/// Executes the branch-and-bound search.
///
/// # Examples
///
/// ```
/// use u_knapsack::bnb::{BnbConfig, BnbRunner, SolveStatus};
/// use u_knapsack::model::{Container, Item, Problem};
///
/// let problem = Problem::new(
///     vec![Item::new("a", 3, 5.0, 4), Item::new("b", 2, 3.0, 10)],
///     vec![Container::new(7)],
/// )
/// .unwrap();
///
/// let result = BnbRunner::run(&problem, &BnbConfig::default()).unwrap();
/// assert_eq!(result.status, SolveStatus::Optimal);
/// assert!((result.objective - 11.0).abs() < 1e-9);
/// ```
pub struct BnbRunner;

impl BnbRunner {
    /// Runs the search with the built-in simplex.
    pub fn run(problem: &Problem, config: &BnbConfig) -> Result<BnbResult, KnapsackError> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs the search with an optional cancellation token.
    pub fn run_with_cancel(
        problem: &Problem,
        config: &BnbConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<BnbResult, KnapsackError> {
        let solver = BoundedSimplex::new(config.lp);
        Self::run_with_solver(problem, config, &solver, cancel)
    }

    /// Runs the search with a caller-supplied relaxation solver.
    pub fn run_with_solver<S: RelaxationSolver>(
        problem: &Problem,
        config: &BnbConfig,
        solver: &S,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<BnbResult, KnapsackError> {
        config.validate().map_err(KnapsackError::Config)?;

        let start = Instant::now();
        let deadline = (config.time_limit_ms > 0)
            .then(|| start + Duration::from_millis(config.time_limit_ms));

        info!(
            "branch-and-bound: {} items, {} containers, {} variables",
            problem.num_items(),
            problem.num_containers(),
            problem.num_vars()
        );

        let mut search = Search::new(problem, config, solver);
        let mut stats = SearchStats::default();
        let mut incumbent = Incumbent::empty(problem.num_vars());

        if config.surrogate_bound {
            search.seed_from_surrogate(&mut incumbent, &mut stats);
        }

        let budget = Budget {
            deadline,
            node_limit: config.node_limit,
            worklist_limit: config.worklist_limit,
            cancel,
        };

        #[cfg(feature = "parallel")]
        let outcome = if config.parallel {
            search.run_parallel(incumbent, &mut stats, &budget)
        } else {
            search.run_sequential(incumbent, &mut stats, &budget)
        };
        #[cfg(not(feature = "parallel"))]
        let outcome = search.run_sequential(incumbent, &mut stats, &budget);

        let (incumbent, open_bound) = outcome;
        let status = match open_bound {
            Some(_) => SolveStatus::TimedOut,
            None if stats.nodes_dropped > 0 => SolveStatus::Degraded,
            None => SolveStatus::Optimal,
        };
        stats.best_bound = match open_bound {
            Some(bound) => bound.min(search.global_bound).max(incumbent.objective),
            None => incumbent.objective,
        };
        stats.elapsed_ms = start.elapsed().as_millis() as u64;

        info!(
            "branch-and-bound finished: {status}, objective {:.2}, {} nodes in {} ms",
            incumbent.objective, stats.nodes_explored, stats.elapsed_ms
        );

        Ok(BnbResult {
            values: incumbent.values,
            objective: incumbent.objective,
            status,
            stats,
        })
    }
}

/// Best assignment found so far.
#[derive(Debug, Clone)]
struct Incumbent {
    objective: f64,
    values: Vec<f64>,
}

impl Incumbent {
    /// The empty assignment, feasible for every valid problem.
    fn empty(num_vars: usize) -> Self {
        Self {
            objective: 0.0,
            values: vec![0.0; num_vars],
        }
    }

    fn from_counts(problem: &Problem, counts: &[i64]) -> Self {
        Self {
            objective: heuristic::objective(problem, counts),
            values: counts.iter().map(|&x| x as f64).collect(),
        }
    }
}

struct Budget {
    deadline: Option<Instant>,
    node_limit: usize,
    worklist_limit: usize,
    cancel: Option<Arc<AtomicBool>>,
}

impl Budget {
    fn exhausted(&self, explored: usize, open: usize) -> bool {
        if let Some(ref flag) = self.cancel {
            if flag.load(Ordering::Relaxed) {
                return true;
            }
        }
        if self.node_limit > 0 && explored >= self.node_limit {
            return true;
        }
        if self.worklist_limit > 0 && open >= self.worklist_limit {
            return true;
        }
        matches!(self.deadline, Some(d) if Instant::now() >= d)
    }
}

/// Relaxation outcome after the retry policy.
enum NodeLp {
    Solved(Solved),
    Infeasible,
    Dropped,
}

/// What expanding one node produced.
#[derive(Default)]
struct Expansion {
    children: Vec<(Override, f64, Solved)>,
    candidate: Option<Incumbent>,
    pruned: usize,
    infeasible: usize,
    dropped: usize,
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    improved: bool,
}

/// Per-invocation search context.
struct Search<'a, S> {
    problem: &'a Problem,
    config: &'a BnbConfig,
    solver: &'a S,
    base: VarBounds,
    order: Vec<usize>,
    integral: bool,
    /// Problem-wide upper bound (surrogate optimum), or infinity.
    global_bound: f64,
}

impl<'a, S: RelaxationSolver> Search<'a, S> {
    fn new(problem: &'a Problem, config: &'a BnbConfig, solver: &'a S) -> Self {
        Self {
            problem,
            config,
            solver,
            base: VarBounds::implicit(problem),
            order: heuristic::density_order(problem),
            integral: problem.has_integral_objective(),
            global_bound: f64::INFINITY,
        }
    }

    /// Bound used for ordering and pruning: capped by the global bound and,
    /// for integral objectives, rounded down.
    fn effective(&self, bound: f64) -> f64 {
        let b = bound.min(self.global_bound);
        if self.integral && b.is_finite() {
            (b + self.config.tolerance).floor()
        } else {
            b
        }
    }

    fn dominated(&self, bound: f64, incumbent: f64) -> bool {
        self.effective(bound) <= incumbent + self.config.tolerance
    }

    fn seed_from_surrogate(&mut self, incumbent: &mut Incumbent, stats: &mut SearchStats) {
        let Some(merged) = surrogate::solve(
            self.problem,
            self.config.surrogate_cell_limit,
            self.config.surrogate_max_capacity,
        ) else {
            debug!("surrogate bound skipped: table exceeds configured limits");
            return;
        };

        self.global_bound = merged.bound;
        stats.surrogate_bound = Some(merged.bound);

        let mut counts = surrogate::split(self.problem, &merged.counts);
        heuristic::fill(self.problem, &mut counts, &self.base.upper, &self.order);
        let seeded = Incumbent::from_counts(self.problem, &counts);
        debug!(
            "surrogate bound {:.2}, split assignment {:.2}",
            merged.bound, seeded.objective
        );
        if seeded.objective > incumbent.objective + self.config.tolerance {
            *incumbent = seeded;
            stats.incumbent_updates += 1;
        }
    }

    /// Solves a relaxation, retrying once with Bland's rule.
    fn relax(&self, bounds: &VarBounds) -> NodeLp {
        let first = self.solver.solve(self.problem, bounds, PivotRule::Dantzig);
        let result = match first {
            Ok(r) => Ok(r),
            Err(e) => {
                debug!("{e}; retrying with Bland's rule");
                self.solver.solve(self.problem, bounds, PivotRule::Bland)
            }
        };
        match result {
            Ok(Relaxation::Optimal { objective, values }) => {
                NodeLp::Solved(Solved { objective, values })
            }
            Ok(Relaxation::Infeasible) => NodeLp::Infeasible,
            Err(e) => {
                warn!("dropping subproblem: {e}");
                NodeLp::Dropped
            }
        }
    }

    /// Solves, prunes, rounds and branches one node against the incumbent
    /// value `incumbent`. Takes the node's cached relaxation.
    fn expand(&self, node: &mut Node, incumbent: f64) -> Expansion {
        let eps = self.config.tolerance;
        let mut out = Expansion::default();
        let bounds = node.bounds(&self.base);

        let solved = match node.relaxation.take() {
            Some(solved) => solved,
            None => match self.relax(&bounds) {
                NodeLp::Solved(solved) => solved,
                NodeLp::Infeasible => {
                    out.infeasible += 1;
                    return out;
                }
                NodeLp::Dropped => {
                    out.dropped += 1;
                    return out;
                }
            },
        };
        trace!(
            "node {} depth {}: bound {:.4}",
            node.seq,
            node.depth(),
            solved.objective
        );

        let mut best = incumbent;
        if self.dominated(solved.objective, best) {
            out.pruned += 1;
            return out;
        }

        let (var, value) = match branching_variable(&solved.values, eps) {
            Some(branch) => branch,
            None => {
                // Integral within tolerance: snap to exact counts and accept.
                let counts: Vec<i64> = solved.values.iter().map(|v| v.round() as i64).collect();
                if heuristic::is_feasible(self.problem, &counts, &bounds) {
                    let snapped = Incumbent::from_counts(self.problem, &counts);
                    if snapped.objective > best + eps {
                        out.candidate = Some(snapped);
                    }
                    return out;
                }
                // Snapping overloaded a row (heavy items turn a tiny
                // fraction into whole grams). Keep searching below the node.
                match snap_violator(self.problem, &solved.values) {
                    Some(branch) => {
                        trace!("node {}: snapped counts infeasible, branching", node.seq);
                        branch
                    }
                    None => {
                        warn!(
                            "dropping node {}: integral relaxation violates a row",
                            node.seq
                        );
                        out.dropped += 1;
                        return out;
                    }
                }
            }
        };

        if self.config.rounding_heuristic {
            let (objective, counts) =
                heuristic::round_and_fill(self.problem, &solved.values, &bounds, &self.order, eps);
            if objective > best + eps && heuristic::is_feasible(self.problem, &counts, &bounds) {
                best = objective;
                out.candidate = Some(Incumbent::from_counts(self.problem, &counts));
            }
            if self.dominated(solved.objective, best) {
                out.pruned += 1;
                return out;
            }
        }

        let branches = [
            Override::Upper {
                var,
                value: value.floor() as i64,
            },
            Override::Lower {
                var,
                value: value.ceil() as i64,
            },
        ];
        for branch in branches {
            let mut child_bounds = bounds.clone();
            branch.apply(&mut child_bounds);
            match self.relax(&child_bounds) {
                NodeLp::Solved(child) => {
                    if self.dominated(child.objective, best) {
                        out.pruned += 1;
                    } else {
                        let priority = self.effective(child.objective);
                        out.children.push((branch, priority, child));
                    }
                }
                NodeLp::Infeasible => out.infeasible += 1,
                NodeLp::Dropped => out.dropped += 1,
            }
        }
        out
    }

    /// Folds an expansion's counters into `stats` and its children into
    /// the worklist.
    fn merge(
        &self,
        parent: &Node,
        expansion: Expansion,
        heap: &mut BinaryHeap<Node>,
        seq: &mut u64,
        stats: &mut SearchStats,
    ) {
        stats.nodes_pruned += expansion.pruned;
        stats.nodes_infeasible += expansion.infeasible;
        stats.nodes_dropped += expansion.dropped;
        for (branch, priority, solved) in expansion.children {
            heap.push(parent.child(branch, &self.base, priority, *seq, solved));
            *seq += 1;
        }
        stats.max_worklist = stats.max_worklist.max(heap.len());
    }

    /// Returns the incumbent and, if a budget stopped the search, the best
    /// bound still open.
    fn run_sequential(
        &self,
        mut incumbent: Incumbent,
        stats: &mut SearchStats,
        budget: &Budget,
    ) -> (Incumbent, Option<f64>) {
        let mut heap = BinaryHeap::new();
        heap.push(Node::root());
        let mut seq = 1u64;

        while let Some(open) = heap.peek().map(|n| n.priority) {
            if budget.exhausted(stats.nodes_explored, heap.len()) {
                debug!("budget exhausted with {} open nodes", heap.len());
                return (incumbent, Some(open));
            }
            let Some(mut node) = heap.pop() else { break };
            if node.priority <= incumbent.objective + self.config.tolerance {
                // Best-first: nothing left can beat the incumbent.
                stats.nodes_pruned += 1 + heap.len();
                heap.clear();
                break;
            }
            stats.nodes_explored += 1;

            let mut expansion = self.expand(&mut node, incumbent.objective);
            if let Some(candidate) = expansion.candidate.take() {
                if candidate.objective > incumbent.objective + self.config.tolerance {
                    debug!(
                        "incumbent {:.2} -> {:.2} at node {}",
                        incumbent.objective, candidate.objective, stats.nodes_explored
                    );
                    incumbent = candidate;
                    stats.incumbent_updates += 1;
                }
            }
            self.merge(&node, expansion, &mut heap, &mut seq, stats);
        }
        (incumbent, None)
    }

    /// Like [`run_sequential`](Self::run_sequential), but pops up to
    /// `batch_size` nodes per round and expands them on the rayon pool.
    #[cfg(feature = "parallel")]
    fn run_parallel(
        &self,
        incumbent: Incumbent,
        stats: &mut SearchStats,
        budget: &Budget,
    ) -> (Incumbent, Option<f64>) {
        let eps = self.config.tolerance;
        let shared = Mutex::new(incumbent);
        let read = |m: &Mutex<Incumbent>| -> f64 {
            m.lock().unwrap_or_else(|e| e.into_inner()).objective
        };

        let mut heap = BinaryHeap::new();
        heap.push(Node::root());
        let mut seq = 1u64;
        let mut open = None;

        while let Some(top) = heap.peek().map(|n| n.priority) {
            if budget.exhausted(stats.nodes_explored, heap.len()) {
                open = Some(top);
                break;
            }

            let mut batch = Vec::with_capacity(self.config.batch_size);
            let mut finished = false;
            let current = read(&shared);
            while batch.len() < self.config.batch_size {
                let Some(node) = heap.pop() else { break };
                if node.priority <= current + eps {
                    stats.nodes_pruned += 1 + heap.len();
                    heap.clear();
                    finished = true;
                    break;
                }
                batch.push(node);
            }
            stats.nodes_explored += batch.len();

            let expansions: Vec<Expansion> = batch
                .par_iter_mut()
                .map(|node| {
                    let mut expansion = self.expand(node, read(&shared));
                    if let Some(candidate) = expansion.candidate.take() {
                        let mut guard = shared.lock().unwrap_or_else(|e| e.into_inner());
                        if candidate.objective > guard.objective + eps {
                            debug!(
                                "incumbent {:.2} -> {:.2}",
                                guard.objective, candidate.objective
                            );
                            *guard = candidate;
                            expansion.improved = true;
                        }
                    }
                    expansion
                })
                .collect();

            for (parent, expansion) in batch.iter().zip(expansions) {
                if expansion.improved {
                    stats.incumbent_updates += 1;
                }
                self.merge(parent, expansion, &mut heap, &mut seq, stats);
            }
            if finished {
                break;
            }
        }

        (shared.into_inner().unwrap_or_else(|e| e.into_inner()), open)
    }
}

/// The variable whose fractional part is closest to 0.5; ties go to the
/// lowest index (lower item, then lower container).
fn branching_variable(values: &[f64], eps: f64) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    let mut best_score = f64::INFINITY;
    for (j, &v) in values.iter().enumerate() {
        let frac = v - v.floor();
        if frac <= eps || frac >= 1.0 - eps {
            continue;
        }
        let score = (frac - 0.5).abs();
        if score < best_score - eps {
            best_score = score;
            best = Some((j, v));
        }
    }
    best
}

/// The non-integral variable whose rounding moves the most weight; ties go
/// to the lowest index. Used when every value is integral within tolerance
/// but the rounded counts break a row.
fn snap_violator(problem: &Problem, values: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    let mut best_shift = 0.0;
    for (j, &v) in values.iter().enumerate() {
        let off = (v - v.round()).abs();
        if off == 0.0 {
            continue;
        }
        let shift = off * problem.weight(j).max(1) as f64;
        if best.is_none() || shift > best_shift {
            best_shift = shift;
            best = Some((j, v));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LpError;
    use crate::fixtures;
    use crate::model::{Container, Item};
    use proptest::prelude::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn small() -> Problem {
        Problem::new(
            vec![Item::new("a", 3, 5.0, 4), Item::new("b", 2, 3.0, 10)],
            vec![Container::new(7)],
        )
        .unwrap()
    }

    fn assert_feasible(problem: &Problem, values: &[f64]) {
        let counts: Vec<i64> = values.iter().map(|v| v.round() as i64).collect();
        for (&v, &c) in values.iter().zip(&counts) {
            assert!((v - c as f64).abs() < 1e-6, "non-integral value {v}");
            assert!(c >= 0);
        }
        assert!(heuristic::is_feasible(
            problem,
            &counts,
            &VarBounds::implicit(problem)
        ));
    }

    // ---- Branching rule ----

    #[test]
    fn test_branching_variable_closest_to_half() {
        let values = [1.0, 2.3, 0.45, 3.9999999];
        assert_eq!(branching_variable(&values, 1e-6), Some((2, 0.45)));
    }

    #[test]
    fn test_branching_variable_tie_goes_to_lower_index() {
        let values = [0.0, 1.4, 2.6, 0.4];
        assert_eq!(branching_variable(&values, 1e-6).map(|b| b.0), Some(1));
    }

    #[test]
    fn test_branching_variable_integral() {
        assert_eq!(branching_variable(&[1.0, 2.0000001, 0.0], 1e-6), None);
    }

    // ---- Basic runs ----

    #[test]
    fn test_small_optimal() {
        init_logger();
        for surrogate in [true, false] {
            let config = BnbConfig::default().with_surrogate_bound(surrogate);
            let result = BnbRunner::run(&small(), &config).unwrap();
            assert_eq!(result.status, SolveStatus::Optimal);
            assert!((result.objective - 11.0).abs() < 1e-9);
            assert_feasible(&small(), &result.values);
            assert!((result.stats.best_bound - 11.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_fractional_utilities() {
        let p = Problem::new(
            vec![Item::new("a", 3, 5.5, 4), Item::new("b", 2, 3.25, 10)],
            vec![Container::new(7), Container::new(5)],
        )
        .unwrap();
        let result = BnbRunner::run(&p, &BnbConfig::default()).unwrap();
        assert!((result.objective - fixtures::brute_force(&p)).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = BnbConfig::default().with_batch_size(0);
        let err = BnbRunner::run(&small(), &config).unwrap_err();
        assert!(matches!(err, KnapsackError::Config(_)));
    }

    #[test]
    fn test_worked_scenario() {
        init_logger();
        let p = fixtures::worked_scenario();
        let result = BnbRunner::run(&p, &BnbConfig::default()).unwrap();
        assert_eq!(result.status, SolveStatus::Optimal);
        assert!((result.objective - 74_660.0).abs() < 1e-6);
        assert_feasible(&p, &result.values);
        assert_eq!(result.stats.surrogate_bound, Some(74_660.0));
    }

    #[test]
    fn test_worked_scenario_is_deterministic() {
        let p = fixtures::worked_scenario();
        let a = BnbRunner::run(&p, &BnbConfig::default()).unwrap();
        let b = BnbRunner::run(&p, &BnbConfig::default()).unwrap();
        assert_eq!(a.values, b.values);
        assert_eq!(a.objective, b.objective);
    }

    #[test]
    fn test_near_integral_relaxation_with_heavy_items() {
        // The relaxation puts 3171330/3171331 of "i0" into container 0;
        // rounding that up overloads the container by one gram.
        let p = Problem::new(
            vec![
                Item::new("i0", 3_171_331, 1.0, 1),
                Item::new("i1", 511_506, 1.0, 2),
            ],
            vec![Container::new(3_682_836), Container::new(613_806)],
        )
        .unwrap();
        for surrogate in [true, false] {
            let config = BnbConfig::default().with_surrogate_bound(surrogate);
            let result = BnbRunner::run(&p, &config).unwrap();
            assert_eq!(result.status, SolveStatus::Optimal);
            assert!((result.objective - 2.0).abs() < 1e-9, "got {}", result.objective);
            assert!((result.objective - fixtures::brute_force(&p)).abs() < 1e-9);
            assert_feasible(&p, &result.values);
        }
    }

    #[test]
    fn test_snap_violator_prefers_heaviest_shift() {
        let p = Problem::new(
            vec![Item::new("light", 10, 1.0, 5), Item::new("heavy", 3_000_000, 1.0, 5)],
            vec![Container::new(10_000_000)],
        )
        .unwrap();
        // 1e-7 of the heavy item is 0.3 g; 4e-7 of the light one is 4 µg
        let values = [2.000_000_4, 0.999_999_9];
        assert_eq!(snap_violator(&p, &values), Some((1, 0.999_999_9)));
        assert_eq!(snap_violator(&p, &[2.0, 1.0]), None);
    }

    // ---- Budgets ----

    #[test]
    fn test_cancellation_returns_incumbent() {
        let cancel = Arc::new(AtomicBool::new(true));
        let p = fixtures::worked_scenario();

        let config = BnbConfig::default().with_surrogate_bound(false);
        let result = BnbRunner::run_with_cancel(&p, &config, Some(cancel.clone())).unwrap();
        assert_eq!(result.status, SolveStatus::TimedOut);
        assert_eq!(result.objective, 0.0);
        assert_eq!(result.stats.nodes_explored, 0);

        // the surrogate seed is still returned
        let result = BnbRunner::run_with_cancel(&p, &BnbConfig::default(), Some(cancel)).unwrap();
        assert_eq!(result.status, SolveStatus::TimedOut);
        assert!((result.objective - 74_660.0).abs() < 1e-6);
        assert_feasible(&p, &result.values);
    }

    #[test]
    fn test_node_limit() {
        let p = fixtures::worked_scenario();
        let config = BnbConfig::default()
            .with_surrogate_bound(false)
            .with_node_limit(1);
        let result = BnbRunner::run(&p, &config).unwrap();
        assert_eq!(result.status, SolveStatus::TimedOut);
        assert_eq!(result.stats.nodes_explored, 1);
        assert!(result.objective > 0.0);
        assert!(result.stats.best_bound >= result.objective);
        assert_feasible(&p, &result.values);
    }

    #[test]
    fn test_time_limit() {
        let p = fixtures::worked_scenario();
        let config = BnbConfig::default()
            .with_surrogate_bound(false)
            .with_time_limit_ms(50);
        let result = BnbRunner::run(&p, &config).unwrap();
        // plain LP bounds cannot close this instance within 50 ms
        assert_eq!(result.status, SolveStatus::TimedOut);
        assert!(result.objective <= 74_660.0 + 1e-6);
        assert_feasible(&p, &result.values);
    }

    #[test]
    fn test_worklist_limit() {
        let p = fixtures::worked_scenario();
        let config = BnbConfig::default()
            .with_surrogate_bound(false)
            .with_worklist_limit(3)
            .with_time_limit_ms(10_000);
        let result = BnbRunner::run(&p, &config).unwrap();
        assert_eq!(result.status, SolveStatus::TimedOut);
        // each expansion adds at most two children past the check
        assert!(result.stats.max_worklist <= 4, "{}", result.stats.max_worklist);
        assert!(result.stats.best_bound >= result.objective);
        assert_feasible(&p, &result.values);
    }

    // ---- Numerical trouble ----

    /// Fails every relaxation that has a positive lower bound.
    struct FailingOnLowerBounds(BoundedSimplex);

    impl RelaxationSolver for FailingOnLowerBounds {
        fn solve(
            &self,
            problem: &Problem,
            bounds: &VarBounds,
            rule: PivotRule,
        ) -> Result<Relaxation, LpError> {
            if bounds.lower.iter().any(|&l| l > 0) {
                return Err(LpError::NumericalInstability { iterations: 0 });
            }
            self.0.solve(problem, bounds, rule)
        }
    }

    #[test]
    fn test_dropped_subproblem_degrades_status() {
        init_logger();
        let config = BnbConfig::default().with_surrogate_bound(false);
        let solver = FailingOnLowerBounds(BoundedSimplex::default());
        let result = BnbRunner::run_with_solver(&small(), &config, &solver, None).unwrap();
        assert_eq!(result.status, SolveStatus::Degraded);
        assert!(result.stats.nodes_dropped > 0);
        // the up-branch holding the optimum (11) was lost
        assert!((result.objective - 10.0).abs() < 1e-9);
        assert_feasible(&small(), &result.values);
    }

    /// Succeeds only with Bland's rule.
    struct BlandOnly(BoundedSimplex);

    impl RelaxationSolver for BlandOnly {
        fn solve(
            &self,
            problem: &Problem,
            bounds: &VarBounds,
            rule: PivotRule,
        ) -> Result<Relaxation, LpError> {
            match rule {
                PivotRule::Dantzig => Err(LpError::NumericalInstability { iterations: 0 }),
                PivotRule::Bland => self.0.solve(problem, bounds, rule),
            }
        }
    }

    #[test]
    fn test_bland_retry_recovers() {
        let solver = BlandOnly(BoundedSimplex::default());
        let result =
            BnbRunner::run_with_solver(&small(), &BnbConfig::default(), &solver, None).unwrap();
        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(result.stats.nodes_dropped, 0);
        assert!((result.objective - 11.0).abs() < 1e-9);
    }

    // ---- Parallel expansion ----

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential_objective() {
        let p = Problem::new(
            vec![
                Item::new("a", 7, 9.0, 5),
                Item::new("b", 5, 7.0, 6),
                Item::new("c", 4, 5.0, 8),
                Item::new("d", 3, 3.0, 9),
            ],
            vec![Container::new(23), Container::new(17), Container::new(11)],
        )
        .unwrap();
        let base = BnbConfig::default().with_surrogate_bound(false);
        let sequential = BnbRunner::run(&p, &base).unwrap();
        let config = base.clone().with_parallel(true).with_batch_size(4);
        let parallel = BnbRunner::run(&p, &config).unwrap();
        assert_eq!(parallel.status, SolveStatus::Optimal);
        assert!((sequential.objective - parallel.objective).abs() < 1e-9);
        assert_feasible(&p, &parallel.values);
    }

    // ---- Properties on small instances ----

    fn instance() -> impl Strategy<Value = Problem> {
        let item = (1i64..=8, 0u32..=12, 0i64..=3);
        (
            prop::collection::vec(item, 1..=3),
            prop::collection::vec(0i64..=14, 1..=2),
            any::<bool>(),
        )
            .prop_map(|(items, capacities, halves)| {
                let items = items
                    .into_iter()
                    .enumerate()
                    .map(|(i, (w, u, c))| {
                        let utility = if halves { u as f64 / 2.0 } else { u as f64 };
                        Item::new(format!("item-{i}"), w, utility, c)
                    })
                    .collect();
                let containers = capacities.into_iter().map(Container::new).collect();
                Problem::new(items, containers).unwrap()
            })
    }

    /// Gram-scale instances: item weights up to 4 t, capacities up to 8 t.
    fn heavy_instance() -> impl Strategy<Value = Problem> {
        let item = (1i64..=4_000_000, 1u32..=12, 0i64..=3);
        (
            prop::collection::vec(item, 1..=3),
            prop::collection::vec(0i64..=8_000_000, 1..=2),
        )
            .prop_map(|(items, capacities)| {
                let items = items
                    .into_iter()
                    .enumerate()
                    .map(|(i, (w, u, c))| Item::new(format!("item-{i}"), w, u as f64, c))
                    .collect();
                let containers = capacities.into_iter().map(Container::new).collect();
                Problem::new(items, containers).unwrap()
            })
    }

    /// Small instances scaled to grams with a per-item jitter, so that
    /// relaxations land a hair below whole counts.
    fn scaled_instance() -> impl Strategy<Value = Problem> {
        (instance(), 1_000i64..=1_000_000, prop::collection::vec(-3i64..=3, 3))
            .prop_map(|(p, scale, jitter)| {
                let items = p
                    .items()
                    .iter()
                    .zip(&jitter)
                    .map(|(item, &j)| {
                        Item::new(
                            item.name.clone(),
                            item.weight * scale + j,
                            item.utility,
                            item.max_count,
                        )
                    })
                    .collect();
                let containers = p
                    .containers()
                    .iter()
                    .map(|c| Container::new(c.capacity * scale))
                    .collect();
                Problem::new(items, containers).unwrap()
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_heavy_matches_brute_force(p in heavy_instance(), surrogate in any::<bool>()) {
            let config = BnbConfig::default().with_surrogate_bound(surrogate);
            let result = BnbRunner::run(&p, &config).unwrap();
            prop_assert_eq!(result.status, SolveStatus::Optimal);
            let expected = fixtures::brute_force(&p);
            prop_assert!((result.objective - expected).abs() < 1e-6,
                "got {} expected {}", result.objective, expected);
            let counts: Vec<i64> = result.values.iter().map(|v| v.round() as i64).collect();
            prop_assert!(heuristic::is_feasible(&p, &counts, &VarBounds::implicit(&p)));
        }

        #[test]
        fn prop_scaled_matches_brute_force(p in scaled_instance(), surrogate in any::<bool>()) {
            let config = BnbConfig::default().with_surrogate_bound(surrogate);
            let result = BnbRunner::run(&p, &config).unwrap();
            prop_assert_eq!(result.status, SolveStatus::Optimal);
            let expected = fixtures::brute_force(&p);
            prop_assert!((result.objective - expected).abs() < 1e-6,
                "got {} expected {}", result.objective, expected);
        }
    }

    proptest! {
        #[test]
        fn prop_matches_brute_force(p in instance(), surrogate in any::<bool>(), rounding in any::<bool>()) {
            let config = BnbConfig::default()
                .with_surrogate_bound(surrogate)
                .with_rounding_heuristic(rounding);
            let result = BnbRunner::run(&p, &config).unwrap();
            prop_assert_eq!(result.status, SolveStatus::Optimal);
            let expected = fixtures::brute_force(&p);
            prop_assert!((result.objective - expected).abs() < 1e-6,
                "got {} expected {}", result.objective, expected);
        }

        #[test]
        fn prop_result_is_feasible(p in instance()) {
            let result = BnbRunner::run(&p, &BnbConfig::default()).unwrap();
            let counts: Vec<i64> = result.values.iter().map(|v| v.round() as i64).collect();
            prop_assert!(heuristic::is_feasible(&p, &counts, &VarBounds::implicit(&p)));
            prop_assert!((heuristic::objective(&p, &counts) - result.objective).abs() < 1e-6);
        }

        #[test]
        fn prop_more_capacity_never_hurts(p in instance(), extra in 1i64..=6, which in 0usize..2) {
            let k = which % p.num_containers();
            let mut containers = p.containers().to_vec();
            containers[k].capacity += extra;
            let bigger = Problem::new(p.items().to_vec(), containers).unwrap();

            let config = BnbConfig::default();
            let before = BnbRunner::run(&p, &config).unwrap().objective;
            let after = BnbRunner::run(&bigger, &config).unwrap().objective;
            prop_assert!(after >= before - 1e-9);
        }

        #[test]
        fn prop_deterministic(p in instance()) {
            let config = BnbConfig::default().with_surrogate_bound(false);
            let a = BnbRunner::run(&p, &config).unwrap();
            let b = BnbRunner::run(&p, &config).unwrap();
            prop_assert_eq!(a.values, b.values);
        }
    }
}
