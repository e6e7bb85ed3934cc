//! Best-first branch-and-bound over the LP relaxation.
//!
//! The driver keeps a worklist of subproblems ordered by their relaxation
//! bound (highest first, most recent first on ties). Each expanded node is
//! pruned against the incumbent, accepted if its relaxation is already
//! integral, or split on the variable whose fractional part is closest to
//! one half. Both children are solved eagerly so only promising ones enter
//! the worklist.
//!
//! Two devices tighten the search:
//!
//! - a rounding heuristic turns every fractional relaxation into a feasible
//!   assignment, improving the incumbent early;
//! - the surrogate knapsack (all containers merged) gives a problem-wide
//!   integer bound and, once split back over the containers, a strong
//!   starting incumbent.
//!
//! When every utility is a whole number, bounds are rounded down before
//! comparing, since no integer assignment can land between two integers.
//!
//! # References
//!
//! - Land & Doig (1960), "An Automatic Method of Solving Discrete
//!   Programming Problems"
//! - Martello & Toth (1990), "Knapsack Problems", ch. 6
//! - Wolsey (1998), "Integer Programming", ch. 7

mod config;
mod heuristic;
mod node;
mod runner;
mod surrogate;
mod types;

pub use config::BnbConfig;
pub use runner::{BnbResult, BnbRunner};
pub use types::{SearchStats, SolveStatus};
