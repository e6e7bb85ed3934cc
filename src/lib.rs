//! Exact solver for the bounded multiple knapsack problem with a shared
//! item pool.
//!
//! Given item types (unit weight, unit utility, maximum count across all
//! containers) and containers (net capacity), find how many units of each
//! item to put into each container so that the total utility is maximal,
//! no container is overloaded and no item is used more often than it is
//! available.
//!
//! - **Model** ([`model`]): validated problem, variable layout and bounds.
//! - **LP relaxation** ([`lp`]): bounded-variable primal simplex with
//!   two phases and a swappable pivot rule.
//! - **Branch-and-bound** ([`bnb`]): best-first search over the
//!   relaxation, with a rounding heuristic, a surrogate bound,
//!   cancellation, node and time budgets, and optional parallel expansion.
//! - **Solution** ([`solution`]): verified per-container counts and a
//!   plain-text report.
//! - **Loading** ([`loading`]): fleet capacities, column remapping and
//!   mass units for building problems from raw data.
//!
//! # Quick start
//!
//! ```
//! use u_knapsack::bnb::{BnbConfig, SolveStatus};
//! use u_knapsack::model::{Container, Item, Problem};
//!
//! let problem = Problem::new(
//!     vec![
//!         Item::new("phone", 700, 30.0, 5),
//!         Item::new("tablet", 1400, 45.0, 3),
//!     ],
//!     vec![Container::new(3000), Container::labelled("Van", 2000)],
//! )
//! .unwrap();
//!
//! let solution = u_knapsack::solve(&problem, &BnbConfig::default()).unwrap();
//! assert_eq!(solution.status, SolveStatus::Optimal);
//! assert!(solution.total_count("phone") <= 5);
//! println!("{solution}");
//! ```
//!
//! # Logging
//!
//! Progress goes through the [`log`] facade; install any logger to see it.

pub mod bnb;
pub mod error;
pub mod loading;
pub mod lp;
pub mod model;
pub mod solution;

#[cfg(test)]
mod fixtures;

pub use bnb::{BnbConfig, SolveStatus};
pub use error::KnapsackError;
pub use model::{Container, Item, Problem};
pub use solution::Solution;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Solves `problem` and returns the verified allocation.
///
/// Equivalent to [`solve_with_cancel`] without a cancellation token.
pub fn solve(problem: &Problem, config: &BnbConfig) -> Result<Solution, KnapsackError> {
    solve_with_cancel(problem, config, None)
}

/// Solves `problem`, stopping early once `cancel` is set.
///
/// A cancelled or budget-limited run still returns the best allocation
/// found so far, with [`SolveStatus::TimedOut`].
///
/// # Errors
///
/// [`KnapsackError::Config`] for an invalid configuration, and
/// [`KnapsackError::Consistency`] if the search produced an allocation
/// that fails re-verification.
pub fn solve_with_cancel(
    problem: &Problem,
    config: &BnbConfig,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<Solution, KnapsackError> {
    let result = bnb::BnbRunner::run_with_cancel(problem, config, cancel)?;
    let solution = solution::extract(problem, &result, config.tolerance)?;
    Ok(solution)
}
