//! LP relaxation of a bounded knapsack subproblem.
//!
//! Solves the continuous relaxation of a node: the integrality of the
//! counts is dropped, the container and item-pool rows stay, and every
//! variable keeps its (possibly tightened) bounds. Upper bounds are handled
//! implicitly by bound flipping, so the tableau has only
//! `containers + items` rows regardless of the number of bound overrides.
//!
//! # References
//!
//! - Dantzig (1955), "Upper Bounds, Secondary Constraints, and Block
//!   Triangularity in Linear Programming"
//! - Bland (1977), "New Finite Pivoting Rules for the Simplex Method"
//! - Chvátal (1983), "Linear Programming", ch. 8 (bounded variables)

mod config;
mod simplex;
mod types;

pub use config::LpConfig;
pub use simplex::BoundedSimplex;
pub use types::{PivotRule, Relaxation, RelaxationSolver, VarBounds};
