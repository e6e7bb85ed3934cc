//! Problem model for the bounded multi-knapsack with a shared item pool.
//!
//! A [`Problem`] holds item types (unit weight, unit utility, global maximum
//! count) and containers (net capacity). The decision variables are the
//! counts `x[i][k]` of item `i` placed in container `k`:
//!
//! ```text
//! maximize    Σ_i Σ_k utility_i · x[i][k]
//! subject to  Σ_i weight_i · x[i][k] ≤ capacity_k     for every container k
//!             Σ_k x[i][k]           ≤ max_count_i    for every item i
//!             x[i][k] ∈ ℤ, x[i][k] ≥ 0
//! ```
//!
//! Variables are enumerated item-major (see [`Problem::var_index`]), so
//! ascending variable index means "lower item first, then lower container".
//!
//! # References
//!
//! - Martello & Toth (1990), "Knapsack Problems: Algorithms and Computer
//!   Implementations", ch. 6 (multiple knapsack) and ch. 7 (bounded knapsack)

mod item;
mod problem;

pub use item::{Container, Item};
pub use problem::{Problem, VarId};
