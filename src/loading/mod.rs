//! Building problems from raw input.
//!
//! Helpers for the outer surfaces of a solver: net container capacities
//! from a fleet description, item records from tabular data with
//! arbitrary column names, mass unit conversion and an efficiency ranking
//! for display. File and terminal I/O stay with the caller.
//!
//! ```
//! use u_knapsack::loading::{ColumnMapping, Fleet};
//! use u_knapsack::model::Problem;
//!
//! let header = ["name", "max_count", "weight", "utility"];
//! let records = [["office-phone", "60", "717", "30"], ["outdoor-phone", "157", "988", "35"]];
//!
//! let columns = ColumnMapping::default().resolve(&header).unwrap();
//! let items = records
//!     .iter()
//!     .map(|r| columns.item(r))
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//!
//! let containers = Fleet::new(vec![1100.0], vec![72.4]).containers().unwrap();
//! let problem = Problem::new(items, containers).unwrap();
//! assert_eq!(problem.num_vars(), 2);
//! ```

mod columns;
mod efficiency;
mod fleet;
mod units;

pub use columns::{ColumnMapping, ResolvedColumns};
pub use efficiency::efficiency_ranking;
pub use fleet::Fleet;
pub use units::MassUnit;
