//! Solution shape returned to callers.

use crate::bnb::{SearchStats, SolveStatus};

/// What one container ends up carrying.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerLoad {
    /// Container index in the problem.
    pub index: usize,
    /// Display label.
    pub label: String,
    /// Net capacity.
    pub capacity: i64,
    /// Total weight of the chosen items.
    pub weight: i64,
    /// Total utility of the chosen items.
    pub utility: f64,
    /// `(item name, count)` in item order; zero counts are omitted.
    pub items: Vec<(String, i64)>,
}

impl ContainerLoad {
    /// Count of the named item (0 when absent).
    pub fn count(&self, item: &str) -> i64 {
        self.items
            .iter()
            .find(|(name, _)| name == item)
            .map_or(0, |&(_, count)| count)
    }

    /// Unused capacity.
    pub fn spare(&self) -> i64 {
        self.capacity - self.weight
    }
}

/// An optimized allocation.
///
/// Independent of the [`Problem`](crate::model::Problem) it was computed
/// from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// One entry per container, in problem order.
    pub containers: Vec<ContainerLoad>,
    /// Total utility over all containers.
    pub total_utility: f64,
    /// How the search ended.
    pub status: SolveStatus,
    /// Search counters.
    pub stats: SearchStats,
}

impl Solution {
    /// Count of `item` in container `container` (0 when absent).
    pub fn count(&self, item: &str, container: usize) -> i64 {
        self.containers
            .get(container)
            .map_or(0, |load| load.count(item))
    }

    /// Units of `item` over all containers.
    pub fn total_count(&self, item: &str) -> i64 {
        self.containers.iter().map(|load| load.count(item)).sum()
    }

    /// Weight carried over all containers.
    pub fn total_weight(&self) -> i64 {
        self.containers.iter().map(|load| load.weight).sum()
    }
}
