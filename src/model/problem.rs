//! Validated problem instance.

use super::item::{Container, Item};
use crate::error::ValidationError;
use std::collections::HashSet;

/// Identifies the decision variable "count of `item` in `container`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId {
    pub item: usize,
    pub container: usize,
}

impl VarId {
    pub fn new(item: usize, container: usize) -> Self {
        Self { item, container }
    }
}

/// A validated multi-knapsack instance.
///
/// Immutable once built; the search only ever borrows it.
///
/// # Examples
///
/// ```
/// use u_knapsack::model::{Container, Item, Problem, VarId};
///
/// let problem = Problem::new(
///     vec![Item::new("a", 3, 5.0, 4), Item::new("b", 2, 3.0, 10)],
///     vec![Container::new(7), Container::new(4)],
/// )
/// .unwrap();
///
/// assert_eq!(problem.num_vars(), 4);
/// // min(max_count = 4, floor(7 / 3) = 2)
/// assert_eq!(problem.implicit_upper(problem.var_index(VarId::new(0, 0))), 2);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Problem {
    items: Vec<Item>,
    containers: Vec<Container>,
}

impl Problem {
    /// Validates and builds a problem.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::NoContainers`] when `containers` is empty.
    /// - [`ValidationError::NegativeWeight`], [`ValidationError::NegativeMaxCount`],
    ///   [`ValidationError::InvalidUtility`] or [`ValidationError::NegativeCapacity`]
    ///   for out-of-range magnitudes.
    /// - [`ValidationError::DuplicateItem`] when two items share a name.
    /// - [`ValidationError::UnboundedItem`] for a zero-weight item with positive
    ///   utility, unless its `max_count` is 0.
    pub fn new(items: Vec<Item>, containers: Vec<Container>) -> Result<Self, ValidationError> {
        if containers.is_empty() {
            return Err(ValidationError::NoContainers);
        }
        for (index, container) in containers.iter().enumerate() {
            if container.capacity < 0 {
                return Err(ValidationError::NegativeCapacity {
                    container: index,
                    capacity: container.capacity,
                });
            }
        }

        let mut names = HashSet::with_capacity(items.len());
        for item in &items {
            if item.weight < 0 {
                return Err(ValidationError::NegativeWeight {
                    item: item.name.clone(),
                    weight: item.weight,
                });
            }
            if item.max_count < 0 {
                return Err(ValidationError::NegativeMaxCount {
                    item: item.name.clone(),
                    max_count: item.max_count,
                });
            }
            if !item.utility.is_finite() || item.utility < 0.0 {
                return Err(ValidationError::InvalidUtility {
                    item: item.name.clone(),
                    utility: item.utility,
                });
            }
            if item.weight == 0 && item.utility > 0.0 && item.max_count > 0 {
                return Err(ValidationError::UnboundedItem {
                    item: item.name.clone(),
                });
            }
            if !names.insert(item.name.as_str()) {
                return Err(ValidationError::DuplicateItem {
                    item: item.name.clone(),
                });
            }
        }

        Ok(Self { items, containers })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    pub fn num_containers(&self) -> usize {
        self.containers.len()
    }

    /// Number of decision variables (`items × containers`).
    pub fn num_vars(&self) -> usize {
        self.items.len() * self.containers.len()
    }

    /// Item-major variable index: `item * containers + container`.
    pub fn var_index(&self, var: VarId) -> usize {
        var.item * self.containers.len() + var.container
    }

    /// Inverse of [`var_index`](Self::var_index).
    pub fn var_id(&self, index: usize) -> VarId {
        let m = self.containers.len();
        VarId::new(index / m, index % m)
    }

    /// Implicit upper bound of variable `j`:
    /// `min(max_count, floor(capacity / weight))`, or `max_count` for
    /// zero-weight items. The implicit lower bound is always 0.
    pub fn implicit_upper(&self, j: usize) -> i64 {
        let var = self.var_id(j);
        let item = &self.items[var.item];
        if item.weight > 0 {
            item.max_count
                .min(self.containers[var.container].capacity / item.weight)
        } else {
            item.max_count
        }
    }

    /// Objective coefficient of variable `j` (the item's utility).
    pub fn utility(&self, j: usize) -> f64 {
        self.items[j / self.containers.len()].utility
    }

    /// Constraint coefficient of variable `j` in its container row (the
    /// item's weight; identical for every container).
    pub fn weight(&self, j: usize) -> i64 {
        self.items[j / self.containers.len()].weight
    }

    /// Sum of all container capacities.
    pub fn total_capacity(&self) -> i64 {
        self.containers.iter().map(|c| c.capacity).sum()
    }

    /// Whether every utility is a whole number, so every integer
    /// assignment has an integral objective value.
    pub fn has_integral_objective(&self) -> bool {
        self.items.iter().all(|item| item.utility.fract() == 0.0)
    }

    /// Objective value of a dense assignment.
    pub fn objective(&self, values: &[f64]) -> f64 {
        values
            .iter()
            .enumerate()
            .map(|(j, &v)| self.utility(j) * v)
            .sum()
    }
}
