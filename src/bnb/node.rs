//! Search nodes and their ordering in the worklist.

use crate::lp::VarBounds;
use std::cmp::Ordering;

/// A single branching decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Override {
    /// `x[var] ≤ value`
    Upper { var: usize, value: i64 },
    /// `x[var] ≥ value`
    Lower { var: usize, value: i64 },
}

impl Override {
    pub(crate) fn apply(&self, bounds: &mut VarBounds) {
        match *self {
            Override::Upper { var, value } => bounds.tighten_upper(var, value),
            Override::Lower { var, value } => bounds.tighten_lower(var, value),
        }
    }
}

/// Net bounds of one variable that differ from the problem's implicit ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BoundChange {
    pub var: usize,
    pub lower: i64,
    pub upper: i64,
}

/// A subproblem: the problem's implicit bounds plus the net bound changes
/// accumulated along its branch, at most one entry per variable and sorted
/// by variable.
///
/// Children carry the relaxation solved when they were created, so a node
/// is never solved twice.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub changes: Vec<BoundChange>,
    /// Bound used for worklist ordering.
    pub priority: f64,
    /// Creation order; later nodes win priority ties.
    pub seq: u64,
    pub relaxation: Option<Solved>,
}

/// An optimal relaxation attached to a node.
#[derive(Debug, Clone)]
pub(crate) struct Solved {
    pub objective: f64,
    pub values: Vec<f64>,
}

impl Node {
    pub(crate) fn root() -> Self {
        Self {
            changes: Vec::new(),
            priority: f64::INFINITY,
            seq: 0,
            relaxation: None,
        }
    }

    /// The child reached by applying `branch` to this node's bounds.
    pub(crate) fn child(
        &self,
        branch: Override,
        base: &VarBounds,
        priority: f64,
        seq: u64,
        solved: Solved,
    ) -> Self {
        let var = match branch {
            Override::Upper { var, .. } | Override::Lower { var, .. } => var,
        };
        let mut changes = self.changes.clone();
        let at = match changes.binary_search_by_key(&var, |c| c.var) {
            Ok(at) => at,
            Err(at) => {
                changes.insert(
                    at,
                    BoundChange {
                        var,
                        lower: base.lower[var],
                        upper: base.upper[var],
                    },
                );
                at
            }
        };
        let change = &mut changes[at];
        match branch {
            Override::Upper { value, .. } => change.upper = change.upper.min(value),
            Override::Lower { value, .. } => change.lower = change.lower.max(value),
        }
        Self {
            changes,
            priority,
            seq,
            relaxation: Some(solved),
        }
    }

    /// Number of variables whose bounds differ from the base.
    pub(crate) fn depth(&self) -> usize {
        self.changes.len()
    }

    /// Dense bounds of this node layered on `base`.
    pub(crate) fn bounds(&self, base: &VarBounds) -> VarBounds {
        let mut bounds = base.clone();
        for c in &self.changes {
            bounds.tighten_lower(c.var, c.lower);
            bounds.tighten_upper(c.var, c.upper);
        }
        bounds
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    // Max-heap: highest bound first, then most recently created.
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then(self.seq.cmp(&other.seq))
    }
}
