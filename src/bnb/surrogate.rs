//! Surrogate relaxation: all containers merged into one.
//!
//! Summing the container rows yields a single bounded knapsack of capacity
//! `Σ capacity_k`. Its integer optimum bounds every assignment of the
//! multi-container problem and is usually tighter than the LP bound. The
//! aggregate counts it picks are then split across the real containers to
//! seed the incumbent.
//!
//! # References
//!
//! - Martello & Toth (1990), "Knapsack Problems", §6.2 (surrogate
//!   relaxation of the multiple knapsack) and §7.1 (binary splitting of
//!   bounded items)

use crate::model::Problem;

/// Optimum of the merged knapsack.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Surrogate {
    pub bound: f64,
    /// Units of each item chosen by the merged knapsack.
    pub counts: Vec<i64>,
}

/// Solves the merged knapsack by dynamic programming over binary-split
/// item copies. Returns `None` when the table would exceed the limits.
pub(crate) fn solve(problem: &Problem, cell_limit: u64, max_capacity: i64) -> Option<Surrogate> {
    let total = problem.total_capacity();

    // An item never fits more often than the containers can hold it.
    let available: Vec<i64> = problem
        .items()
        .iter()
        .map(|item| {
            if item.weight == 0 || item.utility <= 0.0 {
                return 0;
            }
            let fits: i64 = problem
                .containers()
                .iter()
                .map(|c| c.capacity / item.weight)
                .sum();
            item.max_count.min(fits)
        })
        .collect();

    let demand: i128 = problem
        .items()
        .iter()
        .zip(&available)
        .map(|(item, &a)| item.weight as i128 * a as i128)
        .sum();
    let capacity = (total as i128).min(demand) as i64;
    if capacity > max_capacity {
        return None;
    }
    let capacity = usize::try_from(capacity).ok()?;

    // Binary splitting: 1, 2, 4, ... copies, then the remainder.
    let mut parts: Vec<(usize, i64)> = Vec::new();
    for (i, &a) in available.iter().enumerate() {
        let (mut left, mut size) = (a, 1i64);
        while left > 0 {
            let t = left.min(size);
            parts.push((i, t));
            left -= t;
            size *= 2;
        }
    }
    let cells = (parts.len() as u64).checked_mul(capacity as u64 + 1)?;
    if cells > cell_limit {
        return None;
    }

    let words = capacity / 64 + 1;
    let mut best = vec![0.0f64; capacity + 1];
    let mut taken: Vec<Vec<u64>> = Vec::with_capacity(parts.len());
    for &(i, t) in &parts {
        let item = &problem.items()[i];
        let w = (item.weight * t) as usize;
        let u = item.utility * t as f64;
        let mut bits = vec![0u64; words];
        if w <= capacity {
            for c in (w..=capacity).rev() {
                let candidate = best[c - w] + u;
                if candidate > best[c] {
                    best[c] = candidate;
                    bits[c / 64] |= 1u64 << (c % 64);
                }
            }
        }
        taken.push(bits);
    }

    let mut counts = vec![0i64; problem.num_items()];
    let mut c = capacity;
    for (p, &(i, t)) in parts.iter().enumerate().rev() {
        if taken[p][c / 64] & (1u64 << (c % 64)) != 0 {
            counts[i] += t;
            c -= (problem.items()[i].weight * t) as usize;
        }
    }

    Some(Surrogate {
        bound: best[capacity],
        counts,
    })
}

/// Distributes aggregate item counts over the containers in index order.
///
/// Each container takes a maximum-weight sub-multiset of what is left
/// that fits its capacity. Units that fit nowhere are dropped. Returns a
/// dense per-variable assignment.
pub(crate) fn split(problem: &Problem, aggregate: &[i64]) -> Vec<i64> {
    let m = problem.num_containers();
    let mut remaining = aggregate.to_vec();
    let mut counts = vec![0i64; problem.num_vars()];

    for (k, container) in problem.containers().iter().enumerate() {
        let weight_left: i64 = problem
            .items()
            .iter()
            .zip(&remaining)
            .map(|(item, &r)| item.weight * r)
            .sum();
        let capacity = container.capacity.min(weight_left);
        if capacity <= 0 {
            continue;
        }
        let take = max_weight_subset(problem, &remaining, capacity as usize);
        for (i, &t) in take.iter().enumerate() {
            counts[i * m + k] = t;
            remaining[i] -= t;
        }
    }
    counts
}

const UNREACHED: u32 = u32::MAX;

/// Bounded subset sum: the heaviest multiset with at most `limit[i]` units
/// of item `i` and total weight at most `capacity`.
fn max_weight_subset(problem: &Problem, limit: &[i64], capacity: usize) -> Vec<i64> {
    let n = problem.num_items();
    // reach[x]: last item used to reach weight x; units[x]: how many of it.
    let mut reach = vec![UNREACHED; capacity + 1];
    let mut units = vec![0u32; capacity + 1];
    let mut run = vec![0u32; capacity + 1];
    reach[0] = n as u32;

    for (i, item) in problem.items().iter().enumerate() {
        if item.weight <= 0 || limit[i] <= 0 {
            continue;
        }
        let w = item.weight as usize;
        if w > capacity {
            continue;
        }
        let cap = limit[i].min((capacity / w) as i64) as u32;
        run.fill(0);
        for x in w..=capacity {
            if reach[x] == UNREACHED && reach[x - w] != UNREACHED && run[x - w] < cap {
                reach[x] = i as u32;
                run[x] = run[x - w] + 1;
                units[x] = run[x];
            }
        }
    }

    let mut take = vec![0i64; n];
    let Some(mut x) = (0..=capacity).rev().find(|&x| reach[x] != UNREACHED) else {
        return take;
    };
    while x > 0 {
        let i = reach[x] as usize;
        take[i] += units[x] as i64;
        x -= units[x] as usize * problem.items()[i].weight as usize;
    }
    take
}
