//! Rounding heuristic.
//!
//! All constraint coefficients are non-negative, so rounding a feasible
//! relaxation down stays feasible. The leftover room is then filled
//! greedily by utility density.

use crate::lp::VarBounds;
use crate::model::Problem;

/// Variables with positive utility, by descending item density
/// (utility / weight), ties by variable index.
pub(crate) fn density_order(problem: &Problem) -> Vec<usize> {
    let mut order: Vec<usize> = (0..problem.num_vars())
        .filter(|&j| problem.utility(j) > 0.0)
        .collect();
    order.sort_by(|&a, &b| {
        let da = problem.items()[problem.var_id(a).item].density();
        let db = problem.items()[problem.var_id(b).item].density();
        db.total_cmp(&da).then(a.cmp(&b))
    });
    order
}

/// Whether integer `counts` satisfy every row and `bounds`.
pub(crate) fn is_feasible(problem: &Problem, counts: &[i64], bounds: &VarBounds) -> bool {
    let m = problem.num_containers();
    let mut load = vec![0i64; m];
    let mut used = vec![0i64; problem.num_items()];
    for (j, &x) in counts.iter().enumerate() {
        if x < bounds.lower[j] || x > bounds.upper[j] {
            return false;
        }
        load[j % m] += problem.weight(j) * x;
        used[j / m] += x;
    }
    let containers_ok = problem
        .containers()
        .iter()
        .zip(&load)
        .all(|(c, &l)| l <= c.capacity);
    let pools_ok = problem
        .items()
        .iter()
        .zip(&used)
        .all(|(item, &u)| u <= item.max_count);
    containers_ok && pools_ok
}

/// Raises counts in `order` as far as `upper`, the residual capacity and
/// the residual item pool allow.
pub(crate) fn fill(problem: &Problem, counts: &mut [i64], upper: &[i64], order: &[usize]) {
    let m = problem.num_containers();
    let mut load = vec![0i64; m];
    let mut used = vec![0i64; problem.num_items()];
    for (j, &x) in counts.iter().enumerate() {
        load[j % m] += problem.weight(j) * x;
        used[j / m] += x;
    }

    for &j in order {
        let (i, k) = (j / m, j % m);
        let item = &problem.items()[i];
        let mut room = (item.max_count - used[i]).min(upper[j] - counts[j]);
        if item.weight > 0 {
            room = room.min((problem.containers()[k].capacity - load[k]) / item.weight);
        }
        if room > 0 {
            counts[j] += room;
            used[i] += room;
            load[k] += item.weight * room;
        }
    }
}

/// Rounds a relaxation down and tops it up. Returns the objective and the
/// integer assignment.
pub(crate) fn round_and_fill(
    problem: &Problem,
    values: &[f64],
    bounds: &VarBounds,
    order: &[usize],
    eps: f64,
) -> (f64, Vec<i64>) {
    // Tolerant rounding keeps 2.9999999 at 3; fall back to a strict floor
    // if that overshoots a row.
    let mut counts: Vec<i64> = values
        .iter()
        .enumerate()
        .map(|(j, &v)| ((v + eps).floor() as i64).clamp(bounds.lower[j], bounds.upper[j]))
        .collect();
    if !is_feasible(problem, &counts, bounds) {
        counts = values
            .iter()
            .enumerate()
            .map(|(j, &v)| (v.floor() as i64).clamp(bounds.lower[j], bounds.upper[j]))
            .collect();
    }

    fill(problem, &mut counts, &bounds.upper, order);
    (objective(problem, &counts), counts)
}

pub(crate) fn objective(problem: &Problem, counts: &[i64]) -> f64 {
    counts
        .iter()
        .enumerate()
        .map(|(j, &x)| problem.utility(j) * x as f64)
        .sum()
}
