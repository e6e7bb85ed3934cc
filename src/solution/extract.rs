//! Incumbent to [`Solution`] conversion.

use super::types::{ContainerLoad, Solution};
use crate::bnb::BnbResult;
use crate::error::ConsistencyError;
use crate::model::{Problem, VarId};

/// Converts a search result into a [`Solution`].
///
/// Every value is rounded to the nearest integer; the resulting counts are
/// re-checked against every container and item-pool limit, and the
/// recomputed utility must match the search's objective within `tolerance`.
///
/// # Errors
///
/// [`ConsistencyError`] when a value is not within `tolerance` of a
/// non-negative integer, when a limit is violated, or when the utility
/// disagrees. Any of these indicates a bug in the search.
pub fn extract(
    problem: &Problem,
    result: &BnbResult,
    tolerance: f64,
) -> Result<Solution, ConsistencyError> {
    if result.values.len() != problem.num_vars() {
        return Err(ConsistencyError::new(format!(
            "expected {} values, got {}",
            problem.num_vars(),
            result.values.len()
        )));
    }

    let mut counts = Vec::with_capacity(result.values.len());
    for (j, &v) in result.values.iter().enumerate() {
        let rounded = v.round();
        let VarId { item, container } = problem.var_id(j);
        if !v.is_finite() || (v - rounded).abs() > tolerance {
            return Err(ConsistencyError::new(format!(
                "'{}' in container {container} has non-integral count {v}",
                problem.items()[item].name
            )));
        }
        if rounded < 0.0 {
            return Err(ConsistencyError::new(format!(
                "'{}' in container {container} has negative count {rounded}",
                problem.items()[item].name
            )));
        }
        counts.push(rounded as i64);
    }

    let m = problem.num_containers();
    for (i, item) in problem.items().iter().enumerate() {
        let used: i64 = counts[i * m..(i + 1) * m].iter().sum();
        if used > item.max_count {
            return Err(ConsistencyError::new(format!(
                "'{}' used {used} times, only {} available",
                item.name, item.max_count
            )));
        }
    }

    let mut containers = Vec::with_capacity(m);
    for (k, container) in problem.containers().iter().enumerate() {
        let mut load = ContainerLoad {
            index: k,
            label: container.display_label(k),
            capacity: container.capacity,
            weight: 0,
            utility: 0.0,
            items: Vec::new(),
        };
        for (i, item) in problem.items().iter().enumerate() {
            let count = counts[i * m + k];
            if count == 0 {
                continue;
            }
            load.weight += item.weight * count;
            load.utility += item.utility * count as f64;
            load.items.push((item.name.clone(), count));
        }
        if load.weight > container.capacity {
            return Err(ConsistencyError::new(format!(
                "{} carries {} but holds {}",
                load.label, load.weight, container.capacity
            )));
        }
        containers.push(load);
    }

    let total_utility: f64 = containers.iter().map(|c| c.utility).sum();
    if (total_utility - result.objective).abs() > tolerance {
        return Err(ConsistencyError::new(format!(
            "recomputed utility {total_utility} differs from search objective {}",
            result.objective
        )));
    }

    Ok(Solution {
        containers,
        total_utility,
        status: result.status,
        stats: result.stats.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bnb::{SearchStats, SolveStatus};
    use crate::model::{Container, Item};

    fn problem() -> Problem {
        Problem::new(
            vec![Item::new("a", 3, 5.0, 4), Item::new("b", 2, 3.0, 10)],
            vec![Container::new(7), Container::labelled("Van", 4)],
        )
        .unwrap()
    }

    fn result(values: Vec<f64>, objective: f64) -> BnbResult {
        BnbResult {
            values,
            objective,
            status: SolveStatus::Optimal,
            stats: SearchStats::default(),
        }
    }

    #[test]
    fn test_extract_rounds_and_omits_zeros() {
        let p = problem();
        // a: 1 in container 0; b: 2 in container 0, 2 in "Van"
        let r = result(vec![1.0000001, 0.0, 1.9999999, 2.0], 17.0);
        let s = extract(&p, &r, 1e-6).unwrap();

        assert_eq!(s.containers.len(), 2);
        assert_eq!(s.containers[0].items, vec![("a".into(), 1), ("b".into(), 2)]);
        assert_eq!(s.containers[0].weight, 7);
        assert_eq!(s.containers[0].label, "Container 1");
        assert_eq!(s.containers[1].items, vec![("b".into(), 2)]);
        assert_eq!(s.containers[1].label, "Van");
        assert_eq!(s.containers[1].spare(), 0);
        assert!((s.total_utility - 17.0).abs() < 1e-9);
        assert_eq!(s.count("b", 1), 2);
        assert_eq!(s.count("a", 1), 0);
        assert_eq!(s.total_count("b"), 4);
        assert_eq!(s.total_weight(), 11);
    }

    #[test]
    fn test_non_integral_value() {
        let err = extract(&problem(), &result(vec![0.5, 0.0, 0.0, 0.0], 2.5), 1e-6).unwrap_err();
        assert!(err.detail.contains("non-integral"), "{err}");
    }

    #[test]
    fn test_capacity_violation() {
        let err = extract(&problem(), &result(vec![0.0, 2.0, 0.0, 0.0], 10.0), 1e-6).unwrap_err();
        assert!(err.detail.contains("Van"), "{err}");
    }

    #[test]
    fn test_pool_violation() {
        let p = Problem::new(
            vec![Item::new("a", 1, 1.0, 1)],
            vec![Container::new(5), Container::new(5)],
        )
        .unwrap();
        let err = extract(&p, &result(vec![1.0, 1.0], 2.0), 1e-6).unwrap_err();
        assert!(err.detail.contains("only 1 available"), "{err}");
    }

    #[test]
    fn test_objective_mismatch() {
        let err = extract(&problem(), &result(vec![1.0, 0.0, 0.0, 0.0], 6.0), 1e-6).unwrap_err();
        assert!(err.detail.contains("differs"), "{err}");
    }

    #[test]
    fn test_wrong_length() {
        assert!(extract(&problem(), &result(vec![0.0], 0.0), 1e-6).is_err());
    }
}
