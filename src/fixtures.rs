//! Shared test instances.

use crate::model::{Container, Item, Problem};

/// Ten hardware item types: (name, max_count, weight in grams, utility).
pub(crate) const HARDWARE: [(&str, i64, i64, f64); 10] = [
    ("office-notebook-13", 205, 2451, 40.0),
    ("office-notebook-14", 420, 2978, 35.0),
    ("outdoor-notebook", 450, 3625, 80.0),
    ("office-phone", 60, 717, 30.0),
    ("outdoor-phone", 157, 988, 60.0),
    ("heavy-duty-phone", 220, 1220, 65.0),
    ("small-office-tablet", 620, 1405, 40.0),
    ("big-office-tablet", 250, 1455, 40.0),
    ("small-outdoor-tablet", 540, 1690, 45.0),
    ("big-outdoor-tablet", 370, 1980, 68.0),
];

pub(crate) fn hardware_items() -> Vec<Item> {
    HARDWARE
        .iter()
        .map(|&(name, max_count, weight, utility)| Item::new(name, weight, utility, max_count))
        .collect()
}

/// Two 1100 kg trucks with 72.4 kg and 85.7 kg drivers.
pub(crate) fn worked_scenario() -> Problem {
    Problem::new(
        hardware_items(),
        vec![Container::new(1_027_600), Container::new(1_014_300)],
    )
    .unwrap()
}

/// Exhaustive optimum for tiny instances.
pub(crate) fn brute_force(problem: &Problem) -> f64 {
    let mut load = vec![0i64; problem.num_containers()];
    let mut used = vec![0i64; problem.num_items()];
    enumerate(problem, 0, &mut load, &mut used)
}

fn enumerate(problem: &Problem, j: usize, load: &mut [i64], used: &mut [i64]) -> f64 {
    if j == problem.num_vars() {
        return 0.0;
    }
    let var = problem.var_id(j);
    let item = &problem.items()[var.item];
    let capacity = problem.containers()[var.container].capacity;

    let mut best = f64::NEG_INFINITY;
    let mut count = 0;
    loop {
        let weight = item.weight * count;
        if load[var.container] + weight > capacity || used[var.item] + count > item.max_count {
            break;
        }
        load[var.container] += weight;
        used[var.item] += count;
        let value = item.utility * count as f64 + enumerate(problem, j + 1, load, used);
        load[var.container] -= weight;
        used[var.item] -= count;
        best = best.max(value);
        count += 1;
    }
    best
}
