//! Plain-text report.

use super::types::Solution;
use std::fmt;

impl fmt::Display for Solution {
    /// Item counts per container, then loads against capacities, then the
    /// total utility rounded to two decimals.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for load in &self.containers {
            writeln!(f, "{}:", load.label)?;
            for (name, count) in &load.items {
                writeln!(f, "  {name:<25} = {count:>10}")?;
            }
            writeln!(f)?;
        }

        for load in &self.containers {
            writeln!(
                f,
                "{}: total weight {} of {}",
                load.label, load.weight, load.capacity
            )?;
        }
        writeln!(f)?;

        write!(
            f,
            "Total utility: {:.2} ({})",
            self.total_utility, self.status
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::bnb::{SearchStats, SolveStatus};
    use crate::solution::{ContainerLoad, Solution};

    #[test]
    fn test_report_layout() {
        let solution = Solution {
            containers: vec![
                ContainerLoad {
                    index: 0,
                    label: "Container 1".into(),
                    capacity: 10,
                    weight: 9,
                    utility: 12.5,
                    items: vec![("phone".into(), 3)],
                },
                ContainerLoad {
                    index: 1,
                    label: "Van".into(),
                    capacity: 4,
                    weight: 0,
                    utility: 0.0,
                    items: vec![],
                },
            ],
            total_utility: 12.5,
            status: SolveStatus::Optimal,
            stats: SearchStats::default(),
        };

        let report = solution.to_string();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "Container 1:");
        assert_eq!(lines[1], format!("  {:<25} = {:>10}", "phone", 3));
        assert_eq!(lines[3], "Van:");
        assert!(report.contains("Container 1: total weight 9 of 10"));
        assert!(report.contains("Van: total weight 0 of 4"));
        assert!(report.ends_with("Total utility: 12.50 (Optimal)"));
    }
}
