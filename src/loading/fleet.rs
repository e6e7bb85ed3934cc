//! Containers from raw fleet data.

use super::units::MassUnit;
use crate::error::ValidationError;
use crate::model::Container;

/// Raw fleet description: per-container maximum loads and the fixed load
/// each one always carries (e.g. its driver).
///
/// # Examples
///
/// ```
/// use u_knapsack::loading::Fleet;
///
/// // two 1100 kg trucks, drivers of 72.4 kg and 85.7 kg
/// let containers = Fleet::new(vec![1100.0, 1100.0], vec![72.4, 85.7])
///     .containers()
///     .unwrap();
/// assert_eq!(containers[0].capacity, 1_027_600);
/// assert_eq!(containers[1].capacity, 1_014_300);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fleet {
    pub max_loads: Vec<f64>,
    pub max_load_unit: MassUnit,
    pub fixed_loads: Vec<f64>,
    pub fixed_load_unit: MassUnit,
    /// Display labels; empty means "Container 1", "Container 2", ...
    pub labels: Vec<String>,
}

impl Fleet {
    /// A fleet with both lists in kilograms.
    pub fn new(max_loads: Vec<f64>, fixed_loads: Vec<f64>) -> Self {
        Self {
            max_loads,
            max_load_unit: MassUnit::Kilogram,
            fixed_loads,
            fixed_load_unit: MassUnit::Kilogram,
            labels: Vec::new(),
        }
    }

    pub fn with_max_load_unit(mut self, unit: MassUnit) -> Self {
        self.max_load_unit = unit;
        self
    }

    pub fn with_fixed_load_unit(mut self, unit: MassUnit) -> Self {
        self.fixed_load_unit = unit;
        self
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    /// Net containers, capacities in grams.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::LengthMismatch`] when the lists differ in length.
    /// - [`ValidationError::InvalidField`] for a non-finite quantity.
    /// - [`ValidationError::NegativeCapacity`] when a fixed load exceeds
    ///   its maximum load.
    pub fn containers(&self) -> Result<Vec<Container>, ValidationError> {
        let n = self.max_loads.len();
        if self.fixed_loads.len() != n {
            return Err(ValidationError::LengthMismatch {
                what: "fixed loads",
                expected: n,
                found: self.fixed_loads.len(),
            });
        }
        if !self.labels.is_empty() && self.labels.len() != n {
            return Err(ValidationError::LengthMismatch {
                what: "labels",
                expected: n,
                found: self.labels.len(),
            });
        }

        let mut containers = Vec::with_capacity(n);
        for (k, (&max_load, &fixed)) in self.max_loads.iter().zip(&self.fixed_loads).enumerate() {
            for (column, value) in [("max_loads", max_load), ("fixed_loads", fixed)] {
                if !value.is_finite() {
                    return Err(ValidationError::InvalidField {
                        column: column.into(),
                        value: value.to_string(),
                    });
                }
            }
            let capacity =
                self.max_load_unit.to_grams(max_load) - self.fixed_load_unit.to_grams(fixed);
            if capacity < 0 {
                return Err(ValidationError::NegativeCapacity {
                    container: k,
                    capacity,
                });
            }
            let label = match self.labels.get(k) {
                Some(label) => label.clone(),
                None => format!("Container {}", k + 1),
            };
            containers.push(Container::labelled(label, capacity));
        }
        Ok(containers)
    }
}
