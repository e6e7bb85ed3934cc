//! Item types and containers.

/// An item type that can be loaded into containers.
///
/// `weight` is expressed in the smallest weight unit (e.g. grams) and is
/// shared by every container; `max_count` caps the total number of units
/// across all containers.
///
/// # Examples
///
/// ```
/// use u_knapsack::model::Item;
///
/// let phone = Item::new("office-phone", 2451, 40.0, 205);
/// assert_eq!(phone.weight, 2451);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    /// Unique name.
    pub name: String,
    /// Unit weight.
    pub weight: i64,
    /// Unit utility.
    pub utility: f64,
    /// Units available across all containers.
    pub max_count: i64,
}

impl Item {
    /// Creates a new item type.
    pub fn new(name: impl Into<String>, weight: i64, utility: f64, max_count: i64) -> Self {
        Self {
            name: name.into(),
            weight,
            utility,
            max_count,
        }
    }

    /// Utility per unit of weight. Zero-weight items report infinity.
    pub fn density(&self) -> f64 {
        if self.weight == 0 {
            f64::INFINITY
        } else {
            self.utility / self.weight as f64
        }
    }
}

/// A capacity-limited container.
///
/// The capacity is net of any fixed load (a driver's own weight, for
/// instance); see [`crate::loading::Fleet`] for building containers from
/// raw fleet data.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Container {
    /// Net capacity, in the same unit as item weights.
    pub capacity: i64,
    /// Optional display label.
    pub label: Option<String>,
}

impl Container {
    /// Creates an unlabelled container.
    pub fn new(capacity: i64) -> Self {
        Self {
            capacity,
            label: None,
        }
    }

    /// Creates a labelled container.
    pub fn labelled(label: impl Into<String>, capacity: i64) -> Self {
        Self {
            capacity,
            label: Some(label.into()),
        }
    }

    /// The label, or `"Container N"` (1-based) when none was given.
    pub fn display_label(&self, index: usize) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("Container {}", index + 1),
        }
    }
}
