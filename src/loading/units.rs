//! Mass units.

use crate::error::ValidationError;
use std::fmt;
use std::str::FromStr;

/// Unit of a mass quantity. Weights inside a [`Problem`](crate::model::Problem)
/// are always whole grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MassUnit {
    Gram,
    #[default]
    Kilogram,
}

impl MassUnit {
    /// Grams in one unit.
    pub fn grams(&self) -> f64 {
        match self {
            MassUnit::Gram => 1.0,
            MassUnit::Kilogram => 1000.0,
        }
    }

    /// Converts `value` to whole grams, rounding to the nearest gram.
    ///
    /// ```
    /// use u_knapsack::loading::MassUnit;
    ///
    /// assert_eq!(MassUnit::Kilogram.to_grams(72.4), 72_400);
    /// assert_eq!(MassUnit::Gram.to_grams(2451.4), 2451);
    /// ```
    pub fn to_grams(&self, value: f64) -> i64 {
        (value * self.grams()).round() as i64
    }
}

impl FromStr for MassUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "g" | "gram" | "grams" => Ok(MassUnit::Gram),
            "kg" | "kilogram" | "kilograms" => Ok(MassUnit::Kilogram),
            _ => Err(ValidationError::UnknownUnit { unit: s.into() }),
        }
    }
}

impl fmt::Display for MassUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MassUnit::Gram => f.write_str("g"),
            MassUnit::Kilogram => f.write_str("kg"),
        }
    }
}
