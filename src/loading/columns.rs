//! Column remapping over tabular records.

use super::units::MassUnit;
use crate::error::ValidationError;
use crate::model::Item;

/// Source column names of the four item fields.
///
/// The default mapping expects the columns to be called `name`,
/// `max_count`, `weight` and `utility`.
///
/// # Examples
///
/// ```
/// use u_knapsack::loading::ColumnMapping;
///
/// let columns = ColumnMapping::default()
///     .with_name("article")
///     .with_max_count("stock")
///     .resolve(&["article", "weight", "utility", "stock"])
///     .unwrap();
///
/// let item = columns.item(&["phone", "717", "30", "60"]).unwrap();
/// assert_eq!(item.name, "phone");
/// assert_eq!(item.max_count, 60);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnMapping {
    pub name: String,
    pub max_count: String,
    pub weight: String,
    pub utility: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            name: "name".into(),
            max_count: "max_count".into(),
            weight: "weight".into(),
            utility: "utility".into(),
        }
    }
}

impl ColumnMapping {
    pub fn with_name(mut self, column: impl Into<String>) -> Self {
        self.name = column.into();
        self
    }

    pub fn with_max_count(mut self, column: impl Into<String>) -> Self {
        self.max_count = column.into();
        self
    }

    pub fn with_weight(mut self, column: impl Into<String>) -> Self {
        self.weight = column.into();
        self
    }

    pub fn with_utility(mut self, column: impl Into<String>) -> Self {
        self.utility = column.into();
        self
    }

    /// Locates each mapped column in `header`. Header cells are trimmed
    /// before comparing.
    pub fn resolve<S: AsRef<str>>(&self, header: &[S]) -> Result<ResolvedColumns, ValidationError> {
        let find = |column: &str| {
            header
                .iter()
                .position(|h| h.as_ref().trim() == column)
                .ok_or_else(|| ValidationError::MissingColumn {
                    column: column.into(),
                })
        };
        Ok(ResolvedColumns {
            mapping: self.clone(),
            name: find(&self.name)?,
            max_count: find(&self.max_count)?,
            weight: find(&self.weight)?,
            utility: find(&self.utility)?,
            weight_unit: MassUnit::Gram,
        })
    }

    /// Like [`resolve`](Self::resolve), for a header line whose cells are
    /// separated by `delimiter`.
    pub fn resolve_line(
        &self,
        header: &str,
        delimiter: char,
    ) -> Result<ResolvedColumns, ValidationError> {
        let cells: Vec<&str> = split_line(header, delimiter).collect();
        self.resolve(&cells)
    }
}

/// Column positions of a concrete header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumns {
    mapping: ColumnMapping,
    name: usize,
    max_count: usize,
    weight: usize,
    utility: usize,
    weight_unit: MassUnit,
}

impl ResolvedColumns {
    /// Unit of the weight column (grams by default).
    pub fn with_weight_unit(mut self, unit: MassUnit) -> Self {
        self.weight_unit = unit;
        self
    }

    /// Builds an [`Item`] from one record's fields.
    ///
    /// Magnitudes are not range-checked here; [`Problem::new`](crate::model::Problem::new)
    /// does that.
    pub fn item<S: AsRef<str>>(&self, fields: &[S]) -> Result<Item, ValidationError> {
        let field = |index: usize, column: &str| -> Result<&str, ValidationError> {
            fields
                .get(index)
                .map(|f| f.as_ref().trim())
                .ok_or_else(|| ValidationError::InvalidField {
                    column: column.into(),
                    value: String::new(),
                })
        };
        let invalid = |column: &str, value: &str| ValidationError::InvalidField {
            column: column.into(),
            value: value.into(),
        };

        let name = field(self.name, &self.mapping.name)?;
        if name.is_empty() {
            return Err(invalid(&self.mapping.name, name));
        }

        let raw = field(self.max_count, &self.mapping.max_count)?;
        let max_count = parse_count(raw).ok_or_else(|| invalid(&self.mapping.max_count, raw))?;

        let raw = field(self.weight, &self.mapping.weight)?;
        let weight = raw
            .parse::<f64>()
            .ok()
            .filter(|w| w.is_finite())
            .map(|w| self.weight_unit.to_grams(w))
            .ok_or_else(|| invalid(&self.mapping.weight, raw))?;

        let raw = field(self.utility, &self.mapping.utility)?;
        let utility = raw
            .parse::<f64>()
            .map_err(|_| invalid(&self.mapping.utility, raw))?;

        Ok(Item::new(name, weight, utility, max_count))
    }

    /// Builds an [`Item`] from one delimited record line.
    ///
    /// Fields are split on `delimiter` as-is; quoting is not interpreted.
    pub fn item_from_line(&self, line: &str, delimiter: char) -> Result<Item, ValidationError> {
        let fields: Vec<&str> = split_line(line, delimiter).collect();
        self.item(&fields)
    }
}

/// Splits one line, ignoring a trailing line break.
fn split_line(line: &str, delimiter: char) -> std::str::Split<'_, char> {
    line.trim_end_matches(|c: char| c == '\r' || c == '\n').split(delimiter)
}

/// Whole numbers, also written as `"205.0"`.
fn parse_count(raw: &str) -> Option<i64> {
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    let f = raw.parse::<f64>().ok()?;
    (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}
