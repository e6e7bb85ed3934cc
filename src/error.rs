//! Error taxonomy.
//!
//! - [`ValidationError`]: malformed input, raised before any search starts.
//! - [`LpError`]: internal relaxation failure. The driver retries and, if
//!   needed, drops the subproblem; it never reaches the caller directly.
//! - [`ConsistencyError`]: the extracted incumbent violates an invariant.
//!   This is an internal bug and is always returned as an error.
//!
//! [`KnapsackError`] unifies the caller-facing variants.

use std::fmt;

/// A malformed problem or ingestion input.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The problem has no containers.
    NoContainers,
    /// An item has a negative unit weight.
    NegativeWeight { item: String, weight: i64 },
    /// An item has a negative maximum count.
    NegativeMaxCount { item: String, max_count: i64 },
    /// An item has a negative or non-finite utility.
    InvalidUtility { item: String, utility: f64 },
    /// A container has a negative capacity (possibly after subtracting its fixed load).
    NegativeCapacity { container: usize, capacity: i64 },
    /// A zero-weight item with positive utility and a positive count would be
    /// selectable without limit inside a container.
    UnboundedItem { item: String },
    /// Two items share the same name.
    DuplicateItem { item: String },
    /// Parallel lists (e.g. capacities and fixed loads) differ in length.
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// A mapped column is absent from the header row.
    MissingColumn { column: String },
    /// A record field could not be interpreted.
    InvalidField { column: String, value: String },
    /// A mass unit name was not recognised.
    UnknownUnit { unit: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoContainers => write!(f, "problem must contain at least one container"),
            Self::NegativeWeight { item, weight } => {
                write!(f, "item '{item}' has negative weight {weight}")
            }
            Self::NegativeMaxCount { item, max_count } => {
                write!(f, "item '{item}' has negative max_count {max_count}")
            }
            Self::InvalidUtility { item, utility } => {
                write!(f, "item '{item}' has invalid utility {utility}")
            }
            Self::NegativeCapacity {
                container,
                capacity,
            } => write!(f, "container {container} has negative capacity {capacity}"),
            Self::UnboundedItem { item } => write!(
                f,
                "item '{item}' has zero weight but positive utility and max_count"
            ),
            Self::DuplicateItem { item } => write!(f, "duplicate item name '{item}'"),
            Self::LengthMismatch {
                what,
                expected,
                found,
            } => write!(f, "{what}: expected {expected} entries, found {found}"),
            Self::MissingColumn { column } => write!(f, "missing column '{column}'"),
            Self::InvalidField { column, value } => {
                write!(f, "column '{column}': cannot interpret '{value}'")
            }
            Self::UnknownUnit { unit } => write!(f, "unknown mass unit '{unit}'"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Failure of a single relaxation solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LpError {
    /// The simplex exceeded its iteration budget (degeneracy or cycling).
    NumericalInstability { iterations: usize },
}

impl fmt::Display for LpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NumericalInstability { iterations } => {
                write!(f, "simplex did not converge within {iterations} iterations")
            }
        }
    }
}

impl std::error::Error for LpError {}

/// The incumbent handed to the extractor violates an invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsistencyError {
    pub detail: String,
}

impl ConsistencyError {
    pub(crate) fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ConsistencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "inconsistent incumbent: {}", self.detail)
    }
}

impl std::error::Error for ConsistencyError {}

/// Any error surfaced to the caller of [`crate::solve`].
#[derive(Debug, Clone, PartialEq)]
pub enum KnapsackError {
    Validation(ValidationError),
    Consistency(ConsistencyError),
    /// The search configuration is invalid.
    Config(String),
}

impl fmt::Display for KnapsackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "validation error: {e}"),
            Self::Consistency(e) => write!(f, "consistency error: {e}"),
            Self::Config(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for KnapsackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(e) => Some(e),
            Self::Consistency(e) => Some(e),
            Self::Config(_) => None,
        }
    }
}

impl From<ValidationError> for KnapsackError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<ConsistencyError> for KnapsackError {
    fn from(e: ConsistencyError) -> Self {
        Self::Consistency(e)
    }
}
