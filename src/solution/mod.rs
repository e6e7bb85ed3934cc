//! Solution extraction and reporting.
//!
//! [`extract`] turns the driver's incumbent into per-container item
//! counts, re-verifying every limit on the way. [`Solution`] implements
//! `Display` for a plain-text report.

mod extract;
mod report;
mod types;

pub use extract::extract;
pub use types::{ContainerLoad, Solution};
