//! Typed search errors.
//!
//! `SearchError` represents pre-flight failures only. Once a run starts it
//! always ends in a [`crate::report::SearchOutcome`]; nothing inside the
//! search loop is fallible.

use thiserror::Error;

use crate::canon::CanonError;

/// Typed failure for pre-flight validation and report serialization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// A policy field is outside its accepted range.
    #[error("invalid search policy field `{field}`: {detail}")]
    InvalidPolicy { field: &'static str, detail: String },
    /// A report or policy snapshot could not be canonicalized.
    #[error("canonical JSON failure: {0}")]
    Canon(#[from] CanonError),
}
