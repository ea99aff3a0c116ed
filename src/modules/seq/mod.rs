//! Sequence module
//!
//! This module provides the record and feature types produced by the
//! GenBank parser.

pub mod feature;
pub mod record;

use thiserror::Error;

/// Error type for record and feature construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(String),
}

/// Result type for sequence operations
pub type SequenceResult<T> = Result<T, SequenceError>;

pub use feature::{CodingSequence, Coordinates, Gene, Orientation};
pub use record::GenbankRecord;
