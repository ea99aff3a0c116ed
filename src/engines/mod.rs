//! Low-level engines for GenBank processing
//!
//! This module holds the building blocks the query layer sits on:
//! file access, text primitives and the record parser.

pub mod core;
pub mod compute;
pub mod storage;

use thiserror::Error;

pub use storage::formats::ParseError;

/// Error type for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid sequence data: {0}")]
    InvalidSequenceData(String),

    #[error("Operation not supported: {0}")]
    UnsupportedOperation(String),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
