//! I/O module
//!
//! This module reads GenBank files from disk and from text.

pub mod genbank;

use thiserror::Error;

use crate::engines::EngineError;

/// Error type for GenBank file access
#[derive(Error, Debug)]
pub enum GenbankIoError {
    #[error("Given file does not exist, is a directory or is not a GenBank: {0}")]
    InvalidPath(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result type for GenBank file access
pub type GenbankIoResult<T> = Result<T, GenbankIoError>;

/// Convenience re-exports
pub use genbank::{read_genbank, read_genbank_string, GenbankFile};
