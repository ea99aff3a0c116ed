//! Storage formats
//!
//! This module turns raw flat file text into typed records.

pub mod formats;

pub use formats::{create_parser, detect_format, GenbankParser, ParseError, RecordParser};
