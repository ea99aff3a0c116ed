//! GenBank flat file reader
//!
//! Parses the first record of a GenBank file into a typed model and
//! answers report queries over it: a summary, gene and CDS sequences by
//! name pattern, features within a range and degenerate site search.
//!
//! ```no_run
//! use genbank_reader::{read_genbank, Query};
//!
//! let file = read_genbank("NC_000913.gbk")?;
//! let query = Query::from_parts("find_sites", Some("GAATTC"))?;
//! for line in file.engine().with_line_width(Some(80)).run(&query) {
//!     println!("{}", line);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod engines;
pub mod modules;

pub use engines::storage::{create_parser, detect_format, GenbankParser, RecordParser};
pub use engines::{EngineError, EngineResult, ParseError};
pub use modules::io::{read_genbank, read_genbank_string, GenbankFile, GenbankIoError};
pub use modules::query::{Lines, Query, QueryEngine, QueryError};
pub use modules::seq::{CodingSequence, Coordinates, GenbankRecord, Gene, Orientation};
