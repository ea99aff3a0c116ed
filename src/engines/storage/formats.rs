//! GenBank flat file parser
//!
//! Fields are pulled out of the raw text one at a time, each by its own
//! anchored search over the same immutable buffer. Every search starts at
//! the offset where the previous one ended, so the fields are taken from
//! the first record in the file and anything after its `//` terminator is
//! never looked at.

use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::engines::compute::string_ops;
use crate::engines::core::io::{self, FastReader};
use crate::engines::{EngineError, EngineResult};
use crate::modules::seq::{CodingSequence, Coordinates, GenbankRecord, Gene, Orientation};

const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024; // 1MB
const DEFAULT_MMAP_THRESHOLD: usize = 100 * 1024 * 1024; // 100MB

static DEFINITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)DEFINITION(.+?)ACCESSION").expect("valid DEFINITION regex"));

static ACCESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)ACCESSION(.+?)VERSION").expect("valid ACCESSION regex"));

// Group 1 is the organism name, group 2 the feature table up to ORIGIN.
static SOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)source.+?/organism="(.+?)"(.+?)ORIGIN"#).expect("valid source regex")
});

static CDS_FEATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)CDS(.+?/translation=".+?")"#).expect("valid CDS regex")
});

// `[^/]` keeps qualifier names such as `/gene=` from opening a new feature.
static GENE_FEATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)[^/]gene(.+?/gene=".+?"|.+?/db_xref=".+?")"#).expect("valid gene regex")
});

static ORIGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)ORIGIN(.+?)//").expect("valid ORIGIN regex"));

/// Error type for record parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Missing section: {0}")]
    MissingSection(&'static str),

    #[error("Invalid coordinates for {feature} feature: '{text}'")]
    InvalidCoordinates { feature: &'static str, text: String },

    /// Start after stop once the location is reduced to its outer bounds,
    /// as for joins across the origin of a circular sequence
    #[error("Coordinates of {feature} feature '{text}' run backwards: {first} > {last}")]
    ReversedCoordinates {
        feature: &'static str,
        text: String,
        first: u64,
        last: u64,
    },

    #[error("Input of {size} bytes exceeds the limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },
}

/// Result type for record parsing
pub type ParseResult<T> = Result<T, ParseError>;

/// Trait for record parsers
pub trait RecordParser: Send + Sync {
    /// Parse a record from text already in memory
    fn parse_string(&self, content: &str) -> EngineResult<GenbankRecord>;

    /// Read and parse a record file
    fn parse_file(&self, path: &Path) -> EngineResult<GenbankRecord>;

    /// Get the format name
    fn format_name(&self) -> &str;
}

/// GenBank flat file parser
#[derive(Debug, Clone)]
pub struct GenbankParser {
    /// Buffer size for buffered file reads
    buffer_size: usize,
    /// Inputs larger than this are rejected before scanning
    size_limit: Option<usize>,
    /// Files at least this large are memory-mapped
    mmap_threshold: usize,
}

impl GenbankParser {
    /// Create a parser with default settings and no size limit
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            size_limit: None,
            mmap_threshold: DEFAULT_MMAP_THRESHOLD,
        }
    }

    /// Set the buffer size used for file reads
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Reject inputs larger than `limit` bytes
    pub fn with_size_limit(mut self, limit: Option<usize>) -> Self {
        self.size_limit = limit;
        self
    }

    /// Memory-map files of at least `threshold` bytes
    pub fn with_mmap_threshold(mut self, threshold: usize) -> Self {
        self.mmap_threshold = threshold;
        self
    }

    /// Get the configured size limit, if any
    pub fn size_limit(&self) -> Option<usize> {
        self.size_limit
    }

    /// Parse the first record in `text`
    pub fn parse(&self, text: &str) -> ParseResult<GenbankRecord> {
        self.check_size(text.len())?;

        let definition = find_section(&DEFINITION, text, 0, &["DEFINITION", "ACCESSION"])?;
        let definition_text = group(&definition, 1);
        log::debug!("DEFINITION section: {} bytes", definition_text.len());

        let cursor = group_end(&definition, 1);
        let accession = find_section(&ACCESSION, text, cursor, &["ACCESSION", "VERSION"])?;

        let cursor = group_end(&accession, 1);
        let source = find_section(&SOURCE, text, cursor, &["source", "/organism", "ORIGIN"])?;
        let features = group(&source, 2);
        log::debug!("feature table: {} bytes", features.len());

        let cdss = parse_cds_features(features)?;
        let genes = parse_gene_features(features)?;

        let cursor = group_end(&source, 2);
        let origin = find_section(&ORIGIN, text, cursor, &["ORIGIN", "//"])?;
        let sequence = string_ops::strip_sequence_block(group(&origin, 1));

        let record = GenbankRecord::new(
            &string_ops::collapse_whitespace(definition_text),
            &string_ops::collapse_whitespace(group(&accession, 1)),
            group(&source, 1),
            &sequence,
            genes,
            cdss,
        );

        log::info!(
            "parsed {}: {} bp, {} genes, {} CDS",
            record.accession(),
            record.len(),
            record.genes().len(),
            record.cdss().len()
        );

        Ok(record)
    }

    fn check_size(&self, size: usize) -> ParseResult<()> {
        match self.size_limit {
            Some(limit) if size > limit => Err(ParseError::InputTooLarge { size, limit }),
            _ => Ok(()),
        }
    }
}

impl Default for GenbankParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordParser for GenbankParser {
    fn parse_string(&self, content: &str) -> EngineResult<GenbankRecord> {
        Ok(self.parse(content)?)
    }

    fn parse_file(&self, path: &Path) -> EngineResult<GenbankRecord> {
        self.check_size(io::file_size(path)?)?;

        let text = io::read_text(path, Some(self.buffer_size), self.mmap_threshold)?;
        self.parse_string(&text)
    }

    fn format_name(&self) -> &str {
        "GENBANK"
    }
}

/// Search `re` from `from` onwards. When it does not match, report the
/// first of `anchors` missing from the rest of the text (or the last one
/// if all are present but out of order).
fn find_section<'t>(
    re: &Regex,
    text: &'t str,
    from: usize,
    anchors: &[&'static str],
) -> ParseResult<Captures<'t>> {
    re.captures_at(text, from).ok_or_else(|| {
        let rest = &text[from..];
        let missing = anchors
            .iter()
            .find(|anchor| !rest.contains(*anchor))
            .or(anchors.last())
            .copied()
            .unwrap_or("record");
        ParseError::MissingSection(missing)
    })
}

fn group<'t>(caps: &Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map_or("", |m| m.as_str())
}

fn group_end(caps: &Captures<'_>, index: usize) -> usize {
    caps.get(index).map_or(0, |m| m.end())
}

/// Orientation and coordinates from the location segment of a feature
fn feature_location(feature: &'static str, location: &str) -> ParseResult<(Coordinates, Orientation)> {
    let invalid = || ParseError::InvalidCoordinates {
        feature,
        text: location.to_string(),
    };

    let digits = string_ops::location_digits(location);
    let tokens = string_ops::split_trailing(&digits, "..");

    let first = tokens.first().and_then(|t| t.parse::<u64>().ok()).ok_or_else(invalid)?;
    let last = tokens.last().and_then(|t| t.parse::<u64>().ok()).ok_or_else(invalid)?;
    let coordinates =
        Coordinates::new(first, last).map_err(|_| ParseError::ReversedCoordinates {
            feature,
            text: location.to_string(),
            first,
            last,
        })?;

    Ok((coordinates, Orientation::from_location(location)))
}

fn parse_cds_features(features: &str) -> ParseResult<Vec<CodingSequence>> {
    CDS_FEATURE
        .captures_iter(features)
        .map(|caps| {
            let stripped = string_ops::strip_whitespace_and_quotes(group(&caps, 1));
            let mut segments = stripped.split('/');
            let (coordinates, orientation) =
                feature_location("CDS", segments.next().unwrap_or_default())?;

            let mut product = "";
            let mut protein_id = "";
            let mut translation = "";
            for segment in segments {
                if let Some(value) = segment.strip_prefix("product=") {
                    product = value;
                } else if let Some(value) = segment.strip_prefix("protein_id=") {
                    protein_id = value;
                } else if let Some(value) = segment.strip_prefix("translation=") {
                    translation = value;
                }
            }

            Ok(CodingSequence::new(
                coordinates,
                product,
                protein_id,
                translation,
                orientation,
            ))
        })
        .collect()
}

fn parse_gene_features(features: &str) -> ParseResult<Vec<Gene>> {
    GENE_FEATURE
        .captures_iter(features)
        .map(|caps| {
            let stripped = string_ops::strip_whitespace_and_quotes(group(&caps, 1));
            let mut segments = stripped.split('/');
            let (coordinates, orientation) =
                feature_location("gene", segments.next().unwrap_or_default())?;

            // Whichever name qualifier comes last wins
            let mut name = "";
            for segment in segments {
                if let Some(value) = segment.strip_prefix("locus_tag=") {
                    name = value;
                } else if let Some(value) = segment.strip_prefix("gene=") {
                    name = value;
                }
            }

            Ok(Gene::new(coordinates, name, orientation))
        })
        .collect()
}

/// Detect the format of a record file from its first non-empty line
pub fn detect_format<P: AsRef<Path>>(path: P) -> EngineResult<&'static str> {
    let mut reader = FastReader::new(path.as_ref(), None)?;

    for line in reader.read_lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with("LOCUS") {
            return Ok("GENBANK");
        }
        break;
    }

    Err(EngineError::InvalidSequenceData(
        "Could not determine file format".to_string(),
    ))
}

/// Create a parser for the specified format
pub fn create_parser(format: &str) -> EngineResult<Box<dyn RecordParser>> {
    match format.to_uppercase().as_str() {
        "GENBANK" | "GB" | "GBK" => Ok(Box::new(GenbankParser::new())),
        _ => Err(EngineError::UnsupportedOperation(format!(
            "Unsupported format: {}",
            format
        ))),
    }
}
