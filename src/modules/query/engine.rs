//! Report queries over a parsed record
//!
//! Every query yields plain text lines; multi-column rows are separated by
//! `;`. A query that finds nothing yields a single explanatory line rather
//! than an empty result, and bad arguments are reported the same way.

use std::iter;
use std::sync::LazyLock;

use regex::Regex;

use super::{Query, QueryError};
use crate::engines::compute::string_ops;
use crate::modules::seq::{Coordinates, GenbankRecord, Gene};

/// Lines produced by a query
pub type Lines<'a> = Box<dyn Iterator<Item = String> + 'a>;

const FEATURE_HEADER: &str = "FEATURE;TYPE;START;STOP;ORIENTATION";
const SITE_HEADER: &str = "POSITION;SEQUENCE;GENE";
const INTERGENIC: &str = "INTERGENIC";

static MATCH_ANY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(".").expect("valid fallback regex"));

/// Runs queries against one record
#[derive(Debug, Clone)]
pub struct QueryEngine<'r> {
    record: &'r GenbankRecord,
    /// Name reported by the summary, usually the file name
    source_name: String,
    /// Wrap width for sequence lines, `None` for one line per sequence
    line_width: Option<usize>,
}

impl<'r> QueryEngine<'r> {
    /// Create an engine over `record`, named `unnamed`, without line wrapping
    pub fn new(record: &'r GenbankRecord) -> Self {
        Self {
            record,
            source_name: "unnamed".to_string(),
            line_width: None,
        }
    }

    /// Set the source name reported by the summary
    pub fn with_source_name(mut self, name: &str) -> Self {
        self.source_name = name.to_string();
        self
    }

    /// Wrap sequence output at `width` characters
    pub fn with_line_width(mut self, width: Option<usize>) -> Self {
        self.line_width = width;
        self
    }

    /// Get the record being queried
    pub fn record(&self) -> &'r GenbankRecord {
        self.record
    }

    /// Run a query selected by key
    pub fn run(&self, query: &Query) -> Lines<'r> {
        log::debug!("running {} query on {}", query.key(), self.record.accession());

        match query {
            Query::Summary => self.summary(),
            Query::FetchGene(pattern) => self.fetch_gene(pattern),
            Query::FetchCds(pattern) => self.fetch_cds(pattern),
            Query::FetchFeatures(range) => self.fetch_features(range),
            Query::FindSites(pattern) => self.find_sites(pattern),
        }
    }

    /// Overview of the record
    pub fn summary(&self) -> Lines<'r> {
        let record = self.record;
        let lines = vec![
            format!("file: {}", self.source_name),
            format!("organism: {}", record.organism()),
            format!("accession: {}", record.accession()),
            format!("sequence length: {} bp", record.len()),
            format!("number of genes: {}", record.genes().len()),
            format!("gene F/R balance: {:?}", record.forward_ratio()),
            format!("number of CDS's: {}", record.cdss().len()),
        ];
        Box::new(lines.into_iter())
    }

    /// FASTA entries with the nucleotide sequence of every gene whose
    /// name matches `pattern`
    pub fn fetch_gene(&self, pattern: &str) -> Lines<'r> {
        let record = self.record;
        let width = self.line_width;
        let (regex, warning) = pattern_or_any("Gene", pattern);

        let entries = record
            .genes()
            .iter()
            .filter(move |gene| regex.is_match(&gene.name))
            .flat_map(move |gene| gene_entry(record, gene, width));

        framed(
            Vec::new(),
            warning.into_iter().chain(entries),
            format!("Gene pattern '{}' was not found in the given GenBank.", pattern),
        )
    }

    /// FASTA entries with the translation of every CDS whose product
    /// matches `pattern`
    pub fn fetch_cds(&self, pattern: &str) -> Lines<'r> {
        let width = self.line_width;
        let (regex, warning) = pattern_or_any("CDS", pattern);

        let entries = self
            .record
            .cdss()
            .iter()
            .filter(move |cds| regex.is_match(&cds.product))
            .flat_map(move |cds| {
                iter::once(format!(">CDS {} sequence", cds.product))
                    .chain(string_ops::wrap_sequence(&cds.translation, width))
            });

        framed(
            Vec::new(),
            warning.into_iter().chain(entries),
            format!("CDS pattern '{}' was not found in the given GenBank.", pattern),
        )
    }

    /// Genes lying strictly inside the range `first,last`, each followed by
    /// the CDSs sharing its exact coordinates
    pub fn fetch_features(&self, range_text: &str) -> Lines<'r> {
        let range = match QueryRange::parse(range_text) {
            Ok(range) => range,
            Err(err) => return Box::new(iter::once(err.to_string())),
        };

        let record = self.record;
        let rows = record
            .genes()
            .iter()
            .filter(move |gene| range.strictly_contains(&gene.coordinates))
            .flat_map(move |gene| {
                let cs = gene.coordinates;
                let gene_row = format!(
                    "{};gene;{};{};{}",
                    gene.name,
                    cs.first(),
                    cs.last(),
                    gene.orientation
                );
                // CDS rows report the orientation of the gene they belong to
                let cds_rows = record
                    .cdss()
                    .iter()
                    .filter(move |cds| cds.coordinates == cs)
                    .map(move |cds| {
                        format!(
                            "{};CDS;{};{};{}",
                            cds.product,
                            cs.first(),
                            cs.last(),
                            gene.orientation
                        )
                    });
                iter::once(gene_row).chain(cds_rows)
            });

        framed(
            vec![FEATURE_HEADER.to_string()],
            rows,
            format!(
                "No gene(s) or CDS(s) was/were found between '{}' in the given GenBank.",
                range_text
            ),
        )
    }

    /// Every non-overlapping occurrence of an IUPAC pattern, tagged with the
    /// genes it starts in
    pub fn find_sites(&self, pattern: &str) -> Lines<'r> {
        let filtered = string_ops::normalize_site_pattern(pattern);
        if filtered.is_empty() {
            return Box::new(iter::once(
                QueryError::EmptySitePattern(pattern.to_string()).to_string(),
            ));
        }

        let expanded = string_ops::expand_iupac(&filtered);
        let regex = match Regex::new(&expanded) {
            Ok(regex) => regex,
            Err(err) => {
                log::warn!("site pattern {} did not compile: {}", expanded, err);
                return Box::new(iter::once(
                    QueryError::UnsearchableSitePattern {
                        pattern: filtered,
                        regex: expanded,
                    }
                    .to_string(),
                ));
            }
        };

        let record = self.record;
        let sites: Vec<(usize, &'r str)> = regex
            .find_iter(record.sequence())
            .map(|m| (m.start(), m.as_str()))
            .collect();
        log::debug!("{} sites matched {}", sites.len(), expanded);

        let rows = annotate_sites(record.genes(), sites);

        framed(
            vec![
                format!("site search: {} (regex: {})", filtered, expanded),
                SITE_HEADER.to_string(),
            ],
            rows,
            format!(
                "The pattern '{}' did not result in matches within the given GenBank.",
                filtered
            ),
        )
    }
}

/// Start and stop of a feature listing, as given by the user.
/// Unlike `Coordinates` the ends may be negative or reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueryRange {
    first: i64,
    last: i64,
}

impl QueryRange {
    /// Parse `first,last` ignoring whitespace. With more than two numbers
    /// only the first and the last are used.
    fn parse(text: &str) -> Result<Self, QueryError> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let tokens = string_ops::split_trailing(&compact, ",");

        let number = |token: Option<&&str>| token.and_then(|t| t.parse::<i64>().ok());
        match (number(tokens.first()), number(tokens.last())) {
            (Some(first), Some(last)) => Ok(Self { first, last }),
            _ => Err(QueryError::InvalidRange(text.to_string())),
        }
    }

    /// Touching either end does not count as inside
    fn strictly_contains(&self, coordinates: &Coordinates) -> bool {
        i128::from(coordinates.first()) > i128::from(self.first)
            && i128::from(coordinates.last()) < i128::from(self.last)
    }
}

/// Compile a user pattern, falling back to match-anything with a warning line
fn pattern_or_any(kind: &'static str, pattern: &str) -> (Regex, Option<String>) {
    match compile_pattern(kind, pattern) {
        Ok(regex) => (regex, None),
        Err(err) => (MATCH_ANY.clone(), Some(err.to_string())),
    }
}

fn compile_pattern(kind: &'static str, pattern: &str) -> Result<Regex, QueryError> {
    Regex::new(pattern).map_err(|err| {
        log::warn!("{} pattern '{}' rejected: {}", kind, pattern, err);
        QueryError::InvalidPattern {
            kind,
            pattern: pattern.to_string(),
        }
    })
}

fn gene_entry(record: &GenbankRecord, gene: &Gene, width: Option<usize>) -> Vec<String> {
    let mut lines = vec![format!(">gene {} sequence", gene.name)];
    match record.subsequence(&gene.coordinates) {
        Ok(sequence) => lines.extend(string_ops::wrap_sequence(sequence, width)),
        Err(err) => {
            log::warn!("gene {} lies outside the sequence: {}", gene.name, err);
            lines.push(format!("Gene '{}' could not be extracted: {}", gene.name, err));
        }
    }
    lines
}

/// Report lines for one site. The 0-based match start is compared directly
/// with the 1-based gene bounds, both exclusive.
fn site_rows(genes: &[Gene], position: usize, site: &str) -> Vec<String> {
    let start = position as u64;
    let rows: Vec<String> = genes
        .iter()
        .filter(|gene| gene.coordinates.first() < start && gene.coordinates.last() > start)
        .map(|gene| format!("{};{};{}", position + 1, site, gene.name))
        .collect();

    if rows.is_empty() {
        vec![format!("{};{};{}", position + 1, site, INTERGENIC)]
    } else {
        rows
    }
}

#[cfg(not(feature = "parallel"))]
fn annotate_sites<'r>(genes: &'r [Gene], sites: Vec<(usize, &'r str)>) -> Lines<'r> {
    Box::new(
        sites
            .into_iter()
            .flat_map(move |(position, site)| site_rows(genes, position, site)),
    )
}

#[cfg(feature = "parallel")]
fn annotate_sites<'r>(genes: &'r [Gene], sites: Vec<(usize, &'r str)>) -> Lines<'r> {
    use rayon::prelude::*;

    let rows: Vec<Vec<String>> = sites
        .par_iter()
        .map(|&(position, site)| site_rows(genes, position, site))
        .collect();
    Box::new(rows.into_iter().flatten())
}

/// Prefix `rows` with `header`, or replace them with `message` when empty
fn framed<'a, I>(header: Vec<String>, rows: I, message: String) -> Lines<'a>
where
    I: Iterator<Item = String> + 'a,
{
    let mut rows = rows.peekable();
    if rows.peek().is_none() {
        return Box::new(iter::once(message));
    }
    Box::new(header.into_iter().chain(rows))
}
