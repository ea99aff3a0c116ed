//! Annotated features of a GenBank record
//!
//! Genes and coding sequences share a 1-based inclusive coordinate range
//! and a strand orientation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{SequenceError, SequenceResult};

/// 1-based inclusive coordinate range, `first <= last`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    first: u64,
    last: u64,
}

/// Unchecked serialised form of `Coordinates`
#[derive(Deserialize)]
struct RawCoordinates {
    first: u64,
    last: u64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = SequenceError;

    fn try_from(raw: RawCoordinates) -> SequenceResult<Self> {
        Coordinates::new(raw.first, raw.last)
    }
}

impl Coordinates {
    /// Create a range, rejecting `first > last`
    pub fn new(first: u64, last: u64) -> SequenceResult<Self> {
        if first > last {
            return Err(SequenceError::InvalidRange(format!(
                "start {} lies after stop {}",
                first, last
            )));
        }

        Ok(Self { first, last })
    }

    /// Get the 1-based start
    pub fn first(&self) -> u64 {
        self.first
    }

    /// Get the 1-based inclusive stop
    pub fn last(&self) -> u64 {
        self.last
    }

    /// Number of positions covered by the range
    pub fn len(&self) -> u64 {
        self.last - self.first + 1
    }

    /// Always false, a range covers at least one position
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.first, self.last)
    }
}

/// Strand on which a feature is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Forward,
    Reverse,
}

impl Orientation {
    /// A location wrapped in `complement(...)` lies on the reverse strand
    pub fn from_location(location: &str) -> Self {
        if location.contains("complement") {
            Orientation::Reverse
        } else {
            Orientation::Forward
        }
    }

    /// Name used in feature listings
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Forward => "Forward",
            Orientation::Reverse => "Reverse",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An annotated gene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    pub coordinates: Coordinates,
    /// Locus tag or gene name, whichever the annotation listed last
    pub name: String,
    pub orientation: Orientation,
}

impl Gene {
    /// Create a new gene
    pub fn new(coordinates: Coordinates, name: &str, orientation: Orientation) -> Self {
        Self {
            coordinates,
            name: name.to_string(),
            orientation,
        }
    }
}

/// An annotated protein coding region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodingSequence {
    pub coordinates: Coordinates,
    pub product: String,
    pub protein_id: String,
    /// Amino-acid sequence, upper case
    pub translation: String,
    pub orientation: Orientation,
}

impl CodingSequence {
    /// Create a new coding sequence; the translation is upper-cased
    pub fn new(
        coordinates: Coordinates,
        product: &str,
        protein_id: &str,
        translation: &str,
        orientation: Orientation,
    ) -> Self {
        Self {
            coordinates,
            product: product.to_string(),
            protein_id: protein_id.to_string(),
            translation: translation.to_ascii_uppercase(),
            orientation,
        }
    }
}
