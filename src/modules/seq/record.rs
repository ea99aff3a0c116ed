//! Parsed GenBank record
//!
//! A record is built once by the parser and never modified afterwards;
//! queries borrow it.

use serde::{Deserialize, Serialize};

use super::feature::{CodingSequence, Coordinates, Gene, Orientation};
use super::{SequenceError, SequenceResult};

/// Annotations and sequence of one GenBank entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenbankRecord {
    definition: String,
    accession: String,
    organism: String,
    /// Upper-case nucleotides, no whitespace or digits
    sequence: String,
    genes: Vec<Gene>,
    cdss: Vec<CodingSequence>,
}

impl GenbankRecord {
    /// Create a record from its parsed sections
    pub fn new(
        definition: &str,
        accession: &str,
        organism: &str,
        sequence: &str,
        genes: Vec<Gene>,
        cdss: Vec<CodingSequence>,
    ) -> Self {
        Self {
            definition: definition.to_string(),
            accession: accession.to_string(),
            organism: organism.to_string(),
            sequence: sequence.to_string(),
            genes,
            cdss,
        }
    }

    /// Get the definition line, whitespace collapsed
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Get the accession number
    pub fn accession(&self) -> &str {
        &self.accession
    }

    /// Get the organism name from the source feature
    pub fn organism(&self) -> &str {
        &self.organism
    }

    /// Get the nucleotide sequence
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// Get the genes in file order
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Get the coding sequences in file order
    pub fn cdss(&self) -> &[CodingSequence] {
        &self.cdss
    }

    /// Sequence length in base pairs
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Check whether the record has no sequence
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Nucleotides covered by a 1-based inclusive range
    pub fn subsequence(&self, coordinates: &Coordinates) -> SequenceResult<&str> {
        let out_of_bounds = || {
            SequenceError::IndexOutOfBounds(format!(
                "Invalid range {} for sequence of length {}",
                coordinates,
                self.sequence.len()
            ))
        };

        // Coordinates beyond the address space cannot lie inside the sequence
        let first = usize::try_from(coordinates.first()).map_err(|_| out_of_bounds())?;
        let end = usize::try_from(coordinates.last()).map_err(|_| out_of_bounds())?;

        if first == 0 || end > self.sequence.len() {
            return Err(out_of_bounds());
        }

        self.sequence.get(first - 1..end).ok_or_else(|| {
            SequenceError::IndexOutOfBounds(format!("Range {} is not on a base boundary", coordinates))
        })
    }

    /// Number of genes on the forward strand
    pub fn forward_gene_count(&self) -> usize {
        self.genes
            .iter()
            .filter(|gene| gene.orientation == Orientation::Forward)
            .count()
    }

    /// Forward genes divided by all genes; NaN when there are no genes
    pub fn forward_ratio(&self) -> f32 {
        if self.genes.is_empty() {
            return f32::NAN;
        }
        self.forward_gene_count() as f32 / self.genes.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(genes: Vec<Gene>) -> GenbankRecord {
        GenbankRecord::new("def", "U00001", "E. coli", "ATGCGTACGT", genes, Vec::new())
    }

    #[test]
    fn test_subsequence() {
        let rec = record(Vec::new());

        let whole = Coordinates::new(1, 10).unwrap();
        assert_eq!(rec.subsequence(&whole).unwrap(), "ATGCGTACGT");

        let inner = Coordinates::new(3, 5).unwrap();
        assert_eq!(rec.subsequence(&inner).unwrap(), "GCG");

        let single = Coordinates::new(10, 10).unwrap();
        assert_eq!(rec.subsequence(&single).unwrap(), "T");
    }

    #[test]
    fn test_subsequence_out_of_bounds() {
        let rec = record(Vec::new());

        let past_end = Coordinates::new(5, 11).unwrap();
        assert!(matches!(
            rec.subsequence(&past_end),
            Err(SequenceError::IndexOutOfBounds(_))
        ));

        let zero = Coordinates::new(0, 3).unwrap();
        assert!(rec.subsequence(&zero).is_err());

        // Must not wrap around to a short range on narrow targets
        let huge = Coordinates::new(5, u64::MAX).unwrap();
        assert!(matches!(
            rec.subsequence(&huge),
            Err(SequenceError::IndexOutOfBounds(_))
        ));

        let beyond = Coordinates::new(u64::MAX - 1, u64::MAX).unwrap();
        assert!(matches!(
            rec.subsequence(&beyond),
            Err(SequenceError::IndexOutOfBounds(_))
        ));
    }

    #[test]
    fn test_forward_ratio() {
        let cs = Coordinates::new(1, 4).unwrap();
        let rec = record(vec![
            Gene::new(cs, "a", Orientation::Forward),
            Gene::new(cs, "b", Orientation::Reverse),
            Gene::new(cs, "c", Orientation::Forward),
            Gene::new(cs, "d", Orientation::Forward),
        ]);
        assert_eq!(rec.forward_gene_count(), 3);
        assert_eq!(rec.forward_ratio(), 0.75);

        assert!(record(Vec::new()).forward_ratio().is_nan());
    }
}
