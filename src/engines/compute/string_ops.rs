//! String operations on GenBank text
//!
//! The flat file format mixes free text, feature locations and sequence
//! blocks with line numbers. These helpers normalise each of them, and
//! expand IUPAC nucleotide codes into regular expression classes for the
//! site search.

use itertools::Itertools;

/// Collapse every whitespace run to a single space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().join(" ")
}

/// Remove whitespace and double quotes, used before splitting a feature on `/`
pub fn strip_whitespace_and_quotes(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != '"')
        .collect()
}

/// Turn an ORIGIN block into a bare upper-case sequence
pub fn strip_sequence_block(block: &str) -> String {
    block
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_ascii_digit())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Keep only the digits and dots of a feature location,
/// e.g. `complement(<1..206)` becomes `1..206`
pub fn location_digits(location: &str) -> String {
    location
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Split on `separator`, dropping empty pieces at the end (but always
/// keeping the first piece), so `"206.."` gives `["206"]`
pub fn split_trailing<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut pieces: Vec<&str> = text.split(separator).collect();
    while pieces.len() > 1 && pieces.last().is_some_and(|piece| piece.is_empty()) {
        pieces.pop();
    }
    pieces
}

/// Character class for an IUPAC ambiguity code, `None` for anything else
/// (including the unambiguous A, C, G and T)
pub fn iupac_class(code: char) -> Option<&'static str> {
    match code {
        'R' => Some("[AG]"),
        'Y' => Some("[CT]"),
        'S' => Some("[GC]"),
        'W' => Some("[AT]"),
        'K' => Some("[GT]"),
        'M' => Some("[AC]"),
        'B' => Some("[CGT]"),
        'D' => Some("[AGT]"),
        'H' => Some("[ACT]"),
        'V' => Some("[ACG]"),
        'N' => Some("[ACGT]"),
        _ => None,
    }
}

/// Normalise a user supplied site pattern: drop every character that is
/// not an ASCII word character, drop digits, upper-case the rest.
pub fn normalize_site_pattern(pattern: &str) -> String {
    pattern
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == '_')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Expand a normalised site pattern into a regular expression.
/// Characters without an IUPAC class are copied unchanged.
pub fn expand_iupac(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() * 4);
    for code in pattern.chars() {
        match iupac_class(code) {
            Some(class) => regex.push_str(class),
            None => regex.push(code),
        }
    }
    regex
}

/// Wrap a sequence into lines of at most `width` characters.
/// `None` (or a zero width) keeps the sequence on one line.
pub fn wrap_sequence(sequence: &str, width: Option<usize>) -> Vec<String> {
    match width {
        Some(width) if width > 0 && sequence.len() > width => sequence
            .as_bytes()
            .chunks(width)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect(),
        _ => vec![sequence.to_string()],
    }
}
