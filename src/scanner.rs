//! Line scanner for aligned bracket notation
//!
//! Each line of a pretty-printed treebank encodes one top-to-leaf branch of
//! the sentence tree, e.g.
//!
//! ```text
//! ( (S (NP-SBJ (DT The)
//!              (NN dog))
//!      (VP (VBZ runs))))
//! ```
//!
//! The scanner pulls out the category labels opened on a line together with
//! the byte column of each opening bracket, followed by the leaf token and its
//! column. Columns are used downstream as the depth key for tree assembly.

use memchr::memchr;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// An opening bracket followed by a category tag and a space
static OPEN_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([A-Z0-9,.;:!?`'$#-]+) ").expect("static regex"));

/// The leaf token: the first space-delimited run without an open bracket
/// that is closed by `)`
static LEAF_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r" ([^()]+?)\)").expect("static regex"));

/// A label and the column it was found at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedLabel<'a> {
    pub label: &'a str,
    /// Byte offset of the opening bracket (or of the token itself, for leaves)
    pub column: usize,
}

impl<'a> ScannedLabel<'a> {
    pub fn new(label: &'a str, column: usize) -> Self {
        Self { label, column }
    }
}

/// Error produced when a line cannot be scanned
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("no opening category marker in line: {0:?}")]
    NoMarkers(String),

    #[error("no leaf token in line: {0:?}")]
    NoLeaf(String),

    #[error("more than one branch on line: {0:?}")]
    MultipleLeaves(String),
}

/// Scan one line into its ordered `(label, column)` sequence
///
/// The result holds one entry per opening category marker, left to right,
/// followed by a final entry for the leaf token.
pub fn scan_line(line: &str) -> Result<Vec<ScannedLabel<'_>>, ScanError> {
    let mut labels: Vec<ScannedLabel> = OPEN_MARKER
        .captures_iter(line)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let tag = caps.get(1)?;
            Some(ScannedLabel::new(tag.as_str(), whole.start()))
        })
        .collect();

    if labels.is_empty() {
        return Err(ScanError::NoMarkers(line.to_string()));
    }

    let Some(leaf) = LEAF_TOKEN.captures(line).and_then(|caps| caps.get(1)) else {
        return Err(ScanError::NoLeaf(line.to_string()));
    };

    let token = leaf.as_str().trim();
    if token.is_empty() {
        return Err(ScanError::NoLeaf(line.to_string()));
    }

    // Anything opened after the leaf's closing bracket is a second branch
    if memchr(b'(', line[leaf.end()..].as_bytes()).is_some() {
        return Err(ScanError::MultipleLeaves(line.to_string()));
    }

    let leading = leaf.as_str().len() - leaf.as_str().trim_start().len();
    labels.push(ScannedLabel::new(token, leaf.start() + leading));

    Ok(labels)
}

/// True if the line carries any bracket at all
///
/// Lines without an opening bracket separate sentence blocks.
#[inline]
pub fn is_bracket_line(line: &str) -> bool {
    memchr(b'(', line.as_bytes()).is_some()
}
