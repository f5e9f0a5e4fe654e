//! Treecontext: adverb-phrase contexts from aligned bracket treebanks
//!
//! Rebuilds constituency trees from pretty-printed bracket notation, where
//! each line holds one top-to-leaf branch and depth is given by column
//! alignment, then tallies the parent, neighbour and child labels of every
//! adverb-phrase node.

pub mod assembly; // Line chains and column-aligned tree merging
pub mod config;
pub mod context; // Adverb-phrase context extraction
pub mod pipeline; // End-to-end corpus pass
pub mod report; // CSV output channels
pub mod scanner; // Per-line (label, column) scanning
pub mod stats; // Frequency aggregation
pub mod tree; // Arena-backed constituency trees
pub mod treebank; // Sentence blocks from strings, files and globs

// Re-exports for convenience
pub use assembly::{AlignmentError, SentenceAssembler, SentenceError, assemble_sentence};
pub use config::AnalysisConfig;
pub use context::{ADVP_MARKER, AdverbContext, ContextError, extract_contexts};
pub use pipeline::{Analysis, CorpusSummary, analyze, analyze_blocks};
pub use scanner::{ScanError, ScannedLabel, scan_line};
pub use stats::{ContextAggregator, ContextTable, DEFAULT_THRESHOLD, FrequencyTables};
pub use tree::{Constituent, NodeId, ParseTree};
pub use treebank::{BlockReader, SentenceBlock, Treebank, TreebankError};
