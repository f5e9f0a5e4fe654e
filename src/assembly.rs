//! Sentence tree assembly from aligned bracket lines
//!
//! Every line of a sentence block becomes a single downward chain of
//! constituents (one per opened label, ending in the leaf). The chains are then
//! folded, in source order, into one shared tree. Instead of counting
//! brackets, structural depth is read off the text alignment: a chain whose
//! top label starts in the same column as an existing node is that node's
//! sibling.
//!
//! The search for the attachment point walks the tree from the root and tries
//! children from last to first. Treebank lines extend the tree depth-first and
//! rightward, so the most recently opened branch is almost always the one the
//! next line continues.

use crate::scanner::{ScanError, ScannedLabel, scan_line};
use crate::tree::{NodeId, ParseTree};
use thiserror::Error;

/// A line chain that could not be placed in the sentence tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignmentError {
    #[error("no node aligned with {label:?} at column {column}")]
    NoMatch { label: String, column: usize },

    #[error("{label:?} at column {column} would be a second root")]
    SecondRoot { label: String, column: usize },
}

/// Failure to assemble one sentence block
///
/// `line` is the 1-based line number within the block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SentenceError {
    #[error("line {line}: {source}")]
    Scan {
        line: usize,
        #[source]
        source: ScanError,
    },

    #[error("line {line}: {source}")]
    Alignment {
        line: usize,
        #[source]
        source: AlignmentError,
    },

    #[error("empty sentence block")]
    Empty,
}

/// Incremental builder for one sentence's tree
///
/// Chain heads are assembly-only state: they are kept beside the arena and
/// dropped by [`SentenceAssembler::finish`].
#[derive(Debug, Default)]
pub struct SentenceAssembler {
    tree: ParseTree,
    heads: Vec<NodeId>,
    lines: usize,
}

impl SentenceAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the downward chain for one scanned line
    ///
    /// The first label becomes the chain's head; each following label is the
    /// sole child of the one before it. Returns the head, or `None` for an
    /// empty label sequence.
    pub fn build_chain(&mut self, labels: &[ScannedLabel<'_>]) -> Option<NodeId> {
        let (first, rest) = labels.split_first()?;

        let head = self.add_node(first.label, first.column, None);
        let mut tail = head;
        for scanned in rest {
            let id = self.add_node(scanned.label, scanned.column, Some(head));
            self.tree.set_parent(id, tail);
            tail = id;
        }

        Some(head)
    }

    fn add_node(&mut self, label: &str, column: usize, head: Option<NodeId>) -> NodeId {
        let id = self.tree.add_node(label, column);
        self.heads.push(head.unwrap_or(id));
        id
    }

    /// Fold a chain into the sentence tree
    ///
    /// The first chain seeds the tree. Later chains are attached beside the
    /// node found by [`Self::attach`].
    pub fn merge(&mut self, chain: NodeId) -> Result<(), AlignmentError> {
        let Some(root) = self.tree.root_id else {
            self.tree.root_id = Some(chain);
            return Ok(());
        };

        let (label, column) = {
            let node = &self.tree.nodes[chain];
            (node.label.clone(), node.column)
        };

        if self.tree.nodes[root].column == column {
            return Err(AlignmentError::SecondRoot { label, column });
        }

        if self.attach(root, chain) {
            Ok(())
        } else {
            Err(AlignmentError::NoMatch { label, column })
        }
    }

    /// Try to attach `chain` at or below `at`
    ///
    /// If `at` sits in the chain's column the chain becomes its next sibling.
    /// Otherwise the children of `at` are searched last to first and the first
    /// successful attachment wins.
    fn attach(&mut self, at: NodeId, chain: NodeId) -> bool {
        if self.tree.nodes[at].column == self.tree.nodes[chain].column {
            let Some(parent) = self.tree.nodes[at].parent else {
                return false;
            };
            self.heads[chain] = self.heads[at];
            self.tree.set_parent(chain, parent);
            return true;
        }

        for i in (0..self.tree.nodes[at].children.len()).rev() {
            let child = self.tree.nodes[at].children[i];
            if self.attach(child, chain) {
                return true;
            }
        }

        false
    }

    /// Scan one raw line, build its chain and merge it
    pub fn push_line(&mut self, line: &str) -> Result<(), SentenceError> {
        self.lines += 1;
        let line_num = self.lines;

        let labels = scan_line(line).map_err(|source| SentenceError::Scan {
            line: line_num,
            source,
        })?;
        let Some(chain) = self.build_chain(&labels) else {
            return Err(SentenceError::Scan {
                line: line_num,
                source: ScanError::NoMarkers(line.to_string()),
            });
        };

        self.merge(chain).map_err(|source| SentenceError::Alignment {
            line: line_num,
            source,
        })
    }

    /// Transient chain head of a node, valid only during assembly
    pub fn head_of(&self, id: NodeId) -> Option<NodeId> {
        self.heads.get(id).copied()
    }

    /// The tree assembled so far
    pub fn tree(&self) -> &ParseTree {
        &self.tree
    }

    /// Finish assembly, discarding chain heads
    pub fn finish(self) -> Result<ParseTree, SentenceError> {
        if self.tree.root_id.is_none() {
            return Err(SentenceError::Empty);
        }
        Ok(self.tree)
    }
}

/// Assemble the lines of one sentence block into a tree
///
/// Any line that fails to scan or align aborts the whole sentence; no partial
/// tree is returned.
pub fn assemble_sentence<S: AsRef<str>>(lines: &[S]) -> Result<ParseTree, SentenceError> {
    let mut assembler = SentenceAssembler::new();
    for line in lines {
        assembler.push_line(line.as_ref())?;
    }
    assembler.finish()
}
