//! Adverb-phrase context extraction
//!
//! For every node whose label contains the adverb-phrase marker, collect the
//! local syntactic context: the parent's label, the labels of all of the
//! parent's children (the node included) and the node's own child labels.

use crate::tree::{NodeId, ParseTree};
use log::debug;
use thiserror::Error;

/// Default adverb-phrase marker
pub const ADVP_MARKER: &str = "ADVP";

/// Context of one adverb-phrase node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdverbContext {
    pub label: String,
    pub parent_label: String,
    /// Labels of the parent's children, in reading order
    pub sibling_labels: Vec<String>,
    pub child_labels: Vec<String>,
    /// Index of the first sibling carrying the node's label
    ///
    /// When a label repeats under one parent, every occurrence resolves to
    /// the first one.
    pub position: usize,
}

impl AdverbContext {
    /// The sibling immediately to the left, if any
    pub fn left_neighbor(&self) -> Option<&str> {
        let index = self.position.checked_sub(1)?;
        self.sibling_labels.get(index).map(String::as_str)
    }

    /// The sibling immediately to the right, if any
    pub fn right_neighbor(&self) -> Option<&str> {
        self.sibling_labels
            .get(self.position + 1)
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("{label:?} has no parent")]
    Orphan { label: String },
}

/// Context of a single node, if it has a parent
pub fn try_context(tree: &ParseTree, node_id: NodeId) -> Result<AdverbContext, ContextError> {
    let node = &tree.nodes[node_id];
    let Some(parent) = tree.parent(node_id) else {
        return Err(ContextError::Orphan {
            label: node.label.clone(),
        });
    };

    let sibling_labels = tree.child_labels(parent.id);
    let position = sibling_labels
        .iter()
        .position(|label| *label == node.label)
        .unwrap_or_default();

    Ok(AdverbContext {
        label: node.label.clone(),
        parent_label: parent.label.clone(),
        sibling_labels,
        child_labels: tree.child_labels(node_id),
        position,
    })
}

/// Collect the contexts of all marked nodes, in pre-order
///
/// Marked nodes without a parent are skipped.
pub fn extract_contexts(tree: &ParseTree, marker: &str) -> Vec<AdverbContext> {
    tree.preorder()
        .into_iter()
        .filter(|&id| tree.nodes[id].label.contains(marker))
        .filter_map(|id| match try_context(tree, id) {
            Ok(context) => Some(context),
            Err(e) => {
                debug!("skipping context: {}", e);
                None
            }
        })
        .collect()
}
