//! Constituency tree data structures
//!
//! Nodes live in an arena owned by the tree; parent and child links are
//! indices into that arena, so there are no reference cycles.

use std::fmt;

/// Unique identifier for a node (index into the tree's arena)
pub type NodeId = usize;

/// A node in a constituency tree
///
/// Internal nodes carry a category label (possibly with a functional suffix,
/// as in `ADVP-TMP`); leaves carry the literal token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constituent {
    pub id: NodeId,
    pub label: String,
    /// Source column of the node's opening bracket (or of the token, for leaves)
    pub column: usize,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Constituent {
    /// Create a new detached node
    pub fn new(id: NodeId, label: &str, column: usize) -> Self {
        Self {
            id,
            label: label.to_string(),
            column,
            parent: None,
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A constituency tree (sentence)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseTree {
    pub nodes: Vec<Constituent>,
    pub root_id: Option<NodeId>,
}

impl ParseTree {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a detached node to the arena, returning its id
    pub fn add_node(&mut self, label: &str, column: usize) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Constituent::new(id, label, column));
        id
    }

    /// Append `child_id` to the children of `parent_id`
    pub fn set_parent(&mut self, child_id: NodeId, parent_id: NodeId) {
        if let Some(child) = self.nodes.get_mut(child_id) {
            child.parent = Some(parent_id);
        }
        if let Some(parent) = self.nodes.get_mut(parent_id) {
            parent.children.push(child_id);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by ID
    pub fn get_node(&self, id: NodeId) -> Option<&Constituent> {
        self.nodes.get(id)
    }

    pub fn root(&self) -> Option<&Constituent> {
        self.root_id.and_then(|id| self.get_node(id))
    }

    /// Get the parent of a node
    pub fn parent(&self, node_id: NodeId) -> Option<&Constituent> {
        self.get_node(node_id)
            .and_then(|node| node.parent)
            .and_then(|parent_id| self.get_node(parent_id))
    }

    /// Get the children of a node, in reading order
    pub fn children(&self, node_id: NodeId) -> impl Iterator<Item = &Constituent> + '_ {
        self.get_node(node_id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(move |&id| self.get_node(id))
    }

    /// Labels of a node's children, in reading order
    pub fn child_labels(&self, node_id: NodeId) -> Vec<String> {
        self.children(node_id).map(|c| c.label.clone()).collect()
    }

    /// Node ids in pre-order, left to right
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.root_id.into_iter().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(node) = self.get_node(id) {
                stack.extend(node.children.iter().rev());
            }
        }
        order
    }

    /// Leaf tokens in reading order
    pub fn leaves(&self) -> Vec<&str> {
        self.preorder()
            .into_iter()
            .filter_map(|id| self.get_node(id))
            .filter(|node| node.is_leaf())
            .map(|node| node.label.as_str())
            .collect()
    }

    /// Check the alignment invariants of an assembled tree
    ///
    /// Siblings must share a column and every child must sit strictly to the
    /// right of its parent. Returns the first offending node, if any.
    pub fn check_columns(&self) -> Result<(), NodeId> {
        for node in &self.nodes {
            let Some(first) = node.children.first().and_then(|&id| self.get_node(id)) else {
                continue;
            };
            for child in self.children(node.id) {
                if child.column != first.column || child.column <= node.column {
                    return Err(child.id);
                }
            }
        }
        Ok(())
    }

    fn write_node(&self, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(node) = self.get_node(id) else {
            return Ok(());
        };
        if node.is_leaf() {
            return write!(f, "{}", node.label);
        }
        write!(f, "({}", node.label)?;
        for &child in &node.children {
            write!(f, " ")?;
            self.write_node(child, f)?;
        }
        write!(f, ")")
    }
}

/// Bracket notation on a single line, e.g. `(S (ADVP (RB quickly)) (VP (VBD ran)))`
impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root_id {
            Some(root) => self.write_node(root, f),
            None => write!(f, "()"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// (S (ADVP (RB quickly)) (VP (VBD ran)))
    fn create_test_tree() -> ParseTree {
        let mut tree = ParseTree::new();
        let s = tree.add_node("S", 0);
        let advp = tree.add_node("ADVP", 3);
        let rb = tree.add_node("RB", 9);
        let quickly = tree.add_node("quickly", 13);
        let vp = tree.add_node("VP", 3);
        let vbd = tree.add_node("VBD", 7);
        let ran = tree.add_node("ran", 12);

        tree.set_parent(advp, s);
        tree.set_parent(rb, advp);
        tree.set_parent(quickly, rb);
        tree.set_parent(vp, s);
        tree.set_parent(vbd, vp);
        tree.set_parent(ran, vbd);
        tree.root_id = Some(s);
        tree
    }

    #[test]
    fn test_tree_creation() {
        let tree = create_test_tree();

        assert_eq!(tree.len(), 7);
        assert_eq!(tree.root().unwrap().label, "S");
        assert_eq!(tree.parent(1).unwrap().id, 0);
        assert!(tree.parent(0).is_none());
        assert_eq!(tree.child_labels(0), vec!["ADVP", "VP"]);
        assert_eq!(tree.children(3).count(), 0);
    }

    #[test]
    fn test_preorder_and_leaves() {
        let tree = create_test_tree();

        assert_eq!(tree.preorder(), vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(tree.leaves(), vec!["quickly", "ran"]);
    }

    #[test]
    fn test_display() {
        let tree = create_test_tree();
        assert_eq!(tree.to_string(), "(S (ADVP (RB quickly)) (VP (VBD ran)))");
        assert_eq!(ParseTree::new().to_string(), "()");
    }

    #[test]
    fn test_check_columns() {
        let mut tree = create_test_tree();
        assert_eq!(tree.check_columns(), Ok(()));

        tree.nodes[4].column = 4;
        assert_eq!(tree.check_columns(), Err(4));
    }

    #[test]
    fn test_child_left_of_parent() {
        let mut tree = ParseTree::new();
        let a = tree.add_node("A", 5);
        let b = tree.add_node("b", 2);
        tree.set_parent(b, a);
        tree.root_id = Some(a);

        assert_eq!(tree.check_columns(), Err(b));
    }
}
