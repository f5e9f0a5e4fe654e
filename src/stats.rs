//! Corpus-wide context aggregation
//!
//! The aggregator accumulates, per distinct adverb label, three growing lists
//! of context labels:
//! - preceding: the parent label of each occurrence
//! - same level: the immediate left and right neighbours of each occurrence
//! - next level: every child label of each occurrence
//!
//! Once the corpus pass is over the lists are turned into relative
//! frequencies and thresholded.

use crate::context::{AdverbContext, extract_contexts};
use crate::tree::ParseTree;
use lasso::{Rodeo, Spur};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;

/// Minimum relative frequency for a context label to be reported
pub const DEFAULT_THRESHOLD: f64 = 0.10;

#[derive(Debug, Default)]
struct ContextLists {
    preceding: Vec<Spur>,
    same_level: Vec<Spur>,
    next_level: Vec<Spur>,
}

/// Accumulates adverb contexts across a corpus
#[derive(Debug)]
pub struct ContextAggregator {
    labels: Rodeo,
    /// Adverb labels in order of first occurrence
    adverbs: Vec<Spur>,
    lists: FxHashMap<Spur, ContextLists>,
    occurrences: usize,
}

impl Default for ContextAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextAggregator {
    pub fn new() -> Self {
        Self {
            labels: Rodeo::new(),
            adverbs: Vec::new(),
            lists: FxHashMap::default(),
            occurrences: 0,
        }
    }

    /// Record one adverb occurrence
    pub fn add(&mut self, context: &AdverbContext) {
        let key = self.labels.get_or_intern(&context.label);
        let parent = self.labels.get_or_intern(&context.parent_label);
        let neighbors: Vec<Spur> = [context.left_neighbor(), context.right_neighbor()]
            .into_iter()
            .flatten()
            .map(|label| self.labels.get_or_intern(label))
            .collect();
        let children: Vec<Spur> = context
            .child_labels
            .iter()
            .map(|label| self.labels.get_or_intern(label))
            .collect();

        let lists = match self.lists.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                self.adverbs.push(key);
                entry.insert(ContextLists::default())
            }
        };

        lists.preceding.push(parent);
        lists.same_level.extend(neighbors);
        lists.next_level.extend(children);
        self.occurrences += 1;
    }

    /// Extract and record every marked node of a finished tree
    ///
    /// Returns the number of occurrences recorded.
    pub fn add_tree(&mut self, tree: &ParseTree, marker: &str) -> usize {
        let contexts = extract_contexts(tree, marker);
        for context in &contexts {
            self.add(context);
        }
        contexts.len()
    }

    /// Number of distinct adverb labels seen
    pub fn len(&self) -> usize {
        self.adverbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adverbs.is_empty()
    }

    /// Total number of occurrences recorded
    pub fn occurrences(&self) -> usize {
        self.occurrences
    }

    /// Turn the accumulated lists into thresholded frequency tables
    ///
    /// Entries whose frequency is at least `threshold` are kept.
    pub fn compute_frequencies(self, threshold: f64) -> FrequencyTables {
        let mut tables = FrequencyTables::default();

        for key in &self.adverbs {
            let Some(lists) = self.lists.get(key) else {
                continue;
            };
            let label = self.labels.resolve(key);

            let preceding = self.row(label, &lists.preceding, threshold);
            let same_level = self.row(label, &lists.same_level, threshold);
            let next_level = self.row(label, &lists.next_level, threshold);
            tables.preceding.rows.push(preceding);
            tables.same_level.rows.push(same_level);
            tables.next_level.rows.push(next_level);
        }

        tables
    }

    fn row(&self, label: &str, list: &[Spur], threshold: f64) -> LabelFrequencies {
        let entries = distribution(list)
            .into_iter()
            .filter(|&(_, frequency)| frequency >= threshold)
            .map(|(sym, frequency)| (self.labels.resolve(&sym).to_string(), frequency))
            .collect();

        LabelFrequencies {
            label: label.to_string(),
            entries,
        }
    }
}

/// Relative frequency of each distinct item, in order of first occurrence
///
/// The frequencies of a non-empty input sum to 1.
pub fn distribution<T: Copy + Eq + Hash>(items: &[T]) -> Vec<(T, f64)> {
    let mut index: FxHashMap<T, usize> = FxHashMap::default();
    let mut counts: Vec<(T, usize)> = Vec::new();

    for &item in items {
        match index.entry(item) {
            Entry::Occupied(entry) => counts[*entry.get()].1 += 1,
            Entry::Vacant(entry) => {
                entry.insert(counts.len());
                counts.push((item, 1));
            }
        }
    }

    let total = items.len() as f64;
    counts
        .into_iter()
        .map(|(item, count)| (item, count as f64 / total))
        .collect()
}

/// Context-label frequencies for one adverb label
#[derive(Debug, Clone, PartialEq)]
pub struct LabelFrequencies {
    pub label: String,
    pub entries: Vec<(String, f64)>,
}

/// One output channel: a block of frequencies per adverb label
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextTable {
    pub rows: Vec<LabelFrequencies>,
}

impl ContextTable {
    /// Frequencies for one adverb label
    pub fn get(&self, label: &str) -> Option<&[(String, f64)]> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.entries.as_slice())
    }

    /// Frequency of one context label for one adverb label
    pub fn frequency(&self, label: &str, context: &str) -> Option<f64> {
        self.get(label)?
            .iter()
            .find(|(name, _)| name == context)
            .map(|&(_, frequency)| frequency)
    }
}

/// The three finalized context tables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyTables {
    pub preceding: ContextTable,
    pub same_level: ContextTable,
    pub next_level: ContextTable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::assemble_sentence;

    fn context(
        label: &str,
        parent: &str,
        siblings: &[&str],
        children: &[&str],
        position: usize,
    ) -> AdverbContext {
        AdverbContext {
            label: label.to_string(),
            parent_label: parent.to_string(),
            sibling_labels: siblings.iter().map(|s| s.to_string()).collect(),
            child_labels: children.iter().map(|s| s.to_string()).collect(),
            position,
        }
    }

    #[test]
    fn test_distribution_sums_to_one() {
        let items = ["NP", "VP", "NP", "PP", "NP", "VP", "S"];
        let dist = distribution(&items);

        let order: Vec<_> = dist.iter().map(|(item, _)| *item).collect();
        assert_eq!(order, vec!["NP", "VP", "PP", "S"]);
        let total: f64 = dist.iter().map(|(_, f)| f).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!((dist[0].1 - 3.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_distribution_empty() {
        let items: [&str; 0] = [];
        assert!(distribution(&items).is_empty());
    }

    #[test]
    fn test_preceding_split_evenly() {
        let mut aggregator = ContextAggregator::new();
        aggregator.add(&context("ADVP-TMP", "S", &["ADVP-TMP", "NP"], &["RB"], 0));
        aggregator.add(&context("ADVP-TMP", "VP", &["VBD", "ADVP-TMP"], &["RB"], 1));

        let tables = aggregator.compute_frequencies(DEFAULT_THRESHOLD);

        assert_eq!(
            tables.preceding.get("ADVP-TMP").unwrap(),
            &[("S".to_string(), 0.5), ("VP".to_string(), 0.5)]
        );
        assert_eq!(tables.next_level.frequency("ADVP-TMP", "RB"), Some(1.0));
    }

    #[test]
    fn test_same_level_neighbors_only() {
        let mut aggregator = ContextAggregator::new();
        // First position: only the right neighbour counts
        aggregator.add(&context("ADVP", "S", &["ADVP", "NP", "VP"], &["RB"], 0));

        let tables = aggregator.compute_frequencies(0.0);

        assert_eq!(
            tables.same_level.get("ADVP").unwrap(),
            &[("NP".to_string(), 1.0)]
        );
    }

    #[test]
    fn test_only_child_has_no_neighbors() {
        let mut aggregator = ContextAggregator::new();
        aggregator.add(&context("ADVP", "PP", &["ADVP"], &["RB"], 0));

        let tables = aggregator.compute_frequencies(DEFAULT_THRESHOLD);

        assert_eq!(tables.same_level.get("ADVP"), Some(&[][..]));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut aggregator = ContextAggregator::new();
        // Ten children: each label except NN appears once (0.1), NN twice (0.2)
        let children = ["RB", "JJ", "IN", "DT", "CD", "NN", "NN", "RBR", "RBS"];
        aggregator.add(&context("ADVP", "S", &["ADVP"], &children, 0));
        aggregator.add(&context("ADVP", "S", &["ADVP"], &["TO"], 0));

        let tables = aggregator.compute_frequencies(DEFAULT_THRESHOLD);
        let next = tables.next_level.get("ADVP").unwrap();

        assert_eq!(next.len(), 9);
        assert_eq!(tables.next_level.frequency("ADVP", "NN"), Some(0.2));
    }

    #[test]
    fn test_rare_labels_dropped() {
        let mut aggregator = ContextAggregator::new();
        for _ in 0..19 {
            aggregator.add(&context("ADVP", "VP", &["VBD", "ADVP"], &["RB"], 1));
        }
        aggregator.add(&context("ADVP", "NP", &["NN", "ADVP"], &["RB"], 1));

        let tables = aggregator.compute_frequencies(DEFAULT_THRESHOLD);

        assert_eq!(tables.preceding.frequency("ADVP", "VP"), Some(0.95));
        assert_eq!(tables.preceding.frequency("ADVP", "NP"), None);
    }

    #[test]
    fn test_repeated_label_shares_neighbors() {
        let tree = assemble_sentence(&[
            "(S (ADVP (RB so))",
            "   (NP (PRP we))",
            "   (ADVP (RB then))",
            "   (VP (VBD went)))",
        ])
        .unwrap();
        let mut aggregator = ContextAggregator::new();
        assert_eq!(aggregator.add_tree(&tree, "ADVP"), 2);

        let tables = aggregator.compute_frequencies(0.0);

        assert_eq!(
            tables.same_level.get("ADVP").unwrap(),
            &[("NP".to_string(), 1.0)]
        );
        assert_eq!(tables.preceding.frequency("ADVP", "S"), Some(1.0));
    }

    #[test]
    fn test_labels_in_first_seen_order() {
        let mut aggregator = ContextAggregator::new();
        aggregator.add(&context("ADVP-TMP", "S", &["ADVP-TMP"], &["RB"], 0));
        aggregator.add(&context("ADVP", "VP", &["ADVP"], &["RB"], 0));
        aggregator.add(&context("ADVP-TMP", "S", &["ADVP-TMP"], &["NP"], 0));

        assert_eq!(aggregator.len(), 2);
        assert_eq!(aggregator.occurrences(), 3);

        let tables = aggregator.compute_frequencies(DEFAULT_THRESHOLD);
        let order: Vec<_> = tables
            .preceding
            .rows
            .iter()
            .map(|row| row.label.as_str())
            .collect();
        assert_eq!(order, vec!["ADVP-TMP", "ADVP"]);
    }
}
