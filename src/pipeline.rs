//! End-to-end corpus pass
//!
//! The pass combines the pieces:
//! 1. Read sentence blocks from a treebank
//! 2. Assemble each block into a tree
//! 3. Extract the contexts of marked nodes
//! 4. Aggregate them into frequency tables
//!
//! Sentences are handled strictly one at a time. A sentence that fails to
//! assemble is skipped before any of its contexts reach the aggregator.

use crate::config::AnalysisConfig;
use crate::stats::{ContextAggregator, FrequencyTables};
use crate::treebank::{SentenceBlock, Treebank, TreebankError};
use log::{info, warn};

/// Counts gathered during a corpus pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorpusSummary {
    /// Sentence blocks read
    pub sentences: usize,
    /// Sentences assembled into trees
    pub assembled: usize,
    /// Sentences dropped because they could not be scanned or aligned
    pub skipped: usize,
    /// Read errors (unopenable files, I/O failures)
    pub read_errors: usize,
    /// Marked nodes recorded
    pub occurrences: usize,
}

/// Result of a corpus pass
#[derive(Debug, Clone)]
pub struct Analysis {
    pub tables: FrequencyTables,
    pub summary: CorpusSummary,
}

/// Run a corpus pass over a stream of sentence blocks
pub fn analyze_blocks<I>(blocks: I, config: &AnalysisConfig) -> Analysis
where
    I: IntoIterator<Item = Result<SentenceBlock, TreebankError>>,
{
    let mut aggregator = ContextAggregator::new();
    let mut summary = CorpusSummary::default();

    for result in blocks {
        let block = match result {
            Ok(block) => block,
            Err(e) => {
                warn!("{}", e);
                summary.read_errors += 1;
                continue;
            }
        };
        summary.sentences += 1;

        match block.assemble_logged() {
            Some(tree) => {
                summary.assembled += 1;
                summary.occurrences += aggregator.add_tree(&tree, &config.marker);
            }
            None => summary.skipped += 1,
        }
    }

    info!(
        "{} sentences, {} assembled, {} skipped, {} {} occurrences ({} labels)",
        summary.sentences,
        summary.assembled,
        summary.skipped,
        summary.occurrences,
        config.marker,
        aggregator.len()
    );

    Analysis {
        tables: aggregator.compute_frequencies(config.threshold),
        summary,
    }
}

/// Run a corpus pass over a treebank
pub fn analyze(treebank: &Treebank, config: &AnalysisConfig) -> Analysis {
    analyze_blocks(treebank.blocks(), config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: &str = "\
( (S (ADVP-TMP (RB Then))
     (NP-SBJ (PRP he))
     (VP (VBD left))))

( (S (NP-SBJ (PRP She))
     (VP (VBD arrived)
         (ADVP-TMP (RB yesterday)))))

( (S (NP-SBJ (PRP It))
         (VP (VBD broke))))
";

    #[test]
    fn test_analyze_string() {
        let analysis = analyze(&Treebank::from_string(CORPUS), &AnalysisConfig::default());

        assert_eq!(
            analysis.summary,
            CorpusSummary {
                sentences: 3,
                assembled: 2,
                skipped: 1,
                read_errors: 0,
                occurrences: 2,
            }
        );

        let preceding = &analysis.tables.preceding;
        assert_eq!(preceding.frequency("ADVP-TMP", "S"), Some(0.5));
        assert_eq!(preceding.frequency("ADVP-TMP", "VP"), Some(0.5));

        // Right neighbour NP-SBJ in the first sentence, left neighbour VBD in the second
        let same = &analysis.tables.same_level;
        assert_eq!(same.frequency("ADVP-TMP", "NP-SBJ"), Some(0.5));
        assert_eq!(same.frequency("ADVP-TMP", "VBD"), Some(0.5));
    }

    #[test]
    fn test_read_errors_are_counted() {
        let blocks = vec![
            Err(TreebankError::Io(std::io::Error::other("boom"))),
            Ok(SentenceBlock {
                index: 0,
                start_line: 1,
                lines: vec!["(S (ADVP (RB here)))".to_string()],
            }),
        ];
        let analysis = analyze_blocks(blocks, &AnalysisConfig::default());

        assert_eq!(analysis.summary.read_errors, 1);
        assert_eq!(analysis.summary.assembled, 1);
        assert_eq!(analysis.summary.occurrences, 1);
    }
}
