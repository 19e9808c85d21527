//! Mean dependency distance (MDD).
//!
//! The distance of a governor–dependent pair is the absolute difference of
//! the two words' first-occurrence positions in the sentence. A sentence's
//! MDD is the sum of its pair distances divided by `word_count - 1`; a block's
//! MDD is the mean over its sentences.
//!
//! [`run_batch`] scores a whole corpus, recording per-sentence failures
//! instead of aborting.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use crate::error::{ErrorKind, MddError, MddResult};
use crate::pairs::{extract_pairs, flatten};
use crate::parse::TreeBuilder;
use crate::text::{Sentence, TextBlock};
use crate::tree::DependencyNode;

/// MDD of one sentence given its dependency tree.
///
/// # Errors
///
/// - [`MddError::DegenerateSentence`] when the sentence has fewer than two words.
/// - [`MddError::WordNotFound`] when a tree word is missing from the sentence.
/// - [`MddError::MalformedTree`] when the tree is invalid.
pub fn mean_dependency_distance_sentence(
    sentence: &Sentence,
    tree: &DependencyNode,
) -> MddResult<f64> {
    let word_count = sentence.word_count();
    if word_count < 2 {
        return Err(MddError::DegenerateSentence { word_count });
    }

    let flat = flatten(&extract_pairs(tree)?);
    let position = |word: &String| {
        sentence
            .position_of(word)
            .ok_or_else(|| MddError::WordNotFound {
                word: word.clone(),
                sentence: sentence.phrase().to_string(),
            })
    };

    let mut total = 0usize;
    for pair in flat.chunks_exact(2) {
        total += position(&pair[0])?.abs_diff(position(&pair[1])?);
    }

    Ok(total as f64 / (word_count - 1) as f64)
}

/// Build the trees of a sentence and keep the first.
///
/// A parser may split one sentence into several trees; only the first is
/// scored and a warning is logged.
pub fn first_tree<B>(builder: &B, sentence: &Sentence) -> MddResult<DependencyNode>
where
    B: TreeBuilder + ?Sized,
{
    let mut trees = builder.build_trees(sentence.phrase())?;
    if trees.len() > 1 {
        tracing::warn!(
            sentence = sentence.phrase(),
            trees = trees.len(),
            "parser returned several trees; scoring the first only"
        );
    }
    if trees.is_empty() {
        return Err(MddError::MissingParse {
            sentence: sentence.phrase().to_string(),
        });
    }
    Ok(trees.swap_remove(0))
}

/// MDD of one sentence, parsed through `builder`.
pub fn sentence_mdd<B>(builder: &B, sentence: &Sentence) -> MddResult<f64>
where
    B: TreeBuilder + ?Sized,
{
    let tree = first_tree(builder, sentence)?;
    mean_dependency_distance_sentence(sentence, &tree)
}

/// MDD of a text block: the per-sentence MDDs summed and divided by the
/// sentence count, or by 1 in single-sentence mode.
///
/// # Errors
///
/// The first sentence that fails aborts the block.
#[tracing::instrument(skip(block, builder), fields(block = block.id(), sentences = block.sentence_count()))]
pub fn mean_dependency_distance<B>(
    block: &TextBlock,
    builder: &B,
    single_sentence_mode: bool,
) -> MddResult<f64>
where
    B: TreeBuilder + ?Sized,
{
    let mut total = 0.0;
    for sentence in block.sentences() {
        total += sentence_mdd(builder, sentence)?;
    }
    let divisor = if single_sentence_mode {
        1
    } else {
        block.sentence_count()
    };
    Ok(total / divisor as f64)
}

/// Options for [`run_batch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Score blocks on the rayon thread pool.
    pub parallel: bool,
    /// Divide each block's total by 1 instead of its sentence count.
    pub single_sentence_mode: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            single_sentence_mode: false,
        }
    }
}

/// A sentence the batch could not score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchFailure {
    /// Id of the block holding the sentence.
    pub block_id: u64,
    /// 0-based sentence position within the block.
    pub sentence_index: usize,
    /// Failure class.
    pub kind: ErrorKind,
    /// Human-readable cause.
    pub message: String,
}

/// Per-block batch result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockScore {
    /// Block id.
    pub id: u64,
    /// MDD over the block's scored sentences; `None` if none scored.
    pub mdd: Option<f64>,
    /// Sentences scored.
    pub scored: usize,
    /// Sentences that failed.
    pub failed: usize,
}

/// Aggregate result of a corpus batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    /// Per-block results in input order.
    pub blocks: Vec<BlockScore>,
    /// Sentences scored across all blocks.
    pub scored: usize,
    /// Sentences that failed across all blocks.
    pub failed: usize,
    /// Failure count per class.
    pub failures_by_kind: BTreeMap<ErrorKind, usize>,
    /// Every failure in input order.
    pub failures: Vec<BatchFailure>,
    /// Mean sentence MDD over all scored sentences.
    pub mean_mdd: Option<f64>,
    /// Lowest sentence MDD.
    pub min_mdd: Option<f64>,
    /// Highest sentence MDD.
    pub max_mdd: Option<f64>,
}

/// Score every sentence of every block.
///
/// Failures are recorded and the batch carries on. Blocks may be scored in
/// parallel, but results are reduced in input order, so the report does not
/// depend on scheduling.
pub fn run_batch<B>(blocks: &[TextBlock], builder: &B, options: &BatchOptions) -> BatchReport
where
    B: TreeBuilder + Sync + ?Sized,
{
    run_batch_with_progress(blocks, builder, options, |_| {})
}

/// [`run_batch`] with a callback invoked once per finished block.
#[tracing::instrument(
    skip_all,
    fields(blocks = blocks.len(), parallel = options.parallel)
)]
pub fn run_batch_with_progress<B, F>(
    blocks: &[TextBlock],
    builder: &B,
    options: &BatchOptions,
    on_block: F,
) -> BatchReport
where
    B: TreeBuilder + Sync + ?Sized,
    F: Fn(&TextBlock) + Sync,
{
    let score_block = |block: &TextBlock| {
        let results: Vec<MddResult<f64>> = block
            .sentences()
            .iter()
            .map(|sentence| sentence_mdd(builder, sentence))
            .collect();
        on_block(block);
        results
    };

    let scored: Vec<Vec<MddResult<f64>>> = if options.parallel {
        blocks.par_iter().map(score_block).collect()
    } else {
        blocks.iter().map(score_block).collect()
    };

    let mut report = BatchReport::default();
    let mut sum = 0.0;

    for (block, results) in blocks.iter().zip(scored) {
        let mut block_total = 0.0;
        let mut block_scored = 0;
        let mut block_failed = 0;

        for (sentence_index, result) in results.into_iter().enumerate() {
            match result {
                Ok(mdd) => {
                    block_total += mdd;
                    block_scored += 1;
                    sum += mdd;
                    report.min_mdd = Some(report.min_mdd.map_or(mdd, |m| m.min(mdd)));
                    report.max_mdd = Some(report.max_mdd.map_or(mdd, |m| m.max(mdd)));
                }
                Err(err) => {
                    tracing::debug!(block = block.id(), sentence_index, error = %err, "sentence failed");
                    block_failed += 1;
                    *report.failures_by_kind.entry(err.kind()).or_default() += 1;
                    report.failures.push(BatchFailure {
                        block_id: block.id(),
                        sentence_index,
                        kind: err.kind(),
                        message: err.to_string(),
                    });
                }
            }
        }

        let divisor = if options.single_sentence_mode {
            1
        } else {
            block_scored
        };
        report.blocks.push(BlockScore {
            id: block.id(),
            mdd: (block_scored > 0).then(|| block_total / divisor as f64),
            scored: block_scored,
            failed: block_failed,
        });
        report.scored += block_scored;
        report.failed += block_failed;
    }

    report.mean_mdd = (report.scored > 0).then(|| sum / report.scored as f64);
    tracing::info!(
        scored = report.scored,
        failed = report.failed,
        mean_mdd = report.mean_mdd,
        "batch complete"
    );
    report
}
