//! Lexical and syllable readability formulas.
//!
//! - Dale–Chall: `0.1579 * PDW + 0.0496 * ASL`, plus `3.6365` when more than
//!   5% of words are unfamiliar. PDW is the unfamiliar-word fraction.
//! - Flesch Reading Ease: `206.835 - 1.015 * ASL - 84.6 * ASW`.
//!
//! ASL is words per sentence and ASW syllables per word. Both formulas count
//! the punctuation-stripped words of each sentence. A [`TextBlock`] always has
//! at least one sentence with at least one word, so neither can divide by zero.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::familiar::FamiliarWords;
use crate::syllables;
use crate::text::TextBlock;

const DALE_CHALL_PDW_WEIGHT: f64 = 0.1579;
const DALE_CHALL_ASL_WEIGHT: f64 = 0.0496;
const DALE_CHALL_ADJUSTMENT: f64 = 3.6365;
const DALE_CHALL_ADJUST_ABOVE: f64 = 0.05;

/// Result of the Dale–Chall formula.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DaleChallReport {
    /// Final score, adjustment included.
    pub score: f64,
    /// Fraction of words not on the familiar list.
    pub difficult_fraction: f64,
    /// Average sentence length in words.
    pub average_sentence_length: f64,
    /// Number of words counted.
    pub words: usize,
    /// Number of unfamiliar words.
    pub unfamiliar: usize,
    /// Number of sentences.
    pub sentences: usize,
    /// Whether the 3.6365 adjustment was added.
    pub adjusted: bool,
}

/// Result of the Flesch Reading Ease formula.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FleschReport {
    /// Reading ease; higher is easier.
    pub score: f64,
    /// Average sentence length in words.
    pub average_sentence_length: f64,
    /// Average syllables per word.
    pub average_syllables_per_word: f64,
    /// Number of words counted.
    pub words: usize,
    /// Total syllables.
    pub syllables: usize,
    /// Number of sentences.
    pub sentences: usize,
}

/// Score a block with the Dale–Chall formula against `familiar`.
#[tracing::instrument(skip_all, fields(block = block.id(), sentences = block.sentence_count()))]
pub fn dale_chall_score(block: &TextBlock, familiar: &FamiliarWords) -> DaleChallReport {
    let (words, unfamiliar) = block.words().fold((0usize, 0usize), |(total, hard), word| {
        (total + 1, hard + usize::from(!familiar.contains(word)))
    });
    let sentences = block.sentence_count();

    let difficult_fraction = unfamiliar as f64 / words as f64;
    let average_sentence_length = words as f64 / sentences as f64;
    let adjusted = difficult_fraction > DALE_CHALL_ADJUST_ABOVE;

    let mut score = DALE_CHALL_PDW_WEIGHT.mul_add(
        difficult_fraction,
        DALE_CHALL_ASL_WEIGHT * average_sentence_length,
    );
    if adjusted {
        score += DALE_CHALL_ADJUSTMENT;
    }

    DaleChallReport {
        score,
        difficult_fraction,
        average_sentence_length,
        words,
        unfamiliar,
        sentences,
        adjusted,
    }
}

/// Score a block with the Flesch Reading Ease formula.
#[tracing::instrument(skip_all, fields(block = block.id(), sentences = block.sentence_count()))]
pub fn flesch_reading_ease(block: &TextBlock) -> FleschReport {
    let (words, syllables) = block.words().fold((0usize, 0usize), |(total, syl), word| {
        (total + 1, syl + syllables::count_syllables(word))
    });
    let sentences = block.sentence_count();

    let average_sentence_length = words as f64 / sentences as f64;
    let average_syllables_per_word = syllables as f64 / words as f64;
    let score = 84.6f64.mul_add(
        -average_syllables_per_word,
        1.015f64.mul_add(-average_sentence_length, 206.835),
    );

    FleschReport {
        score,
        average_sentence_length,
        average_syllables_per_word,
        words,
        syllables,
        sentences,
    }
}
