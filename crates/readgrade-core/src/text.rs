//! Text model: sentences, text blocks, and their provenance metadata.
//!
//! Excerpts are cut into sentences after every `.`, `?`, or `!`. Each
//! [`Sentence`] keeps its raw phrase, a raw whitespace word count, and a
//! punctuation-stripped word list used for position lookups.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{TextError, TextResult};

/// A run of text up to and including a terminator.
static SENTENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.?!]*[.?!]").expect("valid regex"));

const fn is_sentence_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

/// Remove ASCII punctuation characters.
pub fn strip_punctuation(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}

/// Split an excerpt into sentence strings.
///
/// Cuts after every terminator. Pieces are trimmed; pieces without any words
/// and a trailing fragment with no terminator are dropped.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn split_sentences(text: &str) -> Vec<String> {
    let sentences: Vec<String> = SENTENCE_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !strip_punctuation(s).trim().is_empty())
        .map(str::to_string)
        .collect();

    let consumed = SENTENCE_PATTERN.find_iter(text).last().map_or(0, |m| m.end());
    if !text[consumed..].trim().is_empty() {
        tracing::debug!(
            fragment = text[consumed..].trim(),
            "dropping trailing fragment without terminator"
        );
    }

    sentences
}

/// A single sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sentence {
    phrase: String,
    word_count: usize,
    words: Vec<String>,
}

impl Sentence {
    /// Create a sentence from its raw text.
    ///
    /// # Errors
    ///
    /// The phrase must be non-empty, end with `.`, `?`, or `!`, and contain
    /// at least one word.
    pub fn new(phrase: impl AsRef<str>) -> TextResult<Self> {
        let phrase = phrase.as_ref().trim();
        if phrase.is_empty() {
            return Err(TextError::EmptySentence);
        }
        if !phrase.ends_with(is_sentence_terminator) {
            return Err(TextError::MissingTerminator {
                phrase: phrase.to_string(),
            });
        }

        let words: Vec<String> = strip_punctuation(phrase)
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if words.is_empty() {
            return Err(TextError::NoWords {
                phrase: phrase.to_string(),
            });
        }

        Ok(Self {
            phrase: phrase.to_string(),
            word_count: phrase.split_whitespace().count(),
            words,
        })
    }

    /// The raw sentence text.
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Number of whitespace-separated pieces in the raw phrase.
    pub const fn word_count(&self) -> usize {
        self.word_count
    }

    /// Words with punctuation removed, in sentence order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Position of the first occurrence of `word`, if any.
    pub fn position_of(&self, word: &str) -> Option<usize> {
        self.words.iter().position(|w| w == word)
    }
}

/// Genre of a source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Fiction and other literary prose.
    #[default]
    Literature,
    /// Informational and expository prose.
    Informative,
}

impl FromStr for Category {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lit" | "literature" => Ok(Self::Literature),
            "info" | "informative" => Ok(Self::Informative),
            _ => Err(TextError::UnknownCategory(s.to_string())),
        }
    }
}

/// Where in its source work an excerpt was taken from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// Opening of the work.
    Start,
    /// Closing of the work.
    End,
    /// Somewhere in the middle.
    Mid,
    /// The whole work.
    #[default]
    Whole,
}

impl FromStr for Location {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            "mid" => Ok(Self::Mid),
            "whole" => Ok(Self::Whole),
            _ => Err(TextError::UnknownLocation(s.to_string())),
        }
    }
}

/// Provenance of a text block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BlockMeta {
    /// Corpus identifier.
    pub id: u64,
    /// Author of the source work.
    pub author: String,
    /// Title of the source work.
    pub title: String,
    /// Link to the source work.
    pub url: String,
    /// Year of publication, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pub_year: Option<i32>,
    /// Genre.
    pub category: Category,
    /// Position of the excerpt in the work.
    pub location: Location,
}

/// Reference scores carried by a corpus row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReferenceScores {
    /// Crowd-sourced comprehension score in [-1, 1].
    pub crowd: f64,
    /// Flesch Reading Ease reported by the corpus.
    pub flesch: f64,
    /// Dale–Chall score reported by the corpus.
    pub dale_chall: f64,
}

/// An excerpt: ordered sentences plus metadata and reference scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    meta: BlockMeta,
    sentences: Vec<Sentence>,
    reference: ReferenceScores,
}

impl TextBlock {
    /// Create a text block.
    ///
    /// # Errors
    ///
    /// Fails when `sentences` is empty or the crowd score is outside [-1, 1].
    pub fn new(
        meta: BlockMeta,
        sentences: Vec<Sentence>,
        reference: ReferenceScores,
    ) -> TextResult<Self> {
        if sentences.is_empty() {
            return Err(TextError::EmptyBlock);
        }
        if !(-1.0..=1.0).contains(&reference.crowd) {
            return Err(TextError::CrowdScoreOutOfRange(reference.crowd));
        }
        Ok(Self {
            meta,
            sentences,
            reference,
        })
    }

    /// Split an excerpt into sentences and wrap them in a block.
    pub fn from_excerpt(
        meta: BlockMeta,
        excerpt: &str,
        reference: ReferenceScores,
    ) -> TextResult<Self> {
        let sentences = split_sentences(excerpt)
            .iter()
            .map(Sentence::new)
            .collect::<TextResult<Vec<_>>>()?;
        Self::new(meta, sentences, reference)
    }

    /// Wrap ad-hoc user input as a block holding exactly one sentence.
    ///
    /// The whole input becomes one [`Sentence`] even if it contains several
    /// terminators; pair this with single-sentence mode when aggregating.
    pub fn from_user_input(text: &str) -> TextResult<Self> {
        let sentence = Sentence::new(text)?;
        Self::new(
            BlockMeta::default(),
            vec![sentence],
            ReferenceScores::default(),
        )
    }

    /// Provenance metadata.
    pub const fn meta(&self) -> &BlockMeta {
        &self.meta
    }

    /// Corpus identifier.
    pub const fn id(&self) -> u64 {
        self.meta.id
    }

    /// Sentences in source order.
    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Number of sentences.
    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// Reference scores from the corpus.
    pub const fn reference(&self) -> &ReferenceScores {
        &self.reference
    }

    /// Mean raw word count per sentence.
    pub fn average_sentence_length(&self) -> f64 {
        let total: usize = self.sentences.iter().map(Sentence::word_count).sum();
        total as f64 / self.sentences.len() as f64
    }

    /// Punctuation-stripped words of every sentence, in order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.sentences
            .iter()
            .flat_map(|s| s.words().iter().map(String::as_str))
    }
}
