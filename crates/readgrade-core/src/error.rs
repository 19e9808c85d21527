//! Error types for readgrade-core.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Class of a dependency-distance failure.
///
/// Batch reports count failures per class so callers can tell a parser
/// divergence apart from a malformed tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// The tree violates its structural contract.
    Structural,
    /// A word or parse could not be found.
    Lookup,
    /// The input is outside the metric's domain.
    Domain,
}

impl ErrorKind {
    /// Returns the class as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::Lookup => "lookup",
            Self::Domain => "domain",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while computing mean dependency distance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MddError {
    /// The dependency tree is malformed.
    #[error("malformed dependency tree: {reason}")]
    MalformedTree {
        /// What was wrong with the tree.
        reason: String,
    },

    /// A word produced by the parser does not occur in the sentence text.
    #[error("word {word:?} not found in sentence {sentence:?}")]
    WordNotFound {
        /// The word that could not be located.
        word: String,
        /// The sentence that was searched.
        sentence: String,
    },

    /// The sentence is too short for a distance to be defined.
    #[error("sentence has {word_count} word(s); mean dependency distance needs at least 2")]
    DegenerateSentence {
        /// Number of words in the sentence.
        word_count: usize,
    },

    /// The tree builder has no parse for the sentence.
    #[error("no dependency parse available for sentence {sentence:?}")]
    MissingParse {
        /// The sentence that has no parse.
        sentence: String,
    },
}

impl MddError {
    /// Build a [`MddError::MalformedTree`] from anything string-like.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedTree {
            reason: reason.into(),
        }
    }

    /// Returns the failure class of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedTree { .. } => ErrorKind::Structural,
            Self::WordNotFound { .. } | Self::MissingParse { .. } => ErrorKind::Lookup,
            Self::DegenerateSentence { .. } => ErrorKind::Domain,
        }
    }
}

/// Result type alias using [`MddError`].
pub type MddResult<T> = Result<T, MddError>;

/// Errors raised when constructing sentences and text blocks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TextError {
    /// The sentence is empty after trimming.
    #[error("sentence is empty")]
    EmptySentence,

    /// The sentence does not end with `.`, `?`, or `!`.
    #[error("sentence must end with '.', '?', or '!': {phrase:?}")]
    MissingTerminator {
        /// The offending sentence.
        phrase: String,
    },

    /// The sentence contains punctuation only.
    #[error("sentence has no words: {phrase:?}")]
    NoWords {
        /// The offending sentence.
        phrase: String,
    },

    /// A text block needs at least one sentence.
    #[error("text block has no sentences")]
    EmptyBlock,

    /// The crowd-sourced comprehension score is outside [-1, 1].
    #[error("crowd score {0} is outside [-1, 1]")]
    CrowdScoreOutOfRange(f64),

    /// An unknown category name.
    #[error("unknown category {0:?}; expected Lit/Literature or Info/Informative")]
    UnknownCategory(String),

    /// An unknown excerpt location name.
    #[error("unknown location {0:?}; expected start, end, mid, or whole")]
    UnknownLocation(String),
}

/// Result type alias using [`TextError`].
pub type TextResult<T> = Result<T, TextError>;

/// Errors raised while loading word lists and the reference corpus.
#[derive(Error, Debug)]
pub enum CorpusError {
    /// The file could not be read.
    #[error("failed to read {path}")]
    Io {
        /// The file that failed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The CSV data could not be parsed.
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A row parsed but violates a data-model invariant.
    #[error("invalid row at line {line}: {source}")]
    InvalidRow {
        /// 1-based line number of the row.
        line: u64,
        /// The invariant that was violated.
        #[source]
        source: TextError,
    },
}

/// Result type alias using [`CorpusError`].
pub type CorpusResult<T> = Result<T, CorpusError>;

/// Errors raised while loading a parse file.
#[derive(Error, Debug)]
pub enum ParseFileError {
    /// The file could not be read.
    #[error("failed to read {path}")]
    Io {
        /// The file that failed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The JSON did not match the parse-file format.
    #[error("invalid parse file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using [`ParseFileError`].
pub type ParseFileResult<T> = Result<T, ParseFileError>;
