//! Core library for readgrade.
//!
//! Estimates how hard a text is to read by combining three metrics, each
//! mapped onto grade levels 4–16:
//!
//! - lexical familiarity (Dale–Chall), via [`readability::dale_chall_score`]
//! - syllable density (Flesch Reading Ease), via [`readability::flesch_reading_ease`]
//! - syntactic depth (mean dependency distance), via [`distance`]
//!
//! Dependency trees come from an external parser through the
//! [`parse::TreeBuilder`] trait; [`parse::ParseFile`] reads them from JSON.
//!
//! # Modules
//!
//! - [`tree`] - Dependency tree model
//! - [`pairs`] - Governor–dependent pair extraction and flattening
//! - [`distance`] - Mean dependency distance and corpus batches
//! - [`standardize`] - Grade-level tables
//! - [`text`] - Sentences and text blocks
//! - [`readability`], [`syllables`], [`familiar`] - Dale–Chall and Flesch
//! - [`corpus`] - Reference corpus and crowd-score lookup
//! - [`report`] - Combined per-block report
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use readgrade_core::{DependencyNode, Sentence, mean_dependency_distance_sentence};
//!
//! let tree = DependencyNode::internal(
//!     "ate",
//!     2,
//!     vec![
//!         DependencyNode::internal("girl", 1, vec![DependencyNode::leaf("The", 0)]),
//!         DependencyNode::internal("apple", 4, vec![DependencyNode::leaf("an", 3)]),
//!     ],
//! );
//! let sentence = Sentence::new("The girl ate an apple.").unwrap();
//! let mdd = mean_dependency_distance_sentence(&sentence, &tree).unwrap();
//! assert_eq!(mdd, 1.25);
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod corpus;
pub mod distance;
pub mod error;
pub mod familiar;
pub mod pairs;
pub mod parse;
pub mod readability;
pub mod report;
pub mod standardize;
pub mod syllables;
pub mod text;
pub mod tree;

pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use corpus::Corpus;
pub use distance::{
    BatchOptions, BatchReport, mean_dependency_distance, mean_dependency_distance_sentence,
    run_batch,
};
pub use error::{
    ConfigError, ConfigResult, CorpusError, CorpusResult, ErrorKind, MddError, MddResult,
    ParseFileError, ParseFileResult, TextError, TextResult,
};
pub use familiar::FamiliarWords;
pub use pairs::{DependencyPair, Nested, extract_pairs, flatten};
pub use parse::{ParseFile, TreeBuilder};
pub use report::{Assessor, ComplexityReport, Grades};
pub use standardize::{
    Metric, dale_chall_unit_scale, standardize_dale_chall, standardize_flesch, standardize_lexical,
    standardize_syntax,
};
pub use text::{Sentence, TextBlock};
pub use tree::{DependencyNode, Token};

/// Default maximum input size: 5 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
