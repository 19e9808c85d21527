//! Combined complexity report for one text block.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::corpus::Corpus;
use crate::distance;
use crate::error::MddResult;
use crate::familiar::FamiliarWords;
use crate::parse::TreeBuilder;
use crate::readability::{self, DaleChallReport, FleschReport};
use crate::standardize;
use crate::text::TextBlock;

/// Standardized grade levels, one per metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Grades {
    /// Grade from the Dale–Chall score.
    pub lexical: u8,
    /// Grade from Flesch Reading Ease.
    pub flesch: u8,
    /// Grade from mean dependency distance, when parses were available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syntax: Option<u8>,
}

/// Every score computed for a block.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ComplexityReport {
    /// Block id (0 for user input).
    pub id: u64,
    /// Dale–Chall details.
    pub dale_chall: DaleChallReport,
    /// Flesch Reading Ease details.
    pub flesch: FleschReport,
    /// Mean dependency distance, when parses were available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mdd: Option<f64>,
    /// Standardized grades.
    pub grades: Grades,
    /// Crowd score of the nearest corpus excerpt, when a corpus was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crowd_score: Option<f64>,
    /// Id of the nearest corpus excerpt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nearest_id: Option<u64>,
}

/// Scores text blocks against a familiar-word list, optional parses, and an
/// optional reference corpus.
pub struct Assessor<'a> {
    familiar: &'a FamiliarWords,
    parses: Option<&'a dyn TreeBuilder>,
    corpus: Option<&'a Corpus>,
    single_sentence_mode: bool,
}

impl<'a> Assessor<'a> {
    /// Create an assessor with only the lexical and syllable metrics.
    pub const fn new(familiar: &'a FamiliarWords) -> Self {
        Self {
            familiar,
            parses: None,
            corpus: None,
            single_sentence_mode: false,
        }
    }

    /// Compute MDD with trees from `parses`.
    pub fn with_parses(mut self, parses: &'a dyn TreeBuilder) -> Self {
        self.parses = Some(parses);
        self
    }

    /// Look up the crowd score in `corpus`.
    pub const fn with_corpus(mut self, corpus: &'a Corpus) -> Self {
        self.corpus = Some(corpus);
        self
    }

    /// Treat each block as a single sentence of user input.
    pub const fn single_sentence(mut self, enabled: bool) -> Self {
        self.single_sentence_mode = enabled;
        self
    }

    /// Score a block.
    ///
    /// # Errors
    ///
    /// Propagates any MDD failure when parses are configured.
    #[tracing::instrument(skip_all, fields(block = block.id()))]
    pub fn assess(&self, block: &TextBlock) -> MddResult<ComplexityReport> {
        let dale_chall = readability::dale_chall_score(block, self.familiar);
        let flesch = readability::flesch_reading_ease(block);

        let mdd = self
            .parses
            .map(|parses| {
                distance::mean_dependency_distance(block, parses, self.single_sentence_mode)
            })
            .transpose()?;

        let nearest = self
            .corpus
            .and_then(|corpus| corpus.nearest(dale_chall.score, flesch.score));

        let grades = Grades {
            lexical: standardize::standardize_dale_chall(dale_chall.score),
            flesch: standardize::standardize_flesch(flesch.score),
            syntax: mdd.map(standardize::standardize_syntax),
        };

        Ok(ComplexityReport {
            id: block.id(),
            dale_chall,
            flesch,
            mdd,
            grades,
            crowd_score: nearest.map(|b| b.reference().crowd),
            nearest_id: nearest.map(TextBlock::id),
        })
    }
}
