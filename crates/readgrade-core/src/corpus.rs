//! Reference corpus of scored excerpts.
//!
//! The corpus is a CSV file with a header row and these columns, read by
//! position: id, author, title, url, publication year (may be empty),
//! category, location, excerpt, crowd score, Flesch score, Dale–Chall score.

use std::io::Read;

use camino::Utf8Path;
use serde::Deserialize;

use crate::error::{CorpusError, CorpusResult, TextResult};
use crate::text::{BlockMeta, ReferenceScores, TextBlock};

/// One corpus row as it appears in the file.
#[derive(Debug, Clone, Deserialize)]
struct CorpusRow {
    id: u64,
    author: String,
    title: String,
    url: String,
    pub_year: Option<i32>,
    category: String,
    location: String,
    excerpt: String,
    crowd: f64,
    flesch: f64,
    dale_chall: f64,
}

impl CorpusRow {
    fn into_block(self) -> TextResult<TextBlock> {
        let meta = BlockMeta {
            id: self.id,
            author: self.author,
            title: self.title,
            url: self.url,
            pub_year: self.pub_year,
            category: self.category.parse()?,
            location: self.location.parse()?,
        };
        let reference = ReferenceScores {
            crowd: self.crowd,
            flesch: self.flesch,
            dale_chall: self.dale_chall,
        };
        TextBlock::from_excerpt(meta, &self.excerpt, reference)
    }
}

/// Text blocks loaded from the reference corpus, in file order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    blocks: Vec<TextBlock>,
}

impl Corpus {
    /// Load the corpus from a CSV file.
    #[tracing::instrument(skip_all, fields(path = %path))]
    pub fn from_path(path: &Utf8Path) -> CorpusResult<Self> {
        let file = std::fs::File::open(path).map_err(|source| CorpusError::Io {
            path: path.to_owned(),
            source,
        })?;
        let corpus = Self::from_reader(file)?;
        tracing::info!(blocks = corpus.len(), "loaded reference corpus");
        Ok(corpus)
    }

    /// Load the corpus from any reader.
    ///
    /// # Errors
    ///
    /// Fails on malformed CSV, and with [`CorpusError::InvalidRow`] when a row
    /// breaks a text-model rule such as an out-of-range crowd score.
    pub fn from_reader<R: Read>(reader: R) -> CorpusResult<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let mut blocks = Vec::new();
        for record in csv.records() {
            let record = record?;
            let line = record.position().map_or(0, csv::Position::line);
            let row: CorpusRow = record.deserialize(None)?;
            let block = row
                .into_block()
                .map_err(|source| CorpusError::InvalidRow { line, source })?;
            blocks.push(block);
        }
        Ok(Self { blocks })
    }

    /// All blocks in file order.
    pub fn blocks(&self) -> &[TextBlock] {
        &self.blocks
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The block whose reference scores are closest to the given ones.
    ///
    /// Distance is `|Δ dale_chall| + |Δ flesch|`. On a tie the earlier block
    /// wins. NaN distances never win.
    pub fn nearest(&self, dale_chall: f64, flesch: f64) -> Option<&TextBlock> {
        let mut best: Option<(&TextBlock, f64)> = None;
        for block in &self.blocks {
            let reference = block.reference();
            let distance =
                (dale_chall - reference.dale_chall).abs() + (flesch - reference.flesch).abs();
            if distance.is_nan() {
                continue;
            }
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((block, distance));
            }
        }
        best.map(|(block, _)| block)
    }

    /// Crowd comprehension score of the [`nearest`](Self::nearest) block.
    pub fn crowd_score_for(&self, dale_chall: f64, flesch: f64) -> Option<f64> {
        self.nearest(dale_chall, flesch)
            .map(|block| block.reference().crowd)
    }
}
