//! Dale–Chall familiar-word list.
//!
//! The list file is delimited text with a header row. The first field of each
//! following row is one familiar word. Entries and lookups ignore case and
//! ASCII punctuation, so `can't` on the list matches `cant` in scored text.

use std::collections::HashSet;
use std::io::Read;

use camino::Utf8Path;

use crate::error::{CorpusError, CorpusResult};
use crate::text::strip_punctuation;

/// A set of words a fourth-grade reader is expected to know.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamiliarWords {
    words: HashSet<String>,
}

impl FamiliarWords {
    /// Load a word list from a file.
    #[tracing::instrument(skip_all, fields(path = %path))]
    pub fn from_path(path: &Utf8Path) -> CorpusResult<Self> {
        let file = std::fs::File::open(path).map_err(|source| CorpusError::Io {
            path: path.to_owned(),
            source,
        })?;
        let list = Self::from_reader(file)?;
        tracing::debug!(words = list.len(), "loaded familiar-word list");
        Ok(list)
    }

    /// Load a word list from any reader.
    pub fn from_reader<R: Read>(reader: R) -> CorpusResult<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut words = HashSet::new();
        for record in csv.records() {
            let record = record?;
            if let Some(word) = record.get(0).map(normalize).filter(|w| !w.is_empty()) {
                words.insert(word);
            }
        }
        Ok(Self { words })
    }

    /// Whether `word` is on the list.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&normalize(word))
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for FamiliarWords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            words: iter
                .into_iter()
                .map(|w| normalize(w.as_ref()))
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }
}

fn normalize(word: &str) -> String {
    strip_punctuation(word.trim()).to_lowercase()
}
