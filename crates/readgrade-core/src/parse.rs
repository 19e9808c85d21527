//! Dependency parses supplied by an external parser.
//!
//! [`TreeBuilder`] is the seam between this crate and whatever produces
//! dependency trees. [`ParseFile`] implements it over a JSON dump:
//!
//! ```json
//! { "sentences": [
//!     { "text": "The girl ate an apple.",
//!       "tokens": [ {"text": "The", "head": 1}, {"text": "girl", "head": 2},
//!                   {"text": "ate", "head": null}, {"text": "an", "head": 4},
//!                   {"text": "apple", "head": 2},
//!                   {"text": ".", "head": 2, "punct": true} ] } ] }
//! ```
//!
//! `head` indexes into `tokens`; `null` or the token's own index marks a root.
//! Punctuation tokens without dependents are dropped before the tree is built.

use std::collections::HashMap;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::error::{MddError, MddResult, ParseFileError, ParseFileResult};
use crate::tree::DependencyNode;

/// Produces dependency trees for a sentence.
pub trait TreeBuilder {
    /// Build every tree the parser finds in `sentence`, in order.
    ///
    /// # Errors
    ///
    /// [`MddError::MissingParse`] when no parse is available and
    /// [`MddError::MalformedTree`] when the parse is not a valid tree.
    fn build_trees(&self, sentence: &str) -> MddResult<Vec<DependencyNode>>;
}

impl<F> TreeBuilder for F
where
    F: Fn(&str) -> MddResult<Vec<DependencyNode>>,
{
    fn build_trees(&self, sentence: &str) -> MddResult<Vec<DependencyNode>> {
        self(sentence)
    }
}

/// One token of a parsed sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedToken {
    /// Token text as the parser saw it.
    pub text: String,
    /// Index of the governing token, or `None` for a root.
    pub head: Option<usize>,
    /// Whether the parser tagged this token as punctuation.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub punct: bool,
}

/// A sentence and its head-index parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSentence {
    /// Sentence text.
    pub text: String,
    /// Tokens in sentence order.
    pub tokens: Vec<ParsedToken>,
}

impl ParsedSentence {
    /// Build the dependency trees of this parse.
    pub fn to_trees(&self) -> MddResult<Vec<DependencyNode>> {
        let n = self.tokens.len();
        let mut has_dependents = vec![false; n];
        for (i, token) in self.tokens.iter().enumerate() {
            match token.head {
                Some(h) if h >= n => {
                    return Err(MddError::malformed(format!(
                        "token {i} has head {h}, but the parse only has {n} tokens"
                    )));
                }
                Some(h) if h != i => has_dependents[h] = true,
                _ => {}
            }
        }

        // old index -> new index, for tokens that survive
        let mut remap = vec![None; n];
        let mut next = 0;
        for (i, token) in self.tokens.iter().enumerate() {
            if !(token.punct && !has_dependents[i]) {
                remap[i] = Some(next);
                next += 1;
            }
        }

        let kept: Vec<(&str, Option<usize>)> = self
            .tokens
            .iter()
            .enumerate()
            .filter(|&(i, _)| remap[i].is_some())
            .map(|(i, token)| {
                let head = token.head.filter(|&h| h != i).and_then(|h| remap[h]);
                (token.text.as_str(), head)
            })
            .collect();

        DependencyNode::from_heads(&kept)
    }
}

#[derive(Debug, Deserialize)]
struct ParseDocument {
    sentences: Vec<ParsedSentence>,
}

/// Parses loaded from a JSON file, looked up by sentence text.
#[derive(Debug, Clone, Default)]
pub struct ParseFile {
    sentences: Vec<ParsedSentence>,
    by_text: HashMap<String, usize>,
}

impl ParseFile {
    /// Load parses from a JSON file.
    #[tracing::instrument(skip_all, fields(path = %path))]
    pub fn from_path(path: &Utf8Path) -> ParseFileResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ParseFileError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load parses from a JSON string.
    pub fn from_json(json: &str) -> ParseFileResult<Self> {
        let doc: ParseDocument = serde_json::from_str(json)?;
        Ok(Self::from_sentences(doc.sentences))
    }

    /// Index already-deserialized parses.
    ///
    /// When the same sentence text appears twice, the first parse wins.
    pub fn from_sentences(sentences: Vec<ParsedSentence>) -> Self {
        let mut by_text = HashMap::with_capacity(sentences.len());
        for (i, sentence) in sentences.iter().enumerate() {
            let key = normalize(&sentence.text);
            if by_text.contains_key(&key) {
                tracing::debug!(sentence = %key, "ignoring duplicate parse");
                continue;
            }
            by_text.insert(key, i);
        }
        tracing::debug!(sentences = sentences.len(), "indexed parses");
        Self { sentences, by_text }
    }

    /// Parsed sentences in file order.
    pub fn sentences(&self) -> &[ParsedSentence] {
        &self.sentences
    }

    /// Number of parsed sentences.
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// Whether the file holds no parses.
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// The parse for `sentence`, matched with whitespace runs collapsed.
    pub fn get(&self, sentence: &str) -> Option<&ParsedSentence> {
        self.by_text
            .get(&normalize(sentence))
            .map(|&i| &self.sentences[i])
    }
}

/// Lookup key: words joined by single spaces.
fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl TreeBuilder for ParseFile {
    fn build_trees(&self, sentence: &str) -> MddResult<Vec<DependencyNode>> {
        self.get(sentence)
            .ok_or_else(|| MddError::MissingParse {
                sentence: sentence.to_string(),
            })?
            .to_trees()
    }
}
