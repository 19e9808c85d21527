//! Dependency tree model.
//!
//! A parsed sentence is a rooted, ordered tree. Leaves are tokens with no
//! dependents; internal nodes are head tokens with an ordered, non-empty list
//! of dependent subtrees. Children are owned by their parent, so sharing and
//! cycles cannot be expressed.
//!
//! Trees usually come from an external parser through
//! [`DependencyNode::from_heads`], which accepts the head-index encoding most
//! dependency parsers emit.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MddError, MddResult};

/// A word-level token and its 0-based position in the sentence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    text: String,
    index: usize,
}

impl Token {
    /// Create a token.
    pub fn new(text: impl Into<String>, index: usize) -> Self {
        Self {
            text: text.into(),
            index,
        }
    }

    /// Literal token text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Position of the token in its sentence.
    pub const fn index(&self) -> usize {
        self.index
    }
}

/// A node in a dependency tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyNode {
    /// A token with no dependents.
    Leaf(Token),
    /// A head token governing an ordered list of dependents.
    Internal {
        /// The governing word.
        head: Token,
        /// Dependents in left-to-right order.
        children: Vec<DependencyNode>,
    },
}

impl DependencyNode {
    /// Create a leaf node.
    pub fn leaf(text: impl Into<String>, index: usize) -> Self {
        Self::Leaf(Token::new(text, index))
    }

    /// Create an internal node governing `children`.
    pub fn internal(text: impl Into<String>, index: usize, children: Vec<Self>) -> Self {
        Self::Internal {
            head: Token::new(text, index),
            children,
        }
    }

    /// The token at this node: the leaf itself or the internal node's head.
    pub const fn token(&self) -> &Token {
        match self {
            Self::Leaf(token) | Self::Internal { head: token, .. } => token,
        }
    }

    /// Text of the token at this node.
    pub fn label(&self) -> &str {
        self.token().text()
    }

    /// Direct dependents of this node (empty for leaves).
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Leaf(_) => &[],
            Self::Internal { children, .. } => children,
        }
    }

    /// Whether this node is a leaf.
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Total number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(Self::node_count).sum::<usize>()
    }

    /// Number of governor–dependent edges (nodes minus one).
    pub fn edge_count(&self) -> usize {
        self.node_count() - 1
    }

    /// Check the structural contract: every internal node has at least one
    /// child and every token has non-empty text.
    pub fn validate(&self) -> MddResult<()> {
        if self.label().trim().is_empty() {
            return Err(MddError::malformed(format!(
                "token at position {} has empty text",
                self.token().index()
            )));
        }
        if let Self::Internal { head, children } = self {
            if children.is_empty() {
                return Err(MddError::malformed(format!(
                    "internal node {:?} has no dependents",
                    head.text()
                )));
            }
            for child in children {
                child.validate()?;
            }
        }
        Ok(())
    }

    /// Build trees from the head-index encoding.
    ///
    /// `tokens[i]` is `(text, head)` where `head` is the index of the token's
    /// governor. `None`, or a head equal to the token's own index, marks a
    /// root. One tree is returned per root, in root order.
    pub fn from_heads<S: AsRef<str>>(tokens: &[(S, Option<usize>)]) -> MddResult<Vec<Self>> {
        if tokens.is_empty() {
            return Err(MddError::malformed("parse has no tokens"));
        }

        let n = tokens.len();
        let mut roots = Vec::new();
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];

        for (i, (_, head)) in tokens.iter().enumerate() {
            match *head {
                None => roots.push(i),
                Some(h) if h == i => roots.push(i),
                Some(h) if h >= n => {
                    return Err(MddError::malformed(format!(
                        "token {i} has head {h}, but the parse only has {n} tokens"
                    )));
                }
                Some(h) => dependents[h].push(i),
            }
        }

        if roots.is_empty() {
            return Err(MddError::malformed("parse has no root token"));
        }

        let mut built = 0;
        let trees: Vec<Self> = roots
            .iter()
            .map(|&root| build_subtree(tokens, &dependents, root, &mut built))
            .collect();

        // Tokens on a head cycle are never reached from a root.
        if built != n {
            return Err(MddError::malformed(format!(
                "{} token(s) are not reachable from a root (head cycle)",
                n - built
            )));
        }

        Ok(trees)
    }
}

fn build_subtree<S: AsRef<str>>(
    tokens: &[(S, Option<usize>)],
    dependents: &[Vec<usize>],
    index: usize,
    built: &mut usize,
) -> DependencyNode {
    *built += 1;
    let text = tokens[index].0.as_ref();
    if dependents[index].is_empty() {
        return DependencyNode::leaf(text, index);
    }
    let children = dependents[index]
        .iter()
        .map(|&child| build_subtree(tokens, dependents, child, built))
        .collect();
    DependencyNode::internal(text, index, children)
}

/// Bracketed form, e.g. `(ate (girl The) (apple an))`.
impl fmt::Display for DependencyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(token) => f.write_str(token.text()),
            Self::Internal { head, children } => {
                write!(f, "({}", head.text())?;
                for child in children {
                    write!(f, " {child}")?;
                }
                f.write_str(")")
            }
        }
    }
}
