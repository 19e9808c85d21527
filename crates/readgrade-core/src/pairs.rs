//! Dependency pair extraction and flattening.
//!
//! [`extract_pairs`] walks a [`DependencyNode`] and records one two-word group
//! per tree edge, nested the same way the walk recursed. [`flatten`] turns
//! that nesting into a flat word sequence whose elements pair up at positions
//! `(2i, 2i + 1)`.
//!
//! For a node with head word `R`:
//!
//! 1. every direct leaf child `L` yields `[R, L]`;
//! 2. every direct internal child `S` yields `[S, R]`, followed by the nested
//!    pairs of `S` itself.
//!
//! Leaf pairs come first, then subtree pairs in child order. Only direct
//! children are paired with `R`, so each word is paired with its nearest
//! governor and every edge appears exactly once.

use serde::{Deserialize, Serialize};

use crate::error::MddResult;
use crate::tree::DependencyNode;

/// An arbitrarily nested sequence with possibly empty sub-results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nested<T> {
    /// A single element.
    Item(T),
    /// An ordered group of nested values.
    Group(Vec<Nested<T>>),
    /// A sub-result with nothing in it.
    Empty,
}

impl<T> Nested<T> {
    /// Two-element group.
    pub fn pair(first: T, second: T) -> Self {
        Self::Group(vec![Self::Item(first), Self::Item(second)])
    }
}

impl<T> From<Vec<T>> for Nested<T> {
    fn from(items: Vec<T>) -> Self {
        Self::Group(items.into_iter().map(Self::Item).collect())
    }
}

/// A governor–dependent link between two words.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyPair {
    /// The head word.
    pub governor: String,
    /// The word that depends on it.
    pub dependent: String,
}

/// One tree edge as seen from the walk.
#[derive(Debug, Clone)]
struct Edge {
    pair: DependencyPair,
    /// Whether the dependent is a leaf; subtree edges list the dependent first.
    leaf: bool,
}

impl Edge {
    fn new(governor: &str, dependent: &DependencyNode) -> Self {
        Self {
            pair: DependencyPair {
                governor: governor.to_string(),
                dependent: dependent.label().to_string(),
            },
            leaf: dependent.is_leaf(),
        }
    }

    /// The two words in extraction order.
    fn words(self) -> Nested<String> {
        let DependencyPair {
            governor,
            dependent,
        } = self.pair;
        if self.leaf {
            Nested::pair(governor, dependent)
        } else {
            Nested::pair(dependent, governor)
        }
    }
}

/// Extract every governor–dependent pair from a tree, nested per recursion.
///
/// A lone leaf has no governor and yields [`Nested::Empty`].
///
/// # Errors
///
/// Returns [`MddError::MalformedTree`](crate::error::MddError::MalformedTree)
/// when the tree fails [`DependencyNode::validate`].
#[tracing::instrument(skip_all, fields(root = tree.label(), nodes = tree.node_count()))]
pub fn extract_pairs(tree: &DependencyNode) -> MddResult<Nested<String>> {
    tree.validate()?;
    Ok(edge_words(collect_edges(tree)))
}

/// Every tree edge as a typed (governor, dependent) pair, in extraction order.
///
/// Pair `i` holds the same two words as positions `2i` and `2i + 1` of the
/// flattened [`extract_pairs`] output.
///
/// # Errors
///
/// Same as [`extract_pairs`].
pub fn dependency_pairs(tree: &DependencyNode) -> MddResult<Vec<DependencyPair>> {
    tree.validate()?;
    let mut pairs = Vec::with_capacity(tree.edge_count());
    pairs.extend(
        flatten(&collect_edges(tree))
            .into_iter()
            .map(|edge| edge.pair),
    );
    Ok(pairs)
}

fn collect_edges(node: &DependencyNode) -> Nested<Edge> {
    let DependencyNode::Internal { head, children } = node else {
        return Nested::Empty;
    };
    let root = head.text();

    let mut groups: Vec<Nested<Edge>> = children
        .iter()
        .filter(|child| child.is_leaf())
        .map(|leaf| Nested::Item(Edge::new(root, leaf)))
        .collect();

    for subtree in children.iter().filter(|child| !child.is_leaf()) {
        groups.push(Nested::Item(Edge::new(root, subtree)));
        groups.push(collect_edges(subtree));
    }

    Nested::Group(groups)
}

fn edge_words(nested: Nested<Edge>) -> Nested<String> {
    match nested {
        Nested::Item(edge) => edge.words(),
        Nested::Group(items) => Nested::Group(items.into_iter().map(edge_words).collect()),
        Nested::Empty => Nested::Empty,
    }
}

/// Flatten a nested sequence depth-first, left to right.
///
/// Empty markers and empty groups are dropped. Flattening an already flat
/// sequence returns it unchanged.
pub fn flatten<T: Clone>(nested: &Nested<T>) -> Vec<T> {
    let mut out = Vec::new();
    flatten_into(nested, &mut out);
    out
}

fn flatten_into<T: Clone>(nested: &Nested<T>, out: &mut Vec<T>) {
    match nested {
        Nested::Item(item) => out.push(item.clone()),
        Nested::Group(items) => {
            for item in items {
                flatten_into(item, out);
            }
        }
        Nested::Empty => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MddError;

    fn girl_ate_apple() -> DependencyNode {
        DependencyNode::internal(
            "ate",
            2,
            vec![
                DependencyNode::internal("girl", 1, vec![DependencyNode::leaf("The", 0)]),
                DependencyNode::internal("apple", 4, vec![DependencyNode::leaf("an", 3)]),
            ],
        )
    }

    #[test]
    fn pairs_for_simple_sentence() {
        let flat = flatten(&extract_pairs(&girl_ate_apple()).unwrap());
        assert_eq!(
            flat,
            vec!["girl", "ate", "girl", "The", "apple", "ate", "apple", "an"]
        );
    }

    #[test]
    fn leaf_pairs_come_before_subtree_pairs() {
        // (ran (dog The) fast home)
        let tree = DependencyNode::internal(
            "ran",
            2,
            vec![
                DependencyNode::internal("dog", 1, vec![DependencyNode::leaf("The", 0)]),
                DependencyNode::leaf("fast", 3),
                DependencyNode::leaf("home", 4),
            ],
        );
        let flat = flatten(&extract_pairs(&tree).unwrap());
        assert_eq!(
            flat,
            vec!["ran", "fast", "ran", "home", "dog", "ran", "dog", "The"]
        );
    }

    #[test]
    fn deep_leaves_pair_with_nearest_governor() {
        // (saw I (dog (big very)))
        let tree = DependencyNode::internal(
            "saw",
            1,
            vec![
                DependencyNode::leaf("I", 0),
                DependencyNode::internal(
                    "dog",
                    4,
                    vec![DependencyNode::internal(
                        "big",
                        3,
                        vec![DependencyNode::leaf("very", 2)],
                    )],
                ),
            ],
        );
        let pairs = dependency_pairs(&tree).unwrap();
        let governor_of = |word: &str| {
            pairs
                .iter()
                .find(|p| p.dependent == word)
                .map(|p| p.governor.as_str())
        };
        assert_eq!(governor_of("very"), Some("big"));
        assert_eq!(governor_of("big"), Some("dog"));
        assert_eq!(governor_of("dog"), Some("saw"));
        assert_eq!(governor_of("I"), Some("saw"));
        assert_eq!(pairs.len(), tree.edge_count());
    }

    #[test]
    fn typed_pairs_share_extraction_order() {
        let pairs = dependency_pairs(&girl_ate_apple()).unwrap();
        let edges: Vec<(&str, &str)> = pairs
            .iter()
            .map(|p| (p.governor.as_str(), p.dependent.as_str()))
            .collect();
        assert_eq!(
            edges,
            vec![("ate", "girl"), ("girl", "The"), ("ate", "apple"), ("apple", "an")]
        );
    }

    #[test]
    fn repeated_labels_keep_every_edge() {
        // "that that" style repetition must not hide the inner edge
        let tree = DependencyNode::internal(
            "said",
            1,
            vec![
                DependencyNode::leaf("He", 0),
                DependencyNode::internal("said", 3, vec![DependencyNode::leaf("she", 2)]),
            ],
        );
        let flat = flatten(&extract_pairs(&tree).unwrap());
        assert_eq!(flat.len(), 2 * tree.edge_count());
    }

    #[test]
    fn single_leaf_has_no_pairs() {
        let nested = extract_pairs(&DependencyNode::leaf("Hi", 0)).unwrap();
        assert_eq!(nested, Nested::Empty);
        assert!(flatten(&nested).is_empty());
    }

    #[test]
    fn malformed_tree_is_reported() {
        let tree = DependencyNode::internal("ate", 0, Vec::new());
        assert!(matches!(
            extract_pairs(&tree),
            Err(MddError::MalformedTree { .. })
        ));
    }

    #[test]
    fn flatten_drops_empty_markers() {
        let nested = Nested::Group(vec![
            Nested::Empty,
            Nested::Item("a"),
            Nested::Group(vec![]),
            Nested::Group(vec![Nested::Empty, Nested::Item("b"), Nested::Item("c")]),
            Nested::Empty,
        ]);
        assert_eq!(flatten(&nested), vec!["a", "b", "c"]);
    }

    #[test]
    fn flatten_is_idempotent_on_flat_input() {
        let flat = Nested::from(vec![1, 2, 3]);
        assert_eq!(flatten(&flat), vec![1, 2, 3]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    /// Random head attachments for `size` tokens named `w{i}`.
    fn arb_heads() -> impl Strategy<Value = Vec<(String, Option<usize>)>> {
        (1usize..40).prop_flat_map(|size| {
            prop::collection::vec(any::<prop::sample::Index>(), size).prop_map(|picks| {
                // token i > 0 attaches to some earlier token, so the result is a tree
                picks
                    .iter()
                    .enumerate()
                    .map(|(i, pick)| (format!("w{i}"), (i > 0).then(|| pick.index(i))))
                    .collect()
            })
        })
    }

    fn build(tokens: &[(String, Option<usize>)]) -> DependencyNode {
        DependencyNode::from_heads(tokens)
            .expect("random attachment is a valid tree")
            .remove(0)
    }

    fn arb_tree() -> impl Strategy<Value = DependencyNode> {
        arb_heads().prop_map(|tokens| build(&tokens))
    }

    fn arb_nested() -> impl Strategy<Value = Nested<u8>> {
        let leaf = prop_oneof![any::<u8>().prop_map(Nested::Item), Just(Nested::Empty)];
        leaf.prop_recursive(4, 64, 6, |inner| {
            prop::collection::vec(inner, 0..6).prop_map(Nested::Group)
        })
    }

    proptest! {
        /// Property: flattened pairs cover each edge exactly once
        #[test]
        fn flattened_length_is_twice_edge_count(tree in arb_tree()) {
            let flat = flatten(&extract_pairs(&tree).unwrap());
            prop_assert_eq!(flat.len() % 2, 0);
            prop_assert_eq!(flat.len(), 2 * (tree.node_count() - 1));
        }

        /// Property: typed pairs line up with the flattened word pairs
        #[test]
        fn typed_pairs_match_flattened_pairs(tokens in arb_heads()) {
            let tree = build(&tokens);
            let flat = flatten(&extract_pairs(&tree).unwrap());
            let pairs = dependency_pairs(&tree).unwrap();
            prop_assert_eq!(flat.len(), 2 * pairs.len());
            for (words, pair) in flat.chunks_exact(2).zip(&pairs) {
                let mut expected = [pair.governor.as_str(), pair.dependent.as_str()];
                let mut got = [words[0].as_str(), words[1].as_str()];
                expected.sort_unstable();
                got.sort_unstable();
                prop_assert_eq!(got, expected);
            }
        }

        /// Property: typed pairs are exactly the head attachments
        #[test]
        fn typed_pairs_follow_heads(tokens in arb_heads()) {
            let pairs: HashSet<(String, String)> = dependency_pairs(&build(&tokens))
                .unwrap()
                .into_iter()
                .map(|p| (p.governor, p.dependent))
                .collect();
            let expected: HashSet<(String, String)> = tokens
                .iter()
                .filter_map(|(word, head)| head.map(|h| (tokens[h].0.clone(), word.clone())))
                .collect();
            prop_assert_eq!(pairs, expected);
        }

        /// Property: flatten is idempotent
        #[test]
        fn flatten_twice_is_flatten_once(nested in arb_nested()) {
            let once = flatten(&nested);
            let twice = flatten(&Nested::from(once.clone()));
            prop_assert_eq!(twice, once);
        }
    }
}
