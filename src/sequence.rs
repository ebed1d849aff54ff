//! The ordered edge list the social graph grows from.

use std::hash::Hash;

use itertools::Itertools;
use serde::Deserialize;

use crate::edge::Edge;

/// Interactions of the bundled social network, in the order they occur.
pub const SOCIAL_NETWORK: [(&str, &str); 45] = [
    ("Alice", "Bob"),
    ("Alice", "Charlie"),
    ("Bob", "David"),
    ("Charlie", "Eve"),
    ("David", "Eve"),
    ("Eve", "Frank"),
    ("George", "Helen"),
    ("Helen", "Ivy"),
    ("George", "Ivy"),
    ("Alice", "George"),
    ("David", "Helen"),
    ("Frank", "Jack"),
    ("Jack", "Karen"),
    ("Karen", "Leo"),
    ("Leo", "Mona"),
    ("Mona", "Nate"),
    ("Nate", "Olivia"),
    ("Olivia", "Paul"),
    ("Paul", "Quincy"),
    ("Quincy", "Rachel"),
    ("Rachel", "Sam"),
    ("Sam", "Tina"),
    ("Tina", "Uma"),
    ("Uma", "Victor"),
    ("Victor", "Wendy"),
    ("Wendy", "Xander"),
    ("Xander", "Yara"),
    ("Yara", "Zane"),
    ("Zane", "Alice"),
    ("Frank", "George"),
    ("Karen", "Helen"),
    ("Mona", "Eve"),
    ("Nate", "David"),
    ("Olivia", "Charlie"),
    ("Paul", "Bob"),
    ("Quincy", "Charlie"),
    ("Rachel", "Eve"),
    ("Sam", "Frank"),
    ("Tina", "George"),
    ("Uma", "Helen"),
    ("Victor", "Ivy"),
    ("Wendy", "Jack"),
    ("Xander", "Karen"),
    ("Yara", "Leo"),
    ("Zane", "Mona"),
];

/// An immutable, ordered sequence of edges. Step `k` of the evolution is the graph induced by the
/// first `k` entries.
///
/// Deserializes from a JSON array of `[source, target]` pairs.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<(T, T)>")]
pub struct EdgeSequence<T> {
    edges: Vec<Edge<T>>,
}

impl EdgeSequence<&'static str> {
    /// The bundled 26-person social network.
    pub fn social_network() -> Self {
        SOCIAL_NETWORK.into_iter().collect()
    }
}

impl<T> EdgeSequence<T> {
    /// Creates a sequence from edges in the order given.
    pub fn new(edges: Vec<Edge<T>>) -> Self {
        Self { edges }
    }

    /// Returns the number of steps, duplicates included.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns the first `k` edges, or all of them if `k` runs past the end.
    ///
    /// # Examples
    ///
    /// ```
    /// use sociogram::sequence::EdgeSequence;
    ///
    /// let sequence = EdgeSequence::social_network();
    /// assert_eq!(sequence.prefix(2).len(), 2);
    /// assert_eq!(sequence.prefix(1_000).len(), sequence.len());
    /// ```
    pub fn prefix(&self, k: usize) -> &[Edge<T>] {
        &self.edges[..k.min(self.edges.len())]
    }

    /// Returns the distinct node labels of the first `k` edges, in order of first appearance.
    pub fn nodes(&self, k: usize) -> Vec<&T>
    where
        T: Eq + Hash,
    {
        self.prefix(k)
            .iter()
            .flat_map(|edge| [edge.source(), edge.target()])
            .unique()
            .collect()
    }
}

impl<T> From<Vec<(T, T)>> for EdgeSequence<T> {
    fn from(pairs: Vec<(T, T)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl<T> FromIterator<(T, T)> for EdgeSequence<T> {
    fn from_iter<I: IntoIterator<Item = (T, T)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Edge::from).collect())
    }
}
