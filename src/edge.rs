//! A module for working with edges.

use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

/// A pair of node labels representing an interaction. Edges don't have a direction, despite the
/// `source`-`target` nomenclature used; the orientation is only kept so that snapshots can report
/// an edge the way it was first recorded.
#[derive(Clone, Debug, Eq, Serialize, Deserialize)]
pub struct Edge<T> {
    source: T,
    target: T,
}

impl<T> Edge<T> {
    /// Creates a new edge from two nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// use sociogram::edge::Edge;
    ///
    /// let edge = Edge::new("Alice", "Bob");
    /// assert_eq!(edge, Edge::new("Bob", "Alice"));
    /// ```
    pub fn new(source: T, target: T) -> Self {
        Self { source, target }
    }

    /// Returns the node the edge was recorded from.
    pub fn source(&self) -> &T {
        &self.source
    }

    /// Returns the node the edge was recorded to.
    pub fn target(&self) -> &T {
        &self.target
    }
}

impl<T> From<(T, T)> for Edge<T> {
    fn from((source, target): (T, T)) -> Self {
        Self::new(source, target)
    }
}

//
// Trait implementations
//

impl<T: PartialEq> PartialEq for Edge<T> {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (&self.source, &self.target);
        let (c, d) = (&other.source, &other.target);

        a == d && b == c || a == c && b == d
    }
}

impl<T: Hash + Ord> Hash for Edge<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (a, b) = (&self.source, &self.target);

        // (a, b) and (b, a) must land in the same bucket.
        match a.cmp(b) {
            Ordering::Greater => {
                b.hash(state);
                a.hash(state);
            }
            _ => {
                a.hash(state);
                b.hash(state);
            }
        }
    }
}
