//! The per-step view of the graph handed to callers.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use itertools::Itertools;
use serde::Serialize;

use crate::{analytics::CentralityKind, edge::Edge, graph::NodeId};

/// Everything reported about one node.
///
/// Scores keep full precision; `Display` rounds them to two decimals.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeRecord<T> {
    pub id: T,
    pub degree: f64,
    pub closeness: f64,
    pub betweenness: f64,
    pub eigenvector: f64,
    pub community: usize,
}

impl<T> NodeRecord<T> {
    pub fn score(&self, kind: CentralityKind) -> f64 {
        match kind {
            CentralityKind::Degree => self.degree,
            CentralityKind::Closeness => self.closeness,
            CentralityKind::Betweenness => self.betweenness,
            CentralityKind::Eigenvector => self.eigenvector,
        }
    }
}

impl<T: fmt::Display> fmt::Display for NodeRecord<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: degree {:.2}, closeness {:.2}, betweenness {:.2}, eigenvector {:.2}, community {}",
            self.id, self.degree, self.closeness, self.betweenness, self.eigenvector, self.community
        )
    }
}

/// The graph after a given number of steps, with the centrality and community of every node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot<T> {
    step: usize,
    nodes: Vec<NodeRecord<T>>,
    edges: Vec<Edge<T>>,
    community_count: usize,
    modularity: f64,
    eigenvector_converged: bool,
}

impl<T> Snapshot<T> {
    /// A snapshot of a graph without nodes.
    pub fn empty(step: usize) -> Self {
        Self {
            step,
            nodes: Vec::new(),
            edges: Vec::new(),
            community_count: 0,
            modularity: 0.0,
            eigenvector_converged: true,
        }
    }

    pub(crate) fn new(
        step: usize,
        nodes: Vec<NodeRecord<T>>,
        edges: Vec<Edge<T>>,
        modularity: f64,
        eigenvector_converged: bool,
    ) -> Self {
        let community_count = nodes.iter().map(|node| node.community).unique().count();

        Self {
            step,
            nodes,
            edges,
            community_count,
            modularity,
            eigenvector_converged,
        }
    }

    /// The number of sequence edges the graph was built from.
    pub fn step(&self) -> usize {
        self.step
    }

    /// One record per node, in the order the nodes joined the graph.
    pub fn nodes(&self) -> &[NodeRecord<T>] {
        &self.nodes
    }

    /// The distinct edges in the order they joined the graph.
    pub fn edges(&self) -> &[Edge<T>] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn community_count(&self) -> usize {
        self.community_count
    }

    /// Modularity of the community assignment.
    pub fn modularity(&self) -> f64 {
        self.modularity
    }

    /// `false` when eigenvector centrality failed to converge and was replaced by zeros.
    pub fn eigenvector_converged(&self) -> bool {
        self.eigenvector_converged
    }

    /// The top `n` nodes under `kind`, highest first. Equal scores keep node order, so the node
    /// that joined the graph first ranks first.
    pub fn top(&self, kind: CentralityKind, n: usize) -> Vec<(&T, f64)> {
        self.nodes
            .iter()
            .map(|node| (&node.id, node.score(kind)))
            .sorted_by(|(_, a), (_, b)| b.total_cmp(a))
            .take(n)
            .collect()
    }

    /// [`top`](Self::top) for every measure.
    pub fn rankings(&self, n: usize) -> BTreeMap<CentralityKind, Vec<(&T, f64)>> {
        CentralityKind::ALL
            .into_iter()
            .map(|kind| (kind, self.top(kind, n)))
            .collect()
    }
}

impl<T: Clone + Ord> Snapshot<T> {
    pub fn node(&self, id: &T) -> Option<&NodeRecord<T>> {
        self.nodes.iter().find(|node| node.id == *id)
    }

    /// Every node's score under `kind`.
    pub fn profile(&self, kind: CentralityKind) -> BTreeMap<T, f64> {
        self.nodes
            .iter()
            .map(|node| (node.id.clone(), node.score(kind)))
            .collect()
    }

    /// Every node's community.
    pub fn assignment(&self) -> BTreeMap<T, usize> {
        self.nodes
            .iter()
            .map(|node| (node.id.clone(), node.community))
            .collect()
    }

    /// Members of each community, in node order.
    pub fn communities(&self) -> BTreeMap<usize, Vec<T>> {
        let mut communities: BTreeMap<usize, Vec<T>> = BTreeMap::new();
        for node in &self.nodes {
            communities
                .entry(node.community)
                .or_default()
                .push(node.id.clone());
        }

        communities
    }
}

/// Gathers per-measure score maps into node records, in the order of `ids`.
pub(crate) fn assemble_records<T: NodeId>(
    ids: Vec<T>,
    scores: &HashMap<CentralityKind, HashMap<T, f64>>,
    communities: &BTreeMap<T, usize>,
) -> Vec<NodeRecord<T>> {
    let score = |kind: CentralityKind, id: &T| {
        scores
            .get(&kind)
            .and_then(|map| map.get(id))
            .copied()
            .unwrap_or(0.0)
    };

    ids.into_iter()
        .map(|id| NodeRecord {
            degree: score(CentralityKind::Degree, &id),
            closeness: score(CentralityKind::Closeness, &id),
            betweenness: score(CentralityKind::Betweenness, &id),
            eigenvector: score(CentralityKind::Eigenvector, &id),
            community: communities.get(&id).copied().unwrap_or(0),
            id,
        })
        .collect()
}
