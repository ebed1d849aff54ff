//! Step-indexed snapshots of the evolving graph.

use std::collections::HashMap;

use itertools::Itertools;
use tracing::{debug, warn};

use crate::{
    analytics::{CentralityKind, GraphAnalytics, NetworkAnalytics},
    config::{AnalyticsConfig, EigenvectorPolicy},
    edge::Edge,
    error::{ConfigError, SnapshotError},
    graph::{Graph, NodeId},
    sequence::EdgeSequence,
    snapshot::{assemble_records, Snapshot},
};

/// Computes the state of the graph after any number of steps of an [`EdgeSequence`].
///
/// Every call rebuilds the graph from the sequence and recomputes all measures; nothing is
/// carried between calls.
///
/// # Examples
///
/// ```
/// use sociogram::engine::GraphSnapshotEngine;
/// use sociogram::sequence::EdgeSequence;
///
/// let engine = GraphSnapshotEngine::new(EdgeSequence::social_network());
/// let snapshot = engine.snapshot(1).unwrap();
///
/// assert_eq!(snapshot.nodes().len(), 2);
/// assert_eq!(snapshot.edges().len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct GraphSnapshotEngine<T, A = NetworkAnalytics> {
    sequence: EdgeSequence<T>,
    analytics: A,
    policy: EigenvectorPolicy,
}

impl<T: NodeId> GraphSnapshotEngine<T, NetworkAnalytics> {
    /// Creates an engine with the default analytics configuration.
    pub fn new(sequence: EdgeSequence<T>) -> Self {
        Self::with_analytics(sequence, NetworkAnalytics::default(), Default::default())
    }

    /// Creates an engine from a validated configuration.
    pub fn with_config(
        sequence: EdgeSequence<T>,
        config: AnalyticsConfig,
    ) -> Result<Self, ConfigError> {
        let policy = config.eigenvector_policy;

        Ok(Self::with_analytics(
            sequence,
            NetworkAnalytics::new(config)?,
            policy,
        ))
    }
}

impl<T: NodeId, A: GraphAnalytics<T>> GraphSnapshotEngine<T, A> {
    /// Creates an engine backed by custom analytics.
    pub fn with_analytics(
        sequence: EdgeSequence<T>,
        analytics: A,
        policy: EigenvectorPolicy,
    ) -> Self {
        Self {
            sequence,
            analytics,
            policy,
        }
    }

    pub fn sequence(&self) -> &EdgeSequence<T> {
        &self.sequence
    }

    /// The last valid step.
    pub fn max_step(&self) -> usize {
        self.sequence.len()
    }

    /// Builds the graph induced by the first `step` edges.
    pub fn graph(&self, step: usize) -> Result<Graph<T>, SnapshotError> {
        self.check_step(step)?;

        Ok(self.analytics.build_graph(self.sequence.prefix(step)))
    }

    /// Computes the snapshot after `step` edges, `1 <= step <= max_step()`.
    ///
    /// With [`EigenvectorPolicy::Propagate`] a power iteration that doesn't converge fails the
    /// call, which on graphs still split into several components is an expected outcome rather
    /// than a fault.
    pub fn snapshot(&self, step: usize) -> Result<Snapshot<T>, SnapshotError> {
        let mut graph = self.graph(step)?;

        // Repeats of an earlier edge, in either orientation, are dropped.
        let edges = self
            .sequence
            .prefix(step)
            .iter()
            .unique()
            .cloned()
            .collect();
        let order = self.sequence.nodes(step).into_iter().cloned().collect();

        self.assemble(step, &mut graph, edges, order)
    }

    /// Computes a snapshot of an arbitrary graph. The step is the graph's edge count, and since
    /// the graph has no history its nodes and edges are listed in label order.
    pub fn snapshot_of(&self, graph: &mut Graph<T>) -> Result<Snapshot<T>, SnapshotError> {
        let edges = graph
            .edges()
            .iter()
            .cloned()
            .sorted_by(|a, b| (a.source(), a.target()).cmp(&(b.source(), b.target())))
            .collect();
        let order = graph.vertices();

        self.assemble(graph.edge_count(), graph, edges, order)
    }

    /// Snapshots of every step in order.
    pub fn snapshots(&self) -> impl Iterator<Item = Result<Snapshot<T>, SnapshotError>> + '_ {
        (1..=self.max_step()).map(|step| self.snapshot(step))
    }

    //
    // Private
    //

    fn check_step(&self, step: usize) -> Result<(), SnapshotError> {
        let max = self.max_step();

        if step == 0 || step > max {
            return Err(SnapshotError::InvalidStep { step, max });
        }

        Ok(())
    }

    fn assemble(
        &self,
        step: usize,
        graph: &mut Graph<T>,
        edges: Vec<Edge<T>>,
        order: Vec<T>,
    ) -> Result<Snapshot<T>, SnapshotError> {
        if graph.vertex_count() == 0 {
            debug!(step, "graph has no nodes, returning an empty snapshot");
            return Ok(Snapshot::empty(step));
        }

        debug!(
            step,
            nodes = graph.vertex_count(),
            edges = graph.edge_count(),
            "computing snapshot"
        );

        let partition = self.analytics.partition(graph);

        let mut scores = HashMap::new();
        let mut eigenvector_converged = true;

        for kind in CentralityKind::ALL {
            match self.analytics.centrality(graph, kind) {
                Ok(map) => {
                    scores.insert(kind, map);
                }
                Err(err)
                    if kind == CentralityKind::Eigenvector
                        && self.policy == EigenvectorPolicy::Zero =>
                {
                    warn!(step, %err, "substituting zero eigenvector centrality");
                    // Missing measures are recorded as 0.
                    eigenvector_converged = false;
                }
                Err(err) => {
                    debug!(step, %kind, %err, "centrality failed");
                    return Err(err.into());
                }
            }
        }

        let nodes = assemble_records(order, &scores, partition.labels());
        let snapshot = Snapshot::new(
            step,
            nodes,
            edges,
            partition.modularity(),
            eigenvector_converged,
        );

        debug!(
            step,
            communities = snapshot.community_count(),
            modularity = snapshot.modularity(),
            "snapshot ready"
        );

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{community::Partition, error::CentralityError};

    /// Analytics whose closeness always fails.
    struct BrokenCloseness(NetworkAnalytics);

    impl<T: NodeId> GraphAnalytics<T> for BrokenCloseness {
        fn centrality(
            &self,
            graph: &mut Graph<T>,
            kind: CentralityKind,
        ) -> Result<HashMap<T, f64>, CentralityError> {
            match kind {
                CentralityKind::Closeness => Err(CentralityError::NotConverged { iterations: 0 }),
                _ => self.0.centrality(graph, kind),
            }
        }

        fn partition(&self, graph: &mut Graph<T>) -> Partition<T> {
            self.0.partition(graph)
        }
    }

    fn engine(pairs: &[(&'static str, &'static str)]) -> GraphSnapshotEngine<&'static str> {
        GraphSnapshotEngine::new(pairs.iter().copied().collect())
    }

    #[test]
    fn rejects_out_of_range_steps() {
        let engine = engine(&[("a", "b"), ("b", "c")]);

        for step in [0, 3] {
            assert!(matches!(
                engine.snapshot(step),
                Err(SnapshotError::InvalidStep { max: 2, .. })
            ));
        }
    }

    #[test]
    fn duplicate_edges_are_listed_once() {
        let engine = engine(&[("a", "b"), ("b", "a"), ("b", "c")]);

        let snapshot = engine.snapshot(3).unwrap();

        assert_eq!(
            snapshot.edges(),
            &[Edge::new("a", "b"), Edge::new("b", "c")]
        );
        assert_eq!(snapshot.step(), 3);
    }

    #[test]
    fn empty_graph_gives_empty_snapshot() {
        let engine = engine(&[("a", "b")]);

        let snapshot = engine.snapshot_of(&mut Graph::new()).unwrap();

        assert!(snapshot.is_empty());
        assert!(snapshot.edges().is_empty());
    }

    #[test]
    fn snapshot_of_lists_edges_in_label_order() {
        let engine = engine(&[("a", "b")]);
        let mut graph: Graph<&str> = [Edge::new("c", "d"), Edge::new("a", "b")]
            .into_iter()
            .collect();

        let snapshot = engine.snapshot_of(&mut graph).unwrap();

        assert_eq!(snapshot.edges(), &[Edge::new("a", "b"), Edge::new("c", "d")]);
        assert_eq!(snapshot.step(), 2);
    }

    #[test]
    fn policy_decides_eigenvector_failures() {
        let pairs = [("a", "b"), ("b", "c")];
        let config = AnalyticsConfig {
            eigenvector_max_iterations: 1,
            ..Default::default()
        };

        let propagate =
            GraphSnapshotEngine::with_config(pairs.into_iter().collect(), config).unwrap();
        assert!(matches!(
            propagate.snapshot(2),
            Err(SnapshotError::Centrality(CentralityError::NotConverged { .. }))
        ));

        let zero = GraphSnapshotEngine::with_config(
            pairs.into_iter().collect(),
            AnalyticsConfig {
                eigenvector_policy: EigenvectorPolicy::Zero,
                ..config
            },
        )
        .unwrap();
        let snapshot = zero.snapshot(2).unwrap();

        assert!(!snapshot.eigenvector_converged());
        assert!(snapshot.nodes().iter().all(|node| node.eigenvector == 0.0));
        assert_eq!(snapshot.node(&"b").map(|node| node.degree), Some(1.0));
    }

    #[test]
    fn snapshots_walk_every_step() {
        let engine = engine(&[("a", "b"), ("b", "c"), ("c", "a")]);

        let steps: Vec<usize> = engine
            .snapshots()
            .map(|snapshot| snapshot.unwrap().step())
            .collect();

        assert_eq!(steps, vec![1, 2, 3]);
    }

    #[test]
    fn zero_policy_only_covers_eigenvector() {
        let engine = GraphSnapshotEngine::with_analytics(
            [("a", "b"), ("a", "c")].into_iter().collect(),
            BrokenCloseness(NetworkAnalytics::default()),
            EigenvectorPolicy::Zero,
        );

        assert!(matches!(
            engine.snapshot(2),
            Err(SnapshotError::Centrality(CentralityError::NotConverged { iterations: 0 }))
        ));
    }

    #[test]
    fn nodes_keep_the_order_they_joined() {
        let engine = engine(&[("c", "b"), ("b", "a"), ("a", "d")]);

        let snapshot = engine.snapshot(3).unwrap();
        let ids: Vec<&str> = snapshot.nodes().iter().map(|node| node.id).collect();

        assert_eq!(ids, vec!["c", "b", "a", "d"]);
        assert_eq!(snapshot.node(&"a").map(|node| node.degree), Some(2.0 / 3.0));
        // "b" and "a" tie, "b" joined first.
        assert_eq!(
            snapshot.top(CentralityKind::Betweenness, 2),
            vec![(&"b", 2.0 / 3.0), (&"a", 2.0 / 3.0)]
        );
    }
}
