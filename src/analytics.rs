//! The algorithms a snapshot is assembled from, behind a swappable interface.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{
    community::Partition,
    config::AnalyticsConfig,
    edge::Edge,
    error::{CentralityError, ConfigError},
    graph::{Graph, NodeId},
};

/// The centrality measures reported for every node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CentralityKind {
    Degree,
    Closeness,
    Betweenness,
    Eigenvector,
}

impl CentralityKind {
    pub const ALL: [Self; 4] = [
        Self::Degree,
        Self::Closeness,
        Self::Betweenness,
        Self::Eigenvector,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Degree => "degree",
            Self::Closeness => "closeness",
            Self::Betweenness => "betweenness",
            Self::Eigenvector => "eigenvector",
        }
    }
}

impl fmt::Display for CentralityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Graph construction, centrality and community detection.
///
/// [`GraphSnapshotEngine`](crate::engine::GraphSnapshotEngine) only talks to the algorithms
/// through this trait, so an implementation can be swapped without touching snapshot assembly.
pub trait GraphAnalytics<T: NodeId> {
    /// Builds the graph induced by `edges`. Repeated edges collapse.
    fn build_graph(&self, edges: &[Edge<T>]) -> Graph<T> {
        edges.iter().cloned().collect()
    }

    /// Scores every node of `graph` under `kind`.
    fn centrality(
        &self,
        graph: &mut Graph<T>,
        kind: CentralityKind,
    ) -> Result<HashMap<T, f64>, CentralityError>;

    /// Assigns every node of `graph` to a community.
    fn partition(&self, graph: &mut Graph<T>) -> Partition<T>;
}

/// The bundled implementation: closed-form degree, BFS closeness, Brandes betweenness, power
/// iteration for eigenvector centrality and Louvain communities.
#[derive(Clone, Debug, Default)]
pub struct NetworkAnalytics {
    config: AnalyticsConfig,
}

impl NetworkAnalytics {
    pub fn new(config: AnalyticsConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }
}

impl<T: NodeId> GraphAnalytics<T> for NetworkAnalytics {
    fn centrality(
        &self,
        graph: &mut Graph<T>,
        kind: CentralityKind,
    ) -> Result<HashMap<T, f64>, CentralityError> {
        match kind {
            CentralityKind::Degree => Ok(graph.degree_centrality()),
            CentralityKind::Closeness => Ok(graph.closeness_centrality()),
            CentralityKind::Betweenness => Ok(graph.betweenness_centrality()),
            CentralityKind::Eigenvector => graph.eigenvector_centrality(
                self.config.eigenvector_max_iterations,
                self.config.eigenvector_tolerance,
            ),
        }
    }

    fn partition(&self, graph: &mut Graph<T>) -> Partition<T> {
        graph.louvain_communities(
            self.config.louvain_resolution,
            self.config.louvain_max_passes,
        )
    }
}
