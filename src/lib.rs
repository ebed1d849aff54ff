//! Sociogram follows a social network as it grows one friendship at a time, reporting the
//! centrality and community structure of every member at any point of its history.
//!
//! # Basic usage
//!
//! The library is centered around the [`GraphSnapshotEngine`](engine::GraphSnapshotEngine), built
//! from an [`EdgeSequence`](sequence::EdgeSequence). Asking it for step `k` builds the
//! [`Graph`](graph::Graph) of the first `k` edges and computes a [`Snapshot`](snapshot::Snapshot)
//! holding degree, closeness, betweenness and eigenvector centrality plus a Louvain community for
//! each node.
//!
//! ```rust
//! use sociogram::analytics::CentralityKind;
//! use sociogram::engine::GraphSnapshotEngine;
//! use sociogram::sequence::EdgeSequence;
//!
//! let engine = GraphSnapshotEngine::new(EdgeSequence::social_network());
//!
//! // Alice knows Bob and Charlie, who don't know each other yet.
//! let snapshot = engine.snapshot(2).unwrap();
//!
//! let top = snapshot.top(CentralityKind::Betweenness, 1);
//! assert_eq!(top, vec![(&"Alice", 1.0)]);
//! assert_eq!(snapshot.community_count(), 1);
//!
//! // Nodes print with their scores rounded to two decimals.
//! for node in snapshot.nodes() {
//!     println!("{node}");
//! }
//! ```
//!
//! The graph itself can also be used directly:
//!
//! ```rust
//! use sociogram::edge::Edge;
//! use sociogram::graph::Graph;
//!
//! let mut graph: Graph<u32> = [Edge::new(0, 1), Edge::new(1, 2)].into_iter().collect();
//!
//! assert_eq!(graph.degree_centrality()[&1], 1.0);
//! assert!(graph.is_connected());
//! ```

mod betweenness;
mod closeness;
mod eigenvector;

pub mod analytics;
pub mod community;
pub mod config;
pub mod edge;
pub mod engine;
pub mod error;
pub mod graph;
pub mod sequence;
pub mod snapshot;

pub use analytics::{CentralityKind, GraphAnalytics, NetworkAnalytics};
pub use config::{AnalyticsConfig, EigenvectorPolicy};
pub use edge::Edge;
pub use engine::GraphSnapshotEngine;
pub use error::{CentralityError, ConfigError, SnapshotError};
pub use graph::Graph;
pub use sequence::EdgeSequence;
pub use snapshot::{NodeRecord, Snapshot};
