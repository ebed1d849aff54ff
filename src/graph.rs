//! A module for working with graphs.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    fmt::Debug,
    hash::Hash,
};

use nalgebra::DMatrix;

use crate::{
    betweenness::compute_betweenness,
    closeness::compute_closeness,
    community::{self, Partition},
    edge::Edge,
    eigenvector::power_iteration,
    error::CentralityError,
};

/// Position of a node in the graph's sorted index, shared by the matrices and neighbour lists.
pub type GraphIndex = usize;

/// Bounds required of a node label.
pub trait NodeId: Clone + Debug + Eq + Hash + Ord {}

impl<T: Clone + Debug + Eq + Hash + Ord> NodeId for T {}

/// An undirected graph, made up of edges.
#[derive(Clone, Debug)]
pub struct Graph<T> {
    /// The edges in the graph.
    edges: HashSet<Edge<T>>,
    /// A mapping of nodes to their indices, used when constructing the matrices and neighbour
    /// lists representing the graph.
    ///
    /// The `BTreeMap` keeps the index sorted by label so results come out in the same order on
    /// every computation.
    index: Option<BTreeMap<T, GraphIndex>>,
    /// Cache the adjacency matrix when possible.
    adjacency_matrix: Option<DMatrix<f64>>,
    /// Cache the degree matrix when possible.
    degree_matrix: Option<DMatrix<f64>>,
}

impl<T: NodeId> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: NodeId> Graph<T> {
    /// Creates an empty graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use sociogram::graph::Graph;
    ///
    /// let graph: Graph<&str> = Graph::new();
    /// assert_eq!(graph.vertex_count(), 0);
    /// ```
    pub fn new() -> Self {
        Self {
            edges: Default::default(),
            index: None,
            adjacency_matrix: None,
            degree_matrix: None,
        }
    }

    pub fn edges(&self) -> &HashSet<Edge<T>> {
        &self.edges
    }

    /// Inserts an edge into the graph, returning `false` if it was already present in either
    /// orientation.
    pub fn insert(&mut self, edge: Edge<T>) -> bool {
        let is_inserted = self.edges.insert(edge);

        // The cached objects can't be patched from a single new connection.
        if is_inserted && self.index.is_some() {
            self.clear_cache()
        }

        is_inserted
    }

    /// Checks if the graph contains an edge.
    pub fn contains(&self, edge: &Edge<T>) -> bool {
        self.edges.contains(edge)
    }

    /// Returns the node count of the graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use sociogram::edge::Edge;
    /// use sociogram::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("Alice", "Bob"));
    ///
    /// assert_eq!(graph.vertex_count(), 2);
    /// ```
    pub fn vertex_count(&self) -> usize {
        match &self.index {
            Some(index) => index.len(),
            None => self.vertices_from_edges().len(),
        }
    }

    /// Returns the edge count of the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Computes the density of the graph, the ratio of edges with respect to the maximum possible
    /// edges. `NaN` for an empty graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use sociogram::edge::Edge;
    /// use sociogram::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    ///
    /// graph.insert(Edge::new("Alice", "Bob"));
    /// assert_eq!(graph.density(), 1.0);
    ///
    /// graph.insert(Edge::new("Alice", "Charlie"));
    /// assert_eq!(graph.density(), 2.0 / 3.0);
    /// ```
    pub fn density(&self) -> f64 {
        let vc = self.vertex_count() as f64;
        let ec = self.edge_count() as f64;

        let pec = vc * (vc - 1.0) / 2.0;
        ec / pec
    }

    /// Returns the nodes in index order.
    pub fn vertices(&mut self) -> Vec<T> {
        let (index, _) = self.indexed();

        index.keys().cloned().collect()
    }

    /// Constructs the adjacency matrix for this graph. A self-loop sets the diagonal entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::dmatrix;
    /// use sociogram::edge::Edge;
    /// use sociogram::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("Alice", "Bob"));
    /// assert_eq!(
    ///     graph.adjacency_matrix(),
    ///     dmatrix![0.0, 1.0;
    ///              1.0, 0.0]
    /// );
    /// ```
    pub fn adjacency_matrix(&mut self) -> DMatrix<f64> {
        if let Some(matrix) = &self.adjacency_matrix {
            return matrix.clone();
        }

        let (index, edges) = self.indexed();
        let n = index.len();
        let mut matrix = DMatrix::<f64>::zeros(n, n);

        // Both triangles are written since the graph is undirected.
        for edge in edges {
            let i = index[edge.source()];
            let j = index[edge.target()];

            matrix[(i, j)] = 1.0;
            matrix[(j, i)] = 1.0;
        }

        self.adjacency_matrix = Some(matrix.clone());

        matrix
    }

    /// Constructs the degree matrix for this graph. A self-loop adds two to its node's degree.
    pub fn degree_matrix(&mut self) -> DMatrix<f64> {
        if let Some(matrix) = &self.degree_matrix {
            return matrix.clone();
        }

        let adjacency_matrix = self.adjacency_matrix();
        let n = adjacency_matrix.nrows();
        let mut matrix = DMatrix::<f64>::zeros(n, n);

        for (i, row) in adjacency_matrix.row_iter().enumerate() {
            matrix[(i, i)] = row.sum() + adjacency_matrix[(i, i)];
        }

        self.degree_matrix = Some(matrix.clone());

        matrix
    }

    /// Returns the sorted neighbour list of every node, in index order. A self-loop lists the
    /// node once among its own neighbours.
    pub fn neighbours(&mut self) -> Vec<Vec<GraphIndex>> {
        let (index, edges) = self.indexed();
        let mut neighbours = vec![Vec::new(); index.len()];

        for edge in edges {
            let i = index[edge.source()];
            let j = index[edge.target()];

            neighbours[i].push(j);
            if i != j {
                neighbours[j].push(i);
            }
        }

        // The edge set iterates in arbitrary order.
        for list in neighbours.iter_mut() {
            list.sort_unstable();
        }

        neighbours
    }

    /// Returns the number of connected components.
    pub fn component_count(&mut self) -> usize {
        let neighbours = self.neighbours();
        let mut visited = vec![false; neighbours.len()];
        let mut count = 0;

        for start in 0..neighbours.len() {
            if visited[start] {
                continue;
            }

            count += 1;
            visited[start] = true;
            let mut queue = VecDeque::from([start]);

            while let Some(current) = queue.pop_front() {
                for &next in &neighbours[current] {
                    if !visited[next] {
                        visited[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }

        count
    }

    /// Returns whether every node can reach every other node. The empty graph counts as
    /// connected.
    pub fn is_connected(&mut self) -> bool {
        self.component_count() <= 1
    }

    /// Returns a mapping of nodes to their degree divided by `n - 1`, the largest degree
    /// possible in a simple graph. A lone node scores 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use sociogram::edge::Edge;
    /// use sociogram::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("Alice", "Bob"));
    /// graph.insert(Edge::new("Alice", "Charlie"));
    ///
    /// let degree = graph.degree_centrality();
    /// assert_eq!(degree["Alice"], 1.0);
    /// assert_eq!(degree["Bob"], 0.5);
    /// ```
    pub fn degree_centrality(&mut self) -> HashMap<T, f64> {
        let degree_matrix = self.degree_matrix();
        let n = degree_matrix.nrows();

        let scores = degree_matrix
            .diagonal()
            .iter()
            .map(|degree| if n > 1 { degree / (n - 1) as f64 } else { 0.0 })
            .collect();

        self.label(scores)
    }

    /// Returns a mapping of nodes to their closeness centrality, the reciprocal of the mean
    /// distance to the nodes they can reach, scaled by the share of the graph they can reach
    /// (Wasserman and Faust).
    pub fn closeness_centrality(&mut self) -> HashMap<T, f64> {
        let scores = compute_closeness(&self.neighbours());

        self.label(scores)
    }

    /// Returns a mapping of nodes to their normalised betweenness centrality, the fraction of
    /// shortest paths between other pairs of nodes that pass through them.
    pub fn betweenness_centrality(&mut self) -> HashMap<T, f64> {
        let normalize = true;
        let scores = compute_betweenness(&self.neighbours(), normalize);

        self.label(scores)
    }

    /// Returns a mapping of nodes to their eigenvector centrality (the relative importance of
    /// the node), the unit-length principal eigenvector of the adjacency matrix found by power
    /// iteration.
    ///
    /// Fails if the iteration doesn't settle within `max_iterations` steps.
    pub fn eigenvector_centrality(
        &mut self,
        max_iterations: usize,
        tolerance: f64,
    ) -> Result<HashMap<T, f64>, CentralityError> {
        let adjacency_matrix = self.adjacency_matrix();
        let vector = power_iteration(&adjacency_matrix, max_iterations, tolerance)?;

        Ok(self.label(vector.iter().copied().collect()))
    }

    /// Partitions the nodes into communities with the Louvain method.
    pub fn louvain_communities(&mut self, resolution: f64, max_passes: usize) -> Partition<T> {
        let neighbours = self.neighbours();
        let labels = community::louvain(&neighbours, resolution, max_passes);
        let modularity = community::modularity(&neighbours, &labels, resolution);

        Partition::new(self.vertices().into_iter().zip(labels).collect(), modularity)
    }

    //
    // Private
    //

    /// Clears the computed state.
    ///
    /// This should be called every time the set of edges is mutated since the cached state won't
    /// correspond to the new graph.
    fn clear_cache(&mut self) {
        self.index = None;
        self.adjacency_matrix = None;
        self.degree_matrix = None;
    }

    /// Returns the set of unique nodes contained within the set of edges.
    fn vertices_from_edges(&self) -> HashSet<&T> {
        self.edges
            .iter()
            .flat_map(|edge| [edge.source(), edge.target()])
            .collect()
    }

    /// Returns the index, generating it first if needed, alongside the edges it was built from.
    fn indexed(&mut self) -> (&BTreeMap<T, GraphIndex>, &HashSet<Edge<T>>) {
        let edges = &self.edges;
        let index = self.index.get_or_insert_with(|| {
            let vertices: BTreeSet<T> = edges
                .iter()
                .flat_map(|edge| [edge.source(), edge.target()])
                .cloned()
                .collect();

            vertices
                .into_iter()
                .enumerate()
                .map(|(i, vertex)| (vertex, i))
                .collect()
        });

        (&*index, edges)
    }

    /// Pairs per-index scores with their node labels.
    fn label(&mut self, scores: Vec<f64>) -> HashMap<T, f64> {
        let (index, _) = self.indexed();

        index.keys().cloned().zip(scores).collect()
    }
}

impl<T: NodeId> FromIterator<Edge<T>> for Graph<T> {
    fn from_iter<I: IntoIterator<Item = Edge<T>>>(iter: I) -> Self {
        let mut graph = Self::new();
        graph.extend(iter);

        graph
    }
}

impl<T: NodeId> Extend<Edge<T>> for Graph<T> {
    fn extend<I: IntoIterator<Item = Edge<T>>>(&mut self, iter: I) {
        for edge in iter {
            self.insert(edge);
        }
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::dmatrix;

    use super::*;

    macro_rules! graph {
          ($($path:expr),*) => {{
              let mut graph = Graph::new();

              $(
                  let mut iter = $path.into_iter().peekable();
                  while let (Some(a), Some(b)) = (iter.next(), iter.peek()) {
                      graph.insert(Edge::new(a, *b));
                  }

              )*

              graph
          }}
      }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn new() {
        let _: Graph<()> = Graph::new();
    }

    #[test]
    fn insert() {
        let mut graph = Graph::new();

        assert!(graph.insert(Edge::new("a", "b")));
        assert!(!graph.insert(Edge::new("a", "b")));
        assert!(!graph.insert(Edge::new("b", "a")));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn contains() {
        let graph = graph!(["a", "b"]);

        assert!(graph.contains(&Edge::new("a", "b")));
        assert!(graph.contains(&Edge::new("b", "a")));
        assert!(!graph.contains(&Edge::new("b", "c")));
    }

    #[test]
    fn from_iter_collapses_duplicates() {
        let graph: Graph<&str> = [("a", "b"), ("b", "a"), ("a", "c")]
            .into_iter()
            .map(Edge::from)
            .collect();

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.vertex_count(), 3);
    }

    #[test]
    fn vertex_count() {
        let mut graph = Graph::new();
        assert_eq!(graph.vertex_count(), 0);

        graph.insert(Edge::new("a", "b"));
        assert_eq!(graph.vertex_count(), 2);

        graph.insert(Edge::new("a", "c"));
        assert_eq!(graph.vertex_count(), 3);

        // Also correct once the index has been generated.
        graph.adjacency_matrix();
        assert_eq!(graph.vertex_count(), 3);
    }

    #[test]
    fn density() {
        let mut graph = Graph::new();
        assert!(graph.density().is_nan());

        graph.insert(Edge::new("a", "b"));
        assert_eq!(graph.density(), 1.0);

        graph.insert(Edge::new("a", "c"));
        assert_eq!(graph.density(), 2.0 / 3.0);
    }

    #[test]
    fn vertices_are_sorted() {
        let mut graph = graph!(["c", "a", "b"]);

        assert_eq!(graph.vertices(), vec!["a", "b", "c"]);
    }

    #[test]
    fn adjacency_matrix() {
        let mut graph = Graph::new();
        assert_eq!(graph.adjacency_matrix(), dmatrix![]);

        graph.insert(Edge::new("a", "b"));
        assert_eq!(
            graph.adjacency_matrix(),
            dmatrix![0.0, 1.0;
                     1.0, 0.0]
        );

        graph.insert(Edge::new("a", "c"));
        assert_eq!(
            graph.adjacency_matrix(),
            dmatrix![0.0, 1.0, 1.0;
                     1.0, 0.0, 0.0;
                     1.0, 0.0, 0.0]
        );

        assert!(graph.index.is_some());
    }

    #[test]
    fn degree_matrix() {
        let mut graph = graph!(["b", "a", "c"]);

        assert_eq!(
            graph.degree_matrix(),
            dmatrix![1.0, 0.0, 0.0;
                     0.0, 2.0, 0.0;
                     0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn self_loop_counts_twice() {
        let mut graph = graph!(["a", "a", "b"]);

        assert_eq!(
            graph.degree_matrix(),
            dmatrix![3.0, 0.0;
                     0.0, 1.0]
        );
        assert_eq!(graph.neighbours(), vec![vec![0, 1], vec![0]]);
    }

    #[test]
    fn neighbours() {
        let mut graph = graph!(["a", "b", "c"], ["a", "c"]);

        assert_eq!(graph.neighbours(), vec![vec![1, 2], vec![0, 2], vec![0, 1]]);
    }

    #[test]
    fn component_count() {
        let mut graph = Graph::new();
        assert_eq!(graph.component_count(), 0);
        assert!(graph.is_connected());

        graph.insert(Edge::new("a", "b"));
        graph.insert(Edge::new("c", "d"));
        assert_eq!(graph.component_count(), 2);
        assert!(!graph.is_connected());

        graph.insert(Edge::new("b", "c"));
        assert!(graph.is_connected());
    }

    #[test]
    fn degree_centrality() {
        let mut graph = Graph::new();
        assert!(graph.degree_centrality().is_empty());

        let (a, b, c) = ("a", "b", "c");
        graph.insert(Edge::new(a, b));
        let degree_centrality = graph.degree_centrality();

        assert_eq!(degree_centrality.get_key_value(a), Some((&a, &1.0)));
        assert_eq!(degree_centrality.get_key_value(b), Some((&b, &1.0)));
        assert_eq!(degree_centrality.len(), 2);

        graph.insert(Edge::new(a, c));
        let degree_centrality = graph.degree_centrality();

        assert_eq!(degree_centrality.get_key_value(a), Some((&a, &1.0)));
        assert_eq!(degree_centrality.get_key_value(b), Some((&b, &0.5)));
        assert_eq!(degree_centrality.get_key_value(c), Some((&c, &0.5)));
        assert_eq!(degree_centrality.len(), 3);
    }

    #[test]
    fn degree_centrality_of_a_lone_node() {
        let mut graph = graph!(["a", "a"]);

        assert_eq!(graph.degree_centrality()["a"], 0.0);
    }

    #[test]
    fn closeness_centrality() {
        let (a, b, c, d) = ("a", "b", "c", "d");
        let mut graph = graph!([a, b, c, d]);

        let closeness = graph.closeness_centrality();

        assert_eq!(closeness[a], 0.5);
        assert_eq!(closeness[b], 0.75);
        assert_eq!(closeness[c], 0.75);
        assert_eq!(closeness[d], 0.5);
    }

    #[test]
    fn closeness_centrality_penalises_disconnection() {
        let (a, b, c, d) = ("a", "b", "c", "d");
        let mut graph = graph!([a, b], [c, d]);

        let closeness = graph.closeness_centrality();

        for node in [a, b, c, d] {
            assert_close(closeness[node], 1.0 / 3.0);
        }
    }

    #[test]
    fn betweenness_centrality() {
        let (a, b, c, d) = ("a", "b", "c", "d");
        let mut graph = graph!([a, b, c, d]);

        let betweenness_centrality = graph.betweenness_centrality();

        assert_eq!(betweenness_centrality.get_key_value(a), Some((&a, &0.0)));
        assert_close(betweenness_centrality[b], 2.0 / 3.0);
        assert_close(betweenness_centrality[c], 2.0 / 3.0);
        assert_eq!(betweenness_centrality.get_key_value(d), Some((&d, &0.0)));
    }

    #[test]
    fn betweenness_centrality_of_a_pair() {
        let mut graph = graph!(["a", "b"]);

        assert!(graph.betweenness_centrality().values().all(|&v| v == 0.0));
    }

    #[test]
    fn eigenvector_centrality() {
        let mut graph = Graph::new();
        assert!(graph.eigenvector_centrality(100, 1e-6).unwrap().is_empty());

        let (a, b, c) = ("a", "b", "c");
        graph.insert(Edge::new(a, b));
        let eigenvector_centrality = graph.eigenvector_centrality(100, 1e-6).unwrap();

        assert_close(eigenvector_centrality[a], 1.0 / 2f64.sqrt());
        assert_close(eigenvector_centrality[b], 1.0 / 2f64.sqrt());

        graph.insert(Edge::new(a, c));
        let eigenvector_centrality = graph.eigenvector_centrality(100, 1e-6).unwrap();

        assert_close(eigenvector_centrality[a], 1.0 / 2f64.sqrt());
        assert_close(eigenvector_centrality[b], 0.5);
        assert_close(eigenvector_centrality[c], 0.5);
        assert_eq!(eigenvector_centrality.len(), 3);
    }

    #[test]
    fn eigenvector_centrality_gives_up() {
        let mut graph = graph!(["a", "b", "c"]);

        assert!(matches!(
            graph.eigenvector_centrality(1, 1e-6),
            Err(CentralityError::NotConverged { iterations: 1 })
        ));
    }

    #[test]
    fn louvain_communities() {
        // Two triangles joined by a single bridge.
        let mut graph = graph!(["a", "b", "c", "a"], ["d", "e", "f", "d"], ["c", "d"]);

        let partition = graph.louvain_communities(1.0, 100);

        assert_eq!(partition.community_count(), 2);
        assert_eq!(partition.get(&"a"), partition.get(&"b"));
        assert_eq!(partition.get(&"a"), partition.get(&"c"));
        assert_eq!(partition.get(&"d"), partition.get(&"f"));
        assert_ne!(partition.get(&"a"), partition.get(&"d"));
        assert!(partition.modularity() > 0.0);
    }

    //
    // Private
    //

    #[test]
    fn clear_cache_on_insert() {
        let mut graph = graph!(["a", "b"]);

        // The degree matrix requires the index and the adjacency matrix.
        graph.degree_matrix();

        assert!(graph.index.is_some());
        assert!(graph.adjacency_matrix.is_some());
        assert!(graph.degree_matrix.is_some());

        graph.insert(Edge::new("a", "c"));

        assert!(graph.index.is_none());
        assert!(graph.adjacency_matrix.is_none());
        assert!(graph.degree_matrix.is_none());
    }

    #[test]
    fn keep_cache_on_duplicate_insert() {
        let mut graph = graph!(["a", "b"]);
        graph.degree_matrix();

        graph.insert(Edge::new("b", "a"));

        assert!(graph.index.is_some());
        assert!(graph.degree_matrix.is_some());
    }

    #[test]
    fn vertices_from_edges() {
        let mut graph = Graph::new();
        assert!(graph.vertices_from_edges().is_empty());

        let (a, b) = ("a", "b");
        graph.insert(Edge::new(a, b));

        let vertices = graph.vertices_from_edges();
        assert!(vertices.contains(&a));
        assert!(vertices.contains(&b));
        assert_eq!(vertices.len(), 2);
    }

    #[test]
    fn indexed() {
        let mut graph = Graph::new();

        assert!(graph.indexed().0.is_empty());

        let (a, b) = ("a", "b");
        graph.insert(Edge::new(b, a));

        let (index, _) = graph.indexed();
        assert_eq!(index.get_key_value(a), Some((&a, &0)));
        assert_eq!(index.get_key_value(b), Some((&b, &1)));
        assert_eq!(index.len(), 2);
    }
}
