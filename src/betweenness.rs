//! A module for computing betweenness centrality.

use std::collections::VecDeque;

use crate::graph::GraphIndex;

/// This is an implementation of Ulrik Brandes's
/// A Faster Algorithm for Betweenness Centrality
/// http://snap.stanford.edu/class/cs224w-readings/brandes01centrality.pdf
/// page 10, "Algorithm 1: Betweenness centrality in unweighted graphs"
///
/// Accumulates the dependencies of every node on `index` into `betweenness_count`.
fn betweenness_for_node(
    index: usize,
    indices: &[Vec<GraphIndex>],
    betweenness_count: &mut [f64],
) {
    let num_nodes = indices.len();

    let mut sigma: Vec<f64> = vec![0.0; num_nodes];
    let mut distance: Vec<Option<usize>> = vec![None; num_nodes];
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); num_nodes];
    let mut delta: Vec<f64> = vec![0.0; num_nodes];
    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut stack: Vec<usize> = Vec::with_capacity(num_nodes);

    sigma[index] = 1.0;
    distance[index] = Some(0);
    queue.push_back(index);

    while let Some(v) = queue.pop_front() {
        stack.push(v);
        let next = distance[v].map_or(0, |d| d + 1);

        for &w in &indices[v] {
            if distance[w].is_none() {
                distance[w] = Some(next);
                queue.push_back(w);
            }
            if distance[w] == Some(next) {
                sigma[w] += sigma[v];
                predecessors[w].push(v);
            }
        }
    }

    while let Some(w) = stack.pop() {
        for &v in &predecessors[w] {
            delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
        }
        if w != index {
            betweenness_count[w] += delta[w];
        }
    }
}

/// Computes the betweenness of every node from its neighbour lists.
///
/// Each pair is visited from both ends, so raw counts are halved. Normalisation further scales
/// by the number of pairs excluding the node, `(n - 1)(n - 2) / 2`; graphs of two nodes or fewer
/// have no such pairs and score 0 everywhere.
pub fn compute_betweenness(indices: &[Vec<GraphIndex>], normalize: bool) -> Vec<f64> {
    let num_nodes = indices.len();

    let mut betweenness_count: Vec<f64> = vec![0.0; num_nodes];

    if num_nodes <= 2 {
        return betweenness_count;
    }

    for index in 0..num_nodes {
        betweenness_for_node(index, indices, &mut betweenness_count);
    }

    let divisor: f64 = if normalize {
        ((num_nodes - 1) * (num_nodes - 2)) as f64
    } else {
        2.0
    };

    for count in betweenness_count.iter_mut() {
        *count /= divisor;
    }

    betweenness_count
}
