//! A module for computing closeness centrality.

use std::collections::VecDeque;

use crate::graph::GraphIndex;

/// Breadth-first search from `index`, returning the sum of the distances to every reachable node
/// and the number of nodes reached, `index` included.
fn distances_from(index: usize, indices: &[Vec<GraphIndex>]) -> (usize, usize) {
    let num_nodes = indices.len();

    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut deltas: Vec<Option<usize>> = vec![None; num_nodes];

    deltas[index] = Some(0);
    queue.push_back(index);

    let mut total_path_length = 0;
    let mut reached = 1;

    while let Some(current) = queue.pop_front() {
        let next_delta = deltas[current].map_or(0, |delta| delta + 1);

        for &neighbour in &indices[current] {
            if deltas[neighbour].is_none() {
                deltas[neighbour] = Some(next_delta);
                total_path_length += next_delta;
                reached += 1;
                queue.push_back(neighbour);
            }
        }
    }

    (total_path_length, reached)
}

/// Computes the closeness of every node from its neighbour lists.
///
/// A node reaching `r` of the `n` nodes (itself included) at a combined distance `d` scores
/// `(r - 1) / d * (r - 1) / (n - 1)`, so nodes stuck in small components rank below nodes of the
/// same local reach in the main component. Nodes that reach nothing score 0.
pub fn compute_closeness(indices: &[Vec<GraphIndex>]) -> Vec<f64> {
    let num_nodes = indices.len();

    (0..num_nodes)
        .map(|index| {
            let (total_path_length, reached) = distances_from(index, indices);

            if total_path_length == 0 || num_nodes <= 1 {
                return 0.0;
            }

            let reachable = (reached - 1) as f64;
            reachable / total_path_length as f64 * reachable / (num_nodes - 1) as f64
        })
        .collect()
}
