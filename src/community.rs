//! Community detection with the Louvain method.
//!
//! Each level greedily moves single nodes to the neighbouring community with the best modularity
//! gain until no move helps, then collapses every community into one node of a weighted graph and
//! starts over. Detection stops once a level moves nothing. Nodes are visited in index order and
//! ties keep the first candidate found, so the result is deterministic.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::graph::GraphIndex;

/// Gains at or below this are treated as noise.
const MIN_GAIN: f64 = 1e-12;

/// A community label for every node of a graph.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Partition<T: Ord> {
    labels: BTreeMap<T, usize>,
    community_count: usize,
    modularity: f64,
}

impl<T: Ord> Partition<T> {
    /// Wraps node labels, expected to be contiguous from zero.
    pub fn new(labels: BTreeMap<T, usize>, modularity: f64) -> Self {
        let community_count = labels.values().max().map_or(0, |max| max + 1);

        Self {
            labels,
            community_count,
            modularity,
        }
    }

    /// Returns the community of `node`, if it is part of the graph.
    pub fn get(&self, node: &T) -> Option<usize> {
        self.labels.get(node).copied()
    }

    pub fn labels(&self) -> &BTreeMap<T, usize> {
        &self.labels
    }

    pub fn community_count(&self) -> usize {
        self.community_count
    }

    /// Newman's modularity of the partition.
    pub fn modularity(&self) -> f64 {
        self.modularity
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// A weighted graph at one level of the aggregation.
#[derive(Debug)]
struct Level {
    /// Weighted neighbours of each node, self-loops excluded.
    adjacency: Vec<Vec<(usize, f64)>>,
    /// Self-loop weight of each node. At the upper levels this is the weight of the edges that
    /// were collapsed into the node.
    loops: Vec<f64>,
}

impl Level {
    fn from_neighbours(neighbours: &[Vec<GraphIndex>]) -> Self {
        let mut adjacency = vec![Vec::new(); neighbours.len()];
        let mut loops = vec![0.0; neighbours.len()];

        for (i, list) in neighbours.iter().enumerate() {
            for &j in list {
                if i == j {
                    loops[i] += 1.0;
                } else {
                    adjacency[i].push((j, 1.0));
                }
            }
        }

        Self { adjacency, loops }
    }

    fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// Weighted degree of each node, self-loops counted twice.
    fn strengths(&self) -> Vec<f64> {
        self.adjacency
            .iter()
            .zip(&self.loops)
            .map(|(neighbours, w_loop)| {
                neighbours.iter().map(|(_, w)| w).sum::<f64>() + 2.0 * w_loop
            })
            .collect()
    }

    /// Moves nodes between communities until a full pass changes nothing. Returns the contiguous
    /// labels, or `None` if every node stayed alone.
    fn move_nodes(&self, resolution: f64, max_passes: usize) -> Option<Vec<usize>> {
        let n = self.len();
        let strengths = self.strengths();
        let m2: f64 = strengths.iter().sum();

        if m2 == 0.0 {
            return None;
        }

        let mut community: Vec<usize> = (0..n).collect();
        let mut totals = strengths.clone();
        let mut moved = false;

        for _ in 0..max_passes {
            let mut improved = false;

            for node in 0..n {
                let current = community[node];
                let ki = strengths[node];

                // Weight towards each neighbouring community, in discovery order.
                let mut order: Vec<usize> = Vec::new();
                let mut weights: HashMap<usize, f64> = HashMap::new();
                for &(neighbour, w) in &self.adjacency[node] {
                    let c = community[neighbour];
                    weights
                        .entry(c)
                        .and_modify(|total| *total += w)
                        .or_insert_with(|| {
                            order.push(c);
                            w
                        });
                }

                // Take the node out before comparing, so staying put is just another candidate.
                totals[current] -= ki;
                let gain = |c: usize, totals: &[f64]| {
                    weights.get(&c).copied().unwrap_or(0.0) - resolution * totals[c] * ki / m2
                };

                let mut best = current;
                let mut best_gain = gain(current, &totals);
                for &candidate in &order {
                    let candidate_gain = gain(candidate, &totals);
                    if candidate != current && candidate_gain > best_gain + MIN_GAIN {
                        best = candidate;
                        best_gain = candidate_gain;
                    }
                }

                totals[best] += ki;
                community[node] = best;

                if best != current {
                    improved = true;
                    moved = true;
                }
            }

            if !improved {
                break;
            }
        }

        moved.then(|| renumber(&community))
    }

    /// Collapses each community into a single node.
    fn aggregate(&self, labels: &[usize], count: usize) -> Self {
        let mut loops = vec![0.0; count];
        let mut weights: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); count];

        for (i, neighbours) in self.adjacency.iter().enumerate() {
            let ci = labels[i];
            loops[ci] += self.loops[i];

            for &(j, w) in neighbours {
                let cj = labels[j];
                if ci == cj {
                    // Every internal edge is listed from both ends.
                    loops[ci] += w / 2.0;
                } else {
                    *weights[ci].entry(cj).or_default() += w;
                }
            }
        }

        let adjacency = weights
            .into_iter()
            .map(|neighbours| neighbours.into_iter().collect())
            .collect();

        Self { adjacency, loops }
    }
}

/// Relabels communities `0..k` in order of first appearance.
fn renumber(community: &[usize]) -> Vec<usize> {
    let mut remap: HashMap<usize, usize> = HashMap::new();

    community
        .iter()
        .map(|c| {
            let next = remap.len();
            *remap.entry(*c).or_insert(next)
        })
        .collect()
}

/// Partitions the nodes described by `neighbours` into communities, returning one contiguous
/// label per node.
///
/// Higher `resolution` favours smaller communities. `max_passes` bounds the node-moving sweeps
/// made at each level.
pub fn louvain(neighbours: &[Vec<GraphIndex>], resolution: f64, max_passes: usize) -> Vec<usize> {
    let mut assignment: Vec<usize> = (0..neighbours.len()).collect();
    let mut level = Level::from_neighbours(neighbours);
    let mut depth = 0;

    while let Some(labels) = level.move_nodes(resolution, max_passes) {
        let count = labels.iter().max().map_or(0, |max| max + 1);

        for community in assignment.iter_mut() {
            *community = labels[*community];
        }

        depth += 1;
        tracing::trace!(depth, communities = count, "louvain level collapsed");

        level = level.aggregate(&labels, count);
    }

    assignment
}

/// Newman's modularity of `labels` on the graph described by `neighbours`.
///
/// Returns 0 for graphs without edges.
pub fn modularity(neighbours: &[Vec<GraphIndex>], labels: &[usize], resolution: f64) -> f64 {
    let level = Level::from_neighbours(neighbours);
    let strengths = level.strengths();
    let m2: f64 = strengths.iter().sum();

    if m2 == 0.0 {
        return 0.0;
    }

    // Ordered so the sum comes out the same on every call.
    let mut internal: BTreeMap<usize, f64> = BTreeMap::new();
    let mut totals: BTreeMap<usize, f64> = BTreeMap::new();

    for (i, neighbours) in level.adjacency.iter().enumerate() {
        let c = labels[i];
        *totals.entry(c).or_default() += strengths[i];
        *internal.entry(c).or_default() += 2.0 * level.loops[i];

        for &(j, w) in neighbours {
            if labels[j] == c {
                *internal.entry(c).or_default() += w;
            }
        }
    }

    totals
        .iter()
        .map(|(c, total)| {
            let inside = internal.get(c).copied().unwrap_or(0.0);
            inside / m2 - resolution * (total / m2).powi(2)
        })
        .sum()
}
