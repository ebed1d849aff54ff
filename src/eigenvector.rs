//! A module for computing eigenvector centrality by power iteration.

use nalgebra::{DMatrix, DVector};

use crate::error::CentralityError;

/// Iterates `x <- (A + I) x / |(A + I) x|` from the uniform vector until the L1 change between
/// two iterates drops below `n * tolerance`.
///
/// The identity shift keeps bipartite graphs, whose spectrum is symmetric around zero, from
/// oscillating between two vectors forever. Graphs made of several components whose leading
/// eigenvalues are close may still fail to settle in time.
pub fn power_iteration(
    adjacency_matrix: &DMatrix<f64>,
    max_iterations: usize,
    tolerance: f64,
) -> Result<DVector<f64>, CentralityError> {
    let n = adjacency_matrix.nrows();

    if n == 0 {
        return Ok(DVector::zeros(0));
    }

    let mut x = DVector::from_element(n, 1.0 / n as f64);
    let threshold = n as f64 * tolerance;

    for _ in 0..max_iterations {
        let mut next = adjacency_matrix * &x + &x;

        let norm = next.norm();
        if norm > 0.0 {
            next.unscale_mut(norm);
        }

        let change = (&next - &x).lp_norm(1);
        x = next;

        if change < threshold {
            return Ok(x);
        }
    }

    Err(CentralityError::NotConverged {
        iterations: max_iterations,
    })
}
