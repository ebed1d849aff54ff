//! Error types.

/// A centrality measure that couldn't be computed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CentralityError {
    /// Power iteration didn't settle within its iteration budget, typically on a graph made of
    /// several components.
    #[error("eigenvector centrality did not converge within {iterations} iterations")]
    NotConverged { iterations: usize },
}

/// An [`AnalyticsConfig`](crate::config::AnalyticsConfig) that can't be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure to produce a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The requested step lies outside `1..=max`.
    #[error("step {step} is outside the sequence range 1..={max}")]
    InvalidStep { step: usize, max: usize },

    #[error(transparent)]
    Centrality(#[from] CentralityError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
