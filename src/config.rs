//! Tuning parameters for the analytics.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What a snapshot does when eigenvector centrality fails to converge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EigenvectorPolicy {
    /// Fail the whole snapshot with the centrality error.
    #[default]
    Propagate,
    /// Score every node 0 and flag the snapshot as not converged.
    Zero,
}

/// Parameters of the centrality and community algorithms.
///
/// Every field has a default, so a JSON document only needs the fields it changes:
///
/// ```
/// use sociogram::config::{AnalyticsConfig, EigenvectorPolicy};
///
/// let config = AnalyticsConfig::from_json(r#"{ "eigenvector_policy": "zero" }"#).unwrap();
/// assert_eq!(config.eigenvector_policy, EigenvectorPolicy::Zero);
/// assert_eq!(config.eigenvector_max_iterations, 100);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Power iteration budget (default: 100)
    pub eigenvector_max_iterations: usize,
    /// Per-node convergence tolerance of the power iteration (default: 1e-6)
    pub eigenvector_tolerance: f64,
    /// Handling of a power iteration that runs out of budget (default: propagate)
    pub eigenvector_policy: EigenvectorPolicy,
    /// Louvain resolution, higher values give smaller communities (default: 1.0)
    pub louvain_resolution: f64,
    /// Node-moving sweeps allowed per Louvain level (default: 100)
    pub louvain_max_passes: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            eigenvector_max_iterations: 100,
            eigenvector_tolerance: 1e-6,
            eigenvector_policy: EigenvectorPolicy::Propagate,
            louvain_resolution: 1.0,
            louvain_max_passes: 100,
        }
    }
}

impl AnalyticsConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.eigenvector_max_iterations == 0 {
            return Err(ConfigError::InvalidParameter(
                "eigenvector_max_iterations must be > 0".to_string(),
            ));
        }
        if !self.eigenvector_tolerance.is_finite() || self.eigenvector_tolerance <= 0.0 {
            return Err(ConfigError::InvalidParameter(
                "eigenvector_tolerance must be finite and > 0".to_string(),
            ));
        }
        if !self.louvain_resolution.is_finite() || self.louvain_resolution <= 0.0 {
            return Err(ConfigError::InvalidParameter(
                "louvain_resolution must be finite and > 0".to_string(),
            ));
        }
        if self.louvain_max_passes == 0 {
            return Err(ConfigError::InvalidParameter(
                "louvain_max_passes must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
