//! Solver configuration
//!
//! `SolverConfig` is plain serde data: every field has a default, so an empty
//! JSON object is a valid configuration.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};

use crate::algorithm::traits::AlgorithmError;

/// Augmenting path selection rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFlowAlgorithm {
    /// Ford-Fulkerson with DFS path finding
    FordFulkerson,
    /// Edmonds-Karp with BFS shortest augmenting paths
    #[default]
    EdmondsKarp,
}

impl MaxFlowAlgorithm {
    pub const ALL: [MaxFlowAlgorithm; 2] = [Self::FordFulkerson, Self::EdmondsKarp];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FordFulkerson => "ford_fulkerson",
            Self::EdmondsKarp => "edmonds_karp",
        }
    }
}

impl fmt::Display for MaxFlowAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaxFlowAlgorithm {
    type Err = AlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.as_str() == s)
            .ok_or_else(|| AlgorithmError::invalid_parameter(
                "algorithm",
                format!("unknown algorithm '{}'", s),
            ))
    }
}

/// What the network builder does with an edge whose tail equals its head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfLoopPolicy {
    /// Fail construction
    #[default]
    Reject,
    /// Keep the record with zero flow but leave it out of the residual graph
    Ignore,
}

impl SelfLoopPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Ignore => "ignore",
        }
    }
}

impl fmt::Display for SelfLoopPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelfLoopPolicy {
    type Err = AlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reject" => Ok(Self::Reject),
            "ignore" => Ok(Self::Ignore),
            other => Err(AlgorithmError::invalid_parameter(
                "self_loops",
                format!("expected 'reject' or 'ignore', got '{}'", other),
            )),
        }
    }
}

/// Configuration for [`MaxFlowSolver`](crate::algorithm::graph::max_flow::MaxFlowSolver)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Path selection rule
    pub algorithm: MaxFlowAlgorithm,
    /// Self-loop handling during construction
    pub self_loops: SelfLoopPolicy,
    /// Arcs with residual capacity at or below this value are saturated
    pub tolerance: f64,
    /// Keep every applied augmenting path
    pub record_history: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            algorithm: MaxFlowAlgorithm::EdmondsKarp,
            self_loops: SelfLoopPolicy::Reject,
            tolerance: 0.0,
            record_history: false,
        }
    }
}

impl SolverConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, AlgorithmError> {
        let config: SolverConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AlgorithmError> {
        validate_tolerance(self.tolerance)
    }
}

pub(crate) fn validate_tolerance(tolerance: f64) -> Result<(), AlgorithmError> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(AlgorithmError::invalid_parameter(
            "tolerance",
            format!("must be finite and non-negative, got {}", tolerance),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SolverConfig::default();
        assert_eq!(config.algorithm, MaxFlowAlgorithm::EdmondsKarp);
        assert_eq!(config.self_loops, SelfLoopPolicy::Reject);
        assert_eq!(config.tolerance, 0.0);
        assert!(!config.record_history);
    }

    #[test]
    fn test_empty_json_is_default() {
        let config = SolverConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SolverConfig::default());
    }

    #[test]
    fn test_json_overrides() {
        let config = SolverConfig::from_json_str(
            r#"{"algorithm": "ford_fulkerson", "self_loops": "ignore", "tolerance": 1e-9}"#,
        )
        .unwrap();
        assert_eq!(config.algorithm, MaxFlowAlgorithm::FordFulkerson);
        assert_eq!(config.self_loops, SelfLoopPolicy::Ignore);
        assert_eq!(config.tolerance, 1e-9);
    }

    #[test]
    fn test_json_rejects_bad_input() {
        assert!(matches!(
            SolverConfig::from_json_str(r#"{"tolerance": -1.0}"#),
            Err(AlgorithmError::InvalidParameter { .. })
        ));
        assert!(matches!(
            SolverConfig::from_json_str(r#"{"algorithm": "push_relabel"}"#),
            Err(AlgorithmError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            SolverConfig::from_json_str(r#"{"max_rounds": 3}"#),
            Err(AlgorithmError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_algorithm_from_str() {
        for algorithm in MaxFlowAlgorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<MaxFlowAlgorithm>().unwrap(), algorithm);
        }
        assert!("dinic".parse::<MaxFlowAlgorithm>().is_err());
    }
}
