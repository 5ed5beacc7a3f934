//! Maximum flow driver
//!
//! Repeats augmenting path search and flow update until the sink is no longer
//! reachable in the residual graph. At that point the accumulated flow is
//! maximum by the max-flow/min-cut theorem, and the vertices still reachable
//! from the source form the source side of a minimum cut.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::{debug, trace};
use serde::{Serialize, Deserialize};

use crate::algorithm::config::{validate_tolerance, MaxFlowAlgorithm, SelfLoopPolicy, SolverConfig};
use crate::algorithm::graph::augmenting_path::{find_augmenting_path, SearchScratch};
use crate::algorithm::traits::{
    Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmId, AlgorithmParameter,
    AlgorithmProfiler, ParameterConstraints, ParameterType,
};
use crate::data_structures::flow_network::{Flow, FlowEdge, FlowNetwork};
use crate::execution::history::AugmentationHistory;

/// Flow algorithm errors
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("vertex count must be at least 2 and fit in 32 bits, got {vertex_count}")]
    InvalidVertexCount { vertex_count: usize },

    #[error("edge {edge} references vertex {vertex}, outside 0..{vertex_count}")]
    VertexOutOfRange { edge: usize, vertex: usize, vertex_count: usize },

    #[error("edge {edge} has invalid capacity {capacity}")]
    InvalidCapacity { edge: usize, capacity: f64 },

    #[error("edge {edge} is a self-loop on vertex {vertex}")]
    SelfLoop { edge: usize, vertex: usize },

    #[error("edge {edge} duplicates the pair ({tail}, {head})")]
    DuplicateEdge { edge: usize, tail: usize, head: usize },

    #[error("edge index is full ({capacity} slots)")]
    IndexFull { capacity: usize },

    #[error("augmenting path has non-positive bottleneck {bottleneck}")]
    DegeneratePath { bottleneck: f64 },

    #[error("unknown vertex \"{0}\"")]
    UnknownVertex(String),

    #[error("source and sink must be distinct vertices")]
    SourceIsSink,
}

/// Flow algorithm performance metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowMetrics {
    /// Number of augmenting paths applied
    pub augmentations: usize,
    /// Residual arcs inspected by all searches
    pub arcs_scanned: usize,
    /// Wall time of the solve
    pub execution_time_ms: f64,
}

/// Maximum flow result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxFlowResult {
    /// Maximum flow value
    pub max_flow: Flow,
    /// Source side of a minimum cut, ascending
    pub min_cut: Vec<usize>,
    pub metrics: FlowMetrics,
    /// Applied paths, when history recording is enabled
    pub history: Option<AugmentationHistory>,
}

/// Configurable maximum flow solver
#[derive(Debug, Clone, Default)]
pub struct MaxFlowSolver {
    config: SolverConfig,
}

impl MaxFlowSolver {
    pub fn new(algorithm: MaxFlowAlgorithm) -> Self {
        Self::with_config(SolverConfig {
            algorithm,
            ..SolverConfig::default()
        })
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Computes a maximum flow from vertex 0 to vertex 1.
    ///
    /// Every record in `edges` gets its final `flow` written in place. If the
    /// input is rejected, no record is modified.
    pub fn solve(
        &self,
        edges: &mut [FlowEdge],
        vertex_count: usize,
    ) -> Result<MaxFlowResult, FlowError> {
        let mut profiler = AlgorithmProfiler::new();
        profiler.start();

        let mut network = FlowNetwork::build(
            edges,
            vertex_count,
            self.config.self_loops,
            self.config.tolerance,
        )?;
        let mut scratch = SearchScratch::new(vertex_count);
        let mut history = self.config.record_history.then(AugmentationHistory::new);
        let mut max_flow: Flow = 0.0;

        while let Some(path) = find_augmenting_path(&network, self.config.algorithm, &mut scratch) {
            let bottleneck = match path.augment(&mut network) {
                Ok(bottleneck) => bottleneck,
                Err(err) => {
                    network.reset_flows();
                    return Err(err);
                }
            };
            max_flow += bottleneck;
            profiler.record_step();
            trace!(
                "augmentation {}: {} arcs, bottleneck {}, total {}",
                profiler.get_metrics().steps_executed,
                path.len(),
                bottleneck,
                max_flow
            );
            if let Some(history) = history.as_mut() {
                history.record(path.vertices(&network), bottleneck);
            }
        }

        let min_cut = network.source_side();
        profiler.record_node_exploration(scratch.arcs_scanned());
        profiler.stop();

        let profile = profiler.get_metrics();
        let metrics = FlowMetrics {
            augmentations: profile.steps_executed,
            arcs_scanned: profile.nodes_explored,
            execution_time_ms: profile.execution_time.as_secs_f64() * 1000.0,
        };
        debug!(
            "{} finished: max flow {} after {} augmentations ({} arcs scanned)",
            self.name(),
            max_flow,
            metrics.augmentations,
            metrics.arcs_scanned
        );

        Ok(MaxFlowResult {
            max_flow,
            min_cut,
            metrics,
            history,
        })
    }
}

/// Computes the maximum flow with the default Edmonds-Karp configuration.
///
/// Vertex `0` is the source and vertex `1` the sink. Each edge's `flow` is
/// updated in place.
pub fn compute_max_flow(edges: &mut [FlowEdge], vertex_count: usize) -> Result<Flow, FlowError> {
    MaxFlowSolver::default()
        .solve(edges, vertex_count)
        .map(|result| result.max_flow)
}

fn parse_bool(name: &str, value: &str) -> Result<bool, AlgorithmError> {
    value
        .parse::<bool>()
        .map_err(|_| AlgorithmError::invalid_parameter(name, "must be true or false"))
}

impl Algorithm for MaxFlowSolver {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::new(self.config.algorithm.as_str())
    }

    fn name(&self) -> &'static str {
        match self.config.algorithm {
            MaxFlowAlgorithm::FordFulkerson => "Ford-Fulkerson",
            MaxFlowAlgorithm::EdmondsKarp => "Edmonds-Karp",
        }
    }

    fn category(&self) -> &'static str {
        "max_flow"
    }

    fn description(&self) -> String {
        match self.config.algorithm {
            MaxFlowAlgorithm::FordFulkerson => {
                "Augmenting path maximum flow with depth-first path selection.".to_string()
            }
            MaxFlowAlgorithm::EdmondsKarp => {
                "Augmenting path maximum flow with breadth-first shortest paths, \
                 bounded by O(V * E) augmentations."
                    .to_string()
            }
        }
    }

    fn complexity(&self) -> AlgorithmComplexity {
        let time_complexity = match self.config.algorithm {
            MaxFlowAlgorithm::FordFulkerson => "O(E * f)",
            MaxFlowAlgorithm::EdmondsKarp => "O(V * E^2)",
        };
        AlgorithmComplexity {
            time_complexity: time_complexity.to_string(),
            space_complexity: "O(V + E)".to_string(),
        }
    }

    fn parameters(&self) -> Vec<AlgorithmParameter> {
        vec![
            AlgorithmParameter {
                name: "algorithm".to_string(),
                value: self.config.algorithm.to_string(),
                value_type: ParameterType::Enum(
                    MaxFlowAlgorithm::ALL.iter().map(|a| a.to_string()).collect(),
                ),
                constraints: None,
            },
            AlgorithmParameter {
                name: "self_loops".to_string(),
                value: self.config.self_loops.to_string(),
                value_type: ParameterType::Enum(vec!["reject".to_string(), "ignore".to_string()]),
                constraints: None,
            },
            AlgorithmParameter {
                name: "tolerance".to_string(),
                value: self.config.tolerance.to_string(),
                value_type: ParameterType::Float,
                constraints: Some(ParameterConstraints {
                    min: Some(0.0),
                    max: None,
                    allowed_values: None,
                }),
            },
            AlgorithmParameter {
                name: "record_history".to_string(),
                value: self.config.record_history.to_string(),
                value_type: ParameterType::Boolean,
                constraints: None,
            },
        ]
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        match name {
            "algorithm" => {
                self.config.algorithm = value.parse::<MaxFlowAlgorithm>()?;
            }
            "self_loops" => {
                self.config.self_loops = value.parse::<SelfLoopPolicy>()?;
            }
            "tolerance" => {
                let tolerance = value
                    .parse::<f64>()
                    .map_err(|_| AlgorithmError::invalid_parameter(name, "must be a number"))?;
                validate_tolerance(tolerance)?;
                self.config.tolerance = tolerance;
            }
            "record_history" => {
                self.config.record_history = parse_bool(name, value)?;
            }
            _ => {
                return Err(AlgorithmError::invalid_parameter(name, "unknown parameter"));
            }
        }
        Ok(())
    }

    fn get_parameter(&self, name: &str) -> Option<String> {
        self.parameters()
            .into_iter()
            .find(|p| p.name == name)
            .map(|p| p.value)
    }
}
