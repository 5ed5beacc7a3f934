//! Maximum flow over capacitated directed graphs
//!
//! The engine takes a list of [`FlowEdge`] records over dense vertex ids,
//! with vertex `0` as the source and vertex `1` as the sink, and computes a
//! maximum flow by repeatedly augmenting along residual paths. Flows are
//! written back into the caller's records in place.
//!
//! ```
//! use maxflow_core::{compute_max_flow, FlowEdge};
//!
//! let mut edges = vec![
//!     FlowEdge::new(0, 2, 10.0),
//!     FlowEdge::new(2, 3, 3.0),
//!     FlowEdge::new(3, 1, 10.0),
//! ];
//! let total = compute_max_flow(&mut edges, 4).unwrap();
//! assert_eq!(total, 3.0);
//! assert_eq!(edges[1].flow, 3.0);
//! ```
//!
//! - [`algorithm`] holds the search, update and driver loop together with
//!   solver configuration.
//! - [`data_structures`] holds the residual network and the fixed-size edge
//!   index.
//! - [`flow_graph`] maps arbitrary vertex names onto the engine.
//! - [`validation`] certifies a solved flow independently of the solver.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod data_structures;
pub mod execution;
pub mod flow_graph;
pub mod validation;

pub use algorithm::config::{MaxFlowAlgorithm, SelfLoopPolicy, SolverConfig};
pub use algorithm::graph::max_flow::{
    compute_max_flow, FlowError, FlowMetrics, MaxFlowResult, MaxFlowSolver,
};
pub use algorithm::traits::{Algorithm, AlgorithmError};
pub use data_structures::flow_network::{Capacity, Flow, FlowEdge, SINK, SOURCE};
pub use flow_graph::{FlowGraph, VertexMap};
