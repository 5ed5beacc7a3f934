//! Max-flow result certification
//!
//! Checks a solved edge list independently of the solver: capacity bounds,
//! conservation at interior vertices, agreement of the reported total with
//! source outflow and sink inflow, and the min-cut certificate (the sink is
//! unreachable in the residual graph and the cut capacity equals the total).

use thiserror::Error;

use crate::data_structures::flow_network::{Flow, FlowEdge, SINK, SOURCE};

/// Ways a claimed maximum flow can fail verification
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VerificationError {
    #[error("edge {edge} references vertex {vertex}, outside 0..{vertex_count}")]
    VertexOutOfRange { edge: usize, vertex: usize, vertex_count: usize },

    #[error("edge {edge} carries flow {flow} outside [0, {capacity}]")]
    CapacityViolated { edge: usize, flow: Flow, capacity: Flow },

    #[error("vertex {vertex} is unbalanced by {imbalance}")]
    ConservationViolated { vertex: usize, imbalance: Flow },

    #[error("reported total {total} but source sends {source_outflow} and sink receives {sink_inflow}")]
    TotalMismatch { total: Flow, source_outflow: Flow, sink_inflow: Flow },

    #[error("an augmenting path from source to sink remains")]
    AugmentingPathRemains,

    #[error("cut capacity {cut_capacity} differs from total {total}")]
    CutMismatch { total: Flow, cut_capacity: Flow },
}

/// Proof of optimality for a verified flow
#[derive(Debug, Clone, PartialEq)]
pub struct FlowCertificate {
    /// Vertices reachable from the source in the residual graph, ascending
    pub source_side: Vec<usize>,
    /// Capacity of the edges leaving `source_side`
    pub cut_capacity: Flow,
}

/// Verifies that `edges` carry a maximum flow of value `total`.
///
/// `tolerance` bounds every floating-point comparison; arcs with residual
/// capacity at or below it count as saturated.
pub fn verify_max_flow(
    edges: &[FlowEdge],
    vertex_count: usize,
    total: Flow,
    tolerance: Flow,
) -> Result<FlowCertificate, VerificationError> {
    let mut net_outflow = vec![0.0; vertex_count];
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); vertex_count];

    for (id, edge) in edges.iter().enumerate() {
        for vertex in [edge.tail, edge.head] {
            if vertex >= vertex_count {
                return Err(VerificationError::VertexOutOfRange {
                    edge: id,
                    vertex,
                    vertex_count,
                });
            }
        }
        if edge.flow < -tolerance || edge.flow > edge.capacity + tolerance {
            return Err(VerificationError::CapacityViolated {
                edge: id,
                flow: edge.flow,
                capacity: edge.capacity,
            });
        }
        if edge.tail == edge.head {
            continue;
        }
        net_outflow[edge.tail] += edge.flow;
        net_outflow[edge.head] -= edge.flow;
        adjacency[edge.tail].push(id);
        adjacency[edge.head].push(id);
    }

    if let Some((vertex, &imbalance)) = net_outflow
        .iter()
        .enumerate()
        .skip(2)
        .find(|(_, imbalance)| imbalance.abs() > tolerance)
    {
        return Err(VerificationError::ConservationViolated { vertex, imbalance });
    }

    let source_outflow = net_outflow[SOURCE];
    let sink_inflow = -net_outflow[SINK];
    if (source_outflow - total).abs() > tolerance || (sink_inflow - total).abs() > tolerance {
        return Err(VerificationError::TotalMismatch {
            total,
            source_outflow,
            sink_inflow,
        });
    }

    let mut reached = vec![false; vertex_count];
    let mut stack = vec![SOURCE];
    reached[SOURCE] = true;
    while let Some(u) = stack.pop() {
        for &id in &adjacency[u] {
            let edge = &edges[id];
            let (next, residual) = if edge.tail == u {
                (edge.head, edge.capacity - edge.flow)
            } else {
                (edge.tail, edge.flow)
            };
            if !reached[next] && residual > tolerance {
                reached[next] = true;
                stack.push(next);
            }
        }
    }
    if reached[SINK] {
        return Err(VerificationError::AugmentingPathRemains);
    }

    let cut_capacity: Flow = edges
        .iter()
        .filter(|e| reached[e.tail] && !reached[e.head])
        .map(|e| e.capacity)
        .sum();
    let slack = tolerance * (edges.len() as Flow + 1.0);
    if (cut_capacity - total).abs() > slack {
        return Err(VerificationError::CutMismatch {
            total,
            cut_capacity,
        });
    }

    Ok(FlowCertificate {
        source_side: reached
            .iter()
            .enumerate()
            .filter_map(|(v, &r)| r.then_some(v))
            .collect(),
        cut_capacity,
    })
}
