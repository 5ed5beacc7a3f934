//! Residual flow network
//!
//! A [`FlowNetwork`] borrows the caller's edge records for the duration of one
//! max-flow computation and layers an adjacency structure and an
//! [`EdgeTable`] over them. Residual arcs are never stored as separate
//! records: a [`ResidualArc`] is a view over one edge in one direction, and
//! both directions of an edge read and write the same `flow` field.

use log::{debug, warn};
use serde::{Serialize, Deserialize};

use crate::algorithm::config::SelfLoopPolicy;
use crate::algorithm::graph::max_flow::FlowError;
use crate::data_structures::edge_table::EdgeTable;

/// Flow capacity type
pub type Capacity = f64;

/// Flow value type
pub type Flow = f64;

/// Position of an edge record in the caller's edge slice
pub type EdgeId = usize;

/// Vertex id of the source
pub const SOURCE: usize = 0;

/// Vertex id of the sink
pub const SINK: usize = 1;

/// Capacitated directed edge with its current flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    /// Tail vertex
    pub tail: usize,
    /// Head vertex
    pub head: usize,
    /// Original edge capacity
    pub capacity: Capacity,
    /// Current flow through edge
    pub flow: Flow,
}

impl FlowEdge {
    /// Create new flow edge with specified capacity and zero flow
    pub fn new(tail: usize, head: usize, capacity: Capacity) -> Self {
        Self {
            tail,
            head,
            capacity,
            flow: 0.0,
        }
    }

    /// Residual capacity in the edge's own direction
    #[inline]
    pub fn residual_capacity(&self) -> Capacity {
        self.capacity - self.flow
    }

    /// Residual capacity against the edge's direction
    #[inline]
    pub fn reverse_residual_capacity(&self) -> Capacity {
        self.flow
    }

    pub fn is_self_loop(&self) -> bool {
        self.tail == self.head
    }
}

/// One traversable direction of an edge in the residual graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResidualArc {
    /// `tail -> head`, residual `capacity - flow`
    Forward(EdgeId),
    /// `head -> tail`, residual `flow`; pushing along it cancels flow
    Reverse(EdgeId),
}

impl ResidualArc {
    #[inline]
    pub fn edge(self) -> EdgeId {
        match self {
            Self::Forward(e) | Self::Reverse(e) => e,
        }
    }

    /// Vertex the arc leaves
    #[inline]
    pub fn from(self, edges: &[FlowEdge]) -> usize {
        match self {
            Self::Forward(e) => edges[e].tail,
            Self::Reverse(e) => edges[e].head,
        }
    }

    /// Vertex the arc enters
    #[inline]
    pub fn to(self, edges: &[FlowEdge]) -> usize {
        match self {
            Self::Forward(e) => edges[e].head,
            Self::Reverse(e) => edges[e].tail,
        }
    }

    #[inline]
    pub fn residual(self, edges: &[FlowEdge]) -> Capacity {
        match self {
            Self::Forward(e) => edges[e].residual_capacity(),
            Self::Reverse(e) => edges[e].reverse_residual_capacity(),
        }
    }

    /// Moves `amount` units of flow along the arc.
    ///
    /// `amount` must not exceed [`residual`](Self::residual). When it reaches
    /// the residual the flow is set to the exact bound (`capacity` or `0.0`),
    /// so rounding can never leave `flow` outside `[0, capacity]`.
    pub(crate) fn push(self, edges: &mut [FlowEdge], amount: Flow) {
        match self {
            Self::Forward(e) => {
                let edge = &mut edges[e];
                if amount >= edge.residual_capacity() {
                    edge.flow = edge.capacity;
                } else {
                    edge.flow = (edge.flow + amount).min(edge.capacity);
                }
            }
            Self::Reverse(e) => {
                let edge = &mut edges[e];
                if amount >= edge.flow {
                    edge.flow = 0.0;
                } else {
                    edge.flow = (edge.flow - amount).max(0.0);
                }
            }
        }
    }
}

/// Residual network over a borrowed edge list
#[derive(Debug)]
pub struct FlowNetwork<'a> {
    edges: &'a mut [FlowEdge],
    /// Outgoing residual arcs per vertex, in edge insertion order
    adjacency: Vec<Vec<ResidualArc>>,
    index: EdgeTable,
    tolerance: Capacity,
}

impl<'a> FlowNetwork<'a> {
    /// Validates `edges` and builds the residual network.
    ///
    /// Validation runs over the whole list before any record is touched; on
    /// error the caller's edges are unchanged. On success every `flow` is
    /// reset to `0.0`.
    pub fn build(
        edges: &'a mut [FlowEdge],
        vertex_count: usize,
        self_loops: SelfLoopPolicy,
        tolerance: Capacity,
    ) -> Result<Self, FlowError> {
        if vertex_count < 2 || vertex_count > u32::MAX as usize {
            return Err(FlowError::InvalidVertexCount { vertex_count });
        }

        let mut index = EdgeTable::with_capacity(edges.len());
        for (id, edge) in edges.iter().enumerate() {
            validate_edge(id, edge, vertex_count, self_loops)?;
            if !index.insert(edge.tail, edge.head, id)? {
                return Err(FlowError::DuplicateEdge {
                    edge: id,
                    tail: edge.tail,
                    head: edge.head,
                });
            }
        }

        let mut adjacency = vec![Vec::new(); vertex_count];
        let mut ignored = 0usize;
        for (id, edge) in edges.iter_mut().enumerate() {
            edge.flow = 0.0;
            if edge.is_self_loop() {
                ignored += 1;
                continue;
            }
            adjacency[edge.tail].push(ResidualArc::Forward(id));
            adjacency[edge.head].push(ResidualArc::Reverse(id));
        }

        if ignored > 0 {
            warn!("ignoring {} self-loop edge(s)", ignored);
        }
        debug!(
            "built flow network: {} vertices, {} edges, {} index slots",
            vertex_count,
            edges.len(),
            index.capacity()
        );

        Ok(Self {
            edges,
            adjacency,
            index,
            tolerance,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[FlowEdge] {
        &*self.edges
    }

    pub(crate) fn edges_mut(&mut self) -> &mut [FlowEdge] {
        &mut *self.edges
    }

    /// All residual arcs leaving `vertex`, traversable or not
    pub fn arcs(&self, vertex: usize) -> &[ResidualArc] {
        &self.adjacency[vertex]
    }

    /// Whether `arc` has residual capacity above the tolerance
    #[inline]
    pub fn is_traversable(&self, arc: ResidualArc) -> bool {
        arc.residual(self.edges()) > self.tolerance
    }

    /// Edge record for the ordered pair, if one exists
    pub fn find_edge(&self, tail: usize, head: usize) -> Option<&FlowEdge> {
        self.index.get(tail, head).map(|id| &self.edges[id])
    }

    /// Flow on the edge `tail -> head`, `0.0` if there is none
    pub fn flow_between(&self, tail: usize, head: usize) -> Flow {
        self.find_edge(tail, head).map_or(0.0, |edge| edge.flow)
    }

    /// Net flow leaving `vertex`
    pub fn net_outflow(&self, vertex: usize) -> Flow {
        self.adjacency[vertex]
            .iter()
            .map(|arc| match *arc {
                ResidualArc::Forward(e) => self.edges[e].flow,
                ResidualArc::Reverse(e) => -self.edges[e].flow,
            })
            .sum()
    }

    /// Vertices reachable from the source through traversable arcs, ascending.
    ///
    /// After the last augmentation this is the source side of a minimum cut.
    pub fn source_side(&self) -> Vec<usize> {
        let mut reached = vec![false; self.vertex_count()];
        let mut stack = vec![SOURCE];
        reached[SOURCE] = true;

        while let Some(u) = stack.pop() {
            for &arc in self.arcs(u) {
                let v = arc.to(self.edges());
                if !reached[v] && self.is_traversable(arc) {
                    reached[v] = true;
                    stack.push(v);
                }
            }
        }

        reached
            .iter()
            .enumerate()
            .filter_map(|(v, &r)| r.then_some(v))
            .collect()
    }

    /// Sets every flow back to zero
    pub fn reset_flows(&mut self) {
        for edge in self.edges.iter_mut() {
            edge.flow = 0.0;
        }
    }
}

fn validate_edge(
    id: EdgeId,
    edge: &FlowEdge,
    vertex_count: usize,
    self_loops: SelfLoopPolicy,
) -> Result<(), FlowError> {
    for vertex in [edge.tail, edge.head] {
        if vertex >= vertex_count {
            return Err(FlowError::VertexOutOfRange {
                edge: id,
                vertex,
                vertex_count,
            });
        }
    }
    if !edge.capacity.is_finite() || edge.capacity < 0.0 {
        return Err(FlowError::InvalidCapacity {
            edge: id,
            capacity: edge.capacity,
        });
    }
    if edge.is_self_loop() && self_loops == SelfLoopPolicy::Reject {
        return Err(FlowError::SelfLoop {
            edge: id,
            vertex: edge.tail,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Vec<FlowEdge> {
        vec![
            FlowEdge::new(0, 2, 10.0),
            FlowEdge::new(2, 3, 3.0),
            FlowEdge::new(3, 1, 10.0),
        ]
    }

    #[test]
    fn test_flow_edge_creation() {
        let edge = FlowEdge::new(0, 1, 10.0);
        assert_eq!(edge.tail, 0);
        assert_eq!(edge.head, 1);
        assert_eq!(edge.capacity, 10.0);
        assert_eq!(edge.flow, 0.0);
        assert_eq!(edge.residual_capacity(), 10.0);
        assert_eq!(edge.reverse_residual_capacity(), 0.0);
    }

    #[test]
    fn test_adjacency_preserves_insertion_order() {
        let mut edges = vec![
            FlowEdge::new(0, 3, 1.0),
            FlowEdge::new(0, 2, 1.0),
            FlowEdge::new(2, 1, 1.0),
        ];
        let network = FlowNetwork::build(&mut edges, 4, SelfLoopPolicy::Reject, 0.0).unwrap();

        assert_eq!(network.arcs(0), &[ResidualArc::Forward(0), ResidualArc::Forward(1)]);
        assert_eq!(network.arcs(2), &[ResidualArc::Reverse(1), ResidualArc::Forward(2)]);
        assert_eq!(network.arcs(1), &[ResidualArc::Reverse(2)]);
        assert_eq!(network.arcs(3), &[ResidualArc::Reverse(0)]);
    }

    #[test]
    fn test_reverse_arcs_start_saturated() {
        let mut edges = chain();
        let network = FlowNetwork::build(&mut edges, 4, SelfLoopPolicy::Reject, 0.0).unwrap();

        assert!(network.is_traversable(ResidualArc::Forward(1)));
        assert!(!network.is_traversable(ResidualArc::Reverse(1)));
    }

    #[test]
    fn test_arc_push_respects_bounds() {
        let mut edges = vec![FlowEdge::new(0, 1, 0.3)];
        ResidualArc::Forward(0).push(&mut edges, 0.1);
        ResidualArc::Forward(0).push(&mut edges, 0.2);
        assert_eq!(edges[0].flow, 0.3);
        assert_eq!(ResidualArc::Forward(0).residual(&edges), 0.0);

        ResidualArc::Reverse(0).push(&mut edges, 0.3);
        assert_eq!(edges[0].flow, 0.0);
    }

    #[test]
    fn test_arc_endpoints() {
        let edges = vec![FlowEdge::new(4, 7, 1.0)];
        assert_eq!(ResidualArc::Forward(0).from(&edges), 4);
        assert_eq!(ResidualArc::Forward(0).to(&edges), 7);
        assert_eq!(ResidualArc::Reverse(0).from(&edges), 7);
        assert_eq!(ResidualArc::Reverse(0).to(&edges), 4);
        assert_eq!(ResidualArc::Reverse(0).edge(), 0);
    }

    #[test]
    fn test_build_resets_flows() {
        let mut edges = chain();
        edges[1].flow = 2.0;
        let network = FlowNetwork::build(&mut edges, 4, SelfLoopPolicy::Reject, 0.0).unwrap();

        assert_eq!(network.flow_between(2, 3), 0.0);
        assert_eq!(network.flow_between(3, 2), 0.0);
        assert_eq!(network.find_edge(2, 3).map(|e| e.capacity), Some(3.0));
        assert!(network.find_edge(3, 2).is_none());
    }

    #[test]
    fn test_rejects_vertex_count() {
        let mut edges: Vec<FlowEdge> = Vec::new();
        assert!(matches!(
            FlowNetwork::build(&mut edges, 1, SelfLoopPolicy::Reject, 0.0),
            Err(FlowError::InvalidVertexCount { vertex_count: 1 })
        ));
    }

    #[test]
    fn test_rejects_out_of_range_vertex() {
        let mut edges = vec![FlowEdge::new(0, 2, 1.0), FlowEdge::new(2, 4, 1.0)];
        edges[0].flow = 0.5;
        let err = FlowNetwork::build(&mut edges, 4, SelfLoopPolicy::Reject, 0.0).unwrap_err();

        assert!(matches!(
            err,
            FlowError::VertexOutOfRange { edge: 1, vertex: 4, vertex_count: 4 }
        ));
        // nothing was touched
        assert_eq!(edges[0].flow, 0.5);
    }

    #[test]
    fn test_rejects_bad_capacity() {
        for capacity in [-1.0, f64::NAN, f64::INFINITY] {
            let mut edges = vec![FlowEdge::new(0, 1, capacity)];
            assert!(matches!(
                FlowNetwork::build(&mut edges, 2, SelfLoopPolicy::Reject, 0.0),
                Err(FlowError::InvalidCapacity { edge: 0, .. })
            ));
        }
    }

    #[test]
    fn test_rejects_duplicate_pair() {
        let mut edges = vec![FlowEdge::new(0, 1, 4.0), FlowEdge::new(0, 1, 6.0)];
        assert!(matches!(
            FlowNetwork::build(&mut edges, 2, SelfLoopPolicy::Reject, 0.0),
            Err(FlowError::DuplicateEdge { edge: 1, tail: 0, head: 1 })
        ));
    }

    #[test]
    fn test_opposite_edges_are_distinct() {
        let mut edges = vec![FlowEdge::new(0, 2, 4.0), FlowEdge::new(2, 0, 6.0)];
        assert!(FlowNetwork::build(&mut edges, 3, SelfLoopPolicy::Reject, 0.0).is_ok());
    }

    #[test]
    fn test_self_loop_policy() {
        let mut edges = vec![FlowEdge::new(2, 2, 1.0), FlowEdge::new(0, 1, 1.0)];
        assert!(matches!(
            FlowNetwork::build(&mut edges, 3, SelfLoopPolicy::Reject, 0.0),
            Err(FlowError::SelfLoop { edge: 0, vertex: 2 })
        ));

        let network = FlowNetwork::build(&mut edges, 3, SelfLoopPolicy::Ignore, 0.0).unwrap();
        assert!(network.arcs(2).is_empty());
        assert_eq!(network.find_edge(2, 2).map(|e| e.capacity), Some(1.0));
    }

    #[test]
    fn test_source_side_of_fresh_network() {
        let mut edges = chain();
        let network = FlowNetwork::build(&mut edges, 4, SelfLoopPolicy::Reject, 0.0).unwrap();
        assert_eq!(network.source_side(), vec![0, 1, 2, 3]);
        assert_eq!(network.net_outflow(SOURCE), 0.0);
    }
}
