//! Name-keyed flow graph
//!
//! [`FlowGraph`] lets callers name vertices with any hashable value. Names are
//! translated to dense ids through a [`VertexMap`], with the source fixed at
//! id `0` and the sink at id `1`, and the edge list is handed to the solver
//! as-is. Repeated `(tail, head)` submissions are merged here, so the solver
//! only ever sees unique pairs.

use std::fmt::Debug;
use std::hash::Hash;

use fxhash::FxHashMap;

use crate::algorithm::graph::max_flow::{FlowError, MaxFlowResult, MaxFlowSolver};
use crate::data_structures::flow_network::{Capacity, Flow, FlowEdge, SINK, SOURCE};

/// Ordered bijection between caller names and dense vertex ids
#[derive(Debug, Clone)]
pub struct VertexMap<V> {
    names: Vec<V>,
    ids: FxHashMap<V, usize>,
}

impl<V: Eq + Hash + Clone> VertexMap<V> {
    /// Reserves id `0` for `source` and id `1` for `sink`.
    pub fn new(source: V, sink: V) -> Result<Self, FlowError> {
        if source == sink {
            return Err(FlowError::SourceIsSink);
        }
        let mut map = Self {
            names: Vec::new(),
            ids: FxHashMap::default(),
        };
        map.id_or_insert(source);
        map.id_or_insert(sink);
        Ok(map)
    }

    /// Id of `name`, assigning the next free id on first sight
    pub fn id_or_insert(&mut self, name: V) -> usize {
        if let Some(&id) = self.ids.get(&name) {
            return id;
        }
        let id = self.names.len();
        self.names.push(name.clone());
        self.ids.insert(name, id);
        id
    }

    pub fn id(&self, name: &V) -> Option<usize> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: usize) -> Option<&V> {
        self.names.get(id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Flow graph over caller-named vertices
#[derive(Debug, Clone)]
pub struct FlowGraph<V> {
    vertices: VertexMap<V>,
    edges: Vec<FlowEdge>,
    edge_ids: FxHashMap<(usize, usize), usize>,
    solver: MaxFlowSolver,
    result: Option<MaxFlowResult>,
}

impl<V: Eq + Hash + Clone + Debug> FlowGraph<V> {
    /// Creates an empty graph with the given source and sink names.
    pub fn new(source: V, sink: V) -> Result<Self, FlowError> {
        Ok(Self {
            vertices: VertexMap::new(source, sink)?,
            edges: Vec::new(),
            edge_ids: FxHashMap::default(),
            solver: MaxFlowSolver::default(),
            result: None,
        })
    }

    /// Replaces the solver used by [`calculate_max_flow`](Self::calculate_max_flow).
    pub fn with_solver(mut self, solver: MaxFlowSolver) -> Self {
        self.solver = solver;
        self
    }

    /// Adds an edge `tail -> head`.
    ///
    /// If the pair already has an edge, its capacity is replaced, or with
    /// `increase_if_exists` the new capacity is added to it. Any previous
    /// result is discarded either way.
    pub fn add_edge(&mut self, tail: V, head: V, capacity: Capacity, increase_if_exists: bool) {
        let tail = self.vertices.id_or_insert(tail);
        let head = self.vertices.id_or_insert(head);
        self.result = None;

        match self.edge_ids.get(&(tail, head)).copied() {
            Some(id) => {
                let edge = &mut self.edges[id];
                if increase_if_exists {
                    edge.capacity += capacity;
                } else {
                    edge.capacity = capacity;
                }
                edge.flow = 0.0;
            }
            None => {
                self.edge_ids.insert((tail, head), self.edges.len());
                self.edges.push(FlowEdge::new(tail, head, capacity));
            }
        }
    }

    /// Runs the solver and returns the maximum flow value.
    pub fn calculate_max_flow(&mut self) -> Result<Flow, FlowError> {
        let result = self.solver.solve(&mut self.edges, self.vertices.len())?;
        let max_flow = result.max_flow;
        self.result = Some(result);
        Ok(max_flow)
    }

    /// Result of the last successful [`calculate_max_flow`](Self::calculate_max_flow)
    pub fn result(&self) -> Option<&MaxFlowResult> {
        self.result.as_ref()
    }

    /// Source-side vertex names of the minimum cut from the last solve
    pub fn min_cut(&self) -> Option<Vec<&V>> {
        self.result.as_ref().map(|result| {
            result
                .min_cut
                .iter()
                .filter_map(|&id| self.vertices.name(id))
                .collect()
        })
    }

    fn vertex_id(&self, name: &V) -> Result<usize, FlowError> {
        self.vertices
            .id(name)
            .ok_or_else(|| FlowError::UnknownVertex(format!("{:?}", name)))
    }

    fn edge(&self, tail: &V, head: &V) -> Result<Option<&FlowEdge>, FlowError> {
        let key = (self.vertex_id(tail)?, self.vertex_id(head)?);
        Ok(self.edge_ids.get(&key).map(|&id| &self.edges[id]))
    }

    /// Flow from `tail` to `head`, `0.0` if there is no such edge
    pub fn flow(&self, tail: &V, head: &V) -> Result<Flow, FlowError> {
        Ok(self.edge(tail, head)?.map_or(0.0, |edge| edge.flow))
    }

    /// Capacity from `tail` to `head`, `0.0` if there is no such edge
    pub fn capacity(&self, tail: &V, head: &V) -> Result<Capacity, FlowError> {
        Ok(self.edge(tail, head)?.map_or(0.0, |edge| edge.capacity))
    }

    /// Heads of the edges leaving `vertex`, in insertion order
    pub fn vertices_from(&self, vertex: &V) -> Result<Vec<&V>, FlowError> {
        let id = self.vertex_id(vertex)?;
        Ok(self
            .edges
            .iter()
            .filter(|edge| edge.tail == id)
            .filter_map(|edge| self.vertices.name(edge.head))
            .collect())
    }

    /// Tails of the edges entering `vertex`, in insertion order
    pub fn vertices_to(&self, vertex: &V) -> Result<Vec<&V>, FlowError> {
        let id = self.vertex_id(vertex)?;
        Ok(self
            .edges
            .iter()
            .filter(|edge| edge.head == id)
            .filter_map(|edge| self.vertices.name(edge.tail))
            .collect())
    }

    /// Zeroes every edge flow and forgets the last result
    pub fn reset_flows(&mut self) {
        for edge in &mut self.edges {
            edge.flow = 0.0;
        }
        self.result = None;
    }

    pub fn source(&self) -> &V {
        &self.vertices.names[SOURCE]
    }

    pub fn sink(&self) -> &V {
        &self.vertices.names[SINK]
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Edge records in insertion order, with dense vertex ids
    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }
}
