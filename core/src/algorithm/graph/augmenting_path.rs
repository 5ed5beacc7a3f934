//! Augmenting path search and flow update
//!
//! The search walks the residual graph from [`SOURCE`] to [`SINK`] using only
//! arcs with residual capacity above the network tolerance. Breadth-first
//! search yields shortest paths (Edmonds-Karp); depth-first search is the
//! plain Ford-Fulkerson rule. Both visit each vertex at most once and break
//! ties by adjacency insertion order.

use std::collections::VecDeque;

use crate::algorithm::config::MaxFlowAlgorithm;
use crate::algorithm::graph::max_flow::FlowError;
use crate::data_structures::flow_network::{
    Capacity, Flow, FlowNetwork, ResidualArc, SINK, SOURCE,
};

/// Reusable buffers for repeated searches over one network
#[derive(Debug)]
pub struct SearchScratch {
    visited: Vec<bool>,
    predecessor: Vec<Option<ResidualArc>>,
    queue: VecDeque<usize>,
    stack: Vec<usize>,
    arcs_scanned: usize,
}

impl SearchScratch {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            visited: vec![false; vertex_count],
            predecessor: vec![None; vertex_count],
            queue: VecDeque::with_capacity(vertex_count),
            stack: Vec::with_capacity(vertex_count),
            arcs_scanned: 0,
        }
    }

    /// Total arcs inspected across all searches
    pub fn arcs_scanned(&self) -> usize {
        self.arcs_scanned
    }

    fn reset(&mut self) {
        self.visited.fill(false);
        self.queue.clear();
        self.stack.clear();
    }

    /// Follows predecessor arcs back from the sink.
    fn trace_path(&self, network: &FlowNetwork<'_>) -> AugmentingPath {
        let edges = network.edges();
        let mut arcs = Vec::new();
        let mut v = SINK;
        while v != SOURCE {
            let Some(arc) = self.predecessor[v] else {
                unreachable!("visited vertex {} has no predecessor", v);
            };
            arcs.push(arc);
            v = arc.from(edges);
        }
        arcs.reverse();
        AugmentingPath { arcs }
    }
}

/// Simple source-to-sink path in the residual graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentingPath {
    arcs: Vec<ResidualArc>,
}

impl AugmentingPath {
    /// Arcs in order from source to sink
    pub fn arcs(&self) -> &[ResidualArc] {
        &self.arcs
    }

    /// Number of arcs
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Vertex sequence from source to sink
    pub fn vertices(&self, network: &FlowNetwork<'_>) -> Vec<usize> {
        let edges = network.edges();
        std::iter::once(SOURCE)
            .chain(self.arcs.iter().map(|arc| arc.to(edges)))
            .collect()
    }

    /// Minimum residual capacity over the path
    pub fn bottleneck(&self, network: &FlowNetwork<'_>) -> Capacity {
        let edges = network.edges();
        self.arcs
            .iter()
            .map(|arc| arc.residual(edges))
            .fold(Capacity::INFINITY, Capacity::min)
    }

    /// Pushes the bottleneck along every arc and returns it.
    ///
    /// The bottleneck is checked before any arc is written, so a degenerate
    /// path leaves the network untouched.
    pub fn augment(&self, network: &mut FlowNetwork<'_>) -> Result<Flow, FlowError> {
        let bottleneck = self.bottleneck(network);
        if !(bottleneck.is_finite() && bottleneck > 0.0) {
            return Err(FlowError::DegeneratePath { bottleneck });
        }

        let edges = network.edges_mut();
        for &arc in &self.arcs {
            arc.push(edges, bottleneck);
        }
        Ok(bottleneck)
    }
}

/// Finds an augmenting path, or `None` once the sink is unreachable.
pub fn find_augmenting_path(
    network: &FlowNetwork<'_>,
    algorithm: MaxFlowAlgorithm,
    scratch: &mut SearchScratch,
) -> Option<AugmentingPath> {
    scratch.reset();
    let found = match algorithm {
        MaxFlowAlgorithm::EdmondsKarp => breadth_first(network, scratch),
        MaxFlowAlgorithm::FordFulkerson => depth_first(network, scratch),
    };
    found.then(|| scratch.trace_path(network))
}

fn breadth_first(network: &FlowNetwork<'_>, scratch: &mut SearchScratch) -> bool {
    let edges = network.edges();
    scratch.visited[SOURCE] = true;
    scratch.queue.push_back(SOURCE);

    while let Some(u) = scratch.queue.pop_front() {
        for &arc in network.arcs(u) {
            scratch.arcs_scanned += 1;
            let v = arc.to(edges);
            if scratch.visited[v] || !network.is_traversable(arc) {
                continue;
            }
            scratch.visited[v] = true;
            scratch.predecessor[v] = Some(arc);
            if v == SINK {
                return true;
            }
            scratch.queue.push_back(v);
        }
    }
    false
}

fn depth_first(network: &FlowNetwork<'_>, scratch: &mut SearchScratch) -> bool {
    let edges = network.edges();
    scratch.stack.push(SOURCE);

    while let Some(u) = scratch.stack.pop() {
        if scratch.visited[u] {
            continue;
        }
        scratch.visited[u] = true;
        if u == SINK {
            return true;
        }
        // reversed so the first arc in insertion order is explored first
        for &arc in network.arcs(u).iter().rev() {
            scratch.arcs_scanned += 1;
            let v = arc.to(edges);
            if scratch.visited[v] || !network.is_traversable(arc) {
                continue;
            }
            scratch.predecessor[v] = Some(arc);
            scratch.stack.push(v);
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::config::SelfLoopPolicy;
    use crate::data_structures::flow_network::FlowEdge;

    fn build(edges: &mut [FlowEdge], n: usize) -> FlowNetwork<'_> {
        FlowNetwork::build(edges, n, SelfLoopPolicy::Reject, 0.0).unwrap()
    }

    #[test]
    fn test_bfs_prefers_fewest_hops() {
        // 0 -> 2 -> 3 -> 1 is listed first but 0 -> 4 -> 1 is shorter
        let mut edges = vec![
            FlowEdge::new(0, 2, 1.0),
            FlowEdge::new(2, 3, 1.0),
            FlowEdge::new(3, 1, 1.0),
            FlowEdge::new(0, 4, 1.0),
            FlowEdge::new(4, 1, 1.0),
        ];
        let network = build(&mut edges, 5);
        let mut scratch = SearchScratch::new(5);

        let path = find_augmenting_path(&network, MaxFlowAlgorithm::EdmondsKarp, &mut scratch)
            .unwrap();
        assert_eq!(path.vertices(&network), vec![0, 4, 1]);

        let path = find_augmenting_path(&network, MaxFlowAlgorithm::FordFulkerson, &mut scratch)
            .unwrap();
        assert_eq!(path.vertices(&network), vec![0, 2, 3, 1]);
    }

    #[test]
    fn test_ties_follow_insertion_order() {
        let mut edges = vec![
            FlowEdge::new(0, 3, 1.0),
            FlowEdge::new(0, 2, 1.0),
            FlowEdge::new(2, 1, 1.0),
            FlowEdge::new(3, 1, 1.0),
        ];
        let network = build(&mut edges, 4);
        let mut scratch = SearchScratch::new(4);

        for algorithm in MaxFlowAlgorithm::ALL {
            let path = find_augmenting_path(&network, algorithm, &mut scratch).unwrap();
            assert_eq!(path.vertices(&network), vec![0, 3, 1]);
        }
    }

    #[test]
    fn test_no_path_when_disconnected() {
        let mut edges = vec![FlowEdge::new(0, 2, 5.0), FlowEdge::new(3, 1, 5.0)];
        let network = build(&mut edges, 4);
        let mut scratch = SearchScratch::new(4);

        for algorithm in MaxFlowAlgorithm::ALL {
            assert!(find_augmenting_path(&network, algorithm, &mut scratch).is_none());
        }
        assert!(scratch.arcs_scanned() > 0);
    }

    #[test]
    fn test_zero_capacity_is_never_used() {
        let mut edges = vec![FlowEdge::new(0, 1, 0.0)];
        let network = build(&mut edges, 2);
        let mut scratch = SearchScratch::new(2);
        assert!(find_augmenting_path(&network, MaxFlowAlgorithm::EdmondsKarp, &mut scratch)
            .is_none());
    }

    #[test]
    fn test_augment_applies_bottleneck() {
        let mut edges = vec![
            FlowEdge::new(0, 2, 10.0),
            FlowEdge::new(2, 3, 3.0),
            FlowEdge::new(3, 1, 10.0),
        ];
        let mut network = build(&mut edges, 4);
        let mut scratch = SearchScratch::new(4);

        let path = find_augmenting_path(&network, MaxFlowAlgorithm::EdmondsKarp, &mut scratch)
            .unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.bottleneck(&network), 3.0);
        assert_eq!(path.augment(&mut network).unwrap(), 3.0);

        assert_eq!(network.flow_between(0, 2), 3.0);
        assert_eq!(network.flow_between(2, 3), 3.0);
        assert_eq!(network.flow_between(3, 1), 3.0);
        assert!(find_augmenting_path(&network, MaxFlowAlgorithm::EdmondsKarp, &mut scratch)
            .is_none());
    }

    #[test]
    fn test_reverse_arc_cancels_flow() {
        // the first BFS path 0-2-3-1 blocks both other routes; the second
        // path must traverse 3 -> 2 against the edge to reroute
        let mut edges = vec![
            FlowEdge::new(0, 2, 1.0),
            FlowEdge::new(0, 3, 1.0),
            FlowEdge::new(2, 3, 1.0),
            FlowEdge::new(2, 1, 1.0),
            FlowEdge::new(3, 1, 1.0),
        ];
        let mut network = build(&mut edges, 4);
        let mut scratch = SearchScratch::new(4);

        // force the long route first
        let first = AugmentingPath {
            arcs: vec![
                ResidualArc::Forward(0),
                ResidualArc::Forward(2),
                ResidualArc::Forward(4),
            ],
        };
        assert_eq!(first.augment(&mut network).unwrap(), 1.0);

        let second = find_augmenting_path(&network, MaxFlowAlgorithm::EdmondsKarp, &mut scratch)
            .unwrap();
        assert_eq!(
            second.arcs(),
            &[ResidualArc::Forward(1), ResidualArc::Reverse(2), ResidualArc::Forward(3)]
        );
        assert_eq!(second.augment(&mut network).unwrap(), 1.0);
        assert_eq!(network.flow_between(2, 3), 0.0);
        assert_eq!(network.net_outflow(SOURCE), 2.0);
    }

    #[test]
    fn test_degenerate_path_is_not_applied() {
        let mut edges = vec![FlowEdge::new(0, 2, 1.0), FlowEdge::new(2, 1, 0.0)];
        let mut network = build(&mut edges, 3);
        let path = AugmentingPath {
            arcs: vec![ResidualArc::Forward(0), ResidualArc::Forward(1)],
        };

        assert!(matches!(
            path.augment(&mut network),
            Err(FlowError::DegeneratePath { .. })
        ));
        assert_eq!(network.flow_between(0, 2), 0.0);
    }
}
