//! Flow network storage

pub mod edge_table;
pub mod flow_network;

pub use self::edge_table::EdgeTable;
pub use self::flow_network::{
    Capacity, EdgeId, Flow, FlowEdge, FlowNetwork, ResidualArc, SINK, SOURCE,
};
