//! Graph flow algorithms

pub mod augmenting_path;
pub mod max_flow;

pub use self::augmenting_path::{find_augmenting_path, AugmentingPath, SearchScratch};
pub use self::max_flow::{compute_max_flow, FlowError, FlowMetrics, MaxFlowResult, MaxFlowSolver};
