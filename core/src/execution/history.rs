//! Augmentation history
//!
//! Optional record of every augmenting path a solver applied, in order.
//! Serializable so a run can be dumped and inspected offline.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::{Serialize, Deserialize};

use crate::data_structures::flow_network::Flow;

/// One applied augmenting path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentationRecord {
    /// Zero-based augmentation round
    pub round: usize,
    /// Vertex sequence from source to sink
    pub vertices: Vec<usize>,
    /// Flow pushed along the path
    pub bottleneck: Flow,
    /// Total flow after this round
    pub total_flow: Flow,
}

/// Ordered log of augmentations for one solve
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AugmentationHistory {
    records: Vec<AugmentationRecord>,
}

impl AugmentationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, vertices: Vec<usize>, bottleneck: Flow) {
        let total_flow = self.total_flow() + bottleneck;
        self.records.push(AugmentationRecord {
            round: self.records.len(),
            vertices,
            bottleneck,
            total_flow,
        });
    }

    pub fn records(&self) -> &[AugmentationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Flow accumulated over all recorded rounds
    pub fn total_flow(&self) -> Flow {
        self.records.last().map_or(0.0, |r| r.total_flow)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
