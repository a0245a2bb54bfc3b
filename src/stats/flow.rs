//! Flow Graph Module
//! Counts categorical co-occurrences as a weighted node/link structure.

use std::collections::{BTreeMap, HashMap};

use crate::data::StudentRecord;

/// Weighted link between two node indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowEdge {
    pub source: usize,
    pub target: usize,
    pub value: u64,
}

/// Deduplicated node labels plus the links between them. Edge indices
/// reference positions in `nodes`.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    pub nodes: Vec<String>,
    pub edges: Vec<FlowEdge>,
}

impl FlowGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sum of all edge weights.
    pub fn total_flow(&self) -> u64 {
        self.edges.iter().map(|e| e.value).sum()
    }
}

/// Accumulates labelled links, interning node labels in first-seen order.
#[derive(Debug, Default)]
pub struct FlowGraphBuilder {
    nodes: Vec<String>,
    index: HashMap<String, usize>,
    counts: BTreeMap<(usize, usize), u64>,
}

impl FlowGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one co-occurrence of the labelled source/target pair.
    pub fn add_link(&mut self, source: &str, target: &str) {
        let source = self.intern(source);
        let target = self.intern(target);
        *self.counts.entry((source, target)).or_insert(0) += 1;
    }

    fn intern(&mut self, label: &str) -> usize {
        if let Some(&index) = self.index.get(label) {
            return index;
        }
        let index = self.nodes.len();
        self.nodes.push(label.to_string());
        self.index.insert(label.to_string(), index);
        index
    }

    /// Edges come out ordered by (source, target) index pair.
    pub fn finish(self) -> FlowGraph {
        let edges = self
            .counts
            .into_iter()
            .map(|((source, target), value)| FlowEdge {
                source,
                target,
                value,
            })
            .collect();

        FlowGraph {
            nodes: self.nodes,
            edges,
        }
    }
}

/// Build the support flow: each record links both of its support
/// answers to its higher-education answer, so every record contributes
/// exactly two edge increments sharing one target. Raw field text is
/// kept verbatim; distinct values (including the missing marker) become
/// distinct nodes.
pub fn build_support_flow(records: &[StudentRecord]) -> FlowGraph {
    let mut builder = FlowGraphBuilder::new();
    for record in records {
        let target = format!("Pursue Higher Education?: {}", record.higher);
        builder.add_link(&format!("School Support: {}", record.schoolsup), &target);
        builder.add_link(&format!("Family Support: {}", record.famsup), &target);
    }
    builder.finish()
}
