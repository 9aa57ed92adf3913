//! Stage 4: Graph Builder
//!
//! Projects a [`MergedIr`] into the adjacency structures the traversal and
//! expansion stages operate on (spec §4.4). Construction is O(N + E) and
//! never mutates its input.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::domain::models::{CallEdge, FileId, SymbolId};
use crate::merger::MergedIr;

/// Directed multigraph of symbols, built once and read by every downstream
/// stage. Mirrors [`crate::domain::models::Graph`] but is constructed here so
/// the build logic lives next to the stage that owns it.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: HashSet<SymbolId>,
    pub out_edges: HashMap<SymbolId, Vec<CallEdge>>,
    pub in_edges: HashMap<SymbolId, Vec<SymbolId>>,
    pub file_map: HashMap<SymbolId, FileId>,
}

impl Graph {
    pub fn build(merged: &MergedIr) -> Self {
        let mut graph = Graph::default();

        for symbol in &merged.symbols {
            graph.nodes.insert(symbol.id.clone());
            graph
                .file_map
                .insert(symbol.id.clone(), symbol.file_id.clone());
        }

        for edge in &merged.edges {
            graph
                .out_edges
                .entry(edge.caller.clone())
                .or_default()
                .push(edge.clone());
            graph
                .in_edges
                .entry(edge.callee.clone())
                .or_default()
                .push(edge.caller.clone());
        }

        debug!(
            nodes = graph.nodes.len(),
            edges = merged.edges.len(),
            "graph built"
        );
        graph
    }

    pub fn out_edges(&self, id: &SymbolId) -> &[CallEdge] {
        self.out_edges.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}
