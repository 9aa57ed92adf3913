//! Stage 5: Hot-Path Traversal
//!
//! Selects the exercised "hot" subset of symbols (spec §4.5): runtime
//! activity when it exists, entry-point reachability when it doesn't.
//! Determinism is the hard requirement here — two runs over the same graph
//! must produce the same ordered sequence, so every set is sorted before it
//! is turned into output order.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::domain::models::SymbolId;
use crate::errors::Warning;
use crate::graph::Graph;

/// Forward BFS depth cap over runtime-observed edges (spec §4.5 step 3).
const RUNTIME_DEPTH_CAP: u32 = 32;
/// Forward BFS depth cap over all edges, used only when there is no runtime
/// data to traverse (spec §4.5 step 4).
const FALLBACK_DEPTH_CAP: u32 = 8;

pub struct Traversal;

impl Traversal {
    /// Returns the ordered hot set: entry points first in input order, then
    /// the remaining hot symbols sorted ascending by id (spec §4.5).
    pub fn hot_set(
        graph: &Graph,
        entry_points: &[SymbolId],
        warnings: &mut Vec<Warning>,
    ) -> Vec<SymbolId> {
        let entry_points: Vec<SymbolId> = entry_points
            .iter()
            .filter(|id| graph.nodes.contains(id))
            .cloned()
            .collect();

        let mut hot: HashSet<SymbolId> = entry_points.iter().cloned().collect();

        // Steps 1+2: a symbol's runtime activity is only observable through
        // the edges it participates in (the merged IR does not retain a
        // per-symbol call count), so both "nonzero call count" and "endpoint
        // of a runtime-observed edge" reduce to the same scan here.
        for (caller, edges) in &graph.out_edges {
            for edge in edges {
                if edge.runtime_observed {
                    hot.insert(caller.clone());
                    hot.insert(edge.callee.clone());
                }
            }
        }

        let has_runtime_data = graph
            .out_edges
            .values()
            .flatten()
            .any(|e| e.runtime_observed);

        if has_runtime_data {
            // Step 3: forward BFS from entry points over runtime-observed edges.
            let reached = Self::bounded_bfs(graph, &entry_points, RUNTIME_DEPTH_CAP, |edge| {
                edge.runtime_observed
            });
            hot.extend(reached);
        }

        if !has_runtime_data {
            // Step 4: no runtime data at all; fall back to a full-edge traversal.
            warnings.push(Warning::EmptyHotSet);
            let reached = Self::bounded_bfs(graph, &entry_points, FALLBACK_DEPTH_CAP, |_| true);
            hot.extend(reached);
        }

        let ordered = Self::canonical_order(&entry_points, hot);
        debug!(hot = ordered.len(), "hot set computed");
        ordered
    }

    /// Forward BFS from `starts`, following only edges `accept` allows,
    /// bounded to `max_depth` hops. Revisiting an already-visited node is
    /// never performed (cycles are safe).
    fn bounded_bfs(
        graph: &Graph,
        starts: &[SymbolId],
        max_depth: u32,
        accept: impl Fn(&crate::domain::models::CallEdge) -> bool,
    ) -> HashSet<SymbolId> {
        let mut visited: HashSet<SymbolId> = starts.iter().cloned().collect();
        let mut queue: VecDeque<(SymbolId, u32)> =
            starts.iter().cloned().map(|id| (id, 0)).collect();

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            for edge in graph.out_edges(&current) {
                if !accept(edge) {
                    continue;
                }
                if visited.insert(edge.callee.clone()) {
                    queue.push_back((edge.callee.clone(), depth + 1));
                }
            }
        }

        visited
    }

    /// Entry points first in input order, then the rest sorted ascending by id.
    fn canonical_order(entry_points: &[SymbolId], hot: HashSet<SymbolId>) -> Vec<SymbolId> {
        let entry_set: HashSet<&SymbolId> = entry_points.iter().collect();
        let mut rest: Vec<SymbolId> = hot
            .into_iter()
            .filter(|id| !entry_set.contains(id))
            .collect();
        rest.sort();

        let mut ordered = Vec::with_capacity(entry_points.len() + rest.len());
        ordered.extend(entry_points.iter().cloned());
        ordered.extend(rest);
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::CallEdge;
    use crate::merger::MergedIr;
    use crate::domain::models::{FileId, Symbol, SymbolKind};

    fn symbol(id: &str) -> Symbol {
        Symbol {
            id: id.into(),
            kind: SymbolKind::Method,
            name: id.to_string(),
            language: "java".to_string(),
            file_id: FileId::from("f1"),
            line_start: 1,
            line_end: 2,
            visibility: None,
            container: None,
            annotations: vec![],
            is_entry_point: false,
            is_framework: false,
            is_generated: false,
        }
    }

    fn edge(caller: &str, callee: &str, runtime_observed: bool, call_count: u64) -> CallEdge {
        CallEdge {
            caller: caller.into(),
            callee: callee.into(),
            is_static: true,
            runtime_observed,
            call_count,
        }
    }

    #[test]
    fn falls_back_to_entry_point_reachability_without_runtime_data() {
        let merged = MergedIr {
            symbols: vec![symbol("A"), symbol("B"), symbol("C")],
            edges: vec![edge("A", "B", false, 0), edge("B", "C", false, 0)],
            config_reads: vec![],
            runtime_captured: false,
        };
        let graph = Graph::build(&merged);
        let mut warnings = Vec::new();
        let hot = Traversal::hot_set(&graph, &["A".into()], &mut warnings);

        assert_eq!(hot, vec![SymbolId::from("A"), "B".into(), "C".into()]);
        assert!(warnings.contains(&Warning::EmptyHotSet));
    }

    #[test]
    fn prefers_runtime_observed_edges_when_present() {
        let merged = MergedIr {
            symbols: vec![symbol("A"), symbol("B"), symbol("C")],
            edges: vec![edge("A", "B", true, 3), edge("B", "C", false, 0)],
            config_reads: vec![],
            runtime_captured: true,
        };
        let graph = Graph::build(&merged);
        let mut warnings = Vec::new();
        let hot = Traversal::hot_set(&graph, &["A".into()], &mut warnings);

        assert!(hot.contains(&SymbolId::from("A")));
        assert!(hot.contains(&SymbolId::from("B")));
        assert!(!hot.contains(&SymbolId::from("C")));
        assert!(warnings.is_empty());
    }

    #[test]
    fn entry_points_come_first_then_sorted_remainder() {
        let merged = MergedIr {
            symbols: vec![symbol("Z"), symbol("A"), symbol("M")],
            edges: vec![
                edge("Z", "A", false, 0),
                edge("Z", "M", false, 0),
            ],
            config_reads: vec![],
            runtime_captured: false,
        };
        let graph = Graph::build(&merged);
        let mut warnings = Vec::new();
        let hot = Traversal::hot_set(&graph, &["Z".into()], &mut warnings);

        assert_eq!(hot, vec![SymbolId::from("Z"), "A".into(), "M".into()]);
    }

    #[test]
    fn cyclic_graph_does_not_infinite_loop() {
        let merged = MergedIr {
            symbols: vec![symbol("A"), symbol("B")],
            edges: vec![edge("A", "B", false, 0), edge("B", "A", false, 0)],
            config_reads: vec![],
            runtime_captured: false,
        };
        let graph = Graph::build(&merged);
        let mut warnings = Vec::new();
        let hot = Traversal::hot_set(&graph, &["A".into()], &mut warnings);
        assert_eq!(hot.len(), 2);
    }
}
