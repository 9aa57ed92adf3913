//! Stage 6: Expansion
//!
//! Augments the hot set with design-relevant neighbors that weren't
//! themselves exercised but help a reader understand the shape of what was
//! (spec §4.6). Expansion is a single pass — the resulting set is closed
//! under its own rules, not transitively re-expanded.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::models::{CallEdge, ConfigRead, Symbol, SymbolId, SymbolKind};
use crate::graph::Graph;
use crate::merger::MergedIr;

/// The hot set expanded with containers, interface implementors, co-located
/// container-kind symbols, and config readers.
#[derive(Debug, Clone)]
pub struct ExpandedIr {
    pub symbols: HashSet<SymbolId>,
    pub edges: Vec<CallEdge>,
}

pub struct Expansion;

impl Expansion {
    pub fn expand(
        graph: &Graph,
        merged: &MergedIr,
        hot: &[SymbolId],
    ) -> ExpandedIr {
        let by_id: std::collections::HashMap<&SymbolId, &Symbol> =
            merged.symbols.iter().map(|s| (&s.id, s)).collect();

        let mut expanded: HashSet<SymbolId> = hot.iter().cloned().collect();

        Self::include_containers(&by_id, hot, &mut expanded);
        Self::include_interface_implementors(&by_id, graph, hot, &mut expanded);
        Self::include_co_located_members(&by_id, merged, hot, &mut expanded);
        Self::include_config_readers(&merged.config_reads, &mut expanded);

        let edges = merged
            .edges
            .iter()
            .filter(|e| expanded.contains(&e.caller) && expanded.contains(&e.callee))
            .cloned()
            .collect();

        debug!(symbols = expanded.len(), "expansion complete");
        ExpandedIr {
            symbols: expanded,
            edges,
        }
    }

    /// Declaring containers of every hot symbol.
    fn include_containers(
        by_id: &std::collections::HashMap<&SymbolId, &Symbol>,
        hot: &[SymbolId],
        expanded: &mut HashSet<SymbolId>,
    ) {
        for id in hot {
            if let Some(symbol) = by_id.get(id) {
                if let Some(container) = &symbol.container {
                    if by_id.contains_key(container) {
                        expanded.insert(container.clone());
                    }
                }
            }
        }
    }

    /// For every hot interface, every implementor that was actually invoked
    /// on the hot path (its container implements the interface and the
    /// implementor itself is a hot edge callee).
    fn include_interface_implementors(
        by_id: &std::collections::HashMap<&SymbolId, &Symbol>,
        graph: &Graph,
        hot: &[SymbolId],
        expanded: &mut HashSet<SymbolId>,
    ) {
        let hot_set: HashSet<&SymbolId> = hot.iter().collect();
        let hot_interfaces: HashSet<&SymbolId> = hot
            .iter()
            .filter(|id| {
                by_id
                    .get(*id)
                    .is_some_and(|s| s.kind == SymbolKind::Interface)
            })
            .collect();

        if hot_interfaces.is_empty() {
            return;
        }

        let hot_edge_callees: HashSet<&SymbolId> = hot_set
            .iter()
            .flat_map(|caller| graph.out_edges(caller))
            .map(|edge| &edge.callee)
            .collect();

        for symbol in by_id.values() {
            let Some(container) = &symbol.container else {
                continue;
            };
            if hot_interfaces.contains(container) && hot_edge_callees.contains(&symbol.id) {
                expanded.insert(symbol.id.clone());
            }
        }
    }

    /// For every file touched by a hot symbol, every class/interface/constructor
    /// declared in that file. Methods are deliberately excluded.
    fn include_co_located_members(
        by_id: &std::collections::HashMap<&SymbolId, &Symbol>,
        merged: &MergedIr,
        hot: &[SymbolId],
        expanded: &mut HashSet<SymbolId>,
    ) {
        let hot_files: HashSet<_> = hot
            .iter()
            .filter_map(|id| by_id.get(id).map(|s| s.file_id.clone()))
            .collect();

        for symbol in &merged.symbols {
            if hot_files.contains(&symbol.file_id) && symbol.kind.is_container_kind() {
                expanded.insert(symbol.id.clone());
            }
        }
    }

    fn include_config_readers(config_reads: &[ConfigRead], expanded: &mut HashSet<SymbolId>) {
        for read in config_reads {
            expanded.insert(read.symbol_id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::FileId;

    fn symbol(id: &str, kind: SymbolKind, file: &str, container: Option<&str>) -> Symbol {
        Symbol {
            id: id.into(),
            kind,
            name: id.to_string(),
            language: "java".to_string(),
            file_id: FileId::from(file),
            line_start: 1,
            line_end: 2,
            visibility: None,
            container: container.map(Into::into),
            annotations: vec![],
            is_entry_point: false,
            is_framework: false,
            is_generated: false,
        }
    }

    fn merged_of(symbols: Vec<Symbol>, edges: Vec<CallEdge>) -> MergedIr {
        MergedIr {
            symbols,
            edges,
            config_reads: vec![],
            runtime_captured: false,
        }
    }

    #[test]
    fn includes_declaring_container() {
        let foo_class = symbol("Foo", SymbolKind::Class, "f1", None);
        let bar_method = symbol("Foo::bar()", SymbolKind::Method, "f1", Some("Foo"));
        let merged = merged_of(vec![foo_class, bar_method], vec![]);
        let graph = Graph::build(&merged);

        let expanded = Expansion::expand(&graph, &merged, &["Foo::bar()".into()]);
        assert!(expanded.symbols.contains(&SymbolId::from("Foo")));
    }

    #[test]
    fn includes_co_located_container_kinds_but_not_methods() {
        let foo_class = symbol("Foo", SymbolKind::Class, "f1", None);
        let other_method = symbol("Other::m()", SymbolKind::Method, "f1", None);
        let entry = symbol("Entry::go()", SymbolKind::Method, "f1", None);
        let merged = merged_of(vec![foo_class, other_method, entry], vec![]);
        let graph = Graph::build(&merged);

        let expanded = Expansion::expand(&graph, &merged, &["Entry::go()".into()]);
        assert!(expanded.symbols.contains(&SymbolId::from("Foo")));
        assert!(!expanded.symbols.contains(&SymbolId::from("Other::m()")));
    }

    #[test]
    fn includes_invoked_interface_implementor() {
        let iface = symbol("PaymentGateway", SymbolKind::Interface, "f1", None);
        let impl_method = symbol(
            "StripeGateway::charge()",
            SymbolKind::Method,
            "f2",
            Some("PaymentGateway"),
        );
        let caller = symbol("Checkout::pay()", SymbolKind::Method, "f3", None);
        let edge = CallEdge {
            caller: "Checkout::pay()".into(),
            callee: "StripeGateway::charge()".into(),
            is_static: true,
            runtime_observed: true,
            call_count: 1,
        };
        let merged = merged_of(vec![iface.clone(), impl_method, caller], vec![edge]);
        let graph = Graph::build(&merged);

        let expanded = Expansion::expand(
            &graph,
            &merged,
            &["Checkout::pay()".into(), "PaymentGateway".into()],
        );
        assert!(expanded
            .symbols
            .contains(&SymbolId::from("StripeGateway::charge()")));
    }

    #[test]
    fn includes_config_readers_regardless_of_hot_set() {
        let reader = symbol("Config::read()", SymbolKind::Method, "f1", None);
        let mut merged = merged_of(vec![reader], vec![]);
        merged.config_reads.push(ConfigRead {
            symbol_id: "Config::read()".into(),
            config_key: "k".to_string(),
            resolved_value: "v".to_string(),
            source_file: None,
        });
        let graph = Graph::build(&merged);

        let expanded = Expansion::expand(&graph, &merged, &[]);
        assert!(expanded.symbols.contains(&SymbolId::from("Config::read()")));
    }

    #[test]
    fn container_of_container_not_pulled_in_across_files() {
        let baz = symbol("Baz", SymbolKind::Class, "other_file", None);
        let bar = symbol("Bar", SymbolKind::Class, "f1", Some("Baz"));
        let foo = symbol("Foo::m()", SymbolKind::Method, "f1", Some("Bar"));
        let merged = merged_of(vec![baz, bar, foo], vec![]);
        let graph = Graph::build(&merged);

        let expanded = Expansion::expand(&graph, &merged, &["Foo::m()".into()]);
        assert!(expanded.symbols.contains(&SymbolId::from("Bar")));
        assert!(!expanded.symbols.contains(&SymbolId::from("Baz")));
    }
}
