//! Stage 3: Merger
//!
//! Joins the validated static IR with an optional runtime trace into an
//! owned `MergedIr` that supersedes both inputs (spec §4.3). This is where
//! the pipeline's central policy question — what happens when static and
//! runtime disagree, or when one side references something the other
//! doesn't know about — gets decided once, in one place.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::domain::models::{CallEdge, ConfigRead, IrRoot, RuntimeTrace, Symbol, SymbolId};
use crate::errors::Warning;

/// Static IR plus runtime trace, reduced to one consistent symbol/edge/config
/// set. Every cross-reference among its fields is guaranteed to resolve.
#[derive(Debug, Clone)]
pub struct MergedIr {
    pub symbols: Vec<Symbol>,
    pub edges: Vec<CallEdge>,
    pub config_reads: Vec<ConfigRead>,
    pub runtime_captured: bool,
}

pub struct Merger;

impl Merger {
    /// Merges `ir` (already validated) with `runtime`, collecting non-fatal
    /// [`Warning`]s rather than failing. `runtime` is `None` when the Loader
    /// found no trace file; an absent trace is equivalent to an empty one
    /// except that it sets `runtime_captured = false`.
    pub fn merge(ir: IrRoot, runtime: Option<RuntimeTrace>) -> (MergedIr, Vec<Warning>) {
        let mut warnings = Vec::new();
        let runtime_captured = runtime.is_some();
        let runtime = runtime.unwrap_or_default();

        let symbols = Self::dedupe_symbols(ir.symbols, &mut warnings);
        let known_ids: HashSet<&SymbolId> = symbols.iter().map(|s| &s.id).collect();

        Self::check_unknown_runtime_symbols(&runtime, &known_ids, &mut warnings);

        let edges = Self::merge_edges(ir.call_edges, &runtime, &known_ids, &mut warnings);
        let config_reads = Self::merge_config_reads(ir.config_reads, runtime.config_reads);

        debug!(
            symbols = symbols.len(),
            edges = edges.len(),
            config_reads = config_reads.len(),
            runtime_captured,
            "merge complete"
        );

        (
            MergedIr {
                symbols,
                edges,
                config_reads,
                runtime_captured,
            },
            warnings,
        )
    }

    /// First occurrence wins (spec §4.3). The Validator already rejects
    /// duplicate ids in the input stream, so in practice this is a no-op;
    /// it is kept defensive rather than trusting that invariant twice over.
    fn dedupe_symbols(symbols: Vec<Symbol>, warnings: &mut Vec<Warning>) -> Vec<Symbol> {
        let mut seen = HashSet::with_capacity(symbols.len());
        let mut out = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            if seen.insert(symbol.id.clone()) {
                out.push(symbol);
            } else {
                warnings.push(Warning::DanglingReference {
                    kind: "duplicate_symbol",
                    id: symbol.id.to_string(),
                });
            }
        }
        out
    }

    fn check_unknown_runtime_symbols(
        runtime: &RuntimeTrace,
        known_ids: &HashSet<&SymbolId>,
        warnings: &mut Vec<Warning>,
    ) {
        for observed in &runtime.observed_symbols {
            if !known_ids.contains(&observed.symbol_id) {
                warnings.push(Warning::UnknownRuntimeId(observed.symbol_id.to_string()));
            }
        }
    }

    fn merge_edges(
        static_edges: Vec<CallEdge>,
        runtime: &RuntimeTrace,
        known_ids: &HashSet<&SymbolId>,
        warnings: &mut Vec<Warning>,
    ) -> Vec<CallEdge> {
        let mut runtime_counts: HashMap<(SymbolId, SymbolId), u64> = HashMap::new();
        for observed in &runtime.observed_edges {
            if known_ids.contains(&observed.caller) && known_ids.contains(&observed.callee) {
                runtime_counts.insert(
                    (observed.caller.clone(), observed.callee.clone()),
                    observed.call_count,
                );
            } else {
                warnings.push(Warning::UnknownRuntimeId(format!(
                    "{}->{}",
                    observed.caller, observed.callee
                )));
            }
        }

        let mut merged = Vec::with_capacity(static_edges.len());
        let mut covered: HashSet<(SymbolId, SymbolId)> = HashSet::new();

        for edge in static_edges {
            if !known_ids.contains(&edge.caller) || !known_ids.contains(&edge.callee) {
                warnings.push(Warning::DanglingReference {
                    kind: "edge",
                    id: format!("{}->{}", edge.caller, edge.callee),
                });
                continue;
            }
            let key = (edge.caller.clone(), edge.callee.clone());
            let merged_edge = match runtime_counts.get(&key) {
                Some(&count) => CallEdge {
                    runtime_observed: true,
                    call_count: count,
                    ..edge
                },
                None => CallEdge {
                    runtime_observed: false,
                    call_count: 0,
                    ..edge
                },
            };
            covered.insert(key);
            merged.push(merged_edge);
        }

        // Runtime-only edges between two known static symbols are added as new,
        // non-static edges.
        for (caller, callee) in runtime_counts.keys() {
            let key = (caller.clone(), callee.clone());
            if covered.contains(&key) {
                continue;
            }
            let call_count = runtime_counts[&key];
            merged.push(CallEdge {
                caller: caller.clone(),
                callee: callee.clone(),
                is_static: false,
                runtime_observed: true,
                call_count,
            });
        }

        merged
    }

    /// Union of static and runtime config reads, deduplicated by
    /// `(symbol_id, config_key)` with runtime values preferred (spec §4.3).
    fn merge_config_reads(
        static_reads: Vec<ConfigRead>,
        runtime_reads: Vec<ConfigRead>,
    ) -> Vec<ConfigRead> {
        let mut by_key: HashMap<(SymbolId, String), ConfigRead> = HashMap::new();
        for read in static_reads {
            by_key.insert((read.symbol_id.clone(), read.config_key.clone()), read);
        }
        for read in runtime_reads {
            by_key.insert((read.symbol_id.clone(), read.config_key.clone()), read);
        }
        by_key.into_values().collect()
    }
}
