//! Stage 7: Compressor
//!
//! Reduces an [`ExpandedIr`] to the final, ordered [`Slice`] (spec §4.7).
//! Every ordering rule here feeds invariants checked in the Packager's
//! output: symbol order drives `architecture.md`'s call-path listing, file
//! order drives its source-file listing.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::models::{ConfigRead, ScenarioMeta, Slice, Symbol, SymbolId};
use crate::domain::ports::Clock;
use crate::expansion::ExpandedIr;
use crate::merger::MergedIr;

pub struct Compressor;

impl Compressor {
    /// `scenario_name`, `adapter_version`, and `language` come from the
    /// original `IrRoot` (the Compressor never re-reads the raw input, so
    /// these are passed through explicitly rather than re-derived).
    pub fn compress(
        expanded: &ExpandedIr,
        merged: &MergedIr,
        scenario_name: &str,
        adapter_version: &str,
        language: &str,
        clock: &dyn Clock,
    ) -> Slice {
        let by_id: HashMap<&SymbolId, &Symbol> =
            merged.symbols.iter().map(|s| (&s.id, s)).collect();

        let mut ordered_symbols: Vec<&Symbol> = expanded
            .symbols
            .iter()
            .filter_map(|id| by_id.get(id).copied())
            .collect();
        ordered_symbols.sort_by(|a, b| {
            a.file_id
                .cmp(&b.file_id)
                .then(a.line_start.cmp(&b.line_start))
                .then(a.id.cmp(&b.id))
        });

        let ordered_symbol_ids: Vec<SymbolId> =
            ordered_symbols.iter().map(|s| s.id.clone()).collect();

        let mut relevant_file_paths: Vec<String> = ordered_symbols
            .iter()
            .map(|s| s.file_id.as_str().to_string())
            .collect();
        relevant_file_paths.sort();
        relevant_file_paths.dedup();

        let id_set: std::collections::HashSet<&SymbolId> = ordered_symbol_ids.iter().collect();
        let mut relevant_config_reads: Vec<ConfigRead> = merged
            .config_reads
            .iter()
            .filter(|r| id_set.contains(&r.symbol_id))
            .cloned()
            .collect();
        relevant_config_reads
            .sort_by(|a, b| a.symbol_id.cmp(&b.symbol_id).then(a.config_key.cmp(&b.config_key)));

        let now = clock.now();
        let scenario_meta = ScenarioMeta {
            scenario_name: scenario_name.to_string(),
            adapter_version: adapter_version.to_string(),
            language: language.to_string(),
            timestamp_utc: now.to_rfc3339(),
            timestamp_unix: now.timestamp(),
            runtime_captured: merged.runtime_captured,
        };

        let mut edges = expanded.edges.clone();
        edges.sort_by(|a, b| a.caller.cmp(&b.caller).then(a.callee.cmp(&b.callee)));

        debug!(
            symbols = ordered_symbol_ids.len(),
            files = relevant_file_paths.len(),
            "slice compressed"
        );

        Slice {
            ordered_symbols: ordered_symbol_ids,
            relevant_file_paths,
            relevant_config_reads,
            scenario_meta,
            edges,
        }
    }
}
