//! Pipeline orchestration
//!
//! Drives the eight stages in strict sequence (spec §2, §4): `Loaded ->
//! Validated -> Merged -> Graph -> Hot -> Expanded -> Sliced -> Packed`.
//! Each transition is total; the only way out early is a fatal
//! [`PipelineError`]. Recoverable conditions accumulate in `warnings` and
//! are flushed to the tracing subscriber at the end of the run, never
//! interrupting it.

use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

use crate::compressor::Compressor;
use crate::domain::models::Symbol;
use crate::domain::ports::Clock;
use crate::errors::{Result, Warning};
use crate::expansion::Expansion;
use crate::graph::Graph;
use crate::loader::Loader;
use crate::merger::Merger;
use crate::packager::Packager;
use crate::traversal::Traversal;
use crate::validator::Validator;

/// Filenames the Loader and Packager read and write under the slice directory.
pub const STATIC_IR_FILE: &str = "static_ir.json";

/// Runs the full pipeline against `slice_dir`, writing its five output
/// files in place, and returns the warnings accumulated across all stages.
pub fn run(slice_dir: &Path, clock: &dyn Clock) -> Result<Vec<Warning>> {
    let mut warnings = Vec::new();

    let static_ir_path = slice_dir.join(STATIC_IR_FILE);
    let ir = Loader::load_static_ir(&static_ir_path)?;

    Validator::validate(&ir)?;

    let runtime = Loader::resolve_runtime_trace(slice_dir, &ir)?;

    let scenario_name = ir.scenario.name.clone();
    let adapter_version = ir.adapter_version.clone();
    let language = ir.language.clone();
    let entry_points = ir.scenario.entry_points.clone();

    let (merged, merge_warnings) = Merger::merge(ir, runtime);
    warnings.extend(merge_warnings);

    let graph = Graph::build(&merged);

    let hot = Traversal::hot_set(&graph, &entry_points, &mut warnings);

    let expanded = Expansion::expand(&graph, &merged, &hot);

    let slice = Compressor::compress(
        &expanded,
        &merged,
        &scenario_name,
        &adapter_version,
        &language,
        clock,
    );

    let symbols_by_id: HashMap<&str, &Symbol> = merged
        .symbols
        .iter()
        .map(|s| (s.id.as_str(), s))
        .collect();
    Packager::package(&slice, &symbols_by_id, slice_dir)?;

    for warning in &warnings {
        warn!(category = %warning.category(), "{warning}");
    }

    Ok(warnings)
}
