//! Stage 8: Packager
//!
//! Writes the five canonical output files under the slice directory (spec
//! §4.8, §6). Every write goes to a temp file in the target directory first,
//! then is persisted atomically over the destination — a crash or
//! concurrent reader never observes a partially written artifact.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use crate::domain::models::{ConfigRead, Slice, Symbol};
use crate::errors::{PipelineError, Result};

pub const CALL_GRAPH_FILE: &str = "call_graph.json";
pub const ARCHITECTURE_FILE: &str = "architecture.md";
pub const CONFIG_USAGE_FILE: &str = "config_usage.md";
pub const RELEVANT_FILES_FILE: &str = "relevant_files.txt";
pub const METADATA_FILE: &str = "metadata.json";

pub struct Packager;

impl Packager {
    /// Writes all five output files into `slice_dir`, creating it if absent.
    /// `symbols_by_id` supplies the per-symbol file path and line used by
    /// `architecture.md`'s call-path listing.
    pub fn package(
        slice: &Slice,
        symbols_by_id: &HashMap<&str, &Symbol>,
        slice_dir: &Path,
    ) -> Result<()> {
        std::fs::create_dir_all(slice_dir).map_err(|source| PipelineError::IoFailure {
            path: slice_dir.to_path_buf(),
            source,
        })?;

        Self::write_call_graph(slice, slice_dir)?;
        Self::write_architecture(slice, symbols_by_id, slice_dir)?;
        Self::write_config_usage(&slice.relevant_config_reads, slice_dir)?;
        Self::write_relevant_files(&slice.relevant_file_paths, slice_dir)?;
        Self::write_metadata(slice, slice_dir)?;

        info!(dir = %slice_dir.display(), "slice packaged");
        Ok(())
    }

    fn write_call_graph(slice: &Slice, slice_dir: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(slice)
            .map_err(|source| PipelineError::MalformedJson {
                path: slice_dir.join(CALL_GRAPH_FILE),
                source,
            })?;
        Self::atomic_write(slice_dir, CALL_GRAPH_FILE, json.as_bytes())
    }

    fn write_architecture(
        slice: &Slice,
        symbols_by_id: &HashMap<&str, &Symbol>,
        slice_dir: &Path,
    ) -> Result<()> {
        let mut out = String::new();
        let _ = writeln!(out, "# Architecture: {}", slice.scenario_meta.scenario_name);
        let _ = writeln!(out);
        let _ = writeln!(out, "## Call Path");
        let _ = writeln!(out);
        for id in &slice.ordered_symbols {
            if let Some(symbol) = symbols_by_id.get(id.as_str()) {
                let _ = writeln!(
                    out,
                    "- `{}` — {}:{}",
                    id,
                    symbol.file_id.as_str(),
                    symbol.line_start
                );
            } else {
                let _ = writeln!(out, "- `{id}`");
            }
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "## Source Files");
        let _ = writeln!(out);
        for path in &slice.relevant_file_paths {
            let _ = writeln!(out, "- {path}");
        }
        Self::atomic_write(slice_dir, ARCHITECTURE_FILE, out.as_bytes())
    }

    fn write_config_usage(config_reads: &[ConfigRead], slice_dir: &Path) -> Result<()> {
        let mut out = String::new();
        let _ = writeln!(out, "# Configuration Reads");
        let _ = writeln!(out);
        let _ = writeln!(out, "| Symbol | Key | Value | Source |");
        let _ = writeln!(out, "|---|---|---|---|");
        for read in config_reads {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} |",
                read.symbol_id,
                read.config_key,
                read.resolved_value,
                read.source_file.as_deref().unwrap_or("")
            );
        }
        Self::atomic_write(slice_dir, CONFIG_USAGE_FILE, out.as_bytes())
    }

    fn write_relevant_files(paths: &[String], slice_dir: &Path) -> Result<()> {
        let mut out = paths.join("\n");
        if !paths.is_empty() {
            out.push('\n');
        }
        Self::atomic_write(slice_dir, RELEVANT_FILES_FILE, out.as_bytes())
    }

    fn write_metadata(slice: &Slice, slice_dir: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&slice.scenario_meta).map_err(|source| {
            PipelineError::MalformedJson {
                path: slice_dir.join(METADATA_FILE),
                source,
            }
        })?;
        Self::atomic_write(slice_dir, METADATA_FILE, json.as_bytes())
    }

    /// Writes `contents` to a temp file inside `dir` and renames it over
    /// `dir/name`. The temp file lives in the same directory as the final
    /// destination so the rename is a same-filesystem, non-copying move.
    fn atomic_write(dir: &Path, name: &str, contents: &[u8]) -> Result<()> {
        let dest = dir.join(name);
        let mut temp = NamedTempFile::new_in(dir).map_err(|source| PipelineError::IoFailure {
            path: dest.clone(),
            source,
        })?;
        temp.write_all(contents)
            .map_err(|source| PipelineError::IoFailure {
                path: dest.clone(),
                source,
            })?;
        temp.persist(&dest)
            .map_err(|e| PipelineError::IoFailure {
                path: dest.clone(),
                source: e.error,
            })?;
        Ok(())
    }
}
