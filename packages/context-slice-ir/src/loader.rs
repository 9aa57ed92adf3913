//! Stage 1: Loader
//!
//! Reads `static_ir.json` and the optional runtime trace file, returning
//! owned structures (spec §4.1). Unknown JSON fields are silently ignored —
//! `serde`'s default behavior already gives us this for free, since none of
//! our structs use `#[serde(deny_unknown_fields)]`.

use std::fs::File as StdFile;
use std::io::BufReader;
use std::path::Path;

use tracing::{debug, warn};

use crate::domain::models::{IrRoot, RuntimeTrace};
use crate::errors::{PipelineError, Result};

/// The legacy on-disk layout keeps `runtime_trace.json` at the slice
/// directory root; newer producers write it under `runtime/`. Both are
/// accepted, with the `runtime/` path preferred (spec §6 persisted layout).
pub const RUNTIME_TRACE_PREFERRED: &str = "runtime/runtime_trace.json";
pub const RUNTIME_TRACE_LEGACY: &str = "runtime_trace.json";

pub struct Loader;

impl Loader {
    /// Reads and deserializes `static_ir.json`. Any I/O failure or malformed
    /// JSON is fatal — the static IR is the one input this pipeline cannot
    /// run without.
    pub fn load_static_ir(path: &Path) -> Result<IrRoot> {
        let file = StdFile::open(path).map_err(|source| PipelineError::IoFailure {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        let ir: IrRoot =
            serde_json::from_reader(reader).map_err(|source| PipelineError::MalformedJson {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(
            files = ir.files.len(),
            symbols = ir.symbols.len(),
            edges = ir.call_edges.len(),
            "loaded static IR"
        );
        Ok(ir)
    }

    /// Reads the runtime trace at `slice_dir`, preferring the `runtime/`
    /// subdirectory and falling back to the legacy top-level path. A missing
    /// file at either location is not an error — `None` is returned and the
    /// caller falls back to `IrRoot.runtime` (see [`Self::resolve_runtime_trace`]).
    /// Malformed JSON for a file that *does* exist is still fatal, since at
    /// that point the producer clearly intended to supply runtime data.
    pub fn load_runtime_trace(slice_dir: &Path) -> Result<Option<RuntimeTrace>> {
        let preferred = slice_dir.join(RUNTIME_TRACE_PREFERRED);
        let legacy = slice_dir.join(RUNTIME_TRACE_LEGACY);

        let path = if preferred.exists() {
            preferred
        } else if legacy.exists() {
            legacy
        } else {
            return Ok(None);
        };

        let file = StdFile::open(&path).map_err(|source| PipelineError::IoFailure {
            path: path.clone(),
            source,
        })?;
        let reader = BufReader::new(file);
        let trace: RuntimeTrace =
            serde_json::from_reader(reader).map_err(|source| PipelineError::MalformedJson {
                path: path.clone(),
                source,
            })?;
        debug!(
            path = %path.display(),
            observed_symbols = trace.observed_symbols.len(),
            observed_edges = trace.observed_edges.len(),
            "loaded runtime trace"
        );
        Ok(Some(trace))
    }

    /// Resolves the runtime trace for `ir`: the standalone file wins when
    /// present, otherwise the embedded `IrRoot.runtime` section (spec §3's
    /// reserved field) is used, otherwise there is no runtime data at all.
    pub fn resolve_runtime_trace(
        slice_dir: &Path,
        ir: &IrRoot,
    ) -> Result<Option<RuntimeTrace>> {
        if let Some(trace) = Self::load_runtime_trace(slice_dir)? {
            return Ok(Some(trace));
        }
        if let Some(embedded) = &ir.runtime {
            debug!("no standalone runtime trace file; using IrRoot.runtime");
            return Ok(Some(embedded.clone()));
        }
        warn!("no runtime trace found; proceeding with runtime_captured = false");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_ir_json() -> &'static str {
        r#"{
            "ir_version": "0.1",
            "language": "java",
            "repo_root": "/repo",
            "adapter_version": "1.0.0",
            "scenario": {"name": "s", "entry_points": [], "run_args": [], "config_files": []},
            "files": [],
            "symbols": [],
            "call_edges": [],
            "config_reads": []
        }"#
    }

    #[test]
    fn loads_minimal_static_ir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("static_ir.json");
        std::fs::write(&path, minimal_ir_json()).unwrap();

        let ir = Loader::load_static_ir(&path).unwrap();
        assert_eq!(ir.ir_version, "0.1");
        assert!(ir.symbols.is_empty());
    }

    #[test]
    fn ignores_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("static_ir.json");
        let mut json: serde_json::Value = serde_json::from_str(minimal_ir_json()).unwrap();
        json["totally_unknown_field"] = serde_json::json!(42);
        std::fs::write(&path, json.to_string()).unwrap();

        let ir = Loader::load_static_ir(&path).unwrap();
        assert_eq!(ir.language, "java");
    }

    #[test]
    fn malformed_json_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("static_ir.json");
        std::fs::write(&path, b"{not json").unwrap();

        let err = Loader::load_static_ir(&path).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedJson { .. }));
    }

    #[test]
    fn missing_static_ir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does_not_exist.json");
        let err = Loader::load_static_ir(&path).unwrap_err();
        assert!(matches!(err, PipelineError::IoFailure { .. }));
    }

    #[test]
    fn absent_runtime_trace_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let trace = Loader::load_runtime_trace(dir.path()).unwrap();
        assert!(trace.is_none());
    }

    #[test]
    fn prefers_runtime_subdirectory_over_legacy_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("runtime")).unwrap();

        let preferred = dir.path().join(RUNTIME_TRACE_PREFERRED);
        let legacy = dir.path().join(RUNTIME_TRACE_LEGACY);
        std::fs::write(
            &preferred,
            r#"{"observed_symbols":[{"symbol_id":"a","call_count":1}],"observed_edges":[],"config_reads":[]}"#,
        )
        .unwrap();
        std::fs::write(
            &legacy,
            r#"{"observed_symbols":[],"observed_edges":[],"config_reads":[]}"#,
        )
        .unwrap();

        let trace = Loader::load_runtime_trace(dir.path()).unwrap().unwrap();
        assert_eq!(trace.observed_symbols.len(), 1);
    }

    #[test]
    fn malformed_runtime_trace_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(RUNTIME_TRACE_LEGACY), b"not json").unwrap();
        let err = Loader::load_runtime_trace(dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedJson { .. }));
    }

    #[test]
    fn resolve_falls_back_to_embedded_runtime_when_no_file_exists() {
        let dir = tempfile::tempdir().unwrap();
        let mut ir: IrRoot = serde_json::from_str(minimal_ir_json()).unwrap();
        ir.runtime = Some(RuntimeTrace {
            observed_symbols: vec![crate::domain::models::ObservedSymbol {
                symbol_id: "a".into(),
                call_count: 7,
            }],
            observed_edges: vec![],
            config_reads: vec![],
        });

        let trace = Loader::resolve_runtime_trace(dir.path(), &ir)
            .unwrap()
            .unwrap();
        assert_eq!(trace.observed_symbols.len(), 1);
        assert_eq!(trace.observed_symbols[0].call_count, 7);
    }

    #[test]
    fn resolve_prefers_standalone_file_over_embedded_runtime() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(RUNTIME_TRACE_LEGACY),
            r#"{"observed_symbols":[{"symbol_id":"file","call_count":1}],"observed_edges":[],"config_reads":[]}"#,
        )
        .unwrap();
        let mut ir: IrRoot = serde_json::from_str(minimal_ir_json()).unwrap();
        ir.runtime = Some(RuntimeTrace {
            observed_symbols: vec![crate::domain::models::ObservedSymbol {
                symbol_id: "embedded".into(),
                call_count: 9,
            }],
            observed_edges: vec![],
            config_reads: vec![],
        });

        let trace = Loader::resolve_runtime_trace(dir.path(), &ir)
            .unwrap()
            .unwrap();
        assert_eq!(trace.observed_symbols[0].symbol_id.as_str(), "file");
    }

    #[test]
    fn resolve_returns_none_when_neither_file_nor_embedded_runtime_exists() {
        let dir = tempfile::tempdir().unwrap();
        let ir: IrRoot = serde_json::from_str(minimal_ir_json()).unwrap();
        let trace = Loader::resolve_runtime_trace(dir.path(), &ir).unwrap();
        assert!(trace.is_none());
    }
}
