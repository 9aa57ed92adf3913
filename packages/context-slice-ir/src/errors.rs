//! Error types for context-slice-ir
//!
//! Two taxonomies, per the propagation policy in spec §7: fatal errors abort
//! the pipeline and surface as `Err`; recoverable conditions are collected
//! per-stage as [`Warning`]s and flushed to the diagnostic stream without
//! interrupting flow.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::models::SymbolId;

/// Fatal pipeline errors. Each carries enough context to print a precise,
/// single-line diagnostic and to exit the hosting process nonzero.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// `ir_version` did not match [`crate::domain::models::SUPPORTED_IR_VERSION`] exactly.
    #[error("schema version mismatch: expected {expected}, found {found}")]
    SchemaVersionMismatch { expected: String, found: String },

    /// A required field was missing or had the wrong shape.
    #[error("malformed IR: {0}")]
    MalformedIr(String),

    /// The same symbol id appeared twice in the static symbol list.
    #[error("duplicate symbol id in input: {0}")]
    DuplicateSymbolId(SymbolId),

    /// A symbol referenced a file id that does not exist.
    #[error("symbol {symbol} references unknown file {file}")]
    UnknownFileId { symbol: SymbolId, file: String },

    /// `line_end < line_start` for some symbol.
    #[error("symbol {symbol} has line_end ({line_end}) < line_start ({line_start})")]
    InvalidLineRange {
        symbol: SymbolId,
        line_start: u32,
        line_end: u32,
    },

    /// Reading or parsing a required input file failed.
    #[error("I/O error for {path}: {source}")]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `static_ir.json` (or another required input) was not valid JSON.
    #[error("malformed JSON in {path}: {source}")]
    MalformedJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A consumer asked for a slice directory that lacks the required output files.
    #[error("{0} is missing one or more required slice output files")]
    MissingSlice(PathBuf),
}

impl PipelineError {
    /// Category label for structured logging, mirroring the taxonomy in spec §7.
    pub fn category(&self) -> &'static str {
        match self {
            Self::SchemaVersionMismatch { .. } => "schema_version_mismatch",
            Self::MalformedIr(_) => "malformed_ir",
            Self::DuplicateSymbolId(_) => "duplicate_symbol_id",
            Self::UnknownFileId { .. } => "malformed_ir",
            Self::InvalidLineRange { .. } => "malformed_ir",
            Self::IoFailure { .. } => "io_failure",
            Self::MalformedJson { .. } => "malformed_ir",
            Self::MissingSlice(_) => "missing_slice",
        }
    }
}

/// Result alias for fallible pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Recoverable conditions, collected per-stage and logged at stage end
/// without aborting the pipeline (spec §7).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Warning {
    /// A call edge endpoint did not resolve to a known symbol; the edge was dropped.
    #[error("dangling {kind} reference in edge: {id}")]
    DanglingReference { kind: &'static str, id: String },

    /// A runtime-observed symbol or edge endpoint has no static-IR counterpart.
    #[error("runtime id has no static-IR counterpart, discarding its count: {0}")]
    UnknownRuntimeId(String),

    /// No runtime data and no entry points reached anything; fallback traversal applied.
    #[error("hot set empty after entry-point/runtime pass; falling back to full-edge traversal")]
    EmptyHotSet,
}

impl Warning {
    /// Category label for structured logging, mirroring [`PipelineError::category`].
    pub fn category(&self) -> &'static str {
        match self {
            Self::DanglingReference { .. } => "dangling_reference",
            Self::UnknownRuntimeId(_) => "unknown_runtime_id",
            Self::EmptyHotSet => "empty_hot_set",
        }
    }
}
