//! Domain Models - Core entities
//!
//! Pure data types shared by every pipeline stage. None of these types carry
//! behavior beyond small accessors; the stage modules (`loader`, `validator`,
//! `merger`, `graph`, `traversal`, `expansion`, `compressor`, `packager`) own
//! the logic that produces and consumes them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Schema version this pipeline understands. Validation is exact-match, not
/// semver-compatible, per the wire contract.
pub const SUPPORTED_IR_VERSION: &str = "0.1";

/// Interned-style identifier for a [`File`]. Wrapping the raw string keeps
/// `HashMap<FileId, _>` lookups from being accidentally indexed by a
/// `SymbolId` or a bare path string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub String);

impl FileId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for FileId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FileId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical `<lang>::<fqcn>[::<method>(<params>)]` identifier for a [`Symbol`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub String);

impl SymbolId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SymbolId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SymbolId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A source file recorded by the static analyzer. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub id: FileId,
    pub path: String,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// Discriminator for [`Symbol::kind`]. Acts as the sum-type tag over the four
/// shapes of declaration the static analyzer can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Class,
    Interface,
    Method,
    Constructor,
}

impl SymbolKind {
    /// True for the kinds Expansion's "co-located members" rule re-includes
    /// (container-level declarations, not individual methods).
    pub fn is_container_kind(self) -> bool {
        matches!(
            self,
            SymbolKind::Class | SymbolKind::Interface | SymbolKind::Constructor
        )
    }
}

/// A class, interface, method, or constructor declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub kind: SymbolKind,
    pub name: String,
    pub language: String,
    pub file_id: FileId,
    pub line_start: u32,
    pub line_end: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<SymbolId>,
    #[serde(default)]
    pub annotations: Vec<String>,
    #[serde(default)]
    pub is_entry_point: bool,
    #[serde(default)]
    pub is_framework: bool,
    #[serde(default)]
    pub is_generated: bool,
}

/// A static or runtime-annotated call from `caller` to `callee`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEdge {
    pub caller: SymbolId,
    pub callee: SymbolId,
    pub is_static: bool,
    pub runtime_observed: bool,
    pub call_count: u64,
}

/// A configuration key read observed (statically or at runtime) inside a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRead {
    pub symbol_id: SymbolId,
    pub config_key: String,
    pub resolved_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

/// Sentinel written into [`ConfigRead::resolved_value`] when the producer
/// observed a null/unset configuration value.
pub const UNSET_CONFIG_VALUE: &str = "<unset>";

/// A symbol observed at runtime, with its total invocation count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedSymbol {
    pub symbol_id: SymbolId,
    pub call_count: u64,
}

/// An edge observed at runtime, with its total invocation count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedEdge {
    pub caller: SymbolId,
    pub callee: SymbolId,
    pub call_count: u64,
}

/// The runtime instrumentation agent's output. Symbol and edge ids here may
/// reference symbols absent from the static IR; the Merger resolves that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeTrace {
    #[serde(default)]
    pub observed_symbols: Vec<ObservedSymbol>,
    #[serde(default)]
    pub observed_edges: Vec<ObservedEdge>,
    #[serde(default)]
    pub config_reads: Vec<ConfigRead>,
}

/// A named, reproducible user journey captured by one `record` invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub entry_points: Vec<SymbolId>,
    #[serde(default)]
    pub run_args: Vec<String>,
    #[serde(default)]
    pub config_files: Vec<String>,
}

/// The top-level shape of `static_ir.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrRoot {
    pub ir_version: String,
    pub language: String,
    pub repo_root: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_id: Option<String>,
    pub adapter_version: String,
    pub scenario: Scenario,
    #[serde(default)]
    pub files: Vec<File>,
    #[serde(default)]
    pub symbols: Vec<Symbol>,
    #[serde(default)]
    pub call_edges: Vec<CallEdge>,
    #[serde(default)]
    pub config_reads: Vec<ConfigRead>,
    /// Reserved embedded runtime section. The producer may leave this unset;
    /// the Loader always prefers the standalone `runtime_trace.json` file
    /// when present and falls back to this field otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<RuntimeTrace>,
}

/// Directed multigraph of symbols built from the merged IR.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: std::collections::HashSet<SymbolId>,
    pub out_edges: std::collections::HashMap<SymbolId, Vec<CallEdge>>,
    pub in_edges: std::collections::HashMap<SymbolId, Vec<SymbolId>>,
    pub file_map: std::collections::HashMap<SymbolId, FileId>,
}

/// Scenario-level metadata packaged alongside the slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioMeta {
    pub scenario_name: String,
    pub adapter_version: String,
    pub language: String,
    pub timestamp_utc: String,
    pub timestamp_unix: i64,
    pub runtime_captured: bool,
}

/// The final, ordered, deterministic projection of the merged IR.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slice {
    pub ordered_symbols: Vec<SymbolId>,
    pub relevant_file_paths: Vec<String>,
    pub relevant_config_reads: Vec<ConfigRead>,
    pub scenario_meta: ScenarioMeta,
    /// Call edges whose endpoints are both present in `ordered_symbols`,
    /// carried through to `call_graph.json`. Not part of spec.md's abstract
    /// `Slice` record but required to satisfy testable invariant 2 (every
    /// edge in `call_graph.json` has both endpoints in `ordered_symbols`) —
    /// the JSON artifact needs the edges, not just the node list.
    pub edges: Vec<CallEdge>,
}
