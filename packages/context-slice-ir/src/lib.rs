/*
 * context-slice-ir - Context Slice IR Pipeline
 *
 * Feature-First Hexagonal Architecture:
 * - domain/      : Common models (Symbol, File, CallEdge) and driven ports (Clock)
 * - loader, validator, merger, graph, traversal, expansion, compressor,
 *   packager : the eight sequential pipeline stages
 * - config       : `context-slice.json` loading
 * - pipeline     : stage orchestration
 */

pub mod compressor;
pub mod config;
pub mod domain;
pub mod errors;
pub mod expansion;
pub mod graph;
pub mod loader;
pub mod merger;
pub mod packager;
pub mod pipeline;
pub mod traversal;
pub mod validator;

pub use domain::models::{
    CallEdge, ConfigRead, File, FileId, IrRoot, Scenario, ScenarioMeta, Slice, Symbol, SymbolId,
    SymbolKind,
};
pub use errors::{PipelineError, Result, Warning};
