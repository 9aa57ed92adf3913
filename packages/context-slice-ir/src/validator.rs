//! Stage 2: Validator
//!
//! Checks the loaded [`IrRoot`] against the wire contract before anything
//! downstream trusts it (spec §4.2, §7). Every failure here is fatal: the
//! pipeline has no way to repair a schema-version mismatch or a dangling
//! file reference, only to reject it.

use std::collections::HashSet;

use tracing::info;

use crate::domain::models::{IrRoot, SUPPORTED_IR_VERSION};
use crate::errors::{PipelineError, Result};

pub struct Validator;

impl Validator {
    /// Runs every structural check spec §4.2 requires, in the order the
    /// spec lists them, returning on the first violation.
    pub fn validate(ir: &IrRoot) -> Result<()> {
        Self::check_schema_version(ir)?;
        Self::check_file_references(ir)?;
        Self::check_unique_symbol_ids(ir)?;
        Self::check_line_ranges(ir)?;
        info!(symbols = ir.symbols.len(), "static IR validated");
        Ok(())
    }

    fn check_schema_version(ir: &IrRoot) -> Result<()> {
        if ir.ir_version != SUPPORTED_IR_VERSION {
            return Err(PipelineError::SchemaVersionMismatch {
                expected: SUPPORTED_IR_VERSION.to_string(),
                found: ir.ir_version.clone(),
            });
        }
        Ok(())
    }

    fn check_unique_symbol_ids(ir: &IrRoot) -> Result<()> {
        let mut seen = HashSet::with_capacity(ir.symbols.len());
        for symbol in &ir.symbols {
            if !seen.insert(&symbol.id) {
                return Err(PipelineError::DuplicateSymbolId(symbol.id.clone()));
            }
        }
        Ok(())
    }

    fn check_file_references(ir: &IrRoot) -> Result<()> {
        let known_files: HashSet<_> = ir.files.iter().map(|f| &f.id).collect();
        for symbol in &ir.symbols {
            if !known_files.contains(&symbol.file_id) {
                return Err(PipelineError::UnknownFileId {
                    symbol: symbol.id.clone(),
                    file: symbol.file_id.as_str().to_string(),
                });
            }
        }
        Ok(())
    }

    fn check_line_ranges(ir: &IrRoot) -> Result<()> {
        for symbol in &ir.symbols {
            if symbol.line_end < symbol.line_start {
                return Err(PipelineError::InvalidLineRange {
                    symbol: symbol.id.clone(),
                    line_start: symbol.line_start,
                    line_end: symbol.line_end,
                });
            }
        }
        Ok(())
    }
}
