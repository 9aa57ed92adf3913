//! Configuration loading for `context-slice.json`
//!
//! Optional, at the current working directory (spec §6). Unknown keys are
//! ignored rather than rejected — the format is meant to grow without
//! breaking older pipeline binaries reading a newer config file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{PipelineError, Result};

pub const CONFIG_FILE_NAME: &str = "context-slice.json";

fn default_depth_limit() -> u32 {
    2
}

fn default_max_collection_elements() -> u32 {
    3
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformsConfig {
    #[serde(default = "default_depth_limit")]
    pub depth_limit: u32,
    #[serde(default = "default_max_collection_elements")]
    pub max_collection_elements: u32,
}

impl Default for TransformsConfig {
    fn default() -> Self {
        Self {
            depth_limit: default_depth_limit(),
            max_collection_elements: default_max_collection_elements(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSliceConfig {
    #[serde(default)]
    pub transforms: TransformsConfig,
}

impl ContextSliceConfig {
    /// Reads `context-slice.json` from `dir` if present; otherwise returns
    /// the built-in defaults. A present-but-malformed file is fatal — the
    /// user clearly intended to override behavior and the override failed
    /// to parse.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            debug!("no context-slice.json found, using defaults");
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&path).map_err(|source| PipelineError::IoFailure {
                path: path.clone(),
                source,
            })?;
        let config: Self = serde_json::from_str(&contents).map_err(|source| {
            PipelineError::MalformedJson {
                path: path.clone(),
                source,
            }
        })?;
        debug!(
            depth_limit = config.transforms.depth_limit,
            max_collection_elements = config.transforms.max_collection_elements,
            "loaded context-slice.json"
        );
        Ok(config)
    }
}
