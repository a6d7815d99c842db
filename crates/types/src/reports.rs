//! Report type definitions for operations

use crate::BuilderKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Build report
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildReport {
    /// Builder that produced the artifact
    pub builder: BuilderKind,
    /// Whether the primary builder was skipped over
    pub used_fallback: bool,
    /// Output file path
    pub artifact: PathBuf,
    /// Artifact size in bytes
    pub size_bytes: u64,
    /// Build duration
    pub duration_ms: u64,
}
