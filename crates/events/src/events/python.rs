use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Python virtual environment events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PythonEvent {
    /// Base interpreter found on PATH
    InterpreterFound { path: PathBuf },

    VenvCreating { venv_path: PathBuf },

    VenvCreated { venv_path: PathBuf },

    /// Existing environment kept as is
    VenvReused { venv_path: PathBuf },

    RequirementsInstalling { requirements: PathBuf },

    /// Freezing tools being installed into the environment
    ToolsInstalling { packages: Vec<String> },

    /// Captured output of an environment command, for debug logs
    CommandOutput { command: String, output: String },
}
