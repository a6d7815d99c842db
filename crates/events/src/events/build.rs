use crate::FailureContext;
use pyfreeze_types::BuilderKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Position of an attempt in the builder order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStage {
    Primary,
    Fallback,
}

impl std::fmt::Display for BuildStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Freezing tool events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BuildEvent {
    /// A builder is about to run
    AttemptStarted {
        builder: BuilderKind,
        stage: BuildStage,
        command: String,
        /// Flags recovered from the composed argument list
        summary: String,
    },

    /// The builder returned but left nothing at the expected paths
    ArtifactMissing {
        builder: BuilderKind,
        exit_code: Option<i32>,
        expected: Vec<PathBuf>,
    },

    /// Switching from the primary to the fallback builder
    FallbackEngaged {
        from: BuilderKind,
        to: BuilderKind,
    },

    Succeeded {
        builder: BuilderKind,
        artifact: PathBuf,
        size_bytes: u64,
        duration: Duration,
    },

    Failed { failure: FailureContext },

    /// Sidecar logs the artifact writes when the console is hidden
    SidecarLogs { stdout: PathBuf, stderr: PathBuf },
}
