//! Builder fallback states

use crate::BuilderKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Progress of a freeze through its primary and fallback builders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BuildState {
    NotStarted,
    TryingPrimary { builder: BuilderKind },
    TryingFallback { builder: BuilderKind },
    Succeeded { builder: BuilderKind, artifact: PathBuf },
    Failed,
}

impl BuildState {
    /// Builder currently being attempted
    #[must_use]
    pub fn active_builder(&self) -> Option<BuilderKind> {
        match self {
            Self::TryingPrimary { builder } | Self::TryingFallback { builder } => Some(*builder),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Failed)
    }
}

impl std::fmt::Display for BuildState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not started"),
            Self::TryingPrimary { builder } => write!(f, "trying primary ({builder})"),
            Self::TryingFallback { builder } => write!(f, "trying fallback ({builder})"),
            Self::Succeeded { builder, .. } => write!(f, "succeeded ({builder})"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
