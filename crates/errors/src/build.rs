//! Build error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error("no artifact produced; tried {tried}")]
    NoArtifact { tried: String },

    #[error("virtual environment creation failed: {message}")]
    VenvFailed { message: String },

    #[error("dependency installation failed: {message}")]
    InstallFailed { message: String },

    #[error("no builder available for this plan")]
    NoBuilder,
}

impl UserFacingError for BuildError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NoArtifact { .. } => Some(
                "Inspect the builder output above; rerun with --debug for full command logs.",
            ),
            Self::VenvFailed { .. } => Some("Check that the Python installation ships the venv module."),
            Self::InstallFailed { .. } => {
                Some("Check network access and the pinned versions in the requirements file.")
            }
            Self::NoBuilder => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::InstallFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::NoArtifact { .. } => "build.no_artifact",
            Self::VenvFailed { .. } => "build.venv_failed",
            Self::InstallFailed { .. } => "build.install_failed",
            Self::NoBuilder => "build.no_builder",
        })
    }
}
