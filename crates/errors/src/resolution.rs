//! Resolution error types
//!
//! Raised when the planner cannot find something it needs before any
//! external tool is started.

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ResolutionError {
    #[error("no entry script found under {root}")]
    EntryNotFound { root: String },

    #[error("no requirements file found under {root} (looked for {searched})")]
    RequirementsNotFound { root: String, searched: String },
}

impl UserFacingError for ResolutionError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::EntryNotFound { .. } => Some(
                "Add gui/app.py or main.py, guard a script with `if __name__ == \"__main__\":`, or pass --entry.",
            ),
            Self::RequirementsNotFound { .. } => {
                Some("Create env/requirements.txt or requirements.txt, or pass --skip-install.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::EntryNotFound { .. } => "resolution.entry_not_found",
            Self::RequirementsNotFound { .. } => "resolution.requirements_not_found",
        })
    }
}
