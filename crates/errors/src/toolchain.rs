//! Toolchain error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ToolchainError {
    #[error("required tool not found on PATH: {tool}")]
    ToolNotFound { tool: String },

    #[error("virtual environment interpreter missing: {path}")]
    VenvInterpreterMissing { path: String },
}

impl UserFacingError for ToolchainError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ToolNotFound { .. } => {
                Some("Install the tool or set [toolchain] in pyfreeze.toml to its location.")
            }
            Self::VenvInterpreterMissing { .. } => {
                Some("Drop --skip-install so the virtual environment is created.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::ToolNotFound { .. } => "toolchain.tool_not_found",
            Self::VenvInterpreterMissing { .. } => "toolchain.venv_interpreter_missing",
        })
    }
}
