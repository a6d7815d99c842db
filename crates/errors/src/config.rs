//! Configuration error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("parse error: {message}")]
    ParseError { message: String },

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("explicit entry script does not exist: {path}")]
    EntryNotFound { path: String },

    #[error("explicit entry script is not a regular file: {path}")]
    EntryNotAFile { path: String },

    #[error("explicit icon does not exist: {path}")]
    IconNotFound { path: String },

    #[error("repository root is not a directory: {path}")]
    InvalidRepoRoot { path: String },
}

impl UserFacingError for ConfigError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => {
                Some("Pass an existing file to --config or drop the flag to use defaults.")
            }
            Self::ParseError { .. } | Self::InvalidValue { .. } => {
                Some("Fix the configuration value and retry the command.")
            }
            Self::EntryNotFound { .. } | Self::EntryNotAFile { .. } => {
                Some("Point --entry at an existing .py file, or omit it to auto-detect.")
            }
            Self::IconNotFound { .. } => Some("Point --icon at an existing .ico file."),
            Self::InvalidRepoRoot { .. } => Some("Run from the repository root or pass it explicitly."),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::NotFound { .. } => "config.not_found",
            Self::ParseError { .. } => "config.parse_error",
            Self::InvalidValue { .. } => "config.invalid_value",
            Self::EntryNotFound { .. } => "config.entry_not_found",
            Self::EntryNotAFile { .. } => "config.entry_not_a_file",
            Self::IconNotFound { .. } => "config.icon_not_found",
            Self::InvalidRepoRoot { .. } => "config.invalid_repo_root",
        };
        Some(code)
    }
}
