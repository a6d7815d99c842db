#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for pyfreeze
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (`pyfreeze.toml` in the repository, or
//!   `~/.config/pyfreeze/config.toml`)
//! - Environment variables
//! - CLI flags (applied by the binary)

pub mod constants;

pub use constants as fixed_paths;

use pyfreeze_errors::{ConfigError, Error};
use pyfreeze_types::{BuilderKind, ColorChoice, DependencySet};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub paths: PathConfig,

    #[serde(default)]
    pub toolchain: ToolchainConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_color_choice")]
    pub color: ColorChoice,
}

/// Build configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default)]
    pub builder: BuilderKind,
    #[serde(default = "default_fallback")]
    pub fallback: bool,
    #[serde(default = "default_one_file")]
    pub one_file: bool,
    #[serde(default = "default_hide_console")]
    pub hide_console: bool,
    #[serde(default)]
    pub dependency_set: DependencySet,
    /// Artifact base name; defaults to the repository folder name
    #[serde(default)]
    pub app_name: Option<String>,
    /// Modules the freezers cannot discover on their own
    #[serde(default)]
    pub extra_modules: Vec<String>,
    /// Icon used instead of searching `icon/`
    #[serde(default)]
    pub icon: Option<PathBuf>,
}

/// Path configuration, relative paths are taken from the repository root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_workspace_dir")]
    pub workspace_dir: PathBuf,
    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,
}

/// External tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolchainConfig {
    /// Interpreter used to create the virtual environment
    #[serde(default)]
    pub python: Option<String>,
    /// Pass the UPX directory to the bundling freezer when `upx` is on PATH
    #[serde(default = "default_upx")]
    pub upx: bool,
}

// Default implementations

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            color: ColorChoice::Auto,
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            builder: BuilderKind::Nuitka,
            fallback: true,
            one_file: false,
            hide_console: true,
            dependency_set: DependencySet::Full,
            app_name: None,
            extra_modules: Vec::new(),
            icon: None,
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            workspace_dir: default_workspace_dir(),
            dist_dir: default_dist_dir(),
        }
    }
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            python: None,
            upx: true,
        }
    }
}

// Default value functions for serde
fn default_color_choice() -> ColorChoice {
    ColorChoice::Auto
}

fn default_fallback() -> bool {
    true
}

fn default_one_file() -> bool {
    false
}

fn default_hide_console() -> bool {
    true
}

fn default_workspace_dir() -> PathBuf {
    PathBuf::from(constants::DEFAULT_WORKSPACE_DIR)
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from(constants::DEFAULT_DIST_DIR)
}

fn default_upx() -> bool {
    true
}

impl Config {
    /// Get the per-user config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("pyfreeze").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: format!("{}: {e}", path.display()),
            })
            .map_err(Into::into)
    }

    /// Load configuration for a repository
    ///
    /// The repository's own `pyfreeze.toml` wins over the per-user file;
    /// with neither present the defaults are used.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load(repo_root: &Path) -> Result<Self, Error> {
        let repo_config = repo_root.join(constants::CONFIG_FILE_NAME);
        if repo_config.is_file() {
            debug!(path = %repo_config.display(), "loading repository config");
            return Self::load_from_file(&repo_config).await;
        }

        match Self::default_path() {
            Ok(user_config) if user_config.is_file() => {
                debug!(path = %user_config.display(), "loading user config");
                Self::load_from_file(&user_config).await
            }
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>, repo_root: &Path) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load(repo_root).await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // PYFREEZE_COLOR
        if let Ok(color) = std::env::var("PYFREEZE_COLOR") {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "PYFREEZE_COLOR".to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        // PYFREEZE_BUILDER
        if let Ok(builder) = std::env::var("PYFREEZE_BUILDER") {
            self.build.builder = builder.parse().map_err(|_| ConfigError::InvalidValue {
                field: "PYFREEZE_BUILDER".to_string(),
                value: builder,
            })?;
        }

        // PYFREEZE_ONEFILE
        if let Ok(one_file) = std::env::var("PYFREEZE_ONEFILE") {
            self.build.one_file = parse_bool("PYFREEZE_ONEFILE", one_file)?;
        }

        // PYFREEZE_CONSOLE
        if let Ok(console) = std::env::var("PYFREEZE_CONSOLE") {
            self.build.hide_console = !parse_bool("PYFREEZE_CONSOLE", console)?;
        }

        // PYFREEZE_PYTHON
        if let Ok(python) = std::env::var("PYFREEZE_PYTHON") {
            if !python.is_empty() {
                self.toolchain.python = Some(python);
            }
        }

        // PYFREEZE_DIST_DIR
        if let Ok(dist) = std::env::var("PYFREEZE_DIST_DIR") {
            if !dist.is_empty() {
                self.paths.dist_dir = PathBuf::from(dist);
            }
        }

        Ok(())
    }

    /// Interpreter used to bootstrap the virtual environment
    #[must_use]
    pub fn python_program(&self) -> String {
        self.toolchain.python.clone().unwrap_or_else(|| {
            if cfg!(windows) {
                "python".to_string()
            } else {
                "python3".to_string()
            }
        })
    }

    /// Workspace directory for a repository
    #[must_use]
    pub fn workspace_path(&self, repo_root: &Path) -> PathBuf {
        repo_root.join(&self.paths.workspace_dir)
    }

    /// Distribution directory for a repository
    #[must_use]
    pub fn dist_path(&self, repo_root: &Path) -> PathBuf {
        repo_root.join(&self.paths.dist_dir)
    }

    /// Artifact base name, falling back to the repository folder name
    #[must_use]
    pub fn app_name(&self, repo_root: &Path) -> String {
        self.build
            .app_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| {
                repo_root
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "app".to_string())
    }
}

fn parse_bool(field: &str, value: String) -> Result<bool, Error> {
    match value.as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value,
        }
        .into()),
    }
}
