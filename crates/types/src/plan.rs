//! The resolved build plan

use crate::{BuilderKind, DependencySet, Toolkit};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Build venv folder name, below the workspace
pub const VENV_DIR: &str = "venv";

/// Host facts that change how arguments and artifact names are spelled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPlatform {
    /// Separator between source and destination in `--add-data`
    pub data_separator: char,
    /// Suffix appended to executable names (`.exe` on Windows)
    pub exe_suffix: String,
}

impl HostPlatform {
    /// Facts for the platform this binary was compiled for
    #[must_use]
    pub fn current() -> Self {
        Self {
            data_separator: if cfg!(windows) { ';' } else { ':' },
            exe_suffix: std::env::consts::EXE_SUFFIX.to_string(),
        }
    }

    #[must_use]
    pub fn windows() -> Self {
        Self {
            data_separator: ';',
            exe_suffix: ".exe".to_string(),
        }
    }
}

impl Default for HostPlatform {
    fn default() -> Self {
        Self::current()
    }
}

/// Which resolution tier produced the entry script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    /// Given on the command line or in config
    Explicit,
    /// One of the conventional relative paths
    Conventional,
    /// First source file carrying a `__main__` guard
    MainGuard,
}

impl std::fmt::Display for EntrySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Explicit => write!(f, "explicit"),
            Self::Conventional => write!(f, "conventional path"),
            Self::MainGuard => write!(f, "__main__ guard"),
        }
    }
}

/// Everything needed to invoke a freezing tool, resolved once per run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildPlan {
    /// Repository being frozen
    pub repo_root: PathBuf,
    /// Absolute path to the script handed to the builder
    pub entry_script: PathBuf,
    pub entry_source: EntrySource,
    pub toolkit: Toolkit,
    /// Builder plugin identifiers, empty for unknown toolkits
    pub plugin_names: Vec<String>,
    /// Attempt order, primary first
    pub builders: Vec<BuilderKind>,
    pub one_file: bool,
    pub hide_console: bool,
    pub icon_path: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    /// Distribution root; each builder writes below its own folder
    pub dist_dir: PathBuf,
    /// Scratch space holding the venv and builder work dirs
    pub workspace_dir: PathBuf,
    /// Artifact base name, without executable suffix
    pub app_name: String,
    pub dependency_set: DependencySet,
    /// Requirement list installed into the venv, absent when installs are skipped
    pub requirements: Option<PathBuf>,
    /// Modules to force into the bundle
    pub extra_modules: Vec<String>,
    /// Directory holding `upx`, when it was found
    pub upx_dir: Option<PathBuf>,
    pub host: HostPlatform,
}

impl BuildPlan {
    #[must_use]
    pub fn primary(&self) -> Option<BuilderKind> {
        self.builders.first().copied()
    }

    /// Virtual environment the builders run from
    #[must_use]
    pub fn venv_dir(&self) -> PathBuf {
        self.workspace_dir.join(VENV_DIR)
    }

    /// Per-builder output folder
    #[must_use]
    pub fn output_dir(&self, kind: BuilderKind) -> PathBuf {
        self.dist_dir.join(kind.as_str())
    }

    /// Stem of the entry script, used by the second artifact naming convention
    #[must_use]
    pub fn entry_stem(&self) -> String {
        self.entry_script
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.app_name.clone())
    }

    /// `name` plus the host executable suffix
    #[must_use]
    pub fn executable_name(&self, name: &str) -> String {
        format!("{name}{}", self.host.exe_suffix)
    }

    /// Path relative to the repository root, for display
    #[must_use]
    pub fn display_path<'a>(&self, path: &'a Path) -> std::borrow::Cow<'a, str> {
        path.strip_prefix(&self.repo_root)
            .unwrap_or(path)
            .to_string_lossy()
    }
}
