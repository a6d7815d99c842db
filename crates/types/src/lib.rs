#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for pyfreeze
//!
//! This crate provides the value types shared between the planner, the
//! builder and the CLI: toolkits, builder kinds, the resolved build plan
//! and the fallback state.

pub mod plan;
pub mod reports;
pub mod state;
pub mod toolkit;

// Re-export commonly used types
pub use plan::{BuildPlan, EntrySource, HostPlatform, VENV_DIR};
pub use reports::BuildReport;
pub use state::BuildState;
pub use toolkit::Toolkit;

use serde::{Deserialize, Serialize};

/// External freezing tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuilderKind {
    /// Compiling freezer, attempted first by default
    Nuitka,
    /// Bundling freezer, the fallback
    PyInstaller,
}

impl BuilderKind {
    /// Name used for the per-builder output folder and in diagnostics
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nuitka => "nuitka",
            Self::PyInstaller => "pyinstaller",
        }
    }

    /// Module passed to `python -m`
    #[must_use]
    pub fn python_module(self) -> &'static str {
        match self {
            Self::Nuitka => "nuitka",
            Self::PyInstaller => "PyInstaller",
        }
    }

    /// Packages pip must install for this builder to run
    #[must_use]
    pub fn pip_packages(self) -> &'static [&'static str] {
        match self {
            Self::Nuitka => &["nuitka", "ordered-set", "zstandard"],
            Self::PyInstaller => &["pyinstaller"],
        }
    }

    /// Default attempt order when this builder is picked as primary
    #[must_use]
    pub fn attempt_order(self, allow_fallback: bool) -> Vec<Self> {
        match self {
            Self::Nuitka if allow_fallback => vec![Self::Nuitka, Self::PyInstaller],
            other => vec![other],
        }
    }
}

impl std::fmt::Display for BuilderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BuilderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nuitka" => Ok(Self::Nuitka),
            "pyinstaller" => Ok(Self::PyInstaller),
            _ => Err(format!("unknown builder: {s}")),
        }
    }
}

impl clap::ValueEnum for BuilderKind {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Nuitka, Self::PyInstaller]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

impl Default for BuilderKind {
    fn default() -> Self {
        Self::Nuitka
    }
}

/// Which dependency list gets installed into the build environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencySet {
    /// Everything the application declares; toolkits are collected whole
    Full,
    /// Only the slim requirement list; no whole-package collection
    Slim,
}

impl DependencySet {
    /// Requirement files probed in order, relative to the repository root
    #[must_use]
    pub fn requirement_candidates(self) -> &'static [&'static str] {
        match self {
            Self::Full => &["env/requirements.txt", "requirements.txt"],
            Self::Slim => &["env/requirements-slim.txt", "requirements-slim.txt"],
        }
    }
}

impl Default for DependencySet {
    fn default() -> Self {
        Self::Full
    }
}

impl std::fmt::Display for DependencySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Slim => write!(f, "slim"),
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Always,
    Auto,
    Never,
}

// Implement clap::ValueEnum for ColorChoice
impl clap::ValueEnum for ColorChoice {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Always, Self::Auto, Self::Never]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Always => clap::builder::PossibleValue::new("always"),
            Self::Auto => clap::builder::PossibleValue::new("auto"),
            Self::Never => clap::builder::PossibleValue::new("never"),
        })
    }
}

impl Default for ColorChoice {
    fn default() -> Self {
        Self::Auto
    }
}
