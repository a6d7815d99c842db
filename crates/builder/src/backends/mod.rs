//! Freezing tool backends
//!
//! A backend knows how to spell a [`BuildPlan`] as command-line arguments
//! for its tool and where that tool leaves the executable. It never runs
//! anything itself.

use pyfreeze_platform::{OutputMode, PlatformCommand};
use pyfreeze_types::{BuildPlan, BuilderKind};
use std::path::{Path, PathBuf};

mod nuitka;
mod pyinstaller;

pub use nuitka::NuitkaBackend;
pub use pyinstaller::PyInstallerBackend;

/// Trait for freezing tool implementations
pub trait FreezeBackend: Send + Sync {
    fn kind(&self) -> BuilderKind;

    /// Arguments following `python -m <module>`, entry script last
    fn compose_args(&self, plan: &BuildPlan) -> Vec<String>;

    /// Paths the artifact may appear at, in the order they are checked
    fn expected_artifacts(&self, plan: &BuildPlan) -> Vec<PathBuf>;

    /// Log files a windowed artifact writes next to itself at runtime
    fn sidecar_logs(&self, _plan: &BuildPlan, _artifact: &Path) -> Option<(PathBuf, PathBuf)> {
        None
    }

    /// Full command line run with the environment's interpreter
    fn command(&self, python: &Path, plan: &BuildPlan) -> PlatformCommand {
        let mut cmd = PlatformCommand::new(python.to_string_lossy());
        cmd.arg("-m")
            .arg(self.kind().python_module())
            .args(self.compose_args(plan))
            .current_dir(&plan.repo_root)
            .output_mode(OutputMode::Inherit);
        cmd
    }
}

/// Registry of available backends
pub struct BackendRegistry {
    backends: Vec<Box<dyn FreezeBackend>>,
}

impl BackendRegistry {
    /// Create a new registry with both freezing tools
    #[must_use]
    pub fn new() -> Self {
        Self {
            backends: vec![
                Box::new(NuitkaBackend::new()),
                Box::new(PyInstallerBackend::new()),
            ],
        }
    }

    /// Backend for a builder kind
    pub fn get(&self, kind: BuilderKind) -> Option<&dyn FreezeBackend> {
        self.backends
            .iter()
            .find(|b| b.kind() == kind)
            .map(std::convert::AsRef::as_ref)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// First candidate that exists as a regular file
pub(crate) fn find_artifact(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.is_file()).cloned()
}

pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
