//! Immutable facts about the run, threaded through every probe

use pyfreeze_config::fixed_paths::EXCLUDED_DIRS;
use pyfreeze_errors::{ConfigError, Error};
use pyfreeze_types::HostPlatform;
use std::path::{Path, PathBuf};

/// Everything the planner would otherwise read from process-wide state
#[derive(Debug, Clone)]
pub struct PlanContext {
    repo_root: PathBuf,
    host: HostPlatform,
    excluded_dirs: Vec<String>,
    /// Specific folders skipped wherever their name appears elsewhere
    excluded_paths: Vec<PathBuf>,
    upx_dir: Option<PathBuf>,
}

impl PlanContext {
    /// Create a context rooted at `repo_root`
    ///
    /// # Errors
    ///
    /// Returns a config error if `repo_root` is not an existing directory.
    pub fn new(repo_root: impl AsRef<Path>) -> Result<Self, Error> {
        let repo_root = repo_root.as_ref();
        if !repo_root.is_dir() {
            return Err(ConfigError::InvalidRepoRoot {
                path: repo_root.display().to_string(),
            }
            .into());
        }
        let repo_root = repo_root
            .canonicalize()
            .map_err(|e| Error::io_with_path(&e, repo_root))?;

        Ok(Self {
            repo_root,
            host: HostPlatform::current(),
            excluded_dirs: EXCLUDED_DIRS.iter().map(|d| (*d).to_string()).collect(),
            excluded_paths: Vec::new(),
            upx_dir: None,
        })
    }

    #[must_use]
    pub fn with_host(mut self, host: HostPlatform) -> Self {
        self.host = host;
        self
    }

    /// Exclude another directory name from source scans
    #[must_use]
    pub fn with_excluded_dir(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() && !self.excluded_dirs.contains(&name) {
            self.excluded_dirs.push(name);
        }
        self
    }

    /// Exclude one folder of the repository from source scans
    ///
    /// Relative paths are taken from the repository root. Paths outside the
    /// repository are never walked and are ignored.
    #[must_use]
    pub fn with_excluded_path(mut self, path: &Path) -> Self {
        let path = if path.is_relative() {
            self.repo_root.join(path)
        } else {
            path.to_path_buf()
        };
        let path = path.canonicalize().unwrap_or(path);
        if path != self.repo_root
            && path.starts_with(&self.repo_root)
            && !self.excluded_paths.contains(&path)
        {
            self.excluded_paths.push(path);
        }
        self
    }

    /// Record where `upx` was found on the search path
    #[must_use]
    pub fn with_upx_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.upx_dir = dir;
        self
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    pub fn host(&self) -> &HostPlatform {
        &self.host
    }

    pub fn excluded_paths(&self) -> &[PathBuf] {
        &self.excluded_paths
    }

    pub fn upx_dir(&self) -> Option<&Path> {
        self.upx_dir.as_deref()
    }

    /// Whether a directory is skipped by source scans
    pub fn is_excluded(&self, dir: &Path) -> bool {
        let by_name = dir
            .file_name()
            .is_some_and(|name| self.excluded_dirs.iter().any(|d| name == d.as_str()));
        by_name || self.excluded_paths.iter().any(|p| p == dir)
    }
}
