//! Fixed names pyfreeze looks for inside a repository
//!
//! These are conventions rather than settings; only the workspace and dist
//! folders can be moved through `[paths]`.

pub const CONFIG_FILE_NAME: &str = "pyfreeze.toml";

pub const DEFAULT_WORKSPACE_DIR: &str = ".pyfreeze";
pub const DEFAULT_DIST_DIR: &str = "dist";

pub const LOGS_DIR: &str = "logs";

pub const ICON_DIR: &str = "icon";
pub const DATA_DIR: &str = "data";

/// Directory names never scanned for entry scripts or toolkit imports
pub const EXCLUDED_DIRS: &[&str] = &[
    ".pyfreeze",
    "build",
    "dist",
    "env",
    pyfreeze_types::VENV_DIR,
    ".venv",
    "test",
    "tests",
    ".git",
    ".hg",
    ".svn",
    "__pycache__",
];
