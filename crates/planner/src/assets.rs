//! Icon and data directory discovery

use crate::PlanContext;
use ignore::WalkBuilder;
use pyfreeze_config::fixed_paths::{DATA_DIR, ICON_DIR};
use pyfreeze_errors::{ConfigError, Error};
use std::path::{Path, PathBuf};

/// Auxiliary files to bundle with the executable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assets {
    pub icon: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    /// PNG images found in the icon folder when no `.ico` was present
    pub unusable_icons: Vec<PathBuf>,
}

/// Locate the icon and data directory
///
/// An override is taken as is (relative to the repository root); otherwise
/// the lexicographically first `.ico` below `icon/` is used.
///
/// # Errors
///
/// Returns `ConfigError::IconNotFound` when the override does not exist.
pub fn locate_assets(ctx: &PlanContext, icon_override: Option<&Path>) -> Result<Assets, Error> {
    let mut assets = Assets::default();

    if let Some(icon) = icon_override {
        let candidate = if icon.is_absolute() {
            icon.to_path_buf()
        } else {
            ctx.repo_root().join(icon)
        };
        if !candidate.is_file() {
            return Err(ConfigError::IconNotFound {
                path: icon.display().to_string(),
            }
            .into());
        }
        assets.icon = Some(candidate);
    } else {
        let images = icon_images(&ctx.repo_root().join(ICON_DIR));
        assets.icon = images.iter().find(|p| has_extension(p, "ico")).cloned();
        if assets.icon.is_none() {
            assets.unusable_icons = images
                .into_iter()
                .filter(|p| has_extension(p, "png"))
                .collect();
        }
    }

    let data_dir = ctx.repo_root().join(DATA_DIR);
    if data_dir.is_dir() {
        assets.data_dir = Some(data_dir);
    }

    Ok(assets)
}

fn icon_images(icon_dir: &Path) -> Vec<PathBuf> {
    if !icon_dir.is_dir() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkBuilder::new(icon_dir)
        .standard_filters(false)
        .build()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .map(ignore::DirEntry::into_path)
        .filter(|path| has_extension(path, "ico") || has_extension(path, "png"))
        .collect();
    files.sort();
    files
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}
