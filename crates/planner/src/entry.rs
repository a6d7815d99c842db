//! Entry-point resolution
//!
//! Three tiers, first hit wins: an explicit path, a conventional relative
//! path, then the first source file carrying a `__main__` guard.

use crate::sources::{python_sources, read_source};
use crate::PlanContext;
use pyfreeze_errors::{ConfigError, Error, ResolutionError};
use pyfreeze_types::EntrySource;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Conventional entry locations, GUI folder variants first
pub const CONVENTIONAL_ENTRIES: &[&str] = &[
    "gui/app.py",
    "gui/main.py",
    "gui/main_window.py",
    "gui/__main__.py",
    "app.py",
    "main.py",
    "run.py",
    "gui.py",
    "__main__.py",
];

const MAIN_GUARD_PATTERN: &str = r#"(?m)^\s*if\s+__name__\s*==\s*['"]__main__['"]\s*:"#;

/// Entry script together with the tier that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub path: PathBuf,
    pub source: EntrySource,
}

/// Resolve the script to freeze
///
/// An explicit path is never second-guessed: if it does not exist the
/// call fails instead of falling back to detection.
///
/// # Errors
///
/// Returns `ConfigError` for a bad explicit path and
/// `ResolutionError::EntryNotFound` when no tier yields a candidate.
pub fn resolve_entry(ctx: &PlanContext, explicit: Option<&Path>) -> Result<ResolvedEntry, Error> {
    if let Some(explicit) = explicit {
        return resolve_explicit(ctx, explicit).map(|path| ResolvedEntry {
            path,
            source: EntrySource::Explicit,
        });
    }

    if let Some(path) = probe_conventional(ctx) {
        return Ok(ResolvedEntry {
            path,
            source: EntrySource::Conventional,
        });
    }

    if let Some(path) = scan_for_main_guard(ctx)? {
        return Ok(ResolvedEntry {
            path,
            source: EntrySource::MainGuard,
        });
    }

    Err(ResolutionError::EntryNotFound {
        root: ctx.repo_root().display().to_string(),
    }
    .into())
}

fn resolve_explicit(ctx: &PlanContext, explicit: &Path) -> Result<PathBuf, Error> {
    let candidate = if explicit.is_absolute() {
        explicit.to_path_buf()
    } else {
        ctx.repo_root().join(explicit)
    };

    let canonical = candidate
        .canonicalize()
        .map_err(|_| ConfigError::EntryNotFound {
            path: explicit.display().to_string(),
        })?;

    if !canonical.is_file() {
        return Err(ConfigError::EntryNotAFile {
            path: explicit.display().to_string(),
        }
        .into());
    }

    Ok(canonical)
}

fn probe_conventional(ctx: &PlanContext) -> Option<PathBuf> {
    CONVENTIONAL_ENTRIES
        .iter()
        .map(|rel| ctx.repo_root().join(rel))
        .find(|path| {
            let hit = path.is_file();
            debug!(candidate = %path.display(), hit, "probing conventional entry");
            hit
        })
}

fn scan_for_main_guard(ctx: &PlanContext) -> Result<Option<PathBuf>, Error> {
    let guard = Regex::new(MAIN_GUARD_PATTERN).map_err(|e| Error::internal(e.to_string()))?;

    Ok(python_sources(ctx).into_iter().find(|path| {
        read_source(path).is_some_and(|text| guard.is_match(&text))
    }))
}
