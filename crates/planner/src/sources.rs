//! Python source enumeration shared by the entry resolver and toolkit detector

use crate::PlanContext;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::trace;

/// All `*.py` files under the repository, outside excluded directories,
/// sorted by path.
///
/// Ignore files are not honored; only the fixed exclusion set applies.
pub fn python_sources(ctx: &PlanContext) -> Vec<PathBuf> {
    let scan = ctx.clone();

    let mut files: Vec<PathBuf> = WalkBuilder::new(ctx.repo_root())
        .standard_filters(false)
        .follow_links(false)
        .filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !(is_dir && scan.is_excluded(entry.path()))
        })
        .build()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .map(ignore::DirEntry::into_path)
        .filter(|path| is_python_source(path))
        .collect();

    files.sort();
    trace!(count = files.len(), "python sources collected");
    files
}

fn is_python_source(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("py"))
}

/// Read a source file as text, replacing invalid UTF-8
pub(crate) fn read_source(path: &Path) -> Option<String> {
    std::fs::read(path)
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}
