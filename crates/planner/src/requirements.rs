//! Requirement file lookup

use crate::PlanContext;
use pyfreeze_errors::{Error, ResolutionError};
use pyfreeze_types::DependencySet;
use std::path::PathBuf;

/// Requirement list chosen for the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequirements {
    pub path: PathBuf,
    /// Slim was asked for but only the full list exists
    pub fell_back: bool,
}

/// Find the requirement file for a dependency set
///
/// # Errors
///
/// Returns `ResolutionError::RequirementsNotFound` when neither the
/// requested list nor the full list exists.
pub fn resolve_requirements(
    ctx: &PlanContext,
    set: DependencySet,
) -> Result<ResolvedRequirements, Error> {
    if let Some(path) = first_existing(ctx, set) {
        return Ok(ResolvedRequirements {
            path,
            fell_back: false,
        });
    }

    if set == DependencySet::Slim {
        if let Some(path) = first_existing(ctx, DependencySet::Full) {
            return Ok(ResolvedRequirements {
                path,
                fell_back: true,
            });
        }
    }

    let searched = set
        .requirement_candidates()
        .iter()
        .chain(if set == DependencySet::Slim {
            DependencySet::Full.requirement_candidates()
        } else {
            &[]
        })
        .copied()
        .collect::<Vec<_>>()
        .join(", ");

    Err(ResolutionError::RequirementsNotFound {
        root: ctx.repo_root().display().to_string(),
        searched,
    }
    .into())
}

fn first_existing(ctx: &PlanContext, set: DependencySet) -> Option<PathBuf> {
    set.requirement_candidates()
        .iter()
        .map(|rel| ctx.repo_root().join(rel))
        .find(|path| path.is_file())
}
