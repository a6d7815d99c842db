#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Build plan resolution for pyfreeze
//!
//! Given a repository, decides which script to freeze, which GUI toolkit
//! plugins to enable, which builders to try in which order, and which
//! assets to bundle. All probing is read-only.

mod assets;
mod context;
mod entry;
mod planner;
mod requirements;
mod sources;
mod toolkit;

pub use assets::{locate_assets, Assets};
pub use context::PlanContext;
pub use entry::{resolve_entry, ResolvedEntry, CONVENTIONAL_ENTRIES};
pub use planner::{BuildPlanner, PlanOverrides};
pub use requirements::{resolve_requirements, ResolvedRequirements};
pub use sources::python_sources;
pub use toolkit::{detect_toolkit, ToolkitDetection, ToolkitMatcher, ToolkitRule, TOOLKIT_RULES};
