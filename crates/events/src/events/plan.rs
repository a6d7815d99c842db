use pyfreeze_types::{BuilderKind, EntrySource, Toolkit};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One event per planner decision point
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlanEvent {
    EntryResolved {
        entry: PathBuf,
        source: EntrySource,
    },

    ToolkitDetected {
        toolkit: Toolkit,
        plugins: Vec<String>,
    },

    AssetsLocated {
        icon: Option<PathBuf>,
        data_dir: Option<PathBuf>,
    },

    BuildersSelected {
        order: Vec<BuilderKind>,
        upx_dir: Option<PathBuf>,
    },
}
