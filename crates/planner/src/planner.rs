//! Plan resolution

use crate::{detect_toolkit, locate_assets, resolve_entry, resolve_requirements, PlanContext};
use pyfreeze_config::Config;
use pyfreeze_errors::{Error, ResolutionError};
use pyfreeze_events::{AppEvent, EventEmitter, EventSender, PlanEvent};
use pyfreeze_types::{BuildPlan, BuilderKind, DependencySet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Caller-supplied choices layered over what the planner detects
#[derive(Debug, Clone)]
pub struct PlanOverrides {
    /// Explicit entry script; disables auto-detection
    pub entry: Option<PathBuf>,
    pub icon: Option<PathBuf>,
    pub builder: BuilderKind,
    pub allow_fallback: bool,
    pub one_file: bool,
    pub hide_console: bool,
    pub dependency_set: DependencySet,
    pub app_name: String,
    pub dist_dir: PathBuf,
    pub workspace_dir: PathBuf,
    pub extra_modules: Vec<String>,
    /// Fail when no requirement list exists
    pub require_requirements: bool,
    pub use_upx: bool,
}

impl PlanOverrides {
    /// Overrides carrying the configured values for a repository
    #[must_use]
    pub fn from_config(config: &Config, repo_root: &Path) -> Self {
        Self {
            entry: None,
            icon: config.build.icon.clone(),
            builder: config.build.builder,
            allow_fallback: config.build.fallback,
            one_file: config.build.one_file,
            hide_console: config.build.hide_console,
            dependency_set: config.build.dependency_set,
            app_name: config.app_name(repo_root),
            dist_dir: config.dist_path(repo_root),
            workspace_dir: config.workspace_path(repo_root),
            extra_modules: config.build.extra_modules.clone(),
            require_requirements: true,
            use_upx: config.toolchain.upx,
        }
    }
}

/// Resolves a [`BuildPlan`] for one repository
pub struct BuildPlanner {
    ctx: PlanContext,
    event_sender: Option<EventSender>,
}

impl EventEmitter for BuildPlanner {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

impl BuildPlanner {
    #[must_use]
    pub fn new(ctx: PlanContext) -> Self {
        Self {
            ctx,
            event_sender: None,
        }
    }

    #[must_use]
    pub fn with_event_sender(mut self, sender: EventSender) -> Self {
        self.event_sender = Some(sender);
        self
    }

    #[must_use]
    pub fn context(&self) -> &PlanContext {
        &self.ctx
    }

    /// Resolve the plan, emitting one event per decision
    ///
    /// # Errors
    ///
    /// Returns config errors for bad explicit paths and resolution errors
    /// when no entry script or requirement list can be found.
    pub fn resolve(&self, overrides: &PlanOverrides) -> Result<BuildPlan, Error> {
        // Configured output folders may be renamed away from the fixed exclusions
        let ctx = self
            .ctx
            .clone()
            .with_excluded_path(&overrides.workspace_dir)
            .with_excluded_path(&overrides.dist_dir);
        debug!(excluded = ?ctx.excluded_paths(), "output folders excluded from scans");

        let entry = resolve_entry(&ctx, overrides.entry.as_deref())?;
        info!(entry = %entry.path.display(), source = %entry.source, "entry script resolved");
        self.emit(AppEvent::Plan(PlanEvent::EntryResolved {
            entry: entry.path.clone(),
            source: entry.source,
        }));

        let detection = detect_toolkit(&ctx)?;
        info!(toolkit = %detection.toolkit, plugins = ?detection.plugin_names, "toolkit detected");
        self.emit(AppEvent::Plan(PlanEvent::ToolkitDetected {
            toolkit: detection.toolkit,
            plugins: detection.plugin_names.clone(),
        }));

        let assets = locate_assets(&ctx, overrides.icon.as_deref())?;
        if !assets.unusable_icons.is_empty() {
            warn!(count = assets.unusable_icons.len(), "icon folder holds only PNG images");
            self.emit_warning_with_context(
                "icon folder has PNG images but no .ico; building without an icon",
                assets
                    .unusable_icons
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            );
        }
        self.emit(AppEvent::Plan(PlanEvent::AssetsLocated {
            icon: assets.icon.clone(),
            data_dir: assets.data_dir.clone(),
        }));

        let requirements = match resolve_requirements(&ctx, overrides.dependency_set) {
            Ok(found) => {
                if found.fell_back {
                    warn!(path = %found.path.display(), "slim requirements missing, using full list");
                    self.emit_warning(format!(
                        "no slim requirement list; installing {}",
                        found.path.display()
                    ));
                }
                Some(found.path)
            }
            Err(Error::Resolution(ResolutionError::RequirementsNotFound { .. }))
                if !overrides.require_requirements =>
            {
                None
            }
            Err(e) => return Err(e),
        };

        let builders = overrides.builder.attempt_order(overrides.allow_fallback);
        let upx_dir = if overrides.use_upx {
            ctx.upx_dir().map(Path::to_path_buf)
        } else {
            None
        };
        info!(order = ?builders, upx = upx_dir.is_some(), "builders selected");
        self.emit(AppEvent::Plan(PlanEvent::BuildersSelected {
            order: builders.clone(),
            upx_dir: upx_dir.clone(),
        }));

        Ok(BuildPlan {
            repo_root: ctx.repo_root().to_path_buf(),
            entry_script: entry.path,
            entry_source: entry.source,
            toolkit: detection.toolkit,
            plugin_names: detection.plugin_names,
            builders,
            one_file: overrides.one_file,
            hide_console: overrides.hide_console,
            icon_path: assets.icon,
            data_dir: assets.data_dir,
            dist_dir: overrides.dist_dir.clone(),
            workspace_dir: overrides.workspace_dir.clone(),
            app_name: overrides.app_name.clone(),
            dependency_set: overrides.dependency_set,
            requirements,
            extra_modules: overrides.extra_modules.clone(),
            upx_dir,
            host: ctx.host().clone(),
        })
    }
}
