//! Command line interface definition

use clap::{Args, Parser, Subcommand};
use pyfreeze_planner::PlanOverrides;
use pyfreeze_types::{BuilderKind, ColorChoice, DependencySet};
use std::path::{Path, PathBuf};

/// pyfreeze - Freeze Python GUI applications into standalone executables
#[derive(Parser, Debug)]
#[command(name = "pyfreeze")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Freeze Python GUI applications into standalone executables")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable debug logging to <workspace>/logs/
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prepare the environment and freeze the application
    Build(BuildArgs),

    /// Resolve and print the build plan without building
    Plan {
        #[command(flatten)]
        planning: PlanningArgs,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    pub fn planning(&self) -> &PlanningArgs {
        match self {
            Commands::Build(args) => &args.planning,
            Commands::Plan { planning, .. } => planning,
        }
    }
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub planning: PlanningArgs,

    /// Reuse the existing virtual environment without running pip
    #[arg(long)]
    pub skip_install: bool,

    /// Print the commands that would run and exit
    #[arg(long)]
    pub dry_run: bool,
}

/// Flags shared by every command that resolves a plan
#[derive(Args, Debug, Default)]
pub struct PlanningArgs {
    /// Repository root (defaults to the current directory)
    #[arg(value_name = "REPO")]
    pub repo: Option<PathBuf>,

    /// Install the slim requirement list and skip whole-package collection
    #[arg(long)]
    pub slim: bool,

    /// Produce a single-file executable
    #[arg(long, conflicts_with = "onedir")]
    pub onefile: bool,

    /// Produce a directory with the executable and its libraries
    #[arg(long)]
    pub onedir: bool,

    /// Primary builder
    #[arg(long, value_enum)]
    pub builder: Option<BuilderKind>,

    /// Do not try the bundling freezer when the primary fails
    #[arg(long)]
    pub no_fallback: bool,

    /// Entry script, relative to the repository root
    #[arg(long, value_name = "PATH")]
    pub entry: Option<PathBuf>,

    /// Keep the console window
    #[arg(long, conflicts_with = "windowed")]
    pub console: bool,

    /// Hide the console window
    #[arg(long)]
    pub windowed: bool,

    /// Executable base name
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Icon file, relative to the repository root
    #[arg(long, value_name = "PATH")]
    pub icon: Option<PathBuf>,
}

impl PlanningArgs {
    pub fn repo_root(&self) -> &Path {
        self.repo.as_deref().unwrap_or_else(|| Path::new("."))
    }

    /// Layer the flags over configured values
    pub fn apply(&self, overrides: &mut PlanOverrides) {
        if let Some(entry) = &self.entry {
            overrides.entry = Some(entry.clone());
        }
        if let Some(icon) = &self.icon {
            overrides.icon = Some(icon.clone());
        }
        if let Some(builder) = self.builder {
            overrides.builder = builder;
        }
        if self.no_fallback {
            overrides.allow_fallback = false;
        }
        if self.onefile {
            overrides.one_file = true;
        } else if self.onedir {
            overrides.one_file = false;
        }
        if self.console {
            overrides.hide_console = false;
        } else if self.windowed {
            overrides.hide_console = true;
        }
        if self.slim {
            overrides.dependency_set = DependencySet::Slim;
        }
        if let Some(name) = self.name.as_ref().filter(|n| !n.trim().is_empty()) {
            overrides.app_name = name.clone();
        }
    }
}
