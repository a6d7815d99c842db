#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! pyfreeze - Freeze Python GUI applications into standalone executables
//!
//! Resolves a build plan for a repository, prepares a virtual environment
//! and drives the compiling freezer, falling back to the bundling freezer
//! when no artifact appears.

mod cli;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::{Cli, Commands, PlanningArgs};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use pyfreeze_builder::{
    venv_python_path, CancelFlag, EnvironmentManager, FreezeOrchestrator, InstallMode,
};
use pyfreeze_config::{fixed_paths, Config};
use pyfreeze_events::{EventReceiver, EventSender};
use pyfreeze_planner::{BuildPlanner, PlanContext, PlanOverrides};
use pyfreeze_platform::{HostProcessOperations, ProcessOperations};
use pyfreeze_types::{BuildPlan, BuildReport, BuilderKind, ColorChoice};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// What a command produced, rendered after the event stream is drained
enum Outcome {
    Plan(BuildPlan),
    DryRun {
        environment: Vec<String>,
        builders: Vec<(BuilderKind, String)>,
    },
    Built(BuildReport),
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    let planning = cli.command.planning();
    if let Some(name) = &planning.name {
        if name.contains(['/', '\\']) {
            return Err(CliError::InvalidArguments(format!(
                "--name must be a file name, got {name}"
            )));
        }
    }
    let ctx = PlanContext::new(planning.repo_root())?;

    // Precedence: file (or defaults) < environment < flags
    let mut config = Config::load_or_default(cli.global.config.as_deref(), ctx.repo_root()).await?;
    config.merge_env()?;
    if let Some(color) = cli.global.color {
        config.general.color = color;
    }

    init_tracing(
        cli.global.debug,
        &config
            .workspace_path(ctx.repo_root())
            .join(fixed_paths::LOGS_DIR),
    );
    info!("Starting pyfreeze v{}", env!("CARGO_PKG_VERSION"));

    let process: Arc<dyn ProcessOperations> = Arc::new(HostProcessOperations::new());
    let upx_dir = if config.toolchain.upx {
        process
            .which("upx")
            .ok()
            .and_then(|path| path.parent().map(Path::to_path_buf))
    } else {
        None
    };
    let ctx = ctx.with_upx_dir(upx_dir);

    let mut overrides = PlanOverrides::from_config(&config, ctx.repo_root());
    planning.apply(&mut overrides);
    if let Commands::Build(args) = &cli.command {
        if args.skip_install {
            overrides.require_requirements = false;
        }
    }

    let (event_sender, event_receiver) = pyfreeze_events::channel();

    let colors_enabled = match config.general.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stderr().features().colors_supported(),
    };
    let mut event_handler = EventHandler::new(colors_enabled, cli.global.debug);

    let json_output = matches!(cli.command, Commands::Plan { json: true, .. });
    let renderer = OutputRenderer::new(json_output, config.general.color);

    let job = Job {
        command: &cli.command,
        ctx,
        overrides,
        python: config.python_program(),
        process,
        event_sender,
    };
    let outcome = execute_with_events(job, event_receiver, &mut event_handler).await?;

    match outcome {
        Outcome::Plan(plan) => renderer.render_plan(&plan)?,
        Outcome::DryRun {
            environment,
            builders,
        } => renderer.render_dry_run(&environment, &builders)?,
        Outcome::Built(report) => renderer.render_build_report(&report)?,
    }

    info!("Command completed successfully");
    Ok(())
}

/// Everything a command needs once configuration is settled
struct Job<'a> {
    command: &'a Commands,
    ctx: PlanContext,
    overrides: PlanOverrides,
    python: String,
    process: Arc<dyn ProcessOperations>,
    event_sender: EventSender,
}

/// Execute command with concurrent event handling
async fn execute_with_events(
    job: Job<'_>,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<Outcome, CliError> {
    let mut command_future = Box::pin(execute_command(job));

    loop {
        select! {
            result = &mut command_future => {
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result;
            }

            event = event_receiver.recv() => {
                if let Some(event) = event {
                    event_handler.handle_event(event);
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(job: Job<'_>) -> Result<Outcome, CliError> {
    let planner = BuildPlanner::new(job.ctx).with_event_sender(job.event_sender.clone());
    let plan = planner.resolve(&job.overrides)?;

    let Commands::Build(args) = job.command else {
        return Ok(Outcome::Plan(plan));
    };

    let mode = if args.skip_install {
        InstallMode::Skip
    } else {
        InstallMode::Install
    };
    let cancel = CancelFlag::new();
    let environment = EnvironmentManager::new(job.process.clone(), job.python)
        .with_event_sender(job.event_sender.clone())
        .with_cancel_flag(cancel.clone());
    let orchestrator = FreezeOrchestrator::new(job.process)
        .with_event_sender(job.event_sender)
        .with_cancel_flag(cancel.clone());

    if args.dry_run {
        let venv_python = venv_python_path(&plan.venv_dir());
        return Ok(Outcome::DryRun {
            environment: environment
                .planned_commands(&plan, mode)
                .iter()
                .map(pyfreeze_platform::PlatformCommand::display)
                .collect(),
            builders: orchestrator
                .commands(&plan, &venv_python)?
                .into_iter()
                .map(|(kind, cmd)| (kind, cmd.display()))
                .collect(),
        });
    }

    watch_interrupt(cancel);
    let python: PathBuf = environment.prepare(&plan, mode).await?;
    let report = orchestrator.run(&plan, &python).await?;
    Ok(Outcome::Built(report))
}

/// Record Ctrl-C; the running child process receives the signal itself
fn watch_interrupt(cancel: CancelFlag) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received");
            cancel.cancel();
        }
    });
}

/// Initialize tracing/logging
fn init_tracing(debug_flag: bool, log_dir: &Path) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_flag;
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            if debug_enabled {
                tracing_subscriber::EnvFilter::new("info,pyfreeze=debug")
            } else {
                tracing_subscriber::EnvFilter::new("warn,pyfreeze=info")
            }
        })
    };

    if debug_flag {
        // Debug mode: structured JSON logs to file
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            eprintln!("Warning: Failed to create log directory: {e}");
        }

        let log_file = log_dir.join(format!(
            "pyfreeze-{}.log",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        ));

        match std::fs::File::create(&log_file) {
            Ok(file) => {
                let _ = tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(filter())
                    .try_init();
                eprintln!("Debug logging enabled: {}", log_file.display());
                return;
            }
            Err(e) => eprintln!("Warning: Failed to create log file: {e}"),
        }
    }

    // Console events already carry the user-facing lines; keep stderr quiet
    // unless something is wrong or RUST_LOG asks for more
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter())
        .try_init();
}
