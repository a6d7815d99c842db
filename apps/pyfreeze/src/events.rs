//! Event rendering
//!
//! One diagnostic line per event on stderr; stdout stays free for the
//! final result.

use crate::logging::log_event_with_tracing;
use console::{Style, Term};
use pyfreeze_events::{
    AppEvent, BuildEvent, EventLevel, GeneralEvent, PlanEvent, PythonEvent,
};

/// Event handler for user feedback
pub struct EventHandler {
    colors_enabled: bool,
    debug_enabled: bool,
    term: Term,
}

impl EventHandler {
    pub fn new(colors_enabled: bool, debug_enabled: bool) -> Self {
        Self {
            colors_enabled,
            debug_enabled,
            term: Term::stderr(),
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, event: AppEvent) {
        let message = describe(&event);
        log_event_with_tracing(&event, &message);

        let level = event.level();
        if level == EventLevel::Debug && !self.debug_enabled {
            return;
        }

        let prefix = format!("[{}]", event.domain());
        let line = if self.colors_enabled {
            let style = match level {
                EventLevel::Debug => Style::new().dim(),
                EventLevel::Info => Style::new().cyan(),
                EventLevel::Warn => Style::new().yellow().bold(),
                EventLevel::Error => Style::new().red().bold(),
            };
            format!("{} {message}", style.apply_to(prefix))
        } else {
            format!("{prefix} {message}")
        };
        // stderr gone means there is nobody to tell
        let _ = self.term.write_line(&line);
    }
}

/// Human-readable text for an event
pub fn describe(event: &AppEvent) -> String {
    match event {
        AppEvent::General(general) => match general {
            GeneralEvent::Warning { message, context } => match context {
                Some(context) => format!("warning: {message} ({context})"),
                None => format!("warning: {message}"),
            },
            GeneralEvent::DebugLog { message } => message.clone(),
        },

        AppEvent::Plan(plan) => match plan {
            PlanEvent::EntryResolved { entry, source } => {
                format!("entry script {} ({source})", entry.display())
            }
            PlanEvent::ToolkitDetected { toolkit, plugins } => {
                if plugins.is_empty() {
                    format!("GUI toolkit {toolkit}, no builder plugins")
                } else {
                    format!("GUI toolkit {toolkit}, plugins: {}", plugins.join(", "))
                }
            }
            PlanEvent::AssetsLocated { icon, data_dir } => format!(
                "icon: {}, data: {}",
                icon.as_ref()
                    .map_or_else(|| "none".to_string(), |p| p.display().to_string()),
                data_dir
                    .as_ref()
                    .map_or_else(|| "none".to_string(), |p| p.display().to_string()),
            ),
            PlanEvent::BuildersSelected { order, upx_dir } => {
                let order = order
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" -> ");
                match upx_dir {
                    Some(dir) => format!("builders: {order} (upx in {})", dir.display()),
                    None => format!("builders: {order}"),
                }
            }
        },

        AppEvent::Python(python) => match python {
            PythonEvent::InterpreterFound { path } => format!("base interpreter {}", path.display()),
            PythonEvent::VenvCreating { venv_path } => {
                format!("creating virtual environment {}", venv_path.display())
            }
            PythonEvent::VenvCreated { venv_path } => {
                format!("virtual environment ready at {}", venv_path.display())
            }
            PythonEvent::VenvReused { venv_path } => {
                format!("reusing virtual environment {}", venv_path.display())
            }
            PythonEvent::RequirementsInstalling { requirements } => {
                format!("installing requirements from {}", requirements.display())
            }
            PythonEvent::ToolsInstalling { packages } => {
                format!("installing build tools: {}", packages.join(" "))
            }
            PythonEvent::CommandOutput { command, output } => format!("{command}\n{output}"),
        },

        AppEvent::Build(build) => match build {
            BuildEvent::AttemptStarted {
                builder,
                stage,
                command,
                summary,
            } => format!("{stage} builder {builder} ({summary})\n  {command}"),
            BuildEvent::ArtifactMissing {
                builder,
                exit_code,
                expected,
            } => {
                let status = exit_code.map_or_else(|| "killed".to_string(), |c| format!("exit {c}"));
                let paths = expected
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{builder} produced no artifact ({status}); looked for {paths}")
            }
            BuildEvent::FallbackEngaged { from, to } => {
                format!("{from} failed, falling back to {to}")
            }
            BuildEvent::Succeeded {
                builder, artifact, ..
            } => format!("{builder} produced {}", artifact.display()),
            BuildEvent::Failed { failure } => match &failure.code {
                Some(code) => format!("build failed [{code}]: {}", failure.message),
                None => format!("build failed: {}", failure.message),
            },
            BuildEvent::SidecarLogs { stdout, stderr } => format!(
                "windowed executable writes output to {} and {}",
                stdout.display(),
                stderr.display()
            ),
        },
    }
}
