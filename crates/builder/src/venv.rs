//! Virtual environment preparation
//!
//! Creates (or reuses) the build venv below the workspace and installs
//! the application requirements plus the freezing tools into it.

use crate::CancelFlag;
use pyfreeze_errors::{BuildError, Error, ToolchainError};
use pyfreeze_events::{AppEvent, EventEmitter, EventSender, PythonEvent};
use pyfreeze_platform::{PlatformCommand, ProcessOperations};
use pyfreeze_types::BuildPlan;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Whether dependencies are installed before freezing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallMode {
    /// Create the venv when missing and run pip
    #[default]
    Install,
    /// Use an existing venv as is
    Skip,
}

/// Interpreter inside a venv, following the host layout
#[must_use]
pub fn venv_python_path(venv_dir: &Path) -> PathBuf {
    if cfg!(windows) {
        venv_dir.join("Scripts").join("python.exe")
    } else {
        venv_dir.join("bin").join("python")
    }
}

/// Drives `python -m venv` and pip through the process seam
pub struct EnvironmentManager {
    process: Arc<dyn ProcessOperations>,
    base_python: String,
    cancel: CancelFlag,
    event_sender: Option<EventSender>,
}

impl EventEmitter for EnvironmentManager {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

impl EnvironmentManager {
    pub fn new(process: Arc<dyn ProcessOperations>, base_python: impl Into<String>) -> Self {
        Self {
            process,
            base_python: base_python.into(),
            cancel: CancelFlag::new(),
            event_sender: None,
        }
    }

    #[must_use]
    pub fn with_event_sender(mut self, sender: EventSender) -> Self {
        self.event_sender = Some(sender);
        self
    }

    /// Share the interrupt flag; a step that ends after Ctrl-C yields `Error::Cancelled`
    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Prepare the environment and return its interpreter
    ///
    /// # Errors
    ///
    /// Returns a toolchain error when the base interpreter is not on PATH
    /// (or the venv is missing in [`InstallMode::Skip`]), a build error
    /// when venv creation or a pip step fails, and `Error::Cancelled` when
    /// the cancel flag is set once a step returns.
    pub async fn prepare(&self, plan: &BuildPlan, mode: InstallMode) -> Result<PathBuf, Error> {
        let venv_dir = plan.venv_dir();
        let venv_python = venv_python_path(&venv_dir);

        if mode == InstallMode::Skip {
            if !venv_python.is_file() {
                return Err(ToolchainError::VenvInterpreterMissing {
                    path: venv_python.display().to_string(),
                }
                .into());
            }
            info!(venv = %venv_dir.display(), "reusing environment without installs");
            self.emit(AppEvent::Python(PythonEvent::VenvReused { venv_path: venv_dir }));
            return Ok(venv_python);
        }

        if venv_python.is_file() {
            self.emit(AppEvent::Python(PythonEvent::VenvReused {
                venv_path: venv_dir.clone(),
            }));
        } else {
            let interpreter = self.process.which(&self.base_python).map_err(|_| {
                ToolchainError::ToolNotFound {
                    tool: self.base_python.clone(),
                }
            })?;
            self.emit(AppEvent::Python(PythonEvent::InterpreterFound {
                path: interpreter.clone(),
            }));

            tokio::fs::create_dir_all(&plan.workspace_dir)
                .await
                .map_err(|e| Error::io_with_path(&e, &plan.workspace_dir))?;

            self.emit(AppEvent::Python(PythonEvent::VenvCreating {
                venv_path: venv_dir.clone(),
            }));
            let cmd = Self::venv_command(&interpreter, &venv_dir);
            self.run(cmd, |message| BuildError::VenvFailed { message })
                .await?;
            self.emit(AppEvent::Python(PythonEvent::VenvCreated {
                venv_path: venv_dir.clone(),
            }));
        }

        for (step, cmd) in Self::install_commands(&venv_python, plan) {
            match step {
                InstallStep::Pip => {}
                InstallStep::Requirements(path) => {
                    self.emit(AppEvent::Python(PythonEvent::RequirementsInstalling {
                        requirements: path,
                    }));
                }
                InstallStep::Tools(packages) => {
                    self.emit(AppEvent::Python(PythonEvent::ToolsInstalling { packages }));
                }
            }
            self.run(cmd, |message| BuildError::InstallFailed { message })
                .await?;
        }

        Ok(venv_python)
    }

    /// Every command [`Self::prepare`] may run, for dry runs
    #[must_use]
    pub fn planned_commands(&self, plan: &BuildPlan, mode: InstallMode) -> Vec<PlatformCommand> {
        if mode == InstallMode::Skip {
            return Vec::new();
        }
        let venv_dir = plan.venv_dir();
        let venv_python = venv_python_path(&venv_dir);

        let mut commands = Vec::new();
        if !venv_python.is_file() {
            commands.push(Self::venv_command(Path::new(&self.base_python), &venv_dir));
        }
        commands.extend(
            Self::install_commands(&venv_python, plan)
                .into_iter()
                .map(|(_, cmd)| cmd),
        );
        commands
    }

    fn venv_command(interpreter: &Path, venv_dir: &Path) -> PlatformCommand {
        let mut cmd = PlatformCommand::new(interpreter.to_string_lossy());
        cmd.args(["-m", "venv"]).arg(venv_dir.to_string_lossy());
        cmd
    }

    fn install_commands(venv_python: &Path, plan: &BuildPlan) -> Vec<(InstallStep, PlatformCommand)> {
        let pip = |extra: &[String]| pip_command(venv_python, &plan.repo_root, extra);

        let mut steps = vec![(
            InstallStep::Pip,
            pip(&["--upgrade".to_string(), "pip".to_string()][..]),
        )];

        if let Some(requirements) = &plan.requirements {
            steps.push((
                InstallStep::Requirements(requirements.clone()),
                pip(&["-r".to_string(), requirements.to_string_lossy().into_owned()][..]),
            ));
        }

        let mut packages: Vec<String> = Vec::new();
        for kind in &plan.builders {
            for package in kind.pip_packages() {
                if !packages.iter().any(|p| p == package) {
                    packages.push((*package).to_string());
                }
            }
        }
        if !packages.is_empty() {
            steps.push((InstallStep::Tools(packages.clone()), pip(&packages[..])));
        }

        steps
    }

    async fn run(
        &self,
        cmd: PlatformCommand,
        on_failure: impl Fn(String) -> BuildError,
    ) -> Result<(), Error> {
        let rendered = cmd.display();
        debug!(command = %rendered, "running environment command");

        let result = self.process.execute_command(cmd).await;
        // Ctrl-C also reaches the child; an interrupted step ends as cancelled
        if self.cancel.is_cancelled() {
            warn!(command = %rendered, "interrupted during environment setup");
            return Err(Error::Cancelled);
        }
        let output = result.map_err(|e| match e {
            Error::Platform(platform) => Error::Build(on_failure(platform.to_string())),
            other => other,
        })?;

        let combined = format!("{}\n{}", output.stdout_lossy(), output.stderr_lossy());
        if !combined.trim().is_empty() {
            self.emit(AppEvent::Python(PythonEvent::CommandOutput {
                command: rendered.clone(),
                output: combined.trim().to_string(),
            }));
        }

        if output.success() {
            return Ok(());
        }

        let stderr = output.stderr_lossy();
        let detail = if stderr.is_empty() {
            format!("exit code {:?}", output.exit_code)
        } else {
            stderr
        };
        Err(on_failure(format!("{rendered}: {detail}")).into())
    }
}

enum InstallStep {
    Pip,
    Requirements(PathBuf),
    Tools(Vec<String>),
}

fn pip_command(venv_python: &Path, repo_root: &Path, extra: &[String]) -> PlatformCommand {
    let mut cmd = PlatformCommand::new(venv_python.to_string_lossy());
    cmd.args(["-m", "pip", "install"])
        .args(extra)
        .current_dir(repo_root);
    cmd
}
