//! Freeze driver: runs the builders in plan order until one leaves an artifact

use crate::backends::find_artifact;
use crate::{BackendRegistry, FallbackMachine, FlagSummary, FreezeBackend};
use pyfreeze_errors::Error;
use pyfreeze_events::{AppEvent, BuildEvent, BuildStage, EventEmitter, EventSender, FailureContext};
use pyfreeze_platform::{PlatformCommand, ProcessOperations};
use pyfreeze_types::{BuildPlan, BuildReport, BuildState, BuilderKind};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Shared flag set by the interrupt handler
///
/// Checked once, between the primary and the fallback attempt.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct FreezeOrchestrator {
    process: Arc<dyn ProcessOperations>,
    registry: BackendRegistry,
    cancel: CancelFlag,
    event_sender: Option<EventSender>,
}

impl EventEmitter for FreezeOrchestrator {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

impl FreezeOrchestrator {
    pub fn new(process: Arc<dyn ProcessOperations>) -> Self {
        Self {
            process,
            registry: BackendRegistry::new(),
            cancel: CancelFlag::new(),
            event_sender: None,
        }
    }

    #[must_use]
    pub fn with_event_sender(mut self, sender: EventSender) -> Self {
        self.event_sender = Some(sender);
        self
    }

    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    fn backend(&self, kind: BuilderKind) -> Result<&dyn FreezeBackend, Error> {
        self.registry
            .get(kind)
            .ok_or_else(|| Error::internal(format!("no backend registered for {kind}")))
    }

    /// Commands for every builder in the plan, in attempt order
    ///
    /// # Errors
    ///
    /// Returns an internal error if a builder has no registered backend.
    pub fn commands(
        &self,
        plan: &BuildPlan,
        python: &Path,
    ) -> Result<Vec<(BuilderKind, PlatformCommand)>, Error> {
        plan.builders
            .iter()
            .map(|kind| Ok((*kind, self.backend(*kind)?.command(python, plan))))
            .collect()
    }

    /// Freeze the application
    ///
    /// `python` is the environment interpreter the tools are installed in.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::NoArtifact` when no builder leaves an artifact,
    /// `Error::Cancelled` when interrupted before the fallback, and platform
    /// errors when a builder cannot be started at all.
    pub async fn run(&self, plan: &BuildPlan, python: &Path) -> Result<BuildReport, Error> {
        let started = Instant::now();
        let mut machine = FallbackMachine::new(plan.builders.clone());
        let mut kind = machine.start()?;
        let mut stage = BuildStage::Primary;

        loop {
            let artifact = self.attempt(plan, python, kind, stage).await?;

            match machine.observe(artifact) {
                BuildState::Succeeded { .. } => break,
                BuildState::TryingFallback { builder } => {
                    let next = *builder;
                    if self.cancel.is_cancelled() {
                        warn!("interrupted before fallback");
                        return Err(Error::Cancelled);
                    }
                    info!(from = %kind, to = %next, "engaging fallback builder");
                    self.emit(AppEvent::Build(BuildEvent::FallbackEngaged {
                        from: kind,
                        to: next,
                    }));
                    kind = next;
                    stage = BuildStage::Fallback;
                }
                _ => break,
            }
        }

        let (builder, artifact) = match machine.finish() {
            Ok(done) => done,
            Err(e) => {
                self.emit(AppEvent::Build(BuildEvent::Failed {
                    failure: FailureContext::from_error(&e),
                }));
                return Err(e);
            }
        };

        let size_bytes = tokio::fs::metadata(&artifact)
            .await
            .map_err(|e| Error::io_with_path(&e, &artifact))?
            .len();
        let duration = started.elapsed();
        info!(
            builder = %builder,
            artifact = %artifact.display(),
            size_bytes,
            "artifact produced"
        );
        self.emit(AppEvent::Build(BuildEvent::Succeeded {
            builder,
            artifact: artifact.clone(),
            size_bytes,
            duration,
        }));

        if let Some((stdout, stderr)) = self.backend(builder)?.sidecar_logs(plan, &artifact) {
            self.emit(AppEvent::Build(BuildEvent::SidecarLogs { stdout, stderr }));
        }

        Ok(BuildReport {
            builder,
            used_fallback: plan.primary() != Some(builder),
            artifact,
            size_bytes,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        })
    }

    /// One builder invocation; `None` when no artifact appeared
    async fn attempt(
        &self,
        plan: &BuildPlan,
        python: &Path,
        kind: BuilderKind,
        stage: BuildStage,
    ) -> Result<Option<PathBuf>, Error> {
        let backend = self.backend(kind)?;
        let expected = backend.expected_artifacts(plan);
        clear_stale(&expected).await?;

        let output_dir = plan.output_dir(kind);
        tokio::fs::create_dir_all(&output_dir)
            .await
            .map_err(|e| Error::io_with_path(&e, &output_dir))?;

        let cmd = backend.command(python, plan);
        let summary = FlagSummary::from_args(kind, &backend.compose_args(plan));
        info!(builder = %kind, %stage, flags = %summary, "starting builder");
        self.emit(AppEvent::Build(BuildEvent::AttemptStarted {
            builder: kind,
            stage,
            command: cmd.display(),
            summary: summary.to_string(),
        }));

        let output = self.process.execute_command(cmd).await?;
        let artifact = find_artifact(&expected);

        if artifact.is_none() {
            // Exit status is informational only
            warn!(builder = %kind, exit_code = ?output.exit_code, "no artifact at expected paths");
            self.emit(AppEvent::Build(BuildEvent::ArtifactMissing {
                builder: kind,
                exit_code: output.exit_code,
                expected,
            }));
        } else if !output.success() {
            debug!(builder = %kind, exit_code = ?output.exit_code, "artifact present despite exit status");
            self.emit_debug(format!(
                "{kind} exited with {:?} but left an artifact",
                output.exit_code
            ));
        }

        Ok(artifact)
    }
}

/// Remove artifacts left by an earlier run so they cannot pass as fresh
async fn clear_stale(candidates: &[PathBuf]) -> Result<(), Error> {
    for path in candidates {
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!(path = %path.display(), "removed stale artifact"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::io_with_path(&e, path)),
        }
    }
    Ok(())
}
