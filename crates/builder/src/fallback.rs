//! Primary/fallback builder state machine

use pyfreeze_errors::{BuildError, Error};
use pyfreeze_types::{BuildState, BuilderKind};
use std::path::PathBuf;
use tracing::debug;

/// Walks a builder order, one attempt at a time
///
/// The only success signal is an artifact on disk; the caller reports
/// `None` for a missing artifact regardless of the tool's exit status.
#[derive(Debug, Clone)]
pub struct FallbackMachine {
    order: Vec<BuilderKind>,
    state: BuildState,
}

impl FallbackMachine {
    /// Create a machine over `order`, primary first; extra entries beyond
    /// the second are ignored.
    #[must_use]
    pub fn new(order: Vec<BuilderKind>) -> Self {
        Self {
            order,
            state: BuildState::NotStarted,
        }
    }

    #[must_use]
    pub fn state(&self) -> &BuildState {
        &self.state
    }

    /// Builders that were (or are being) attempted
    #[must_use]
    pub fn attempted(&self) -> &[BuilderKind] {
        let count = match self.state {
            BuildState::NotStarted => 0,
            BuildState::TryingPrimary { .. } => 1,
            BuildState::TryingFallback { .. } => 2,
            BuildState::Succeeded { builder, .. } => {
                if self.order.first() == Some(&builder) {
                    1
                } else {
                    2
                }
            }
            BuildState::Failed => self.order.len().min(2),
        };
        &self.order[..count.min(self.order.len())]
    }

    /// Enter `TryingPrimary` and return the primary builder
    ///
    /// # Errors
    ///
    /// Returns `BuildError::NoBuilder` when the order is empty, and an
    /// internal error when the machine was already started.
    pub fn start(&mut self) -> Result<BuilderKind, Error> {
        if self.state != BuildState::NotStarted {
            return Err(Error::internal(format!(
                "fallback machine started twice (state: {})",
                self.state
            )));
        }
        let primary = *self.order.first().ok_or(BuildError::NoBuilder)?;
        self.transition(BuildState::TryingPrimary { builder: primary });
        Ok(primary)
    }

    /// Record the outcome of the active attempt
    ///
    /// Observations outside a trying state leave the machine unchanged.
    pub fn observe(&mut self, artifact: Option<PathBuf>) -> &BuildState {
        let next = match (&self.state, artifact) {
            (
                BuildState::TryingPrimary { builder } | BuildState::TryingFallback { builder },
                Some(artifact),
            ) => BuildState::Succeeded {
                builder: *builder,
                artifact,
            },
            (BuildState::TryingPrimary { .. }, None) => match self.order.get(1) {
                Some(fallback) => BuildState::TryingFallback { builder: *fallback },
                None => BuildState::Failed,
            },
            (BuildState::TryingFallback { .. }, None) => BuildState::Failed,
            (current, _) => current.clone(),
        };
        self.transition(next);
        &self.state
    }

    /// Convert a terminal state into the final result
    ///
    /// # Errors
    ///
    /// Returns `BuildError::NoArtifact` for `Failed` and an internal error
    /// when called before a terminal state.
    pub fn finish(&self) -> Result<(BuilderKind, PathBuf), Error> {
        match &self.state {
            BuildState::Succeeded { builder, artifact } => Ok((*builder, artifact.clone())),
            BuildState::Failed => Err(BuildError::NoArtifact {
                tried: self
                    .attempted()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            }
            .into()),
            other => Err(Error::internal(format!("build not finished (state: {other})"))),
        }
    }

    fn transition(&mut self, next: BuildState) {
        if next != self.state {
            debug!(from = %self.state, to = %next, "build state transition");
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> Option<PathBuf> {
        Some(PathBuf::from("dist/nuitka/Calc.exe"))
    }

    #[test]
    fn test_primary_success() {
        let mut machine = FallbackMachine::new(BuilderKind::Nuitka.attempt_order(true));
        assert_eq!(machine.start().unwrap(), BuilderKind::Nuitka);
        assert!(matches!(
            machine.observe(artifact()),
            BuildState::Succeeded { builder: BuilderKind::Nuitka, .. }
        ));
        assert_eq!(machine.attempted(), &[BuilderKind::Nuitka]);
        assert_eq!(machine.finish().unwrap().0, BuilderKind::Nuitka);
    }

    #[test]
    fn test_missing_artifact_engages_fallback() {
        let mut machine = FallbackMachine::new(BuilderKind::Nuitka.attempt_order(true));
        machine.start().unwrap();
        assert_eq!(
            machine.observe(None),
            &BuildState::TryingFallback {
                builder: BuilderKind::PyInstaller
            }
        );
        assert!(matches!(
            machine.observe(artifact()),
            BuildState::Succeeded { builder: BuilderKind::PyInstaller, .. }
        ));
        assert_eq!(machine.attempted().len(), 2);
    }

    #[test]
    fn test_both_fail() {
        let mut machine = FallbackMachine::new(BuilderKind::Nuitka.attempt_order(true));
        machine.start().unwrap();
        machine.observe(None);
        assert_eq!(machine.observe(None), &BuildState::Failed);

        match machine.finish().unwrap_err() {
            Error::Build(BuildError::NoArtifact { tried }) => {
                assert_eq!(tried, "nuitka, pyinstaller");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_no_fallback_fails_immediately() {
        let mut machine = FallbackMachine::new(vec![BuilderKind::PyInstaller]);
        machine.start().unwrap();
        assert_eq!(machine.observe(None), &BuildState::Failed);
        assert!(machine.state().is_terminal());
    }

    #[test]
    fn test_terminal_states_are_sticky() {
        let mut machine = FallbackMachine::new(vec![BuilderKind::Nuitka]);
        machine.start().unwrap();
        machine.observe(None);
        assert_eq!(machine.observe(artifact()), &BuildState::Failed);
    }

    #[test]
    fn test_start_guards() {
        let mut empty = FallbackMachine::new(Vec::new());
        assert!(matches!(
            empty.start().unwrap_err(),
            Error::Build(BuildError::NoBuilder)
        ));

        let mut machine = FallbackMachine::new(vec![BuilderKind::Nuitka]);
        machine.start().unwrap();
        assert!(machine.start().is_err());
        assert!(machine.finish().is_err());
    }
}
