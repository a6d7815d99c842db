use serde::{Deserialize, Serialize};

use pyfreeze_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureContext {
    /// Stable error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self {
            code: error.user_code().map(Into::into),
            message: error.user_message().into_owned(),
            hint: error.user_hint().map(Into::into),
            retryable: error.is_retryable(),
        }
    }
}

pub mod build;
pub mod general;
pub mod plan;
pub mod python;

pub use build::*;
pub use general::*;
pub use plan::*;
pub use python::*;

/// Severity used when mirroring events into tracing
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<EventLevel> for tracing::Level {
    fn from(level: EventLevel) -> Self {
        match level {
            EventLevel::Debug => tracing::Level::DEBUG,
            EventLevel::Info => tracing::Level::INFO,
            EventLevel::Warn => tracing::Level::WARN,
            EventLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, debug notes)
    General(GeneralEvent),

    /// Planner decisions
    Plan(PlanEvent),

    /// Virtual environment and dependency installation
    Python(PythonEvent),

    /// Freezing tool attempts and fallback
    Build(BuildEvent),
}

impl AppEvent {
    /// Severity of this event
    #[must_use]
    pub fn level(&self) -> EventLevel {
        match self {
            Self::General(GeneralEvent::DebugLog { .. }) => EventLevel::Debug,
            Self::General(GeneralEvent::Warning { .. }) => EventLevel::Warn,
            Self::Build(BuildEvent::ArtifactMissing { .. } | BuildEvent::FallbackEngaged { .. }) => {
                EventLevel::Warn
            }
            Self::Build(BuildEvent::Failed { .. }) => EventLevel::Error,
            Self::Python(PythonEvent::CommandOutput { .. }) => EventLevel::Debug,
            _ => EventLevel::Info,
        }
    }

    /// Short domain label, used as the prefix of rendered lines
    #[must_use]
    pub fn domain(&self) -> &'static str {
        match self {
            Self::General(_) => "general",
            Self::Plan(_) => "plan",
            Self::Python(_) => "env",
            Self::Build(_) => "build",
        }
    }
}
