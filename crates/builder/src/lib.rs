#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Freezing driver for pyfreeze
//!
//! Prepares the build environment, composes argument lists for the two
//! freezing tools and drives them through the primary/fallback state
//! machine. Every external program is started through
//! [`pyfreeze_platform::ProcessOperations`].

mod backends;
mod fallback;
mod orchestrator;
mod summary;
mod venv;

pub use backends::{BackendRegistry, FreezeBackend, NuitkaBackend, PyInstallerBackend};
pub use fallback::FallbackMachine;
pub use orchestrator::{CancelFlag, FreezeOrchestrator};
pub use summary::FlagSummary;
pub use venv::{venv_python_path, EnvironmentManager, InstallMode};
