//! Platform abstraction layer for pyfreeze.
//!
//! Every external program pyfreeze starts (the base interpreter, pip, the
//! freezing tools) goes through [`ProcessOperations`], so tests can swap
//! in a scripted implementation and observe the exact argument lists.

pub mod process;

pub use process::host::HostProcessOperations;
pub use process::{CommandOutput, OutputMode, PlatformCommand, ProcessOperations};
