//! Compiler invocations for the threads demo targets.
//!
//! This module turns the static target table into structured compiler
//! commands and defines the JSON event schema the commands emit.

pub mod events;
pub mod toolchain;

pub use events::OrchestrationEvent;
pub use toolchain::{toolchain_for, CommandSpec, GccToolchain, MsvcToolchain, Toolchain};
