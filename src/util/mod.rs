//! Shared utilities

pub mod cli;
pub mod config;
pub mod context;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod process;
pub mod shell;

pub use config::Config;
pub use context::GlobalContext;
pub use errors::Error;
pub use shell::Shell;
