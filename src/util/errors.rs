//! Error types shared by the library.

use thiserror::Error;

/// Errors produced by the threadworks library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown platform `{0}`; expected `windows`, `linux`, or `unrecognized`")]
    UnknownPlatform(String),

    #[error("unknown failure policy `{0}`; expected `ignore` or `report`")]
    UnknownFailurePolicy(String),

    #[error("unknown removal backend `{0}`; expected `native` or `shell`")]
    UnknownRemovalBackend(String),

    #[error("invalid artifact pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("{failed} of {total} {command} invocation(s) failed")]
    InvocationsFailed {
        command: &'static str,
        failed: usize,
        total: usize,
    },
}
