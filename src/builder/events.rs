//! Orchestration event types for JSON output.
//!
//! These events are emitted on stdout, one JSON object per line, when using
//! `--message-format json`.
//!
//! # Event Types
//!
//! - `invocation-started`: an external command is about to run (or would run, in a dry run)
//! - `invocation-finished`: an external command exited
//! - `platform-skipped`: the platform has no code path; nothing runs
//! - `finished`: the command completed
//!
//! New fields may be added, but existing fields should not be removed or renamed.

use serde::Serialize;

use crate::builder::toolchain::CommandSpec;
use crate::platform::Platform;

/// An event emitted while `build` or `clean` runs.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "reason")]
pub enum OrchestrationEvent {
    /// An invocation is starting.
    #[serde(rename = "invocation-started")]
    InvocationStarted {
        /// Which command issued it ("build" or "clean")
        command: &'static str,
        /// Target name or artifact pattern
        label: String,
        /// Structured command line, when the invocation is a process
        #[serde(skip_serializing_if = "Option::is_none")]
        invocation: Option<CommandSpec>,
        /// Whether this is a dry run (nothing executes)
        dry_run: bool,
    },

    /// An invocation finished.
    #[serde(rename = "invocation-finished")]
    InvocationFinished {
        command: &'static str,
        label: String,
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        exit_code: Option<i32>,
        /// Spawn or removal error, if the invocation never ran to completion
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    /// The platform has no code path.
    #[serde(rename = "platform-skipped")]
    PlatformSkipped {
        command: &'static str,
        platform: Platform,
    },

    /// The command completed.
    #[serde(rename = "finished")]
    Finished {
        command: &'static str,
        platform: Platform,
        /// Number of invocations attempted
        invocations: usize,
        /// Number of invocations that failed
        failures: usize,
        /// Total duration in milliseconds
        duration_ms: u64,
    },
}

impl OrchestrationEvent {
    /// Convert to a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
