//! Tracing subscriber setup for the CLI.

use tracing_subscriber::EnvFilter;

use crate::util::shell::Shell;

/// Log level directive matching the shell's verbosity.
fn directive(shell: &Shell) -> &'static str {
    if shell.is_verbose() {
        "threadworks=debug"
    } else if shell.is_quiet() {
        "threadworks=warn"
    } else {
        "threadworks=info"
    }
}

/// Install the global tracing subscriber.
///
/// Diagnostics go to stderr so stdout stays free for JSON events and the
/// tools' own output.
pub fn init(shell: &Shell) {
    // A second init (e.g. in tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive(shell)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
