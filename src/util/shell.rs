//! User-facing output for `build` and `clean`.
//!
//! Human status lines go to stderr so that stdout carries only what the
//! compilers print (and, with `--message-format json`, one event per line).
//! The two formats never mix: a JSON shell prints no status lines and a
//! human shell prints no events.

use std::fmt::{self, Display};
use std::io::{self, IsTerminal, Write};
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Which format the shell writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellMode {
    /// Status lines on stderr, with an optional progress bar.
    Human {
        verbosity: Verbosity,
        color: ColorChoice,
    },
    /// JSON events on stdout, nothing else.
    Json,
}

/// How much a human shell prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Errors only
    Quiet,
    #[default]
    Normal,
    /// Adds the full command line of every invocation
    Verbose,
}

/// When to emit ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Only when stderr is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            other => Err(format!(
                "invalid color choice `{}`; expected `auto`, `always` or `never`",
                other
            )),
        }
    }
}

/// The verb in front of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Compiling,
    Removing,
    Finished,
    Planned,
    Info,
    Skipped,
    Warning,
    Error,
}

impl Status {
    /// Width the verb is right-aligned to.
    const WIDTH: usize = 12;

    fn label(self) -> &'static str {
        match self {
            Status::Compiling => "Compiling",
            Status::Removing => "Removing",
            Status::Finished => "Finished",
            Status::Planned => "Planned",
            Status::Info => "Info",
            Status::Skipped => "Skipped",
            Status::Warning => "Warning",
            Status::Error => "error",
        }
    }

    fn ansi(self) -> &'static str {
        match self {
            Status::Compiling | Status::Removing => "\x1b[1;36m",
            Status::Finished => "\x1b[1;32m",
            Status::Planned | Status::Info => "\x1b[1;34m",
            Status::Skipped | Status::Warning => "\x1b[1;33m",
            Status::Error => "\x1b[1;31m",
        }
    }
}

/// Output sink shared by the orchestrators.
///
/// Worker threads share a reference. While a progress bar is drawn, status
/// lines are printed above it instead of through it.
pub struct Shell {
    mode: ShellMode,
    use_color: bool,
    active_bar: Mutex<Option<ProgressBar>>,
}

impl fmt::Debug for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shell")
            .field("mode", &self.mode)
            .field("use_color", &self.use_color)
            .finish_non_exhaustive()
    }
}

impl Shell {
    pub fn new(mode: ShellMode) -> Self {
        let use_color = match mode {
            ShellMode::Human {
                color: ColorChoice::Always,
                ..
            } => true,
            ShellMode::Human {
                color: ColorChoice::Auto,
                ..
            } => io::stderr().is_terminal(),
            _ => false,
        };

        Shell {
            mode,
            use_color,
            active_bar: Mutex::new(None),
        }
    }

    /// Build a shell from command-line flags.
    ///
    /// `json` wins over `quiet` and `verbose`; `quiet` wins over `verbose`.
    pub fn from_flags(quiet: bool, verbose: bool, color: ColorChoice, json: bool) -> Self {
        if json {
            return Shell::new(ShellMode::Json);
        }

        let verbosity = match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        };
        Shell::new(ShellMode::Human { verbosity, color })
    }

    fn verbosity(&self) -> Option<Verbosity> {
        match self.mode {
            ShellMode::Human { verbosity, .. } => Some(verbosity),
            ShellMode::Json => None,
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.verbosity() == Some(Verbosity::Quiet)
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity() == Some(Verbosity::Verbose)
    }

    pub fn is_json(&self) -> bool {
        self.mode == ShellMode::Json
    }

    /// Print `{status:>12} {msg}` to stderr.
    ///
    /// A quiet shell prints only [`Status::Error`]; a JSON shell prints none.
    pub fn status(&self, status: Status, msg: impl Display) {
        let show = match self.verbosity() {
            None => false,
            Some(Verbosity::Quiet) => status == Status::Error,
            Some(_) => true,
        };
        if !show {
            return;
        }

        let line = format!("{} {}", self.format_status(status), msg);
        match self.bar() {
            Some(bar) => bar.suspend(|| eprintln!("{}", line)),
            None => eprintln!("{}", line),
        }
    }

    fn bar(&self) -> Option<ProgressBar> {
        self.active_bar.lock().ok().and_then(|bar| bar.clone())
    }

    pub fn note(&self, msg: impl Display) {
        self.status(Status::Info, msg);
    }

    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    /// Blank line on stdout between consecutive compiler runs.
    pub fn separator(&self) {
        if matches!(self.verbosity(), Some(Verbosity::Normal | Verbosity::Verbose)) {
            let mut out = io::stdout().lock();
            let _ = writeln!(out);
            let _ = out.flush();
        }
    }

    /// Write one event line to stdout. No-op outside JSON mode.
    pub fn json_event(&self, event: &serde_json::Value) {
        if !self.is_json() {
            return;
        }
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{}", event);
        let _ = out.flush();
    }

    fn format_status(&self, status: Status) -> String {
        let label = format!("{:>width$}", status.label(), width = Status::WIDTH);
        if self.use_color {
            format!("{}{}\x1b[0m", status.ansi(), label)
        } else {
            label
        }
    }

    /// A progress bar over `total` concurrent invocations.
    ///
    /// Only a normal-verbosity human shell draws one, and only for more than
    /// one invocation.
    pub fn progress(&self, total: u64, msg: impl Display) -> Progress<'_> {
        if self.verbosity() != Some(Verbosity::Normal) || total < 2 {
            return Progress {
                shell: self,
                bar: None,
            };
        }

        let bar = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg:>12} {wide_bar} {pos}/{len}") {
            bar.set_style(style);
        }
        bar.set_message(msg.to_string());
        if let Ok(mut active) = self.active_bar.lock() {
            *active = Some(bar.clone());
        }

        Progress {
            shell: self,
            bar: Some(bar),
        }
    }
}

/// Handle to a possibly hidden progress bar.
pub struct Progress<'a> {
    shell: &'a Shell,
    bar: Option<ProgressBar>,
}

impl Progress<'_> {
    pub fn inc(&self, delta: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(delta);
        }
    }

    /// Clear the bar; later status lines print directly again.
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
            if let Ok(mut active) = self.shell.active_bar.lock() {
                *active = None;
            }
        }
    }
}

/// `0.42s` under a minute, `2m 05s` above.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}
