//! Implementation of `build`.
//!
//! One compiler invocation per target, in table order. Invocations run one
//! after another unless `parallel` is set, in which case they run on the
//! rayon pool; either way every target is attempted and the report lists
//! targets in table order.

use std::path::PathBuf;
use std::time::Instant;

use rayon::prelude::*;

use crate::builder::toolchain::{toolchain_for, CommandSpec};
use crate::core::target::{TargetSpec, TARGETS};
use crate::platform::Platform;
use crate::util::config::{Config, ToolchainSettings};
use crate::util::process::{find_executable, CommandRunner};
use crate::util::shell::Status;

use super::{finish, run_invocation, skip_platform, FailurePolicy, InvocationRecord, OpsContext, OrchestrationReport};

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Run the invocations concurrently
    pub parallel: bool,

    /// Print the invocations without running them
    pub dry_run: bool,

    /// What to do with failed invocations
    pub policy: FailurePolicy,

    /// Compiler program overrides
    pub toolchain: ToolchainSettings,
}

impl BuildOptions {
    /// Options as configured, before command-line overrides.
    pub fn from_config(config: &Config) -> Self {
        BuildOptions {
            parallel: config.build.parallel.unwrap_or(false),
            dry_run: false,
            policy: config.build.failure_policy.unwrap_or_default(),
            toolchain: config.toolchain.clone(),
        }
    }
}

/// One compiler invocation.
#[derive(Debug, Clone)]
pub struct BuildStep {
    /// Target being built
    pub target: &'static TargetSpec,
    /// Command producing it
    pub command: CommandSpec,
}

/// The ordered invocations for a platform.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub platform: Platform,
    /// Compiler program, `None` when the platform has no toolchain
    pub compiler: Option<PathBuf>,
    pub steps: Vec<BuildStep>,
}

impl BuildPlan {
    /// Whether there is nothing to run.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Compute the build invocations for a platform.
///
/// Pure: nothing is spawned. Empty for [`Platform::Unrecognized`].
pub fn plan_build(platform: Platform, settings: &ToolchainSettings) -> BuildPlan {
    let Some(toolchain) = toolchain_for(platform, settings) else {
        return BuildPlan {
            platform,
            compiler: None,
            steps: Vec::new(),
        };
    };

    let steps = TARGETS
        .iter()
        .map(|target| BuildStep {
            target,
            command: toolchain.compile_command(target),
        })
        .collect();

    BuildPlan {
        platform: toolchain.platform(),
        compiler: Some(toolchain.compiler_path().to_path_buf()),
        steps,
    }
}

/// Build all targets for the context's platform.
///
/// Never fails; apply [`OrchestrationReport::check`] to honor the policy.
pub fn build(
    ctx: &OpsContext<'_>,
    runner: &dyn CommandRunner,
    opts: &BuildOptions,
) -> OrchestrationReport {
    let start = Instant::now();
    let plan = plan_build(ctx.platform, &opts.toolchain);

    if plan.is_empty() {
        skip_platform(ctx, "build");
        return finish(ctx, "build", opts.policy, Vec::new(), start);
    }

    if !opts.dry_run {
        warn_if_compiler_missing(ctx, &plan);
    }

    let records = if opts.parallel {
        run_parallel(ctx, runner, &plan, opts.dry_run)
    } else {
        run_sequential(ctx, runner, &plan, opts.dry_run)
    };

    finish(ctx, "build", opts.policy, records, start)
}

fn run_sequential(
    ctx: &OpsContext<'_>,
    runner: &dyn CommandRunner,
    plan: &BuildPlan,
    dry_run: bool,
) -> Vec<InvocationRecord> {
    let mut records = Vec::with_capacity(plan.steps.len());

    for (i, step) in plan.steps.iter().enumerate() {
        // Blank line between consecutive cl runs
        if i > 0 && plan.platform == Platform::Windows && !dry_run {
            ctx.shell.separator();
        }
        records.push(run_step(ctx, runner, step, dry_run));
    }

    records
}

fn run_parallel(
    ctx: &OpsContext<'_>,
    runner: &dyn CommandRunner,
    plan: &BuildPlan,
    dry_run: bool,
) -> Vec<InvocationRecord> {
    let progress = ctx.shell.progress(plan.steps.len() as u64, "Compiling");

    // Indexed collect keeps table order regardless of completion order
    let records: Vec<_> = plan
        .steps
        .par_iter()
        .map(|step| {
            let record = run_step(ctx, runner, step, dry_run);
            progress.inc(1);
            record
        })
        .collect();

    progress.finish();
    records
}

fn run_step(
    ctx: &OpsContext<'_>,
    runner: &dyn CommandRunner,
    step: &BuildStep,
    dry_run: bool,
) -> InvocationRecord {
    run_invocation(
        ctx,
        "build",
        Status::Compiling,
        step.target.name.to_string(),
        Some(step.command.clone()),
        dry_run,
        || runner.run(&step.command, ctx.cwd),
    )
}

fn warn_if_compiler_missing(ctx: &OpsContext<'_>, plan: &BuildPlan) {
    let Some(compiler) = &plan.compiler else {
        return;
    };

    match find_executable(compiler) {
        Some(path) => tracing::debug!("using compiler {}", path.display()),
        None => ctx.shell.warn(format!(
            "compiler `{}` was not found on PATH; its invocations will fail",
            compiler.display()
        )),
    }
}
