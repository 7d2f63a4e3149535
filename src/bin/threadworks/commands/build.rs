//! `threadworks build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use threadworks::ops::{self, BuildOptions, OpsContext};
use threadworks::util::cli::GlobalArgs;
use threadworks::util::process::SystemRunner;
use threadworks::util::Shell;

pub fn execute(args: BuildArgs, global: &GlobalArgs, shell: &Shell) -> Result<()> {
    let ctx = global.context()?;

    // Config first, then command-line overrides
    let mut opts = BuildOptions::from_config(ctx.config());
    if args.parallel {
        opts.parallel = true;
    }
    opts.dry_run = global.dry_run;
    if let Some(policy) = global.failure_policy {
        opts.policy = policy;
    }

    tracing::debug!(
        "build: platform {}, policy {}, parallel {}",
        ctx.platform(),
        opts.policy,
        opts.parallel
    );

    let report = ops::build(&OpsContext::new(&ctx, shell), &SystemRunner, &opts);
    report.check()?;

    Ok(())
}
