//! `threadworks clean` command

use anyhow::Result;

use crate::cli::CleanArgs;
use threadworks::ops::{self, CleanOptions, OpsContext};
use threadworks::util::cli::GlobalArgs;
use threadworks::util::process::SystemRunner;
use threadworks::util::Shell;

pub fn execute(args: CleanArgs, global: &GlobalArgs, shell: &Shell) -> Result<()> {
    let ctx = global.context()?;

    let mut opts = CleanOptions::from_config(ctx.config());
    if let Some(backend) = args.removal {
        opts.backend = backend;
    }
    opts.dry_run = global.dry_run;
    if let Some(policy) = global.failure_policy {
        opts.policy = policy;
    }

    tracing::debug!(
        "clean: platform {}, policy {}, removal {}",
        ctx.platform(),
        opts.policy,
        opts.backend
    );

    let runner = SystemRunner;
    let remover = ops::remover_for(opts.backend, ctx.platform(), &runner);
    let report = ops::clean(&OpsContext::new(&ctx, shell), remover.as_ref(), &opts);
    report.check()?;

    Ok(())
}
