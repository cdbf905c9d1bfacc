use crate::output::print_json;
use anyhow::Context;
use clap::Args;
use optout_core::catalog::Catalog;
use optout_core::engine::{ActionOutcome, Engine, RunConfig, RunReport};
use optout_core::host::SystemHost;

/// Flags for the default opt-out pass. Selecting neither `--env` nor
/// `--exec` applies both kinds.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Only set environment variables
    #[arg(long, env = "OPTOUT_ENV")]
    pub env: bool,

    /// Only run tool commands
    #[arg(long, env = "OPTOUT_EXEC")]
    pub exec: bool,

    /// Show what would be done without changing anything
    #[arg(long, env = "OPTOUT_DRY_RUN")]
    pub dry_run: bool,

    /// Print each action before performing it
    #[arg(long, short = 'v', visible_alias = "show-log", env = "OPTOUT_VERBOSE")]
    pub verbose: bool,
}

impl RunArgs {
    pub fn config(&self) -> RunConfig {
        RunConfig::from_flags(self.env, self.exec, self.dry_run, self.verbose)
    }
}

pub fn run(args: &RunArgs, json: bool) -> anyhow::Result<()> {
    let catalog = Catalog::builtin().context("built-in catalog is invalid")?;
    let engine = Engine::new(args.config());
    let mut host = SystemHost;

    // The action log shares stdout with the JSON report, so move it aside.
    let report = if json {
        engine.run(&catalog, &mut host, &mut std::io::stderr().lock())
    } else {
        engine.run(&catalog, &mut host, &mut std::io::stdout().lock())
    }
    .context("opt-out pass aborted")?;

    summarize(&report);
    if json {
        print_json(&report)?;
    }
    Ok(())
}

fn summarize(report: &RunReport) {
    tracing::info!(
        platform = %report.platform,
        applied = report.applied(),
        simulated = report.simulated(),
        skipped = report.skipped(),
        failed = report.failed(),
        "done"
    );
    for record in &report.records {
        if let ActionOutcome::Failed { reason } = &record.outcome {
            tracing::debug!(action = record.id, %reason, "failed action");
        }
    }
}
