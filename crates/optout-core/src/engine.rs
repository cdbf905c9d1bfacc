//! Applies a [`Catalog`] under a [`RunConfig`].
//!
//! One pass, in catalog order. Each action is evaluated on its own: a skip or
//! a failed command never affects the actions after it.

use serde::Serialize;
use std::io::Write;

use crate::action::{ActionKind, OptOutAction};
use crate::catalog::Catalog;
use crate::error::{OptOutError, Result};
use crate::host::Host;
use crate::platform::Platform;

// ---------------------------------------------------------------------------
// RunConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunConfig {
    pub apply_env: bool,
    pub apply_exec: bool,
    pub dry_run: bool,
    pub verbose: bool,
}

impl RunConfig {
    /// Build from front-end flags. Selecting neither kind selects both.
    pub fn from_flags(env: bool, exec: bool, dry_run: bool, verbose: bool) -> Self {
        let (apply_env, apply_exec) = if env || exec { (env, exec) } else { (true, true) };
        Self {
            apply_env,
            apply_exec,
            dry_run,
            verbose,
        }
    }

    fn kind_enabled(&self, action: &OptOutAction) -> bool {
        match action.kind {
            ActionKind::EnvVar { .. } => self.apply_env,
            ActionKind::Command { .. } => self.apply_exec,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::from_flags(false, false, false, false)
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    PlatformMismatch,
    KindDisabled,
    ExecutableNotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    Applied,
    /// Eligible, but the run was a dry run.
    Simulated,
    Skipped { reason: SkipReason },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRecord {
    pub id: &'static str,
    pub line: String,
    #[serde(flatten)]
    pub outcome: ActionOutcome,
    /// Captured command output, kept only in verbose runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub platform: Platform,
    pub config: RunConfig,
    pub records: Vec<ActionRecord>,
}

impl RunReport {
    fn count(&self, pred: impl Fn(&ActionOutcome) -> bool) -> usize {
        self.records.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn applied(&self) -> usize {
        self.count(|o| matches!(o, ActionOutcome::Applied))
    }

    pub fn simulated(&self) -> usize {
        self.count(|o| matches!(o, ActionOutcome::Simulated))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ActionOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ActionOutcome::Failed { .. }))
    }

    /// Actions that passed every filter, whatever happened next.
    pub fn eligible(&self) -> usize {
        self.records.len() - self.skipped()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct Engine {
    config: RunConfig,
    platform: Platform,
}

impl Engine {
    /// Engine for the detected host platform.
    pub fn new(config: RunConfig) -> Self {
        Self::with_platform(config, Platform::detect())
    }

    pub fn with_platform(config: RunConfig, platform: Platform) -> Self {
        Self { config, platform }
    }

    /// Decide whether `action` is eligible without touching the host.
    pub fn filter(&self, action: &OptOutAction) -> Option<SkipReason> {
        if !action.applies_to(self.platform) {
            return Some(SkipReason::PlatformMismatch);
        }
        if !self.config.kind_enabled(action) {
            return Some(SkipReason::KindDisabled);
        }
        None
    }

    /// Run one pass over `catalog`.
    ///
    /// In verbose mode one line per eligible action is written to `log`
    /// before the action is performed, identically for dry and live runs.
    /// Per-action failures are recorded in the report; only a failing `log`
    /// writer aborts the pass.
    pub fn run<H, W>(&self, catalog: &Catalog, host: &mut H, log: &mut W) -> Result<RunReport>
    where
        H: Host + ?Sized,
        W: Write + ?Sized,
    {
        tracing::debug!(
            platform = %self.platform,
            apply_env = self.config.apply_env,
            apply_exec = self.config.apply_exec,
            dry_run = self.config.dry_run,
            actions = catalog.len(),
            "starting opt-out pass"
        );

        let mut records = Vec::with_capacity(catalog.len());
        for action in catalog {
            records.push(self.apply(action, host, log)?);
        }
        log.flush()?;

        let report = RunReport {
            platform: self.platform,
            config: self.config,
            records,
        };
        tracing::debug!(
            applied = report.applied(),
            simulated = report.simulated(),
            skipped = report.skipped(),
            failed = report.failed(),
            "opt-out pass complete"
        );
        Ok(report)
    }

    fn apply<H, W>(&self, action: &OptOutAction, host: &mut H, log: &mut W) -> Result<ActionRecord>
    where
        H: Host + ?Sized,
        W: Write + ?Sized,
    {
        let line = action.render();
        let record = |outcome, output| ActionRecord {
            id: action.id,
            line: line.clone(),
            outcome,
            output,
        };

        if let Some(reason) = self.filter(action) {
            tracing::debug!(action = action.id, ?reason, "skipped");
            return Ok(record(ActionOutcome::Skipped { reason }, None));
        }

        let resolved = match action.kind {
            ActionKind::Command { executable, .. } => match host.resolve_executable(executable) {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::debug!(action = action.id, error = %e, "skipped");
                    return Ok(record(
                        ActionOutcome::Skipped {
                            reason: SkipReason::ExecutableNotFound,
                        },
                        None,
                    ));
                }
            },
            ActionKind::EnvVar { .. } => None,
        };

        if self.config.verbose {
            writeln!(log, "{line}")?;
        }

        if self.config.dry_run {
            return Ok(record(ActionOutcome::Simulated, None));
        }

        match (action.kind, resolved) {
            (ActionKind::EnvVar { name, value }, _) => {
                host.set_var(name, value.as_str());
                tracing::info!(action = action.id, %line, "environment variable set");
                Ok(record(ActionOutcome::Applied, None))
            }
            (ActionKind::Command { executable, arguments }, Some(path)) => {
                let (outcome, output) = match host.run_command(&path, arguments) {
                    Ok(out) => {
                        let captured = self.capture(action, &out.stdout, &out.stderr);
                        if out.success {
                            tracing::info!(action = action.id, %line, "command completed");
                            (ActionOutcome::Applied, captured)
                        } else {
                            let status = match out.code {
                                Some(code) => format!("exited with status {code}"),
                                None => "terminated by signal".to_string(),
                            };
                            let err = OptOutError::CommandExecutionFailed {
                                program: executable.to_string(),
                                reason: status,
                            };
                            self.report_failure(action, &err);
                            (
                                ActionOutcome::Failed {
                                    reason: err.to_string(),
                                },
                                captured,
                            )
                        }
                    }
                    Err(err) => {
                        self.report_failure(action, &err);
                        (
                            ActionOutcome::Failed {
                                reason: err.to_string(),
                            },
                            None,
                        )
                    }
                };
                Ok(record(outcome, output))
            }
            (ActionKind::Command { executable, .. }, None) => {
                Err(OptOutError::ExecutableNotFound(executable.to_string()))
            }
        }
    }

    /// Failures surface only in verbose runs; a quiet run stays silent.
    fn report_failure(&self, action: &OptOutAction, err: &OptOutError) {
        if self.config.verbose {
            tracing::warn!(action = action.id, "{err}");
        } else {
            tracing::debug!(action = action.id, "{err}");
        }
    }

    /// Keep and echo command output in verbose runs.
    fn capture(&self, action: &OptOutAction, stdout: &str, stderr: &str) -> Option<String> {
        if !self.config.verbose {
            return None;
        }
        let combined = [stdout.trim_end(), stderr.trim_end()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("\n");
        if combined.is_empty() {
            return None;
        }
        tracing::info!(action = action.id, output = %combined, "command output");
        Some(combined)
    }
}
