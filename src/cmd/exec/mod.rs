// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Exec command: run a shell command in every unit and open pull requests.
//!
//! ```text
//! for each repository (working branch checked out):
//!   for each unit:  run CMD in <clone>/<unit.path>
//!                   summarize(unit.path) dirty? --> commit (scope = unit.path), push
//!                   fold the unit summary into the repository's changes
//! then: HEAD moved --> ensure pull request, body = folded changes
//! ```


use std::path::Path;
use std::process::Command;

use anyhow::{Context, bail};
use tracing::{debug, info};

use super::{load_units, orchestrator, print_report};
use crate::cli::exec::ExecArgs;
use crate::config::Config;
use crate::error::Result;
use crate::git::{ChangeSummary, RepositoryHandle, summarize};
use crate::orchestrator::{Job, Transformation};
use crate::units::Unit;

/// Runs one external command per unit and commits what it changed.
#[derive(Debug, Clone)]
pub struct CommandTransformation {
    command: Vec<String>,
    message: String,
    changes: ChangeSummary,
}

impl CommandTransformation {
    #[must_use]
    pub fn new(command: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            command,
            message: message.into(),
            changes: ChangeSummary::default(),
        }
    }

    fn run_in(&self, dir: &Path) -> Result<()> {
        let Some((program, args)) = self.command.split_first() else {
            bail!("no command given");
        };
        let output = Command::new(program)
            .args(args)
            .current_dir(dir)
            .output()
            .with_context(|| format!("failed to start '{program}' in {}", dir.display()))?;

        debug!(
            dir = %dir.display(),
            stdout = %String::from_utf8_lossy(&output.stdout).trim_end(),
            "command finished"
        );
        if !output.status.success() {
            bail!(
                "'{}' failed in {} ({}): {}",
                self.command.join(" "),
                dir.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}

impl Transformation for CommandTransformation {
    fn apply(&mut self, repo: &mut RepositoryHandle, units: &[Unit], _dry_run: bool) -> Result<()> {
        self.changes = ChangeSummary::default();
        for unit in units {
            let dir = repo.path().join(&unit.path);
            info!(unit = %unit.name, command = %self.command.join(" "), "running command");
            self.run_in(&dir)?;

            let pending = summarize(repo, &unit.path)?;
            if pending.dirty {
                info!(unit = %unit.name, changes = %pending, "committing");
                // push is a logged no-op on dry-run handles
                repo.commit_and_push(&self.message, &unit.path, true, false)?;
                self.changes += pending;
            } else {
                debug!(unit = %unit.name, "no changes");
            }
        }
        Ok(())
    }

    fn changes(&self) -> Option<&ChangeSummary> {
        Some(&self.changes)
    }
}

/// Run the exec command.
///
/// # Errors
///
/// Returns an error if units cannot be loaded or grouped, credentials are
/// missing, or any repository failed.
pub async fn run_exec_command(args: &ExecArgs, config: &Config) -> Result<()> {
    let units = load_units(config)?;
    let orchestrator = orchestrator(config)?;

    let job = Job::builder()
        .with_working_branch(args.branch.clone())
        .with_title(args.title.clone())
        .maybe_with_body(args.body.clone())
        .maybe_with_base_override(args.base.clone())
        .build();
    let message = args.message.clone().unwrap_or_else(|| args.title.clone());
    let mut transformation = CommandTransformation::new(args.command.clone(), message);

    let report = orchestrator.run(units, &job, &mut transformation).await?;
    print_report(&report)
}
