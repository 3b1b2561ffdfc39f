// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository listing and descriptor inspection.
//!
//! ```text
//! fleet repos [-o FILE]   grouped units, optionally saved as a repository list
//! fleet resources         checkout, then descriptor resources per unit
//! ```

use anyhow::bail;
use tracing::{error, info};

use super::{load_units, orchestrator};
use crate::cli::ReposArgs;
use crate::config::Config;
use crate::error::{FleetResult, Result};
use crate::github::PullRequestApi;
use crate::logging::repo_span;
use crate::orchestrator::{Orchestrator, group_units};
use crate::units::{
    CharmDescriptorReader, DescriptorSource, RepositoryGroup, RepositoryList,
};

/// Renders groups as `url (branch)` headers followed by indented units.
#[must_use]
pub fn format_groups(groups: &[RepositoryGroup]) -> Vec<String> {
    let mut lines = Vec::new();
    for group in groups {
        lines.push(format!("{} ({})", group.url, group.branch));
        for unit in &group.units {
            lines.push(format!("  {}: {}", unit.name, unit.path.display()));
        }
    }
    lines
}

/// Run the repos command.
///
/// # Errors
///
/// Returns an error if the units cannot be loaded or grouped, or the
/// snapshot cannot be written.
pub fn run_repos_command(args: &ReposArgs, config: &Config) -> Result<()> {
    let groups = group_units(load_units(config)?)?;
    for line in format_groups(&groups) {
        println!("{line}");
    }

    if let Some(output) = &args.output {
        RepositoryList::from_groups(&groups).save(output)?;
        info!(path = %output.display(), repositories = groups.len(), "saved repository list");
    }
    Ok(())
}

/// Resource lines of one checked-out group: `unit: resource = reference`.
///
/// Units without a descriptor contribute nothing.
///
/// # Errors
///
/// Returns an error if the checkout fails or a descriptor is malformed.
pub fn group_resources<A, D>(
    orchestrator: &Orchestrator<A>,
    group: &RepositoryGroup,
    reader: &D,
) -> FleetResult<Vec<String>>
where
    A: PullRequestApi,
    D: DescriptorSource,
{
    let repo = orchestrator.acquire(&group.url, &group.branch)?;
    let mut lines = Vec::new();
    for unit in &group.units {
        let Some(descriptor) = reader.read(&repo.path().join(&unit.path))? else {
            continue;
        };
        for (name, reference) in &descriptor.resources {
            lines.push(format!("{}: {name} = {reference}", descriptor.name));
        }
    }
    Ok(lines)
}

/// Run the resources command.
///
/// # Errors
///
/// Returns an error if units cannot be loaded or any repository failed.
pub fn run_resources_command(config: &Config) -> Result<()> {
    let groups = group_units(load_units(config)?)?;
    let orchestrator = orchestrator(config)?;

    let mut failed = 0usize;
    for group in &groups {
        let _span = repo_span(&group.url).entered();
        match group_resources(&orchestrator, group, &CharmDescriptorReader) {
            Ok(lines) => lines.iter().for_each(|line| println!("{line}")),
            Err(e) => {
                error!(repo = %group.url, error = %e, "repository failed");
                failed += 1;
            }
        }
    }

    println!("failed: {failed}");
    if failed > 0 {
        bail!("{failed} repositories failed");
    }
    Ok(())
}
