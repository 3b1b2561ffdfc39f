// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   config (options), repos (repos, resources), release, exec, pr
//!
//! paths.repositories --> RepositoryListFile --> DiscoveryFilter --> units
//! ```

pub mod config;
pub mod exec;
pub mod pr;
pub mod release;
pub mod repos;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use anyhow::{Context, bail};

use crate::config::Config;
use crate::error::Result;
use crate::github::GithubClient;
use crate::orchestrator::{BatchReport, Orchestrator, OrchestratorOptions};
use crate::units::{DiscoveryFilter, RepositoryListFile, Unit, UnitSource};

/// Reads every configured repository list and applies the discovery filter.
///
/// # Errors
///
/// Returns an error if no list is configured, a list cannot be read, or a
/// skip pattern is invalid.
pub fn load_units(config: &Config) -> Result<Vec<Unit>> {
    if config.paths.repositories.is_empty() {
        bail!("no repository lists configured; pass --repos or set paths.repositories");
    }
    let sources: Vec<RepositoryListFile> = config
        .paths
        .repositories
        .iter()
        .map(RepositoryListFile::new)
        .collect();
    let units = sources.as_slice().units()?;
    let filter = DiscoveryFilter::from_config(&config.discovery)?;
    Ok(filter.apply(units))
}

/// Orchestrator settings derived from the configuration.
#[must_use]
pub fn orchestrator_options(config: &Config) -> OrchestratorOptions {
    OrchestratorOptions::builder()
        .with_base_path(config.paths.base.clone())
        .with_dry_run(config.global.dry)
        .with_remote(config.git.remote.clone())
        .with_stash_policy(config.git.stash_conflict)
        .maybe_with_user_email(config.git.user_email.clone())
        .build()
}

/// Builds a GitHub client from the configured credentials.
///
/// # Errors
///
/// Returns an error if credentials are missing or the client cannot be built.
pub fn github_client(config: &Config) -> Result<GithubClient> {
    let credentials = Arc::new(config.credentials()?);
    Ok(GithubClient::new(&config.github.api_url, credentials)?)
}

/// Builds an orchestrator talking to GitHub.
///
/// # Errors
///
/// Returns an error if credentials are missing or the client cannot be built.
pub fn orchestrator(config: &Config) -> Result<Orchestrator<GithubClient>> {
    let credentials = Arc::new(config.credentials().context("loading credentials")?);
    let api = GithubClient::new(&config.github.api_url, Arc::clone(&credentials))?;
    Ok(Orchestrator::new(
        api,
        credentials,
        orchestrator_options(config),
    ))
}

/// Prints one line per successful repository, then the failure count.
///
/// # Errors
///
/// Returns an error if any repository failed.
pub fn print_report(report: &BatchReport) -> Result<()> {
    for line in report_lines(report) {
        println!("{line}");
    }
    if !report.is_success() {
        bail!("{} repositories failed", report.failed);
    }
    Ok(())
}

fn report_lines(report: &BatchReport) -> Vec<String> {
    let mut lines: Vec<String> = report.outcomes.iter().map(ToString::to_string).collect();
    lines.push(format!("failed: {}", report.failed));
    lines
}
