// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! PR command: status table and batch merge for one working branch.
//!
//! ```text
//! repositories --> open PR with head == BRANCH --> TrackedPullRequest
//!   summary: checks + reviews --> aligned table
//!   merge:   squash-merge approved ones (all with --force)
//! ```


use anyhow::bail;
use tracing::{error, info, warn};

use super::{github_client, load_units};
use crate::cli::pr::{PrArgs, PrOperation};
use crate::config::Config;
use crate::error::Result;
use crate::github::PullRequestApi;
use crate::github::reconcile::{
    MergeOutcome, MergeReport, TrackedPullRequest, find_open_pull_request, merge,
    pull_request_status, render_status_table,
};
use crate::orchestrator::group_units;

/// Pull requests found for a branch, plus the number of lookups that failed.
#[derive(Debug, Default)]
pub struct TrackedBatch {
    pub tracked: Vec<TrackedPullRequest>,
    pub failed: usize,
}

/// Looks up the open pull request of `branch` in each repository.
///
/// Repositories without one are skipped.
pub async fn track_pull_requests<A: PullRequestApi>(
    api: &A,
    urls: &[String],
    branch: &str,
) -> TrackedBatch {
    let mut batch = TrackedBatch::default();
    for url in urls {
        match find_open_pull_request(api, url, branch).await {
            Ok(Some(pull_request)) => batch.tracked.push(TrackedPullRequest {
                repo_url: url.clone(),
                pull_request,
            }),
            Ok(None) => info!(repo = %url, branch, "no open pull request"),
            Err(e) => {
                error!(repo = %url, branch, error = %e, "pull request lookup failed");
                batch.failed += 1;
            }
        }
    }
    batch
}

/// Renders the status table of every tracked pull request.
///
/// Returns the table and the number of pull requests whose status could
/// not be read.
pub async fn summarize<A: PullRequestApi>(
    api: &A,
    tracked: &[TrackedPullRequest],
) -> (String, usize) {
    let mut rows = Vec::with_capacity(tracked.len());
    let mut failed = 0;
    for pr in tracked {
        match pull_request_status(api, pr).await {
            Ok(row) => rows.push(row),
            Err(e) => {
                warn!(pr = %pr.pull_request.html_url, error = %e, "status unavailable");
                failed += 1;
            }
        }
    }
    (render_status_table(&rows), failed)
}

/// One output line per merge report.
#[must_use]
pub fn format_merge_report(report: &MergeReport) -> String {
    let outcome = match &report.outcome {
        MergeOutcome::AlreadyMerged => "already merged".to_string(),
        MergeOutcome::NotMergeable => "not mergeable, skipped".to_string(),
        MergeOutcome::Merged { sha: Some(sha) } => format!("merged as {sha}"),
        MergeOutcome::Merged { sha: None } => "merged".to_string(),
        MergeOutcome::Failed { message } => format!("failed: {message}"),
    };
    format!("{}: {outcome}", report.html_url)
}

/// Run the pr command.
///
/// # Errors
///
/// Returns an error if units cannot be loaded, credentials are missing, or
/// any lookup, status read or merge failed.
pub async fn run_pr_command(args: &PrArgs, config: &Config) -> Result<()> {
    let urls: Vec<String> = group_units(load_units(config)?)?
        .into_iter()
        .map(|group| group.url)
        .collect();
    let api = github_client(config)?;

    match &args.operation {
        PrOperation::Summary { branch } => {
            let batch = track_pull_requests(&api, &urls, branch).await;
            let (table, unreadable) = summarize(&api, &batch.tracked).await;
            print!("{table}");
            let failed = batch.failed + unreadable;
            if failed > 0 {
                bail!("{failed} pull requests could not be read");
            }
        }
        PrOperation::Merge { branch, force } => {
            let batch = track_pull_requests(&api, &urls, branch).await;
            let reports = merge(&api, &batch.tracked, *force).await;
            for report in &reports {
                println!("{}", format_merge_report(report));
            }
            let failed = batch.failed
                + reports
                    .iter()
                    .filter(|r| matches!(r.outcome, MergeOutcome::Failed { .. }))
                    .count();
            println!("failed: {failed}");
            if failed > 0 {
                bail!("{failed} pull requests failed to merge");
            }
        }
    }
    Ok(())
}
