// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Idempotent pull request handling.
//!
//! ```text
//! ensure_pull_request
//!   push branch
//!   find_open_pull_request ── 1 ──> Existing
//!                          ── 0 ──> create ──> Created
//!                          ── n ──> DuplicatePullRequest
//!
//! merge(batch)
//!   per PR: refresh ── merged? ──> AlreadyMerged
//!                   ── !can_be_merged && !force ──> NotMergeable
//!                   ── squash ──> Merged | Failed
//! ```

use std::fmt::Write as _;

use tracing::{info, warn};

use super::{MergeMethod, MergeRequest, NewPullRequest, PullRequest, PullRequestApi, Review};
use crate::error::{FleetResult, RepositoryError};
use crate::git::RepositoryHandle;

/// Commit message body of every merge performed by the tool.
pub const MERGE_MESSAGE: &str = "merged remotely by fleet";

/// Result of [`ensure_pull_request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled {
    /// An open pull request for the branch was already there.
    Existing(PullRequest),
    /// A new pull request was opened.
    Created(PullRequest),
}

impl Reconciled {
    #[must_use]
    pub const fn pull_request(&self) -> &PullRequest {
        match self {
            Self::Existing(pr) | Self::Created(pr) => pr,
        }
    }
}

/// A pull request together with the repository it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedPullRequest {
    pub repo_url: String,
    pub pull_request: PullRequest,
}

/// The single open pull request whose head is `branch`.
///
/// # Errors
///
/// - `RepositoryError::DuplicatePullRequest` if more than one matches.
/// - Any API error.
pub async fn find_open_pull_request<A: PullRequestApi>(
    api: &A,
    url: &str,
    branch: &str,
) -> FleetResult<Option<PullRequest>> {
    let mut matching: Vec<PullRequest> = api
        .open_pull_requests(url, branch)
        .await?
        .into_iter()
        .filter(|pr| pr.head.ref_name == branch)
        .collect();

    match matching.len() {
        0 => Ok(None),
        1 => Ok(matching.pop()),
        count => Err(RepositoryError::DuplicatePullRequest {
            branch: branch.to_string(),
            count,
        }
        .into()),
    }
}

/// Pushes `branch` and makes sure exactly one open pull request targets `base` from it.
///
/// An existing pull request is returned untouched; its title and body are
/// not updated.
///
/// # Errors
///
/// Returns an error if the push, lookup or creation fails.
pub async fn ensure_pull_request<A: PullRequestApi>(
    api: &A,
    repo: &RepositoryHandle,
    branch: &str,
    base: &str,
    title: &str,
    body: &str,
) -> FleetResult<Reconciled> {
    repo.push(Some(branch), false)?;

    if let Some(existing) = find_open_pull_request(api, repo.url(), branch).await? {
        info!(repo = %repo.url(), branch, pr = %existing.html_url, "pull request already open");
        return Ok(Reconciled::Existing(existing));
    }

    let request = NewPullRequest {
        title: title.to_string(),
        head: branch.to_string(),
        base: base.to_string(),
        body: body.to_string(),
    };
    let created = api.create_pull_request(repo.url(), &request).await?;
    info!(repo = %repo.url(), branch, base, pr = %created.html_url, "opened pull request");
    Ok(Reconciled::Created(created))
}

/// Review and mergeability state of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mergeability {
    pub mergeable: bool,
    pub approvals: usize,
    pub reviews: usize,
}

impl Mergeability {
    #[must_use]
    pub fn new(pull_request: &PullRequest, reviews: &[Review]) -> Self {
        Self {
            mergeable: pull_request.mergeable.unwrap_or(false),
            approvals: reviews.iter().filter(|r| r.is_approval()).count(),
            reviews: reviews.len(),
        }
    }

    /// Mergeable, reviewed at least once, and every review is an approval.
    #[must_use]
    pub const fn can_be_merged(&self) -> bool {
        self.mergeable && self.reviews > 0 && self.approvals == self.reviews
    }
}

/// One row of the `pr summary` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestStatus {
    pub html_url: String,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub mergeability: Mergeability,
}

/// Collects check-run counts and review state of a tracked pull request.
///
/// # Errors
///
/// Returns any API error.
pub async fn pull_request_status<A: PullRequestApi>(
    api: &A,
    tracked: &TrackedPullRequest,
) -> FleetResult<PullRequestStatus> {
    let url = &tracked.repo_url;
    let number = tracked.pull_request.number;
    let fresh = api.pull_request(url, number).await?;
    let reviews = api.reviews(url, number).await?;
    let runs = api.check_runs(url, &fresh.head.sha).await?;

    let count = |wanted: &str| {
        runs.iter()
            .filter(|run| run.conclusion.as_deref() == Some(wanted))
            .count()
    };

    Ok(PullRequestStatus {
        html_url: fresh.html_url.clone(),
        succeeded: count("success"),
        failed: count("failure"),
        skipped: count("skipped"),
        mergeability: Mergeability::new(&fresh, &reviews),
    })
}

/// Renders status rows as an aligned plain-text table.
#[must_use]
pub fn render_status_table(rows: &[PullRequestStatus]) -> String {
    const HEADERS: [&str; 6] = ["pull request", "success", "failure", "skipped", "approved", "mergeable"];

    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|row| {
            [
                row.html_url.clone(),
                row.succeeded.to_string(),
                row.failed.to_string(),
                row.skipped.to_string(),
                format!("{}/{}", row.mergeability.approvals, row.mergeability.reviews),
                if row.mergeability.can_be_merged() { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    let mut line = |fields: &[&str]| {
        let joined = fields
            .iter()
            .zip(widths)
            .map(|(field, width)| format!("{field:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "{}", joined.trim_end());
    };
    line(&HEADERS);
    for row in &cells {
        line(&row.each_ref().map(String::as_str));
    }
    out
}

/// What happened to one pull request of a merge batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    AlreadyMerged,
    NotMergeable,
    Merged { sha: Option<String> },
    Failed { message: String },
}

/// A merge outcome and the pull request it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub html_url: String,
    pub outcome: MergeOutcome,
}

async fn merge_one<A: PullRequestApi>(
    api: &A,
    tracked: &TrackedPullRequest,
    force: bool,
) -> FleetResult<MergeOutcome> {
    let url = &tracked.repo_url;
    let number = tracked.pull_request.number;
    let fresh = api.pull_request(url, number).await?;
    if fresh.is_merged() {
        return Ok(MergeOutcome::AlreadyMerged);
    }

    let reviews = api.reviews(url, number).await?;
    if !force && !Mergeability::new(&fresh, &reviews).can_be_merged() {
        return Ok(MergeOutcome::NotMergeable);
    }

    let request = MergeRequest {
        commit_title: format!("{} (#{number})", fresh.title),
        commit_message: MERGE_MESSAGE.to_string(),
        merge_method: MergeMethod::Squash,
    };
    let result = api.merge_pull_request(url, number, &request).await?;
    if result.merged {
        Ok(MergeOutcome::Merged { sha: result.sha })
    } else {
        Ok(MergeOutcome::Failed {
            message: result.message,
        })
    }
}

/// Squash-merges every pull request in `batch`.
///
/// Pull requests that are not fully approved and mergeable are skipped
/// unless `force` is set. A failure is recorded and the batch continues.
pub async fn merge<A: PullRequestApi>(
    api: &A,
    batch: &[TrackedPullRequest],
    force: bool,
) -> Vec<MergeReport> {
    let mut reports = Vec::with_capacity(batch.len());
    for tracked in batch {
        let html_url = tracked.pull_request.html_url.clone();
        let outcome = match merge_one(api, tracked, force).await {
            Ok(outcome) => outcome,
            Err(e) => MergeOutcome::Failed {
                message: e.to_string(),
            },
        };
        match &outcome {
            MergeOutcome::Merged { sha } => {
                info!(pr = %html_url, sha = sha.as_deref().unwrap_or("-"), "merged");
            }
            MergeOutcome::AlreadyMerged => info!(pr = %html_url, "already merged"),
            MergeOutcome::NotMergeable => warn!(pr = %html_url, "not mergeable, skipped"),
            MergeOutcome::Failed { message } => warn!(pr = %html_url, error = %message, "merge failed"),
        }
        reports.push(MergeReport { html_url, outcome });
    }
    reports
}
