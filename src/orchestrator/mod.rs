// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Multi-repository orchestration.
//!
//! ```text
//! units ──> group_units ──> for each RepositoryGroup (sequential, isolated):
//!
//!   acquire     open_or_clone, create and push home from default if
//!               missing, switch, fast-forward
//!   transact    record home commit, BranchGuard(working branch),
//!               transformation.apply(repo, units, dry_run)
//!   describe    job body, else transformation.changes(), else the
//!               summary of home_commit..HEAD
//!   reconcile   HEAD moved && !dry_run ──> ensure_pull_request
//!   restore     guard.restore()
//!
//!   failure ──> logged with the URL, counted, next group
//! ```
//!
//! # Key Types
//!
//! | Type             | Purpose                                 |
//! |------------------|-----------------------------------------|
//! | `Transformation` | Caller-supplied change, run per group   |
//! | `Job`            | Working branch, PR title/body, base     |
//! | `Orchestrator`   | Runs jobs and release steps             |
//! | `BatchReport`    | Per-repository outcomes and fail count  |

#[cfg(test)]
mod tests;

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use bon::Builder;
use tracing::{Instrument, error, info};

use crate::config::Credentials;
use crate::error::{FleetResult, InputError, Result};
use crate::git::{
    BranchGuard, ChangeSummary, HandleOptions, RepositoryHandle, StashConflictPolicy,
    summarize_range,
};
use crate::github::PullRequestApi;
use crate::github::reconcile::{Reconciled, ensure_pull_request};
use crate::logging::repo_span;
use crate::units::{RepositoryGroup, Unit};

/// Groups units by repository URL.
///
/// Groups keep the order in which each URL first appears, and units keep
/// their input order inside a group.
///
/// # Errors
///
/// Returns `InputError::InconsistentBranches` when units of one repository
/// disagree on their home branch.
pub fn group_units(units: Vec<Unit>) -> std::result::Result<Vec<RepositoryGroup>, InputError> {
    let mut groups: Vec<RepositoryGroup> = Vec::new();
    for unit in units {
        match groups.iter_mut().find(|g| g.url == unit.url) {
            Some(group) => group.units.push(unit),
            None => groups.push(RepositoryGroup {
                url: unit.url.clone(),
                branch: unit.branch.clone(),
                units: vec![unit],
            }),
        }
    }

    for group in &groups {
        let branches: BTreeSet<&str> = group.units.iter().map(|u| u.branch.as_str()).collect();
        if branches.len() > 1 {
            return Err(InputError::InconsistentBranches {
                url: group.url.clone(),
                branches: branches.into_iter().map(str::to_string).collect(),
            });
        }
    }
    Ok(groups)
}

/// A change applied to every repository of a batch.
///
/// Runs with the working branch checked out. Whatever it commits on that
/// branch ends up in the pull request.
pub trait Transformation {
    /// Applies the change for `units`, all of which live in `repo`.
    ///
    /// # Errors
    ///
    /// Any error aborts this repository only.
    fn apply(&mut self, repo: &mut RepositoryHandle, units: &[Unit], dry_run: bool) -> Result<()>;

    /// What the last `apply` changed, when the transformation tracks it.
    ///
    /// A non-empty summary becomes the default pull request body.
    fn changes(&self) -> Option<&ChangeSummary> {
        None
    }
}

impl<F> Transformation for F
where
    F: FnMut(&mut RepositoryHandle, &[Unit], bool) -> Result<()>,
{
    fn apply(&mut self, repo: &mut RepositoryHandle, units: &[Unit], dry_run: bool) -> Result<()> {
        self(repo, units, dry_run)
    }
}

/// One batch of changes.
#[derive(Debug, Clone, Builder)]
pub struct Job {
    /// Branch the changes are committed on and the pull request is opened from.
    #[builder(into, setters(name = with_working_branch))]
    pub working_branch: String,
    #[builder(into, setters(name = with_title))]
    pub title: String,
    /// Pull request body; defaults to a summary of the changed paths.
    #[builder(into, setters(name = with_body))]
    pub body: Option<String>,
    /// Home branch to use instead of each group's own.
    #[builder(into, setters(name = with_base_override))]
    pub base_override: Option<String>,
}

/// Orchestrator settings.
#[derive(Debug, Clone, Builder)]
pub struct OrchestratorOptions {
    /// Directory holding one clone per repository.
    #[builder(into, setters(name = with_base_path))]
    base_path: PathBuf,
    #[builder(setters(name = with_dry_run), default = false)]
    dry_run: bool,
    #[builder(into, setters(name = with_remote), default = "origin".to_string())]
    remote: String,
    #[builder(setters(name = with_stash_policy), default)]
    stash_policy: StashConflictPolicy,
    #[builder(into, setters(name = with_user_email))]
    user_email: Option<String>,
}

impl OrchestratorOptions {
    #[must_use]
    pub fn base_path(&self) -> &std::path::Path {
        &self.base_path
    }

    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn handle_options(&self) -> HandleOptions {
        HandleOptions::builder()
            .with_remote(self.remote.clone())
            .with_stash_policy(self.stash_policy)
            .with_dry_run(self.dry_run)
            .maybe_with_user_email(self.user_email.clone())
            .build()
    }
}

/// What happened in one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoStatus {
    /// A pull request was opened; holds its URL.
    Created(String),
    /// A pull request was already open; holds its URL.
    Existing(String),
    /// The transformation left the working branch where the home branch was.
    Unchanged,
    /// Dry run; whether the working branch moved.
    DryRun { changed: bool },
    /// A release branch was cut at `commit`.
    Released { commit: String },
    /// `tag` now points at `commit`.
    Tagged { tag: String, commit: String },
}

impl fmt::Display for RepoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created(url) => write!(f, "created {url}"),
            Self::Existing(url) => write!(f, "existing {url}"),
            Self::Unchanged => write!(f, "unchanged"),
            Self::DryRun { changed: true } => write!(f, "[DRY-RUN] changed"),
            Self::DryRun { changed: false } => write!(f, "[DRY-RUN] unchanged"),
            Self::Released { commit } => write!(f, "released at {commit}"),
            Self::Tagged { tag, commit } => write!(f, "tagged {tag} at {commit}"),
        }
    }
}

/// Outcome of one successfully processed repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoOutcome {
    pub url: String,
    pub branch: String,
    pub status: RepoStatus,
}

impl fmt::Display for RepoOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.url, self.branch, self.status)
    }
}

/// Result of a batch; failed repositories are counted, not listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<RepoOutcome>,
    pub failed: usize,
}

impl BatchReport {
    fn record(&mut self, url: &str, result: Result<RepoOutcome>) {
        match result {
            Ok(outcome) => {
                info!(repo = %outcome.url, branch = %outcome.branch, status = %outcome.status, "done");
                self.outcomes.push(outcome);
            }
            Err(e) => {
                error!(repo = %url, error = %format!("{e:#}"), "repository failed");
                self.failed += 1;
            }
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Applies jobs across repositories, one at a time.
pub struct Orchestrator<A> {
    api: A,
    credentials: Arc<Credentials>,
    options: OrchestratorOptions,
}

impl<A: PullRequestApi> Orchestrator<A> {
    #[must_use]
    pub const fn new(api: A, credentials: Arc<Credentials>, options: OrchestratorOptions) -> Self {
        Self {
            api,
            credentials,
            options,
        }
    }

    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    #[must_use]
    pub const fn options(&self) -> &OrchestratorOptions {
        &self.options
    }

    /// Opens or clones `url` and checks out an up-to-date `branch`.
    ///
    /// A missing `branch` is created from the remote's default branch and
    /// pushed, so pull requests can target it (a no-op in dry runs).
    ///
    /// # Errors
    ///
    /// Returns an error if cloning, branch creation or the switch fails.
    pub fn acquire(&self, url: &str, branch: &str) -> FleetResult<RepositoryHandle> {
        let mut repo = RepositoryHandle::open_or_clone(
            url,
            &self.options.base_path,
            Arc::clone(&self.credentials),
            self.options.handle_options(),
        )?;
        repo.fetch()?;
        if !repo.branch_exists(branch)? {
            let default = repo.default_branch()?;
            info!(repo = %url, branch, from = %default, "home branch missing, creating it");
            repo.create_branch(branch, Some(&default))?;
            repo.push(Some(branch), false)?;
        }
        repo.switch_branch(branch)?;
        repo.fast_forward()?;
        Ok(repo)
    }

    /// Runs `job` over every repository the units belong to.
    ///
    /// # Errors
    ///
    /// Only grouping errors are returned; repository failures are counted
    /// in the report.
    pub async fn run<T>(
        &self,
        units: Vec<Unit>,
        job: &Job,
        transformation: &mut T,
    ) -> FleetResult<BatchReport>
    where
        T: Transformation + ?Sized,
    {
        let groups = group_units(units)?;
        info!(
            repositories = groups.len(),
            branch = %job.working_branch,
            dry_run = self.options.dry_run,
            "starting batch"
        );

        let mut report = BatchReport::default();
        for group in &groups {
            let result = self
                .process(group, job, transformation)
                .instrument(repo_span(&group.url))
                .await;
            report.record(&group.url, result);
        }
        Ok(report)
    }

    async fn process<T>(
        &self,
        group: &RepositoryGroup,
        job: &Job,
        transformation: &mut T,
    ) -> Result<RepoOutcome>
    where
        T: Transformation + ?Sized,
    {
        let home = job.base_override.as_deref().unwrap_or(&group.branch);
        let working = job.working_branch.as_str();
        let mut repo = self.acquire(&group.url, home)?;
        let home_commit = repo.current_commit()?;

        if !repo.branch_exists(working)? {
            repo.create_branch(working, None)?;
        }

        let mut guard = BranchGuard::enter(&mut repo, working)?;
        transformation.apply(&mut guard, &group.units, self.options.dry_run)?;
        let changed = guard.current_commit()? != home_commit;

        let status = if self.options.dry_run {
            RepoStatus::DryRun { changed }
        } else if !changed {
            RepoStatus::Unchanged
        } else {
            let body = match (&job.body, transformation.changes()) {
                (Some(body), _) => body.clone(),
                (None, Some(changes)) if !changes.is_empty() => changes.to_string(),
                (None, _) => summarize_range(&guard, &home_commit, "HEAD")?.to_string(),
            };
            let reconciled =
                ensure_pull_request(&self.api, &guard, working, home, &job.title, &body).await?;
            match reconciled {
                Reconciled::Created(pr) => RepoStatus::Created(pr.html_url),
                Reconciled::Existing(pr) => RepoStatus::Existing(pr.html_url),
            }
        };

        guard.restore()?;
        Ok(RepoOutcome {
            url: group.url.clone(),
            branch: working.to_string(),
            status,
        })
    }

    /// Creates every group's home branch from `from` and pushes it.
    ///
    /// # Errors
    ///
    /// Only grouping errors are returned.
    pub fn cut_release(&self, units: Vec<Unit>, from: &str) -> FleetResult<BatchReport> {
        let groups = group_units(units)?;
        let mut report = BatchReport::default();
        for group in &groups {
            let _span = repo_span(&group.url).entered();
            let result = self.cut_one(group, from);
            report.record(&group.url, result);
        }
        Ok(report)
    }

    fn cut_one(&self, group: &RepositoryGroup, from: &str) -> Result<RepoOutcome> {
        let mut repo = self.acquire(&group.url, from)?;
        repo.create_branch(&group.branch, Some(from))?;
        repo.push(Some(&group.branch), false)?;
        let commit = repo
            .commit_of(&group.branch)?
            .unwrap_or_else(|| "unknown".to_string());
        Ok(RepoOutcome {
            url: group.url.clone(),
            branch: group.branch.clone(),
            status: RepoStatus::Released { commit },
        })
    }

    /// Points `tag` at the head of every group's home branch.
    ///
    /// # Errors
    ///
    /// Only grouping errors are returned.
    pub fn tag_release(&self, units: Vec<Unit>, tag: &str) -> FleetResult<BatchReport> {
        let groups = group_units(units)?;
        let mut report = BatchReport::default();
        for group in &groups {
            let _span = repo_span(&group.url).entered();
            let result = self.tag_one(group, tag);
            report.record(&group.url, result);
        }
        Ok(report)
    }

    fn tag_one(&self, group: &RepositoryGroup, tag: &str) -> Result<RepoOutcome> {
        let mut repo = self.acquire(&group.url, &group.branch)?;
        let commit = repo.current_commit()?;
        repo.tag_commit(tag, &commit)?;
        Ok(RepoOutcome {
            url: group.url.clone(),
            branch: group.branch.clone(),
            status: RepoStatus::Tagged {
                tag: tag.to_string(),
                commit,
            },
        })
    }
}
