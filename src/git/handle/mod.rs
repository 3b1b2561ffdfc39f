// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! A local clone bound to its remote.
//!
//! ```text
//! RepositoryHandle
//!   url ─────────── identity, verified against remote.<name>.url
//!   path ────────── <base>/<last url segment without .git>
//!   credentials ─── Arc<Credentials>, shared read-only
//!   options ─────── remote, stash policy, dry run, user email
//!
//! switch_branch(name)
//!   dirty? ── add -A + stash push
//!   fetch --all
//!   checkout --force: local | remote-tracking | tag/commit (detached)
//!   stash pop (always, even after a failed checkout)
//!     conflict ── StashConflictPolicy
//!   reset
//! ```
//!
//! Reads go through [`GixBackend`]; anything that writes uses the git CLI.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use bon::Builder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::backend::{GitMutation, GitQuery, GixBackend, ShellBackend};
use crate::config::Credentials;
use crate::error::{ConfigError, FleetResult, InputError, RepositoryError};

/// What to do when re-applying stashed changes conflicts with the target branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StashConflictPolicy {
    /// Keep the branch version of conflicted paths and drop the stash.
    #[default]
    PreferBranch,
    /// Keep the stashed version of conflicted paths and drop the stash.
    PreferStash,
    /// Keep the branch version, leave the stash entry in place and fail.
    Fail,
}

impl fmt::Display for StashConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreferBranch => write!(f, "prefer-branch"),
            Self::PreferStash => write!(f, "prefer-stash"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

impl FromStr for StashConflictPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prefer-branch" => Ok(Self::PreferBranch),
            "prefer-stash" => Ok(Self::PreferStash),
            "fail" => Ok(Self::Fail),
            _ => Err(ConfigError::InvalidValue {
                section: "git".to_string(),
                key: "stash_conflict".to_string(),
                message: format!("expected 'prefer-branch', 'prefer-stash', or 'fail', got '{s}'"),
            }),
        }
    }
}

/// Where HEAD points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadRef {
    /// A local branch.
    Branch(String),
    /// A detached commit, e.g. after checking out a tag.
    Detached(String),
}

impl HeadRef {
    /// Name or commit to hand to a checkout.
    #[must_use]
    pub fn as_revision(&self) -> &str {
        match self {
            Self::Branch(name) | Self::Detached(name) => name,
        }
    }
}

impl fmt::Display for HeadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch(name) => write!(f, "{name}"),
            Self::Detached(commit) => write!(f, "detached at {commit}"),
        }
    }
}

/// Per-handle behavior switches.
#[derive(Debug, Clone, Builder)]
pub struct HandleOptions {
    #[builder(into, setters(name = with_remote), default = "origin".to_string())]
    remote: String,
    #[builder(setters(name = with_stash_policy), default)]
    stash_policy: StashConflictPolicy,
    #[builder(setters(name = with_dry_run), default = false)]
    dry_run: bool,
    #[builder(into, setters(name = with_user_email))]
    user_email: Option<String>,
}

impl Default for HandleOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Directory a clone of `url` lives in below `base`.
///
/// # Errors
///
/// Returns `InputError::InvalidRemoteUrl` when the URL has no usable last segment.
pub fn clone_dir(base: &Path, url: &str) -> Result<PathBuf, InputError> {
    let name = url
        .trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()
        .map(|segment| segment.strip_suffix(".git").unwrap_or(segment))
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .ok_or_else(|| InputError::InvalidRemoteUrl(url.to_string()))?;
    Ok(base.join(name))
}

fn normalize_url(url: &str) -> &str {
    let url = url.trim().trim_end_matches('/');
    url.strip_suffix(".git").unwrap_or(url)
}

/// A local working copy and the remote it was cloned from.
#[derive(Debug)]
pub struct RepositoryHandle {
    url: String,
    path: PathBuf,
    credentials: Arc<Credentials>,
    options: HandleOptions,
}

impl RepositoryHandle {
    /// Clones `url` below `base` or opens the existing clone there.
    ///
    /// # Errors
    ///
    /// - `InputError::RemoteMismatch` if the existing clone tracks another remote.
    /// - `RepositoryError::CloneFailed` if cloning fails.
    pub fn open_or_clone(
        url: &str,
        base: &Path,
        credentials: Arc<Credentials>,
        options: HandleOptions,
    ) -> FleetResult<Self> {
        let path = clone_dir(base, url)?;

        if path.exists() {
            if !path.join(".git").exists() {
                return Err(RepositoryError::RepoNotFound {
                    path: path.display().to_string(),
                }
                .into());
            }
            debug!(repo = %url, path = %path.display(), "using existing clone");
        } else {
            std::fs::create_dir_all(base)?;
            info!(repo = %url, path = %path.display(), "cloning");
            ShellBackend::clone(url, &path, Some(&credentials))?;
        }

        let handle = Self {
            url: url.to_string(),
            path,
            credentials,
            options,
        };
        let actual = handle.remote_url()?;
        if normalize_url(&actual) != normalize_url(url) {
            return Err(InputError::RemoteMismatch {
                expected: url.to_string(),
                actual,
            }
            .into());
        }
        handle.configure_user()?;
        Ok(handle)
    }

    /// Opens an existing clone; the URL is read from the configured remote.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::RepoNotFound` if `path` is not a work tree.
    pub fn open(
        path: &Path,
        credentials: Arc<Credentials>,
        options: HandleOptions,
    ) -> FleetResult<Self> {
        if !GixBackend::is_git_repo(path) {
            return Err(RepositoryError::RepoNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        let mut handle = Self {
            url: String::new(),
            path: path.to_path_buf(),
            credentials,
            options,
        };
        handle.url = handle.remote_url()?;
        handle.configure_user()?;
        Ok(handle)
    }

    fn remote_url(&self) -> FleetResult<String> {
        let key = format!("remote.{}.url", self.options.remote);
        let output = ShellBackend::git_output(&["config", "--get", &key], &self.path)?;
        if !output.success() {
            return Err(InputError::InvalidRemoteUrl(format!(
                "{} has no remote named {}",
                self.path.display(),
                self.options.remote
            ))
            .into());
        }
        Ok(output.stdout.trim().to_string())
    }

    fn configure_user(&self) -> FleetResult<()> {
        let identity = self.credentials.identity();
        let email = self
            .options
            .user_email
            .clone()
            .unwrap_or_else(|| format!("{identity}@users.noreply.github.com"));
        ShellBackend::set_config(&self.path, "user.name", identity)?;
        ShellBackend::set_config(&self.path, "user.email", &email)?;
        Ok(())
    }

    fn git(&self, args: &[&str]) -> FleetResult<String> {
        ShellBackend::git_command(args, &self.path)
    }

    fn auth(&self) -> Option<&Credentials> {
        Some(&self.credentials)
    }

    // --- Queries ---

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn remote(&self) -> &str {
        &self.options.remote
    }

    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }

    #[must_use]
    pub const fn stash_policy(&self) -> StashConflictPolicy {
        self.options.stash_policy
    }

    /// Current branch, `None` when HEAD is detached.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if HEAD cannot be read.
    pub fn current_branch(&self) -> FleetResult<Option<String>> {
        GixBackend::current_branch(&self.path)
    }

    /// Current branch or detached commit.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if HEAD cannot be read.
    pub fn head(&self) -> FleetResult<HeadRef> {
        match self.current_branch()? {
            Some(branch) => Ok(HeadRef::Branch(branch)),
            None => Ok(HeadRef::Detached(self.current_commit()?)),
        }
    }

    /// Full hex id of the HEAD commit.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if HEAD does not resolve to a commit.
    pub fn current_commit(&self) -> FleetResult<String> {
        self.git(&["rev-parse", "HEAD"])
    }

    /// Commit a revision resolves to, if it does.
    ///
    /// # Errors
    ///
    /// Returns an error only if git cannot be run.
    pub fn commit_of(&self, revision: &str) -> FleetResult<Option<String>> {
        let spec = format!("{revision}^{{commit}}");
        let output = ShellBackend::git_output(&["rev-parse", "--verify", "--quiet", &spec], &self.path)?;
        Ok(output
            .success()
            .then(|| output.stdout.trim().to_string())
            .filter(|commit| !commit.is_empty()))
    }

    /// Local branch names.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if refs cannot be listed.
    pub fn branches(&self) -> FleetResult<BTreeSet<String>> {
        let output = self.git(&["for-each-ref", "--format=%(refname:short)", "refs/heads"])?;
        Ok(output.lines().map(str::to_string).collect())
    }

    /// Branch names on the remote, as of the last fetch.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if refs cannot be listed.
    pub fn remote_branches(&self) -> FleetResult<BTreeSet<String>> {
        let prefix = format!("refs/remotes/{}/", self.remote());
        let output = self.git(&["for-each-ref", "--format=%(refname)", &prefix])?;
        Ok(output
            .lines()
            .filter_map(|line| line.strip_prefix(&prefix))
            .filter(|name| *name != "HEAD")
            .map(str::to_string)
            .collect())
    }

    fn has_local_branch(&self, name: &str) -> FleetResult<bool> {
        GixBackend::reference_exists(&self.path, &format!("refs/heads/{name}"))
    }

    fn has_remote_branch(&self, name: &str) -> FleetResult<bool> {
        GixBackend::reference_exists(
            &self.path,
            &format!("refs/remotes/{}/{name}", self.remote()),
        )
    }

    /// Whether `name` exists locally or on the remote.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if refs cannot be read.
    pub fn branch_exists(&self, name: &str) -> FleetResult<bool> {
        Ok(self.has_local_branch(name)? || self.has_remote_branch(name)?)
    }

    /// The remote's default branch, falling back to `main` then `master`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::BranchNotFound` if none can be determined.
    pub fn default_branch(&self) -> FleetResult<String> {
        let head = format!("refs/remotes/{}/HEAD", self.remote());
        let output =
            ShellBackend::git_output(&["symbolic-ref", "--quiet", "--short", &head], &self.path)?;
        if output.success()
            && let Some(branch) = output
                .stdout
                .trim()
                .strip_prefix(&format!("{}/", self.remote()))
        {
            return Ok(branch.to_string());
        }
        for candidate in ["main", "master"] {
            if self.branch_exists(candidate)? {
                return Ok(candidate.to_string());
            }
        }
        Err(RepositoryError::BranchNotFound {
            branch: format!("default branch of {}", self.url),
        }
        .into())
    }

    fn is_worktree_dirty(&self) -> FleetResult<bool> {
        GixBackend::has_uncommitted_changes(&self.path)
    }

    /// Whether there are uncommitted or untracked changes.
    ///
    /// With a branch, the check runs on that branch and the current HEAD is
    /// restored afterwards.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if status or the branch switch fails.
    pub fn is_dirty(&mut self, branch: Option<&str>) -> FleetResult<bool> {
        match branch {
            None => self.is_worktree_dirty(),
            Some(branch) => super::guard::with_branch(self, branch, |repo| repo.is_worktree_dirty()),
        }
    }

    /// Whether `commit` is reachable from `branch`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::CommandFailed` if either side is unknown.
    pub fn contains_commit(&self, commit: &str, branch: &str) -> FleetResult<bool> {
        let args = ["merge-base", "--is-ancestor", commit, branch];
        let output = ShellBackend::git_output(&args, &self.path)?;
        match output.code {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(RepositoryError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                message: output.stderr,
            }
            .into()),
        }
    }

    /// Commit a tag points at, after refreshing tags from the remote.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if the fetch fails.
    pub fn tag_exists(&self, tag: &str) -> FleetResult<Option<String>> {
        ShellBackend::fetch_all(&self.path, true, self.auth())?;
        self.commit_of(&format!("refs/tags/{tag}"))
    }

    /// Content of `path` as of `tag`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::TagNotFound` or `RepositoryError::FileNotFound`.
    pub fn file_at_tag(&self, path: &str, tag: &str) -> FleetResult<String> {
        if self.tag_exists(tag)?.is_none() {
            return Err(RepositoryError::TagNotFound {
                tag: tag.to_string(),
            }
            .into());
        }
        let object = format!("refs/tags/{tag}:{path}");
        let output = ShellBackend::git_output(&["show", &object], &self.path)?;
        if !output.success() {
            return Err(RepositoryError::FileNotFound {
                path: path.to_string(),
                tag: tag.to_string(),
            }
            .into());
        }
        Ok(output.stdout)
    }

    // --- Mutations ---

    /// Refreshes remote-tracking refs.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::CommandFailed` if the fetch fails.
    pub fn fetch(&self) -> FleetResult<()> {
        ShellBackend::fetch_all(&self.path, false, self.auth())
    }

    /// Switches to a branch, tag or commit, carrying uncommitted work along.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::BranchNotFound` if `name` resolves to nothing.
    /// - `RepositoryError::StashConflict` under [`StashConflictPolicy::Fail`].
    pub fn switch_branch(&mut self, name: &str) -> FleetResult<()> {
        info!(repo = %self.url, branch = name, "switching branch");

        let stashed = if self.is_worktree_dirty()? {
            self.git(&["add", "-A"])?;
            let message = format!("fleet: switching to {name}");
            self.git(&["stash", "push", "--quiet", "-m", &message])?;
            debug!(repo = %self.url, "stashed uncommitted changes");
            true
        } else {
            false
        };

        let checkout = ShellBackend::fetch_all(&self.path, false, self.auth())
            .and_then(|()| self.checkout_resolved(name));
        let restored = if stashed {
            self.restore_stash(name)
        } else {
            Ok(())
        };
        let reset = self.git(&["reset", "--quiet"]).map(|_| ());

        checkout?;
        restored?;
        reset
    }

    /// Switches back to a previously captured HEAD.
    ///
    /// # Errors
    ///
    /// See [`RepositoryHandle::switch_branch`].
    pub fn switch_to(&mut self, head: &HeadRef) -> FleetResult<()> {
        self.switch_branch(head.as_revision())
    }

    fn checkout_resolved(&self, name: &str) -> FleetResult<()> {
        if self.has_local_branch(name)? {
            return ShellBackend::checkout(&self.path, &[name]);
        }
        if self.has_remote_branch(name)? {
            let upstream = format!("{}/{name}", self.remote());
            return ShellBackend::checkout(&self.path, &["-B", name, "--track", &upstream]);
        }
        if self.commit_of(name)?.is_some() {
            return ShellBackend::checkout(&self.path, &["--detach", name]);
        }
        Err(RepositoryError::BranchNotFound {
            branch: name.to_string(),
        }
        .into())
    }

    fn conflicted_paths(&self) -> FleetResult<Vec<String>> {
        let output = self.git(&["diff", "--name-only", "--diff-filter=U"])?;
        Ok(output.lines().map(str::to_string).collect())
    }

    fn restore_stash(&self, target: &str) -> FleetResult<()> {
        let pop = ShellBackend::git_output(&["stash", "pop", "--quiet"], &self.path)?;
        if pop.success() {
            return Ok(());
        }

        let paths = self.conflicted_paths()?;
        if paths.is_empty() {
            return Err(RepositoryError::StashRestoreFailed {
                branch: target.to_string(),
                message: pop.stderr,
            }
            .into());
        }

        match self.stash_policy() {
            StashConflictPolicy::PreferBranch | StashConflictPolicy::Fail => {
                self.resolve_conflicts(&paths, "HEAD", &["HEAD"])?;
            }
            StashConflictPolicy::PreferStash => {
                self.resolve_conflicts(&paths, "stash@{0}", &["--theirs"])?;
            }
        }

        if self.stash_policy() == StashConflictPolicy::Fail {
            return Err(RepositoryError::StashConflict {
                branch: target.to_string(),
                paths,
            }
            .into());
        }

        warn!(
            repo = %self.url,
            branch = target,
            policy = %self.stash_policy(),
            paths = %paths.join(", "),
            "stashed changes conflicted, resolved by policy"
        );
        self.git(&["stash", "drop", "--quiet"])?;
        Ok(())
    }

    /// Takes each conflicted path from `side`; paths `side` deleted are removed.
    fn resolve_conflicts(
        &self,
        paths: &[String],
        side: &str,
        checkout_from: &[&str],
    ) -> FleetResult<()> {
        let mut present = Vec::new();
        let mut deleted = Vec::new();
        for path in paths {
            let object = format!("{side}:{path}");
            if ShellBackend::git_output(&["cat-file", "-e", &object], &self.path)?.success() {
                present.push(path.as_str());
            } else {
                deleted.push(path.as_str());
            }
        }

        if !present.is_empty() {
            let mut args = vec!["checkout"];
            args.extend_from_slice(checkout_from);
            args.push("--");
            args.extend(present);
            self.git(&args)?;
        }
        if !deleted.is_empty() {
            let mut args = vec!["rm", "--quiet", "--force", "--"];
            args.extend(deleted);
            self.git(&args)?;
        }
        Ok(())
    }

    fn resolve_revision(&self, name: &str) -> FleetResult<String> {
        if self.has_local_branch(name)? {
            return Ok(name.to_string());
        }
        if self.has_remote_branch(name)? {
            return Ok(format!("{}/{name}", self.remote()));
        }
        if self.commit_of(name)?.is_some() {
            return Ok(name.to_string());
        }
        Err(RepositoryError::BranchNotFound {
            branch: name.to_string(),
        }
        .into())
    }

    /// Creates `name` at `base`, replacing any local branch of that name.
    ///
    /// Without a base the current branch (or detached commit) is used. The
    /// new branch is not checked out unless it is the current one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::BranchNotFound` if `base` resolves to nothing.
    pub fn create_branch(&mut self, name: &str, base: Option<&str>) -> FleetResult<()> {
        let base = match base {
            Some(base) => self.resolve_revision(base)?,
            None => self.head()?.as_revision().to_string(),
        };
        info!(repo = %self.url, branch = name, base = %base, "creating branch");

        if self.current_branch()?.as_deref() == Some(name) {
            self.git(&["checkout", "--quiet", "-B", name, &base])?;
            return Ok(());
        }
        if self.has_local_branch(name)? {
            self.git(&["branch", "-D", name])?;
        }
        self.git(&["branch", "--no-track", name, &base])?;
        Ok(())
    }

    /// Stages everything below `scope` and commits only those paths.
    ///
    /// Returns `false` when there was nothing to commit.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if staging or committing fails.
    pub fn commit(&mut self, message: &str, scope: &Path) -> FleetResult<bool> {
        let scope = scope.to_string_lossy();
        self.git(&["add", "-A", "--", &scope])?;
        let staged =
            ShellBackend::git_output(&["diff", "--cached", "--quiet", "--", &scope], &self.path)?;
        if staged.success() {
            debug!(repo = %self.url, scope = %scope, "nothing to commit");
            return Ok(false);
        }
        self.git(&["commit", "--quiet", "-m", message, "--", &scope])?;
        info!(repo = %self.url, scope = %scope, "committed changes");
        Ok(true)
    }

    /// Commits changes below `scope` and optionally pushes the current branch.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if committing or pushing fails.
    pub fn commit_and_push(
        &mut self,
        message: &str,
        scope: &Path,
        push: bool,
        force: bool,
    ) -> FleetResult<bool> {
        let committed = self.commit(message, scope)?;
        if push {
            self.push(None, force)?;
        }
        Ok(committed)
    }

    /// Pushes a branch (default: current) and sets its upstream.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if the push is rejected or HEAD is detached.
    pub fn push(&self, branch: Option<&str>, force: bool) -> FleetResult<()> {
        let branch = match branch {
            Some(branch) => branch.to_string(),
            None => self
                .current_branch()?
                .ok_or_else(|| RepositoryError::BranchNotFound {
                    branch: "HEAD (detached)".to_string(),
                })?,
        };
        if self.is_dry_run() {
            info!(repo = %self.url, branch = %branch, force, "[DRY-RUN] Would push");
            return Ok(());
        }
        let flags: &[&str] = if force { &["-u", "--force"] } else { &["-u"] };
        ShellBackend::push(&self.path, self.remote(), &[&branch], flags, self.auth())?;
        info!(repo = %self.url, branch = %branch, "pushed");
        Ok(())
    }

    /// Fast-forwards the current branch to its remote counterpart.
    ///
    /// Divergence is logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` only if refs cannot be read.
    pub fn fast_forward(&mut self) -> FleetResult<()> {
        let Some(branch) = self.current_branch()? else {
            return Ok(());
        };
        if !self.has_remote_branch(&branch)? {
            return Ok(());
        }
        let upstream = format!("{}/{branch}", self.remote());
        let output =
            ShellBackend::git_output(&["merge", "--ff-only", "--quiet", &upstream], &self.path)?;
        if !output.success() {
            warn!(repo = %self.url, branch = %branch, error = %output.stderr, "fast-forward failed");
        }
        Ok(())
    }

    /// Points `tag` at `commit` locally and on the remote, replacing any
    /// previous tag of that name.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if the commit is unknown or a push fails.
    pub fn tag_commit(&mut self, tag: &str, commit: &str) -> FleetResult<()> {
        ShellBackend::fetch_all(&self.path, true, self.auth())?;
        let tag_ref = format!("refs/tags/{tag}");

        if self.commit_of(&tag_ref)?.is_some() {
            self.git(&["tag", "-d", tag])?;
        }

        let listed = ShellBackend::git_remote_command(
            &["ls-remote", "--tags", self.remote(), &tag_ref],
            &self.path,
            self.auth(),
        )?;
        if !listed.is_empty() {
            if self.is_dry_run() {
                info!(repo = %self.url, tag, "[DRY-RUN] Would delete remote tag");
            } else {
                ShellBackend::push(&self.path, self.remote(), &[&tag_ref], &["--delete"], self.auth())?;
            }
        }

        self.git(&["tag", tag, commit])?;
        if self.is_dry_run() {
            info!(repo = %self.url, tag, commit, "[DRY-RUN] Would push tag");
            return Ok(());
        }
        ShellBackend::push(&self.path, self.remote(), &[&tag_ref], &[], self.auth())?;
        info!(repo = %self.url, tag, commit, "tagged");
        Ok(())
    }
}
