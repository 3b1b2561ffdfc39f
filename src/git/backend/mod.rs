// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! GitQuery (read)     --> GixBackend (pure Rust gix)
//! GitMutation (write) --> ShellBackend (git CLI)
//! ```
//!
//! Remote operations authenticate through an inline credential helper that
//! reads the identity and secret from variables set only on the child
//! process, so the token never shows up in argv or in logged command lines.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use tracing::{debug, trace};

use crate::config::Credentials;
use crate::error::{FleetResult, GixError, RepositoryError};

const IDENTITY_VAR: &str = "FLEET_GIT_IDENTITY";
const SECRET_VAR: &str = "FLEET_GIT_SECRET";
const CREDENTIAL_HELPER: &str = "credential.helper=!f() { echo \"username=${FLEET_GIT_IDENTITY}\"; echo \"password=${FLEET_GIT_SECRET}\"; }; f";

// --- Query Trait (Read-only operations) ---

/// Read-only git query operations.
pub trait GitQuery {
    /// Check if path is inside a git work tree.
    fn is_git_repo(path: &Path) -> bool;

    /// Get current branch name (None if HEAD is detached).
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if repository discovery or head resolution fails.
    fn current_branch(path: &Path) -> FleetResult<Option<String>>;

    /// Check for uncommitted changes (staged, unstaged, or untracked files).
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if repository discovery or status check fails.
    fn has_uncommitted_changes(path: &Path) -> FleetResult<bool>;

    /// Check whether a fully qualified reference such as `refs/heads/main` exists.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if repository discovery or reference lookup fails.
    fn reference_exists(path: &Path, name: &str) -> FleetResult<bool>;
}

// --- Mutation Trait (Write operations) ---

/// Git mutation operations that modify repository or remote state.
pub trait GitMutation {
    /// Clone a repository into `dest`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::CloneFailed` if the clone fails.
    fn clone(url: &str, dest: &Path, auth: Option<&Credentials>) -> FleetResult<()>;

    /// Fetch all remotes, optionally including tags (moved tags are updated).
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if the fetch operation fails.
    fn fetch_all(repo_path: &Path, tags: bool, auth: Option<&Credentials>) -> FleetResult<()>;

    /// Forcefully checkout a branch, tag, or commit.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::CheckoutFailed` if the checkout fails.
    fn checkout(repo_path: &Path, args: &[&str]) -> FleetResult<()>;

    /// Push refs to a remote.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if the push is rejected.
    fn push(
        repo_path: &Path,
        remote: &str,
        refspecs: &[&str],
        flags: &[&str],
        auth: Option<&Credentials>,
    ) -> FleetResult<()>;

    /// Set git config value.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if the config value cannot be set.
    fn set_config(repo_path: &Path, key: &str, value: &str) -> FleetResult<()>;
}

// --- GixBackend Implementation (Pure Rust) ---

/// Pure Rust git backend using gix.
///
/// Provides read-only operations without spawning subprocesses.
pub struct GixBackend;

fn discover(path: &Path) -> FleetResult<gix::Repository> {
    Ok(gix::discover(path)
        .map_err(|e| RepositoryError::Gix(GixError::Discover(Box::new(e))))?)
}

impl GitQuery for GixBackend {
    fn is_git_repo(path: &Path) -> bool {
        gix::discover(path).is_ok()
    }

    fn current_branch(path: &Path) -> FleetResult<Option<String>> {
        let repo = discover(path)?;
        let head = repo
            .head_name()
            .map_err(|e| RepositoryError::Gix(GixError::Head(e)))?;
        Ok(head.map(|name| name.shorten().to_string()))
    }

    fn has_uncommitted_changes(path: &Path) -> FleetResult<bool> {
        use gix::status::UntrackedFiles;

        let repo = discover(path)?;

        let has_changes = repo
            .status(gix::progress::Discard)
            .map_err(|_| RepositoryError::CommandFailed {
                command: "status".to_string(),
                message: "failed to prepare status check".to_string(),
            })?
            .untracked_files(UntrackedFiles::Files)
            .into_iter(None)
            .map_err(|_| RepositoryError::CommandFailed {
                command: "status".to_string(),
                message: "failed to check repository status".to_string(),
            })?
            .next()
            .is_some();

        Ok(has_changes)
    }

    fn reference_exists(path: &Path, name: &str) -> FleetResult<bool> {
        let repo = discover(path)?;
        match repo.find_reference(name) {
            Ok(_) => Ok(true),
            Err(gix::reference::find::existing::Error::NotFound { name: _ }) => Ok(false),
            Err(e) => Err(RepositoryError::Gix(GixError::Head(e)).into()),
        }
    }
}

// --- ShellBackend Implementation (Git CLI) ---

/// Raw result of a git invocation that is allowed to fail.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Exit code, `None` when killed by a signal.
    pub code: Option<i32>,
    /// Untrimmed standard output.
    pub stdout: String,
    /// Trimmed standard error.
    pub stderr: String,
}

impl GitOutput {
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }
}

/// Shell-based git backend using git CLI.
pub struct ShellBackend;

impl ShellBackend {
    /// Location of the `git` executable, resolved once per process.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::CommandFailed` when `git` is not on `PATH`.
    pub fn git_executable() -> FleetResult<&'static Path> {
        static GIT: OnceLock<Option<PathBuf>> = OnceLock::new();
        GIT.get_or_init(|| which::which("git").ok())
            .as_deref()
            .ok_or_else(|| {
                RepositoryError::CommandFailed {
                    command: "git".to_string(),
                    message: "git executable not found in PATH".to_string(),
                }
                .into()
            })
    }

    fn command(args: &[&str], cwd: &Path, auth: Option<&Credentials>) -> FleetResult<Command> {
        let mut command = Command::new(Self::git_executable()?);
        command
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0");
        if let Some(credentials) = auth {
            command
                .args(["-c", "credential.helper=", "-c", CREDENTIAL_HELPER])
                .env(IDENTITY_VAR, credentials.identity())
                .env(SECRET_VAR, credentials.secret());
        }
        command.args(args);
        Ok(command)
    }

    fn run(args: &[&str], cwd: &Path, auth: Option<&Credentials>) -> FleetResult<GitOutput> {
        debug!(cwd = %cwd.display(), "git {}", args.join(" "));
        let output = Self::command(args, cwd, auth)?
            .output()
            .map_err(|e| std::io::Error::new(e.kind(), format!("failed to execute git: {e}")))?;
        let result = GitOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        };
        trace!(code = ?result.code, stdout = %result.stdout.trim_end(), stderr = %result.stderr);
        Ok(result)
    }

    fn check(args: &[&str], output: GitOutput) -> FleetResult<String> {
        if !output.success() {
            return Err(RepositoryError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                message: output.stderr,
            }
            .into());
        }
        Ok(output.stdout.trim().to_string())
    }

    /// Execute a git command. Sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0`.
    ///
    /// Returns trimmed stdout; a non-zero exit is `RepositoryError::CommandFailed`.
    pub(crate) fn git_command(args: &[&str], cwd: &Path) -> FleetResult<String> {
        Self::check(args, Self::run(args, cwd, None)?)
    }

    /// Execute a git command that talks to a remote, with credentials when given.
    pub(crate) fn git_remote_command(
        args: &[&str],
        cwd: &Path,
        auth: Option<&Credentials>,
    ) -> FleetResult<String> {
        Self::check(args, Self::run(args, cwd, auth)?)
    }

    /// Execute a git command whose failure is an expected outcome.
    ///
    /// Only a failure to spawn git is an error.
    pub(crate) fn git_output(args: &[&str], cwd: &Path) -> FleetResult<GitOutput> {
        Self::run(args, cwd, None)
    }
}

impl GitMutation for ShellBackend {
    fn clone(url: &str, dest: &Path, auth: Option<&Credentials>) -> FleetResult<()> {
        let dest_str = dest.to_str().ok_or_else(|| RepositoryError::CloneFailed {
            url: url.to_string(),
            message: "invalid destination path".to_string(),
        })?;
        let parent = dest.parent().unwrap_or_else(|| Path::new("."));
        let args = [
            "clone",
            "--quiet",
            "-c",
            "advice.detachedHead=false",
            url,
            dest_str,
        ];
        let output = Self::run(&args, parent, auth)?;
        if !output.success() {
            return Err(RepositoryError::CloneFailed {
                url: url.to_string(),
                message: output.stderr,
            }
            .into());
        }
        Ok(())
    }

    fn fetch_all(repo_path: &Path, tags: bool, auth: Option<&Credentials>) -> FleetResult<()> {
        let mut args = vec!["fetch", "--all", "--quiet"];
        if tags {
            args.extend(["--tags", "--force"]);
        }
        Self::git_remote_command(&args, repo_path, auth)?;
        Ok(())
    }

    fn checkout(repo_path: &Path, args: &[&str]) -> FleetResult<()> {
        let mut full = vec!["-c", "advice.detachedHead=false", "checkout", "--quiet", "--force"];
        full.extend_from_slice(args);
        full.push("--");
        let output = Self::run(&full, repo_path, None)?;
        if !output.success() {
            return Err(RepositoryError::CheckoutFailed {
                what: args.join(" "),
                message: output.stderr,
            }
            .into());
        }
        Ok(())
    }

    fn push(
        repo_path: &Path,
        remote: &str,
        refspecs: &[&str],
        flags: &[&str],
        auth: Option<&Credentials>,
    ) -> FleetResult<()> {
        let mut args = vec!["push", "--quiet"];
        args.extend_from_slice(flags);
        args.push(remote);
        args.extend_from_slice(refspecs);
        Self::git_remote_command(&args, repo_path, auth)?;
        Ok(())
    }

    fn set_config(repo_path: &Path, key: &str, value: &str) -> FleetResult<()> {
        Self::git_command(&["config", key, value], repo_path)?;
        Ok(())
    }
}
