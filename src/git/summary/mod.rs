// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Change summaries built from `git diff --name-status -z`.
//!
//! ```text
//! summarize(scope)
//!   git add -A -- scope
//!   diff  (index vs worktree) ---+
//!   diff --cached (HEAD vs index)+--> union --> ChangeSummary
//!
//! Status letters (renames are disabled, so a move is D + A):
//!   A -> added     D -> removed     M/T -> modified
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::path::Path;

use serde::Serialize;

use super::backend::ShellBackend;
use super::handle::RepositoryHandle;
use crate::error::FleetResult;

/// Which paths changed, and whether anything changed at all.
///
/// Merging is a set union on each path set and an OR on `dirty`; the
/// default value is the identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSummary {
    pub dirty: bool,
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
    pub modified: BTreeSet<String>,
}

impl ChangeSummary {
    /// Parses NUL-separated `git diff --name-status -z --no-renames` output.
    ///
    /// Unknown status letters are ignored along with their path.
    #[must_use]
    pub fn from_name_status(raw: &str) -> Self {
        let mut summary = Self::default();
        let mut fields = raw.split('\0').filter(|f| !f.is_empty());

        while let Some(status) = fields.next() {
            let Some(kind) = status.chars().next() else {
                continue;
            };
            match kind {
                'A' => {
                    if let Some(path) = fields.next() {
                        summary.added.insert(path.to_string());
                    }
                }
                'D' => {
                    if let Some(path) = fields.next() {
                        summary.removed.insert(path.to_string());
                    }
                }
                'M' | 'T' => {
                    if let Some(path) = fields.next() {
                        summary.modified.insert(path.to_string());
                    }
                }
                _ => {
                    fields.next();
                }
            }
        }

        summary.dirty =
            !(summary.added.is_empty() && summary.removed.is_empty() && summary.modified.is_empty());
        summary
    }

    /// True when no path changed and the tree was clean.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.dirty && self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

impl AddAssign for ChangeSummary {
    fn add_assign(&mut self, other: Self) {
        self.dirty |= other.dirty;
        self.added.extend(other.added);
        self.removed.extend(other.removed);
        self.modified.extend(other.modified);
    }
}

impl Add for ChangeSummary {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl Sum for ChangeSummary {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sections = [
            ("modified", &self.modified),
            ("added", &self.added),
            ("removed", &self.removed),
        ];
        let rendered: Vec<String> = sections
            .iter()
            .filter(|(_, paths)| !paths.is_empty())
            .map(|(label, paths)| {
                format!(
                    "{label}: {}",
                    paths.iter().map(String::as_str).collect::<Vec<_>>().join(",")
                )
            })
            .collect();
        f.write_str(&rendered.join(" // "))
    }
}

fn name_status(repo: &RepositoryHandle, args: &[&str]) -> FleetResult<ChangeSummary> {
    let mut full = vec!["-c", "core.quotePath=false", "diff", "--name-status", "-z", "--no-renames"];
    full.extend_from_slice(args);
    let output = ShellBackend::git_output(&full, repo.path())?;
    if !output.success() {
        return Err(crate::error::RepositoryError::CommandFailed {
            command: format!("git {}", full.join(" ")),
            message: output.stderr,
        }
        .into());
    }
    Ok(ChangeSummary::from_name_status(&output.stdout))
}

/// Summarizes pending changes under `scope`, staging them as a side effect.
///
/// # Errors
///
/// Returns a `RepositoryError` if staging or diffing fails.
pub fn summarize(repo: &RepositoryHandle, scope: &Path) -> FleetResult<ChangeSummary> {
    let scope = scope.to_string_lossy();
    ShellBackend::git_command(&["add", "-A", "--", &scope], repo.path())?;
    let unstaged = name_status(repo, &["--", &scope])?;
    let staged = name_status(repo, &["--cached", "--", &scope])?;
    Ok(unstaged + staged)
}

/// Summarizes what changed between two revisions.
///
/// # Errors
///
/// Returns a `RepositoryError` if either revision is unknown.
pub fn summarize_range(repo: &RepositoryHandle, from: &str, to: &str) -> FleetResult<ChangeSummary> {
    name_status(repo, &[from, to])
}
