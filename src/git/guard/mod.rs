// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Scoped branch context.
//!
//! ```text
//! enter(repo, name)
//!   previous = repo.head()
//!   repo.switch_branch(name)
//!        |
//!   work through Deref/DerefMut
//!        |
//!   restore() ──> switch_to(previous), errors surface
//!   drop      ──> switch_to(previous), errors logged
//! ```

use std::ops::{Deref, DerefMut};

use tracing::{error, warn};

use super::handle::{HeadRef, RepositoryHandle};
use crate::error::{FleetError, FleetResult};

/// Switches a repository to a branch and switches back when released.
///
/// Restoration happens on every exit path: explicit [`BranchGuard::restore`],
/// early return with `?`, or unwinding.
#[must_use = "dropping the guard immediately restores the previous branch"]
pub struct BranchGuard<'a> {
    repo: &'a mut RepositoryHandle,
    previous: Option<HeadRef>,
}

impl<'a> BranchGuard<'a> {
    /// Captures HEAD and switches to `name`.
    ///
    /// # Errors
    ///
    /// Returns the switch error. If HEAD already moved, a restore is attempted
    /// before returning.
    pub fn enter(repo: &'a mut RepositoryHandle, name: &str) -> FleetResult<Self> {
        let previous = repo.head()?;
        if let Err(err) = repo.switch_branch(name) {
            if repo.head().ok().as_ref() != Some(&previous)
                && let Err(restore) = repo.switch_to(&previous)
            {
                warn!(repo = %repo.url(), previous = %previous, error = %restore, "failed to restore after switch error");
            }
            return Err(err);
        }
        Ok(Self {
            repo,
            previous: Some(previous),
        })
    }

    /// HEAD as it was before entering.
    #[must_use]
    pub const fn previous(&self) -> Option<&HeadRef> {
        self.previous.as_ref()
    }

    /// Switches back to the captured HEAD.
    ///
    /// # Errors
    ///
    /// Returns the error from switching back; the guard will not retry on drop.
    pub fn restore(mut self) -> FleetResult<()> {
        match self.previous.take() {
            Some(previous) => self.repo.switch_to(&previous),
            None => Ok(()),
        }
    }
}

impl Deref for BranchGuard<'_> {
    type Target = RepositoryHandle;

    fn deref(&self) -> &Self::Target {
        self.repo
    }
}

impl DerefMut for BranchGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.repo
    }
}

impl Drop for BranchGuard<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take()
            && let Err(err) = self.repo.switch_to(&previous)
        {
            error!(repo = %self.repo.url(), previous = %previous, error = %err, "failed to restore branch");
        }
    }
}

/// Runs `f` on `name` and restores the previous HEAD afterwards.
///
/// The closure's error wins over a restore error.
///
/// # Errors
///
/// Returns the switch error, the closure's error, or the restore error.
pub fn with_branch<T, E, F>(repo: &mut RepositoryHandle, name: &str, f: F) -> Result<T, E>
where
    F: FnOnce(&mut RepositoryHandle) -> Result<T, E>,
    E: From<FleetError>,
{
    let mut guard = BranchGuard::enter(repo, name)?;
    let result = f(&mut *guard);
    let restored = guard.restore();
    let value = result?;
    restored?;
    Ok(value)
}
