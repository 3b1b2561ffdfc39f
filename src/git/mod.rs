// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!          Public API
//!   handle.rs  guard.rs  summary.rs
//!        \        |        /
//!         v       v       v
//!      ,------------------,
//!      | backend (traits) |
//!      '--+----------+----'
//!         |          |
//!         v          v
//!    GitQuery    GitMutation
//!   (gix, read)  (CLI, write)
//!         |          |
//!         v          v
//!    GixBackend  ShellBackend
//!    .branch     .clone/fetch
//!    .status     .checkout
//!    .refs       .push
//! ```
//!
//! **`GixBackend`**: pure Rust, no subprocess, read-only.
//! **`ShellBackend`**: git CLI for writes and anything touching a remote.

pub mod backend;
pub mod guard;
pub mod handle;
pub mod summary;

#[cfg(test)]
pub(crate) mod test_support;

pub use guard::{BranchGuard, with_branch};
pub use handle::{HandleOptions, HeadRef, RepositoryHandle, StashConflictPolicy, clone_dir};
pub use summary::{ChangeSummary, summarize, summarize_range};
