// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI arguments for the `pr` command.
//!
//! ```text
//! fleet pr summary <branch>          table of checks and approvals
//! fleet pr merge <branch> [--force]  squash-merge approved pull requests
//! ```

use clap::{Args, Subcommand};

/// Arguments for the `pr` command.
#[derive(Debug, Clone, Args)]
pub struct PrArgs {
    #[command(subcommand)]
    pub operation: PrOperation,
}

/// Pull request operations.
#[derive(Debug, Clone, Subcommand)]
pub enum PrOperation {
    /// Prints checks and approvals of the open pull request of BRANCH in each repository.
    Summary {
        #[arg(value_name = "BRANCH")]
        branch: String,
    },
    /// Squash-merges the open pull request of BRANCH in each repository.
    Merge {
        #[arg(value_name = "BRANCH")]
        branch: String,

        /// Merges even without full approval.
        #[arg(long)]
        force: bool,
    },
}
