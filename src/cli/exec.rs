// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI arguments for the `exec` command.
//!
//! ```text
//! fleet exec --branch bump-images --title "Bump images" -- ./bump.sh --minor
//! ```

use clap::Args;

/// Arguments for the `exec` command.
#[derive(Debug, Clone, Args)]
pub struct ExecArgs {
    /// Working branch the changes are committed on.
    #[arg(long = "branch", value_name = "BRANCH")]
    pub branch: String,

    /// Pull request title.
    #[arg(long = "title", value_name = "TITLE")]
    pub title: String,

    /// Pull request body; defaults to a summary of the changed paths.
    #[arg(long = "body", value_name = "BODY")]
    pub body: Option<String>,

    /// Commit message; defaults to the title.
    #[arg(short = 'm', long = "message", value_name = "MESSAGE")]
    pub message: Option<String>,

    /// Home branch to start from and target instead of each repository's own.
    #[arg(long = "base", value_name = "BRANCH")]
    pub base: Option<String>,

    /// Command and arguments, run in each unit directory.
    #[arg(last = true, required = true, value_name = "CMD")]
    pub command: Vec<String>,
}
