// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI arguments for the `release` command.
//!
//! ```text
//! fleet release cut [--from main]   each home branch created from --from, pushed
//! fleet release tag v1.2            each home branch head tagged, tag pushed
//! ```

use clap::{Args, Subcommand};

/// Arguments for the `release` command.
#[derive(Debug, Clone, Args)]
pub struct ReleaseArgs {
    #[command(subcommand)]
    pub operation: ReleaseOperation,
}

/// Release operations.
#[derive(Debug, Clone, Subcommand)]
pub enum ReleaseOperation {
    /// Creates every repository's home branch from another branch and pushes it.
    Cut {
        /// Branch the release branches start from.
        #[arg(long = "from", value_name = "BRANCH", default_value = "main")]
        from: String,
    },
    /// Tags the head of every repository's home branch, moving an existing tag.
    Tag {
        #[arg(value_name = "TAG")]
        tag: String,
    },
}
