// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Release command: cut release branches or tag their heads.
//!
//! ```text
//! cut  --> acquire(from) --> branch <home> from <from> --> push
//! tag  --> acquire(home) --> tag HEAD (moving an old tag) --> push tag
//! ```

use crate::cli::release::{ReleaseArgs, ReleaseOperation};
use crate::config::Config;
use crate::error::Result;

use super::{load_units, orchestrator, print_report};

/// Run the release command.
///
/// # Errors
///
/// Returns an error if units cannot be loaded or grouped, credentials are
/// missing, or any repository failed.
pub fn run_release_command(args: &ReleaseArgs, config: &Config) -> Result<()> {
    let units = load_units(config)?;
    let orchestrator = orchestrator(config)?;

    let report = match &args.operation {
        ReleaseOperation::Cut { from } => orchestrator.cut_release(units, from)?,
        ReleaseOperation::Tag { tag } => orchestrator.tag_release(units, tag)?,
    };
    print_report(&report)
}
