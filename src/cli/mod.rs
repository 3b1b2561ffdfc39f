// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for repo-fleet using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! fleet [global options] <command>
//! version
//! options
//! repos [--output FILE]
//! resources
//! release {cut [--from BRANCH] | tag TAG}
//! exec --branch B --title T [--body B] -- CMD ARGS...
//! pr {summary BRANCH | merge BRANCH [--force]}
//! ```

pub mod exec;
pub mod global;
pub mod pr;
pub mod release;


use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::cli::exec::ExecArgs;
use crate::cli::global::GlobalOptions;
use crate::cli::pr::PrArgs;
use crate::cli::release::ReleaseArgs;

/// Branch-based bulk changes across git repositories.
#[derive(Debug, Parser)]
#[command(
    name = "fleet",
    author,
    version,
    about = "Branch-based bulk changes across git repositories",
    long_about = "repo-fleet Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Applies the same change to many repositories, each on its own\n\
                  branch, and opens one pull request per repository. Re-running a\n\
                  command is safe: existing pull requests are reused.",
    after_help = "CONFIGURATION:\n\n\
                  fleet reads `fleet.toml` from the current directory, then any\n\
                  --config files, then FLEET_<SECTION>__<KEY> environment variables,\n\
                  then --set options and explicit flags. Credentials come from\n\
                  --credentials, github.credentials_file, or GITHUB_ACTOR and\n\
                  GITHUB_TOKEN."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Prints the repositories and their units, grouped.
    Repos(ReposArgs),

    /// Prints the resource references of every unit's descriptor.
    Resources,

    /// Cuts or tags release branches.
    Release(ReleaseArgs),

    /// Runs a command in every unit and opens pull requests with the result.
    Exec(ExecArgs),

    /// Inspects or merges the pull requests of a working branch.
    Pr(PrArgs),
}

/// Arguments for the `repos` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ReposArgs {
    /// Also writes the grouped list to FILE (.yaml, .yml or .json).
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
