// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE       ← Additional config files (can repeat)
//! --repos FILE        ← Repository lists (can repeat)
//! --base-path DIR     ← paths.base override
//! --credentials FILE  ← github.credentials_file override
//! --dry               ← Never push or open pull requests
//! --log-level N       ← Console verbosity (0-6)
//! --file-log-level    ← File verbosity (overrides --log-level)
//! --set KEY=VAL       ← Direct config override
//!
//! Precedence: CLI flags > --set > FLEET_* env > --config > fleet.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times.
    #[arg(short = 'c', long = "config", value_name = "FILE", action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Repository list file(s) (.yaml, .yml or .json).
    /// Replaces paths.repositories when given.
    #[arg(short = 'r', long = "repos", value_name = "FILE", action = clap::ArgAction::Append)]
    pub repos: Vec<PathBuf>,

    /// Directory holding one clone per repository.
    #[arg(short = 'b', long = "base-path", value_name = "DIR")]
    pub base_path: Option<PathBuf>,

    /// JSON file with `username` and `access_token`.
    #[arg(long = "credentials", value_name = "FILE")]
    pub credentials: Option<PathBuf>,

    /// Reports what would change without pushing or opening pull requests.
    #[arg(long)]
    pub dry: bool,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// File log level, overrides --log-level for the log file.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Sets an option, such as 'git.stash_conflict=fail'.
    /// Can be specified multiple times.
    #[arg(short = 's', long = "set", value_name = "OPTION", action = clap::ArgAction::Append)]
    pub options: Vec<String>,

    /// Skips `fleet.toml` in the current directory, only uses --config.
    #[arg(long = "no-default-config")]
    pub no_default_config: bool,
}

impl GlobalOptions {
    /// Converts command-line options to `section.key=value` overrides.
    ///
    /// `--set` options come first so explicit flags win.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<String> {
        let mut overrides = self.options.clone();

        if let Some(level) = self.log_level {
            overrides.push(format!("global.output_log_level={level}"));
        }

        // file_log_level falls back to log_level if not specified
        if let Some(level) = self.file_log_level.or(self.log_level) {
            overrides.push(format!("global.file_log_level={level}"));
        }

        if let Some(ref path) = self.log_file {
            overrides.push(format!("global.log_file={}", path.display()));
        }

        if self.dry {
            overrides.push("global.dry=true".to_string());
        }

        if let Some(ref base) = self.base_path {
            overrides.push(format!("paths.base={}", base.display()));
        }

        if let Some(ref path) = self.credentials {
            overrides.push(format!("github.credentials_file={}", path.display()));
        }

        overrides
    }
}
