// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for CLI parsing.
//!
//! Tests the CLI module with realistic command-line argument patterns.

use std::path::PathBuf;

use clap::Parser;
use repo_fleet::cli::exec::ExecArgs;
use repo_fleet::cli::pr::PrOperation;
use repo_fleet::cli::release::ReleaseOperation;
use repo_fleet::cli::{Cli, Command};

// =============================================================================
// Version Command
// =============================================================================

#[test]
fn cli_version_command() {
    let cli = Cli::try_parse_from(["fleet", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn cli_version_alias() {
    let cli = Cli::try_parse_from(["fleet", "-v"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

// =============================================================================
// Batch commands
// =============================================================================

#[test]
fn cli_exec_with_all_options() {
    let cli = Cli::try_parse_from([
        "fleet",
        "--repos",
        "charms.yaml",
        "--dry",
        "exec",
        "--branch",
        "bump",
        "--title",
        "Bump images",
        "--body",
        "Automated bump",
        "-m",
        "chore: bump images",
        "--base",
        "track/1.0",
        "--",
        "./bump.sh",
        "--minor",
    ])
    .unwrap();

    assert!(cli.global.dry);
    assert_eq!(cli.global.repos, [PathBuf::from("charms.yaml")]);
    let Some(Command::Exec(ExecArgs {
        body,
        message,
        base,
        command,
        ..
    })) = cli.command
    else {
        panic!("expected exec command");
    };
    assert_eq!(body.as_deref(), Some("Automated bump"));
    assert_eq!(message.as_deref(), Some("chore: bump images"));
    assert_eq!(base.as_deref(), Some("track/1.0"));
    assert_eq!(command, ["./bump.sh", "--minor"]);
}

#[test]
fn cli_exec_requires_branch_and_title() {
    assert!(Cli::try_parse_from(["fleet", "exec", "--title", "t", "--", "true"]).is_err());
    assert!(Cli::try_parse_from(["fleet", "exec", "--branch", "b", "--", "true"]).is_err());
}

#[test]
fn cli_release_cut_from_branch() {
    let cli = Cli::try_parse_from(["fleet", "release", "cut", "--from", "develop"]).unwrap();
    let Some(Command::Release(args)) = cli.command else {
        panic!("expected release command");
    };
    assert!(matches!(args.operation, ReleaseOperation::Cut { ref from } if from == "develop"));
}

#[test]
fn cli_release_tag_requires_name() {
    assert!(Cli::try_parse_from(["fleet", "release", "tag"]).is_err());
}

#[test]
fn cli_pr_summary() {
    let cli = Cli::try_parse_from(["fleet", "pr", "summary", "bump"]).unwrap();
    let Some(Command::Pr(args)) = cli.command else {
        panic!("expected pr command");
    };
    assert!(matches!(args.operation, PrOperation::Summary { ref branch } if branch == "bump"));
}

#[test]
fn cli_pr_merge_defaults_to_safe() {
    let cli = Cli::try_parse_from(["fleet", "pr", "merge", "bump"]).unwrap();
    let Some(Command::Pr(args)) = cli.command else {
        panic!("expected pr command");
    };
    assert!(matches!(args.operation, PrOperation::Merge { force: false, .. }));
}

// =============================================================================
// Listing commands
// =============================================================================

#[test]
fn cli_repos_output() {
    let cli = Cli::try_parse_from(["fleet", "repos", "-o", "out/charms.json"]).unwrap();
    let Some(Command::Repos(args)) = cli.command else {
        panic!("expected repos command");
    };
    assert_eq!(args.output, Some(PathBuf::from("out/charms.json")));
}

#[test]
fn cli_global_options_become_overrides() {
    let cli = Cli::try_parse_from([
        "fleet",
        "--credentials",
        "creds.json",
        "--set",
        "git.stash_conflict=fail",
        "--log-file",
        "fleet.log",
        "--no-default-config",
        "options",
    ])
    .unwrap();

    assert!(cli.global.no_default_config);
    assert_eq!(
        cli.global.to_config_overrides(),
        [
            "git.stash_conflict=fail",
            "global.log_file=fleet.log",
            "github.credentials_file=creds.json",
        ]
    );
}

#[test]
fn cli_unknown_command_rejected() {
    assert!(Cli::try_parse_from(["fleet", "build"]).is_err());
}
