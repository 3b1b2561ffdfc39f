// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use super::repos::format_groups;
use super::{load_units, orchestrator_options, report_lines};
use crate::config::Config;
use crate::orchestrator::{BatchReport, RepoOutcome, RepoStatus, group_units};

const LIST: &str = "\
- url: https://github.com/acme/widgets
  branch: main
  units:
    - path: charms/widget
      name: widget
    - path: charms/gadget
      name: gadget
- url: https://github.com/acme/legacy-tools
  branch: main
  units:
    - path: .
      name: tools
";

fn config_with_list(dir: &tempfile::TempDir) -> Config {
    let list = dir.path().join("charms.yaml");
    std::fs::write(&list, LIST).unwrap();
    let mut config = Config::default();
    config.paths.repositories = vec![list];
    config
}

#[test]
fn test_load_units_requires_a_list() {
    let err = load_units(&Config::default()).unwrap_err();
    insta::assert_snapshot!(err, @"no repository lists configured; pass --repos or set paths.repositories");
}

#[test]
fn test_load_units_applies_discovery() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_with_list(&dir);
    config.discovery.skip = vec!["github.com/acme/legacy-*".to_string()];
    config
        .discovery
        .rename
        .insert("gadget".to_string(), "gizmo".to_string());

    let units = load_units(&config).unwrap();

    let names: Vec<_> = units.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, ["widget", "gizmo"]);
}

#[test]
fn test_format_groups() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_list(&dir);
    let groups = group_units(load_units(&config).unwrap()).unwrap();

    insta::assert_snapshot!(format_groups(&groups).join("\n"), @r"
    https://github.com/acme/widgets (main)
      widget: charms/widget
      gadget: charms/gadget
    https://github.com/acme/legacy-tools (main)
      tools: .
    ");
}

#[test]
fn test_report_lines_end_with_failure_count() {
    let report = BatchReport {
        outcomes: vec![RepoOutcome {
            url: "https://github.com/acme/a".to_string(),
            branch: "bump".to_string(),
            status: RepoStatus::Unchanged,
        }],
        failed: 2,
    };

    insta::assert_snapshot!(report_lines(&report).join("\n"), @r"
    https://github.com/acme/a (bump): unchanged
    failed: 2
    ");
}

#[test]
fn test_orchestrator_options_follow_config() {
    let mut config = Config::default();
    config.global.dry = true;
    config.paths.base = PathBuf::from("/srv/fleet");

    let options = orchestrator_options(&config);

    assert!(options.is_dry_run());
    assert_eq!(options.base_path(), PathBuf::from("/srv/fleet"));
}
