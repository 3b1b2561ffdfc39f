// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use super::{
    BatchReport, Job, Orchestrator, OrchestratorOptions, RepoStatus, Transformation, group_units,
};
use crate::error::{InputError, Result};
use crate::git::test_support::{Fixture, credentials};
use crate::git::{HandleOptions, RepositoryHandle};
use crate::github::fake::FakeApi;
use crate::units::Unit;

fn orchestrator(fixture: &Fixture, dry_run: bool) -> Orchestrator<FakeApi> {
    let options = OrchestratorOptions::builder()
        .with_base_path(fixture.base.clone())
        .with_dry_run(dry_run)
        .build();
    Orchestrator::new(FakeApi::default(), credentials(), options)
}

fn job() -> Job {
    Job::builder()
        .with_working_branch("bump")
        .with_title("Bump things")
        .build()
}

fn units(fixture: &Fixture) -> Vec<Unit> {
    vec![
        Unit::new("one", fixture.url(), "a", "main"),
        Unit::new("two", fixture.url(), "b", "main"),
    ]
}

/// Writes `new.txt` into every unit directory and commits it per unit.
fn add_file(repo: &mut RepositoryHandle, units: &[Unit], _dry_run: bool) -> Result<()> {
    for unit in units {
        std::fs::write(repo.path().join(&unit.path).join("new.txt"), "new\n")?;
        repo.commit(&format!("update {}", unit.name), &unit.path)?;
    }
    Ok(())
}

fn reopen(fixture: &Fixture) -> RepositoryHandle {
    RepositoryHandle::open(&fixture.base.join("remote"), credentials(), HandleOptions::default())
        .unwrap()
}

fn statuses(report: &BatchReport) -> Vec<RepoStatus> {
    report.outcomes.iter().map(|o| o.status.clone()).collect()
}

// =============================================================================
// group_units
// =============================================================================

#[test]
fn test_group_units_keeps_first_appearance_order() {
    let units = vec![
        Unit::new("b1", "https://github.com/acme/b", "x", "main"),
        Unit::new("a1", "https://github.com/acme/a", "y", "track/1"),
        Unit::new("b2", "https://github.com/acme/b", "z", "main"),
    ];

    let groups = group_units(units).unwrap();

    let summary: Vec<_> = groups
        .iter()
        .map(|g| {
            (
                g.url.as_str(),
                g.branch.as_str(),
                g.units.iter().map(|u| u.name.as_str()).collect::<Vec<_>>(),
            )
        })
        .collect();
    insta::assert_debug_snapshot!(summary, @r#"
    [
        (
            "https://github.com/acme/b",
            "main",
            [
                "b1",
                "b2",
            ],
        ),
        (
            "https://github.com/acme/a",
            "track/1",
            [
                "a1",
            ],
        ),
    ]
    "#);
}

#[test]
fn test_group_units_rejects_inconsistent_branches() {
    let units = vec![
        Unit::new("one", "https://github.com/acme/a", "x", "main"),
        Unit::new("two", "https://github.com/acme/a", "y", "track/1"),
    ];

    match group_units(units) {
        Err(InputError::InconsistentBranches { url, branches }) => {
            assert_eq!(url, "https://github.com/acme/a");
            assert_eq!(branches, ["main", "track/1"]);
        }
        other => panic!("expected InconsistentBranches, got {other:?}"),
    }
}

#[test]
fn test_group_units_empty() {
    assert!(group_units(Vec::new()).unwrap().is_empty());
}

// =============================================================================
// run
// =============================================================================

#[tokio::test]
async fn test_run_opens_pull_request_once() {
    let fixture = Fixture::new();
    let orchestrator = orchestrator(&fixture, false);

    let first = orchestrator
        .run(units(&fixture), &job(), &mut add_file)
        .await
        .unwrap();
    let second = orchestrator
        .run(units(&fixture), &job(), &mut add_file)
        .await
        .unwrap();

    assert_eq!(first.failed, 0);
    assert!(matches!(statuses(&first)[..], [RepoStatus::Created(_)]));
    assert!(matches!(statuses(&second)[..], [RepoStatus::Existing(_)]));

    let created = orchestrator.api().created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].1.base, "main");
    assert_eq!(created[0].1.head, "bump");
    assert_eq!(created[0].1.title, "Bump things");
    assert_eq!(created[0].1.body, "added: a/new.txt,b/new.txt");

    assert!(fixture.remote_ref("refs/heads/bump").is_some());
    assert_eq!(reopen(&fixture).current_branch().unwrap().as_deref(), Some("main"));
}

#[tokio::test]
async fn test_run_uses_explicit_body() {
    let fixture = Fixture::new();
    let orchestrator = orchestrator(&fixture, false);
    let job = Job::builder()
        .with_working_branch("bump")
        .with_title("Bump things")
        .with_body("Hand-written description")
        .build();

    orchestrator.run(units(&fixture), &job, &mut add_file).await.unwrap();

    assert_eq!(orchestrator.api().created()[0].1.body, "Hand-written description");
}

#[tokio::test]
async fn test_dry_run_pushes_nothing() {
    let fixture = Fixture::new();
    let orchestrator = orchestrator(&fixture, true);
    let mut seen_dry_run = false;
    let mut transformation = |repo: &mut RepositoryHandle, units: &[Unit], dry_run: bool| {
        seen_dry_run = dry_run;
        add_file(repo, units, dry_run)
    };

    let report = orchestrator
        .run(units(&fixture), &job(), &mut transformation)
        .await
        .unwrap();

    assert!(seen_dry_run);
    assert_eq!(statuses(&report), [RepoStatus::DryRun { changed: true }]);
    assert!(orchestrator.api().created().is_empty());
    assert!(fixture.remote_ref("refs/heads/bump").is_none());
}

#[tokio::test]
async fn test_no_change_means_no_pull_request() {
    let fixture = Fixture::new();
    let orchestrator = orchestrator(&fixture, false);
    let mut noop = |_: &mut RepositoryHandle, _: &[Unit], _: bool| -> Result<()> { Ok(()) };

    let report = orchestrator.run(units(&fixture), &job(), &mut noop).await.unwrap();

    assert_eq!(statuses(&report), [RepoStatus::Unchanged]);
    assert!(orchestrator.api().created().is_empty());
    assert!(fixture.remote_ref("refs/heads/bump").is_none());
}

#[tokio::test]
async fn test_failure_is_isolated_and_branch_restored() {
    let fixture = Fixture::new();
    let orchestrator = orchestrator(&fixture, false);
    let missing = fixture.temp.path().join("missing.git").display().to_string();
    let mut input = vec![Unit::new("ghost", missing, ".", "main")];
    input.extend(units(&fixture));

    let report = orchestrator.run(input, &job(), &mut add_file).await.unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].url, fixture.url());

    let mut failing = |repo: &mut RepositoryHandle, _: &[Unit], _: bool| -> Result<()> {
        std::fs::write(repo.path().join("a/partial.txt"), "partial\n")?;
        anyhow::bail!("transformation failed halfway")
    };
    let job = Job::builder()
        .with_working_branch("broken")
        .with_title("Broken")
        .build();
    let report = orchestrator.run(units(&fixture), &job, &mut failing).await.unwrap();

    assert_eq!(report.failed, 1);
    assert!(report.outcomes.is_empty());
    let repo = reopen(&fixture);
    assert_eq!(repo.current_branch().unwrap().as_deref(), Some("main"));
    assert!(!repo.path().join("feature.txt").exists());
}

#[tokio::test]
async fn test_inconsistent_branches_are_fatal() {
    let fixture = Fixture::new();
    let orchestrator = orchestrator(&fixture, false);
    let input = vec![
        Unit::new("one", fixture.url(), "a", "main"),
        Unit::new("two", fixture.url(), "b", "feature"),
    ];

    let err = orchestrator.run(input, &job(), &mut add_file).await.unwrap_err();
    assert!(matches!(
        err.as_input(),
        Some(InputError::InconsistentBranches { .. })
    ));
    assert!(!fixture.base.join("remote").exists());
}

#[tokio::test]
async fn test_base_override_targets_other_home() {
    let fixture = Fixture::new();
    let orchestrator = orchestrator(&fixture, false);
    let job = Job::builder()
        .with_working_branch("bump")
        .with_title("Bump things")
        .with_base_override("feature")
        .build();

    let report = orchestrator.run(units(&fixture), &job, &mut add_file).await.unwrap();

    assert!(matches!(statuses(&report)[..], [RepoStatus::Created(_)]));
    assert_eq!(orchestrator.api().created()[0].1.base, "feature");
    let repo = reopen(&fixture);
    assert_eq!(repo.current_branch().unwrap().as_deref(), Some("feature"));
    assert!(repo.contains_commit("feature", "bump").unwrap());
}

#[tokio::test]
async fn test_missing_home_branch_is_published_before_pull_request() {
    let fixture = Fixture::new();
    let orchestrator = orchestrator(&fixture, false);
    let input = vec![Unit::new("one", fixture.url(), "a", "track/9")];

    let report = orchestrator.run(input, &job(), &mut add_file).await.unwrap();

    assert!(matches!(statuses(&report)[..], [RepoStatus::Created(_)]));
    assert_eq!(orchestrator.api().created()[0].1.base, "track/9");
    assert_eq!(
        fixture.remote_ref("refs/heads/track/9"),
        fixture.remote_ref("refs/heads/main")
    );
}

#[tokio::test]
async fn test_transformation_trait_object() {
    struct Counter(usize);
    impl Transformation for Counter {
        fn apply(&mut self, _: &mut RepositoryHandle, units: &[Unit], _: bool) -> Result<()> {
            self.0 += units.len();
            Ok(())
        }
    }

    let fixture = Fixture::new();
    let orchestrator = orchestrator(&fixture, false);
    let mut counter = Counter(0);
    let transformation: &mut dyn Transformation = &mut counter;

    orchestrator.run(units(&fixture), &job(), transformation).await.unwrap();
    assert_eq!(counter.0, 2);
}

// =============================================================================
// acquire and release steps
// =============================================================================

#[test]
fn test_acquire_creates_missing_home_branch() {
    let fixture = Fixture::new();
    let orchestrator = orchestrator(&fixture, false);

    let repo = orchestrator.acquire(&fixture.url(), "track/2.0").unwrap();

    assert_eq!(repo.current_branch().unwrap().as_deref(), Some("track/2.0"));
    assert_eq!(repo.commit_of("track/2.0").unwrap(), repo.commit_of("main").unwrap());
    assert!(fixture.remote_ref("refs/heads/track/2.0").is_some());
}

#[test]
fn test_acquire_in_dry_run_keeps_new_home_local() {
    let fixture = Fixture::new();
    let orchestrator = orchestrator(&fixture, true);

    let repo = orchestrator.acquire(&fixture.url(), "track/2.0").unwrap();

    assert_eq!(repo.current_branch().unwrap().as_deref(), Some("track/2.0"));
    assert!(fixture.remote_ref("refs/heads/track/2.0").is_none());
}

#[test]
fn test_cut_release_pushes_branch_from_source() {
    let fixture = Fixture::new();
    let orchestrator = orchestrator(&fixture, false);
    let input = vec![Unit::new("one", fixture.url(), "a", "track/1.0")];

    let report = orchestrator.cut_release(input, "main").unwrap();

    assert_eq!(report.failed, 0);
    let main = fixture.remote_ref("refs/heads/main").unwrap();
    assert_eq!(fixture.remote_ref("refs/heads/track/1.0"), Some(main.clone()));
    assert_eq!(statuses(&report), [RepoStatus::Released { commit: main }]);
}

#[test]
fn test_tag_release_tags_home_heads() {
    let fixture = Fixture::new();
    let orchestrator = orchestrator(&fixture, false);
    let input = vec![Unit::new("one", fixture.url(), Path::new("a"), "feature")];

    let report = orchestrator.tag_release(input.clone(), "v1.0").unwrap();
    assert_eq!(report.failed, 0);
    let feature = fixture.remote_ref("refs/heads/feature").unwrap();
    assert_eq!(fixture.remote_ref("refs/tags/v1.0^{commit}"), Some(feature.clone()));

    // Tags move on re-release.
    let report = orchestrator.tag_release(input, "v1.0").unwrap();
    assert_eq!(
        statuses(&report),
        [RepoStatus::Tagged {
            tag: "v1.0".to_string(),
            commit: feature
        }]
    );
}

#[test]
fn test_status_display() {
    let lines: Vec<String> = [
        RepoStatus::Created("https://github.com/acme/a/pull/1".to_string()),
        RepoStatus::Unchanged,
        RepoStatus::DryRun { changed: false },
    ]
    .iter()
    .map(ToString::to_string)
    .collect();
    insta::assert_debug_snapshot!(lines, @r#"
    [
        "created https://github.com/acme/a/pull/1",
        "unchanged",
        "[DRY-RUN] unchanged",
    ]
    "#);
}
