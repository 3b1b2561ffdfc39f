// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared helpers for integration tests: scratch repositories behind a bare
//! remote and an in-memory pull request service.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};

use repo_fleet::config::Credentials;
use repo_fleet::error::FleetResult;
use repo_fleet::github::{
    BaseRef, CheckRun, HeadRef, MergeRequest, MergeResult, NewPullRequest, PullRequest,
    PullRequestApi, Review,
};
use tempfile::TempDir;

pub fn git(args: &[&str], cwd: &Path) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A repository with one charm per unit under `charms/<unit>`, behind a bare remote.
pub struct Remote {
    pub temp: TempDir,
    pub units: Vec<String>,
    pub remote: PathBuf,
    pub base: PathBuf,
}

impl Remote {
    pub fn new(units: &[&str]) -> Self {
        let temp = tempfile::tempdir().expect("failed to create temp dir");
        let seed = temp.path().join("seed");
        let remote = temp.path().join("charms.git");
        let base = temp.path().join("base");
        std::fs::create_dir_all(&seed).unwrap();

        git(&["init", "--quiet", "--initial-branch=main"], &seed);
        git(&["config", "user.email", "seed@example.com"], &seed);
        git(&["config", "user.name", "Seed"], &seed);
        for unit in units {
            let dir = seed.join("charms").join(unit);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(
                dir.join("metadata.yaml"),
                format!(
                    "name: {unit}\n\
                     resources:\n  \
                       {unit}-image:\n    \
                         type: oci-image\n    \
                         upstream-source: registry.example.com/{unit}:1.0\n"
                ),
            )
            .unwrap();
        }
        git(&["add", "-A"], &seed);
        git(&["commit", "--quiet", "-m", "initial"], &seed);
        git(
            &[
                "clone",
                "--quiet",
                "--bare",
                seed.to_str().unwrap(),
                remote.to_str().unwrap(),
            ],
            temp.path(),
        );

        Self {
            temp,
            units: units.iter().map(ToString::to_string).collect(),
            remote,
            base,
        }
    }

    pub fn url(&self) -> String {
        self.remote.display().to_string()
    }

    pub fn clone_path(&self) -> PathBuf {
        self.base.join("charms")
    }

    pub fn remote_ref(&self, name: &str) -> Option<String> {
        let output = Command::new("git")
            .args(["rev-parse", "--verify", "--quiet", name])
            .current_dir(&self.remote)
            .output()
            .expect("failed to run git");
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

pub fn credentials() -> Arc<Credentials> {
    Arc::new(Credentials::new("fleet-bot", "test-token").unwrap())
}

/// Pull request service that remembers what it was asked to do.
#[derive(Default)]
pub struct MemoryApi {
    pulls: Mutex<Vec<(String, PullRequest)>>,
    reviews: Mutex<Vec<(u64, Review)>>,
}

impl MemoryApi {
    pub fn pulls(&self) -> Vec<(String, PullRequest)> {
        self.pulls.lock().unwrap().clone()
    }

    pub fn approve(&self, number: u64) {
        self.reviews.lock().unwrap().push((
            number,
            Review {
                state: "APPROVED".to_string(),
            },
        ));
    }

    fn find(&self, url: &str, number: u64) -> PullRequest {
        self.pulls
            .lock()
            .unwrap()
            .iter()
            .find(|(u, pr)| u == url && pr.number == number)
            .map(|(_, pr)| pr.clone())
            .expect("unknown pull request")
    }
}

impl PullRequestApi for MemoryApi {
    async fn open_pull_requests(&self, url: &str, head: &str) -> FleetResult<Vec<PullRequest>> {
        Ok(self
            .pulls
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, pr)| u == url && pr.head.ref_name == head && pr.state == "open")
            .map(|(_, pr)| pr.clone())
            .collect())
    }

    async fn pull_request(&self, url: &str, number: u64) -> FleetResult<PullRequest> {
        Ok(self.find(url, number))
    }

    async fn create_pull_request(
        &self,
        url: &str,
        request: &NewPullRequest,
    ) -> FleetResult<PullRequest> {
        let mut pulls = self.pulls.lock().unwrap();
        let number = pulls.len() as u64 + 1;
        let pr = PullRequest {
            number,
            title: request.title.clone(),
            html_url: format!("https://github.com/acme/charms/pull/{number}"),
            state: "open".to_string(),
            head: HeadRef {
                ref_name: request.head.clone(),
                sha: format!("head{number}"),
            },
            base: BaseRef {
                ref_name: request.base.clone(),
            },
            body: Some(request.body.clone()),
            merged_at: None,
            mergeable: Some(true),
            merged: Some(false),
        };
        pulls.push((url.to_string(), pr.clone()));
        Ok(pr)
    }

    async fn reviews(&self, _url: &str, number: u64) -> FleetResult<Vec<Review>> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|(n, _)| *n == number)
            .map(|(_, review)| review.clone())
            .collect())
    }

    async fn check_runs(&self, _url: &str, _sha: &str) -> FleetResult<Vec<CheckRun>> {
        Ok(vec![CheckRun {
            name: "lint".to_string(),
            conclusion: Some("success".to_string()),
        }])
    }

    async fn merge_pull_request(
        &self,
        url: &str,
        number: u64,
        _request: &MergeRequest,
    ) -> FleetResult<MergeResult> {
        let mut pulls = self.pulls.lock().unwrap();
        if let Some((_, pr)) = pulls
            .iter_mut()
            .find(|(u, pr)| u == url && pr.number == number)
        {
            pr.merged = Some(true);
            pr.state = "closed".to_string();
        }
        Ok(MergeResult {
            sha: Some(format!("merge{number}")),
            merged: true,
            message: "Pull Request successfully merged".to_string(),
        })
    }
}
