// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory [`PullRequestApi`] for tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use super::{
    BaseRef, CheckRun, HeadRef, MergeRequest, MergeResult, NewPullRequest, PullRequest,
    PullRequestApi, Review,
};
use crate::error::{FleetResult, RepositoryError};

pub(crate) fn sample_pull_request(number: u64, branch: &str) -> PullRequest {
    PullRequest {
        number,
        title: format!("Change {number}"),
        html_url: format!("https://github.com/acme/repo/pull/{number}"),
        state: "open".to_string(),
        head: HeadRef {
            ref_name: branch.to_string(),
            sha: format!("sha{number}"),
        },
        base: BaseRef {
            ref_name: "main".to_string(),
        },
        body: None,
        merged_at: None,
        mergeable: Some(true),
        merged: Some(false),
    }
}

#[derive(Default)]
struct State {
    pulls: Vec<(String, PullRequest)>,
    reviews: HashMap<u64, Vec<Review>>,
    runs: HashMap<String, Vec<CheckRun>>,
    merges: Vec<(String, u64, MergeRequest)>,
    created: Vec<(String, NewPullRequest)>,
    failing: HashSet<String>,
}

#[derive(Default)]
pub(crate) struct FakeApi {
    state: Mutex<State>,
}

impl FakeApi {
    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub(crate) fn insert(&self, url: &str, pull_request: PullRequest) {
        self.state().pulls.push((url.to_string(), pull_request));
    }

    pub(crate) fn set_reviews(&self, number: u64, states: &[&str]) {
        let reviews = states
            .iter()
            .map(|state| Review {
                state: (*state).to_string(),
            })
            .collect();
        self.state().reviews.insert(number, reviews);
    }

    pub(crate) fn set_check_runs(&self, sha: &str, conclusions: &[Option<&str>]) {
        let runs = conclusions
            .iter()
            .enumerate()
            .map(|(i, conclusion)| CheckRun {
                name: format!("check-{i}"),
                conclusion: conclusion.map(str::to_string),
            })
            .collect();
        self.state().runs.insert(sha.to_string(), runs);
    }

    /// Every API call for `url` fails from now on.
    pub(crate) fn fail_for(&self, url: &str) {
        self.state().failing.insert(url.to_string());
    }

    pub(crate) fn created(&self) -> Vec<(String, NewPullRequest)> {
        self.state().created.clone()
    }

    pub(crate) fn merges(&self) -> Vec<(String, u64, MergeRequest)> {
        self.state().merges.clone()
    }

    fn check(&self, url: &str) -> FleetResult<()> {
        if self.state().failing.contains(url) {
            return Err(RepositoryError::Api {
                status: 503,
                url: url.to_string(),
                message: "unavailable".to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn find(&self, url: &str, number: u64) -> FleetResult<PullRequest> {
        self.state()
            .pulls
            .iter()
            .find(|(u, pr)| u == url && pr.number == number)
            .map(|(_, pr)| pr.clone())
            .ok_or_else(|| {
                RepositoryError::Api {
                    status: 404,
                    url: url.to_string(),
                    message: "Not Found".to_string(),
                }
                .into()
            })
    }
}

impl PullRequestApi for FakeApi {
    async fn open_pull_requests(&self, url: &str, head: &str) -> FleetResult<Vec<PullRequest>> {
        self.check(url)?;
        Ok(self
            .state()
            .pulls
            .iter()
            .filter(|(u, pr)| u == url && pr.head.ref_name == head && pr.state == "open")
            .map(|(_, pr)| pr.clone())
            .collect())
    }

    async fn pull_request(&self, url: &str, number: u64) -> FleetResult<PullRequest> {
        self.check(url)?;
        self.find(url, number)
    }

    async fn create_pull_request(
        &self,
        url: &str,
        request: &NewPullRequest,
    ) -> FleetResult<PullRequest> {
        self.check(url)?;
        let mut state = self.state();
        let number = state.pulls.len() as u64 + 1;
        let mut pr = sample_pull_request(number, &request.head);
        pr.title.clone_from(&request.title);
        pr.base.ref_name.clone_from(&request.base);
        pr.body = Some(request.body.clone());
        state.pulls.push((url.to_string(), pr.clone()));
        state.created.push((url.to_string(), request.clone()));
        Ok(pr)
    }

    async fn reviews(&self, url: &str, number: u64) -> FleetResult<Vec<Review>> {
        self.check(url)?;
        Ok(self.state().reviews.get(&number).cloned().unwrap_or_default())
    }

    async fn check_runs(&self, url: &str, sha: &str) -> FleetResult<Vec<CheckRun>> {
        self.check(url)?;
        Ok(self.state().runs.get(sha).cloned().unwrap_or_default())
    }

    async fn merge_pull_request(
        &self,
        url: &str,
        number: u64,
        request: &MergeRequest,
    ) -> FleetResult<MergeResult> {
        self.check(url)?;
        let pr = self.find(url, number)?;
        if pr.mergeable == Some(false) {
            return Err(RepositoryError::Api {
                status: 405,
                url: url.to_string(),
                message: "Pull Request is not mergeable".to_string(),
            }
            .into());
        }
        let mut state = self.state();
        state.merges.push((url.to_string(), number, request.clone()));
        if let Some((_, stored)) = state
            .pulls
            .iter_mut()
            .find(|(u, p)| u == url && p.number == number)
        {
            stored.merged = Some(true);
            stored.state = "closed".to_string();
        }
        Ok(MergeResult {
            sha: Some(format!("merge{number}")),
            merged: true,
            message: "Pull Request successfully merged".to_string(),
        })
    }
}
