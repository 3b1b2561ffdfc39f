// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pull request hosting API.
//!
//! ```text
//! PullRequestApi (trait, async)
//!        |
//!        v
//! GithubClient ── reqwest ──> {api_url}/repos/{owner}/{repo}/...
//!   GET  pulls?state=open&head={owner}:{branch}
//!   GET  pulls/{n}
//!   POST pulls
//!   GET  pulls/{n}/reviews
//!   GET  commits/{sha}/check-runs
//!   PUT  pulls/{n}/merge
//! ```
//!
//! # Key Types
//!
//! | Type             | Purpose                              |
//! |------------------|--------------------------------------|
//! | `RepoSlug`       | `owner/name` parsed from a clone URL |
//! | `PullRequest`    | Pull request as returned by the API  |
//! | `NewPullRequest` | Body of a create request             |
//! | `MergeRequest`   | Body of a merge request              |

pub mod reconcile;

#[cfg(test)]
pub(crate) mod fake;

use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Credentials;
use crate::error::{FleetResult, InputError, RepositoryError};

/// `owner/name` of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

fn https_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^https://(?:[^@/]+@)?github\.com/([\w.-]+)/([\w.-]+?)(?:\.git)?/?$")
            .unwrap_or_else(|e| unreachable!("invalid url pattern: {e}"))
    })
}

fn ssh_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^git@[\w.-]+:([\w.-]+)/([\w.-]+?)(?:\.git)?$")
            .unwrap_or_else(|e| unreachable!("invalid url pattern: {e}"))
    })
}

impl RepoSlug {
    /// Parses `https://[user@]github.com/<owner>/<repo>(.git)` and
    /// `git@host:<owner>/<repo>.git`.
    ///
    /// # Errors
    ///
    /// Returns `InputError::InvalidRemoteUrl` for anything else.
    pub fn parse(url: &str) -> Result<Self, InputError> {
        let url = url.trim();
        https_pattern()
            .captures(url)
            .or_else(|| ssh_pattern().captures(url))
            .map(|caps| Self {
                owner: caps[1].to_string(),
                name: caps[2].to_string(),
            })
            .ok_or_else(|| InputError::InvalidRemoteUrl(url.to_string()))
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Head side of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
}

/// Base side of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
}

/// A pull request as the API reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub state: String,
    pub head: HeadRef,
    pub base: BaseRef,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub merged_at: Option<String>,
    #[serde(default)]
    pub mergeable: Option<bool>,
    #[serde(default)]
    pub merged: Option<bool>,
}

impl PullRequest {
    /// Whether the pull request has been merged.
    #[must_use]
    pub fn is_merged(&self) -> bool {
        self.merged.unwrap_or(false) || self.merged_at.is_some()
    }
}

/// A submitted review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub state: String,
}

impl Review {
    #[must_use]
    pub fn is_approval(&self) -> bool {
        self.state.eq_ignore_ascii_case("APPROVED")
    }
}

/// A check run on a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRun {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub conclusion: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CheckRunList {
    check_runs: Vec<CheckRun>,
}

/// Body of a pull request creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPullRequest {
    pub title: String,
    pub head: String,
    pub base: String,
    pub body: String,
}

/// How commits are combined on merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    Merge,
    #[default]
    Squash,
    Rebase,
}

/// Body of a merge request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeRequest {
    pub commit_title: String,
    pub commit_message: String,
    pub merge_method: MergeMethod,
}

/// Reply to a merge request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MergeResult {
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub merged: bool,
    #[serde(default)]
    pub message: String,
}

/// Operations the reconciler needs from a hosting service.
///
/// `url` is always the repository's clone URL.
#[allow(async_fn_in_trait)]
pub trait PullRequestApi {
    /// Open pull requests whose head is `head`.
    async fn open_pull_requests(&self, url: &str, head: &str) -> FleetResult<Vec<PullRequest>>;

    /// A single pull request with mergeability details.
    async fn pull_request(&self, url: &str, number: u64) -> FleetResult<PullRequest>;

    /// Opens a pull request.
    async fn create_pull_request(
        &self,
        url: &str,
        request: &NewPullRequest,
    ) -> FleetResult<PullRequest>;

    /// Reviews submitted on a pull request.
    async fn reviews(&self, url: &str, number: u64) -> FleetResult<Vec<Review>>;

    /// Check runs on a commit.
    async fn check_runs(&self, url: &str, sha: &str) -> FleetResult<Vec<CheckRun>>;

    /// Merges a pull request.
    async fn merge_pull_request(
        &self,
        url: &str,
        number: u64,
        request: &MergeRequest,
    ) -> FleetResult<MergeResult>;
}

/// GitHub REST v3 client.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: Client,
    api_url: String,
    credentials: Arc<Credentials>,
}

impl GithubClient {
    /// Creates a client against `api_url` (e.g. `https://api.github.com`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Http` if the HTTP client cannot be built.
    pub fn new(api_url: &str, credentials: Arc<Credentials>) -> FleetResult<Self> {
        let client = Client::builder()
            .user_agent(format!("repo-fleet/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(RepositoryError::Http)?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn repo_endpoint(&self, url: &str, path: &str) -> FleetResult<String> {
        let slug = RepoSlug::parse(url)?;
        Ok(format!("{}/repos/{slug}/{path}", self.api_url))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(
                "Authorization",
                format!("Bearer {}", self.credentials.secret()),
            )
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    async fn send(&self, request: RequestBuilder, endpoint: &str) -> FleetResult<Response> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(RepositoryError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::Api {
                status: status.as_u16(),
                url: endpoint.to_string(),
                message: api_message(&body),
            }
            .into());
        }
        Ok(response)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> FleetResult<T> {
        self.get_with_query(endpoint, &[]).await
    }

    async fn get_with_query<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> FleetResult<T> {
        debug!(endpoint, ?query, "GET");
        let response = self
            .send(self.client.get(endpoint).query(query), endpoint)
            .await?;
        Ok(response.json::<T>().await.map_err(RepositoryError::Http)?)
    }
}

/// Pulls the `message` field out of an API error body when there is one.
fn api_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ApiError {
        message: String,
    }
    serde_json::from_str::<ApiError>(body).map_or_else(|_| body.trim().to_string(), |e| e.message)
}

impl PullRequestApi for GithubClient {
    async fn open_pull_requests(&self, url: &str, head: &str) -> FleetResult<Vec<PullRequest>> {
        let slug = RepoSlug::parse(url)?;
        let endpoint = self.repo_endpoint(url, "pulls")?;
        let head = format!("{}:{head}", slug.owner);
        let query = [("state", "open"), ("head", head.as_str()), ("per_page", "100")];
        self.get_with_query(&endpoint, &query).await
    }

    async fn pull_request(&self, url: &str, number: u64) -> FleetResult<PullRequest> {
        let endpoint = self.repo_endpoint(url, &format!("pulls/{number}"))?;
        self.get(&endpoint).await
    }

    async fn create_pull_request(
        &self,
        url: &str,
        request: &NewPullRequest,
    ) -> FleetResult<PullRequest> {
        let endpoint = self.repo_endpoint(url, "pulls")?;
        debug!(endpoint, head = %request.head, base = %request.base, "POST");
        let response = self
            .send(self.client.post(&endpoint).json(request), &endpoint)
            .await?;
        Ok(response
            .json::<PullRequest>()
            .await
            .map_err(RepositoryError::Http)?)
    }

    async fn reviews(&self, url: &str, number: u64) -> FleetResult<Vec<Review>> {
        let endpoint = self.repo_endpoint(url, &format!("pulls/{number}/reviews?per_page=100"))?;
        self.get(&endpoint).await
    }

    async fn check_runs(&self, url: &str, sha: &str) -> FleetResult<Vec<CheckRun>> {
        let endpoint =
            self.repo_endpoint(url, &format!("commits/{sha}/check-runs?per_page=100"))?;
        let list: CheckRunList = self.get(&endpoint).await?;
        Ok(list.check_runs)
    }

    async fn merge_pull_request(
        &self,
        url: &str,
        number: u64,
        request: &MergeRequest,
    ) -> FleetResult<MergeResult> {
        let endpoint = self.repo_endpoint(url, &format!("pulls/{number}/merge"))?;
        debug!(endpoint, "PUT");
        let response = self
            .send(self.client.put(&endpoint).json(request), &endpoint)
            .await?;
        Ok(response
            .json::<MergeResult>()
            .await
            .map_err(RepositoryError::Http)?)
    }
}
