// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! GitHub REST client.
//!
//! ```text
//! GitHubClient { api_url, token }
//!   POST /repos/{owner}/{repo}/pulls            create_pull_request
//!   GET  /repos/{owner}/{repo}/pulls?state=open list_open_pull_requests
//!   GET  /repos/{owner}/{repo}/releases         list_releases
//!
//! Shared reqwest client: OnceLock, connection pool, keep-alive
//! Non-2xx: NetworkError::HttpError { status, url }
//! ```

use anyhow::Context;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::debug;

use crate::error::{NetworkError, Result};

/// Default GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Global HTTP client, initialized once and shared by every repository run.
fn global_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent(format!("repoman-rs/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// Pull request as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    #[serde(default)]
    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Label {
    pub name: String,
}

/// Body of a pull-request creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPullRequest {
    pub title: String,
    pub body: String,
    /// Branch holding the changes.
    pub head: String,
    /// Branch the changes should merge into.
    pub base: String,
}

/// Release as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
}

/// Authenticated client for one GitHub API endpoint.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    #[must_use]
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: global_client().clone(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header("Accept", "application/vnd.github.v3+json");
        match &self.token {
            Some(token) => builder.header("Authorization", format!("Bearer {token}")),
            None => builder,
        }
    }

    async fn check(response: Response, url: &str) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(NetworkError::HttpError {
            status: status.as_u16(),
            url: format!("{url} (error: {body})"),
        }
        .into())
    }

    /// Opens a pull request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API rejects it (for example
    /// because a pull request for `head` already exists), or the response
    /// cannot be parsed.
    pub async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pull: &NewPullRequest,
    ) -> Result<PullRequest> {
        let url = format!("{}/repos/{owner}/{repo}/pulls", self.api_url);
        debug!(owner, repo, head = %pull.head, base = %pull.base, "creating pull request");

        let response = self
            .request(Method::POST, &url)
            .json(pull)
            .send()
            .await
            .with_context(|| format!("failed to create pull request at {url}"))?;

        Self::check(response, &url)
            .await?
            .json::<PullRequest>()
            .await
            .with_context(|| "failed to parse pull request from GitHub API")
    }

    /// Lists open pull requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn list_open_pull_requests(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<PullRequest>> {
        let url = format!(
            "{}/repos/{owner}/{repo}/pulls?state=open&per_page=100",
            self.api_url
        );
        debug!(owner, repo, "listing open pull requests");

        let response = self
            .request(Method::GET, &url)
            .send()
            .await
            .with_context(|| format!("failed to list pull requests at {url}"))?;

        Self::check(response, &url)
            .await?
            .json::<Vec<PullRequest>>()
            .await
            .with_context(|| "failed to parse pull requests from GitHub API")
    }

    /// Lists releases, newest first as the API orders them.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn list_releases(&self, owner: &str, repo: &str) -> Result<Vec<Release>> {
        let url = format!(
            "{}/repos/{owner}/{repo}/releases?per_page=100",
            self.api_url
        );
        debug!(owner, repo, "listing releases");

        let response = self
            .request(Method::GET, &url)
            .send()
            .await
            .with_context(|| format!("failed to list releases at {url}"))?;

        Self::check(response, &url)
            .await?
            .json::<Vec<Release>>()
            .await
            .with_context(|| "failed to parse releases from GitHub API")
    }
}

impl PullRequest {
    /// One line of the open pull request listing: `- #12 <url> - <title> [labels]`.
    #[must_use]
    pub fn listing_line(&self) -> String {
        let mut line = format!("- #{:<6} {} - {}", self.number, self.html_url, self.title);
        if !self.labels.is_empty() {
            let labels: Vec<&str> = self.labels.iter().map(|l| l.name.as_str()).collect();
            line.push_str(&format!(" [{}]", labels.join(", ")));
        }
        line
    }
}
