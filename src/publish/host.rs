// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pull-request host seam.

use async_trait::async_trait;

use crate::error::Result;
use crate::github::{GitHubClient, NewPullRequest, PullRequest};

/// Service that accepts pull requests for a repository.
#[async_trait]
pub trait PullRequestHost: Send + Sync {
    async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pull: &NewPullRequest,
    ) -> Result<PullRequest>;

    async fn list_open_pull_requests(&self, owner: &str, repo: &str) -> Result<Vec<PullRequest>>;
}

#[async_trait]
impl PullRequestHost for GitHubClient {
    async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pull: &NewPullRequest,
    ) -> Result<PullRequest> {
        Self::create_pull_request(self, owner, repo, pull).await
    }

    async fn list_open_pull_requests(&self, owner: &str, repo: &str) -> Result<Vec<PullRequest>> {
        Self::list_open_pull_requests(self, owner, repo).await
    }
}
