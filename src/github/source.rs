//! The repository data the release pipeline needs, behind a mockable trait.

use async_trait::async_trait;
use octocrab::Octocrab;

use crate::error::{ConfigError, GitHubError};
use crate::github::commits::{RemoteCommit, fetch_commits_between};
use crate::github::request::build_client;
use crate::github::tags::{TagInfo, fetch_latest_tag, fetch_tag};

/// Source of tags and commits for a single repository.
///
/// This abstraction allows mocking the GitHub API in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Latest release tag, newest first among the recent tags.
    async fn latest_tag(&self, prefix: &str, skip_invalid_tags: bool) -> Result<TagInfo, GitHubError>;

    /// A specific tag, named without `prefix`.
    async fn tag(&self, prefix: &str, name: &str) -> Result<TagInfo, GitHubError>;

    /// Commits reachable from `head` but not from `base`.
    async fn commits_between(&self, base: &str, head: &str) -> Result<Vec<RemoteCommit>, GitHubError>;
}

/// [`ReleaseSource`] backed by the GitHub API.
pub struct GitHubSource {
    client: Octocrab,
    owner: String,
    repo: String,
}

impl GitHubSource {
    pub fn new(client: Octocrab, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            client,
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Build a source authenticated with `token` against `api_url`.
    pub fn from_token(token: &str, api_url: &str, owner: &str, repo: &str) -> Result<Self, GitHubError> {
        Ok(Self::new(build_client(token, api_url)?, owner, repo))
    }
}

#[async_trait]
impl ReleaseSource for GitHubSource {
    async fn latest_tag(&self, prefix: &str, skip_invalid_tags: bool) -> Result<TagInfo, GitHubError> {
        fetch_latest_tag(&self.client, &self.owner, &self.repo, prefix, skip_invalid_tags).await
    }

    async fn tag(&self, prefix: &str, name: &str) -> Result<TagInfo, GitHubError> {
        fetch_tag(&self.client, &self.owner, &self.repo, prefix, name).await
    }

    async fn commits_between(&self, base: &str, head: &str) -> Result<Vec<RemoteCommit>, GitHubError> {
        fetch_commits_between(&self.client, &self.owner, &self.repo, base, head).await
    }
}

/// Extract owner and repo from `owner/repo` or a GitHub remote URL.
pub fn parse_repository(input: &str) -> Result<(String, String), ConfigError> {
    let input = input.trim();
    let invalid = || ConfigError::InvalidRepository(input.to_string());

    // SSH (git@github.com:owner/repo.git), HTTPS (https://github.com/owner/repo.git) or a bare slug
    let path = if let Some(path) = input.strip_prefix("git@github.com:") {
        path
    } else if input.contains("github.com/") {
        input.split("github.com/").nth(1).ok_or_else(invalid)?
    } else {
        input
    };

    let path = path.strip_suffix(".git").unwrap_or(path);
    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();

    match parts.as_slice() {
        [owner, repo, ..] => Ok((owner.to_string(), repo.to_string())),
        _ => Err(invalid()),
    }
}
