//! Commit range fetching via the compare API.

use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::GitHubError;
use crate::github::request::map_request_error;
use crate::github::retry::retry_with_backoff;

/// Commits requested per page (GitHub's maximum).
pub const PER_PAGE: usize = 100;

/// Safety limit to prevent runaway pagination.
const MAX_PAGES: u32 = 50;

/// A commit returned by the GitHub API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCommit {
    pub sha: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct CompareResponse {
    #[serde(default)]
    total_commits: usize,
    #[serde(default)]
    commits: Vec<CompareCommit>,
}

#[derive(Debug, Deserialize)]
struct CompareCommit {
    sha: String,
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
}

#[derive(Debug, Serialize)]
struct PageParams {
    page: u32,
    per_page: usize,
}

/// Fetch all commits reachable from `head` but not from `base`.
///
/// The compare endpoint pages its `commits` array while reporting the full
/// count in `total_commits`; pages are requested until that count is met.
pub async fn fetch_commits_between(
    octocrab: &Octocrab,
    owner: &str,
    repo: &str,
    base: &str,
    head: &str,
) -> Result<Vec<RemoteCommit>, GitHubError> {
    let route = format!("/repos/{owner}/{repo}/compare/{base}...{head}");
    let mut all_commits = Vec::new();
    let mut page = 1u32;

    loop {
        let params = PageParams {
            page,
            per_page: PER_PAGE,
        };

        let response = retry_with_backoff(
            || async {
                octocrab
                    .get::<CompareResponse, _, _>(&route, Some(&params))
                    .await
                    .map_err(|e| map_request_error(e, owner, repo))
            },
            GitHubError::is_transient,
            |e| GitHubError::RetriesExhausted(Box::new(e)),
        )
        .await?;

        let count = response.commits.len();
        debug!(page, count, total = response.total_commits, "Fetched compare page");

        all_commits.extend(response.commits.into_iter().map(|c| RemoteCommit {
            sha: c.sha,
            message: c.commit.message,
        }));

        let seen = (page as usize - 1) * PER_PAGE + count;
        if count == 0 || seen >= response.total_commits {
            break;
        }

        page += 1;

        if page > MAX_PAGES {
            warn!(
                "Reached {}-page safety limit while comparing {}...{} in {}/{}",
                MAX_PAGES, base, head, owner, repo
            );
            break;
        }
    }

    Ok(all_commits)
}
