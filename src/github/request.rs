//! Shared plumbing for GitHub REST and GraphQL requests.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::GitHubError;

/// Build an octocrab client for the given API root.
pub fn build_client(token: &str, api_url: &str) -> Result<octocrab::Octocrab, GitHubError> {
    octocrab::Octocrab::builder()
        .personal_token(token.to_string())
        .base_uri(api_url)
        .map_err(|e| GitHubError::Request(Box::new(e)))?
        .build()
        .map_err(|e| GitHubError::Request(Box::new(e)))
}

/// Classify an octocrab error.
///
/// octocrab error formats differ between variants, so both the Display and
/// Debug renderings are inspected.
pub fn map_request_error(e: octocrab::Error, owner: &str, repo: &str) -> GitHubError {
    let err_display = e.to_string();
    let err_debug = format!("{:?}", e);

    if err_display.to_lowercase().contains("rate limit")
        || err_debug.to_lowercase().contains("rate limit")
    {
        return GitHubError::RateLimited {
            reset_time: "unknown".to_string(),
        };
    }
    if err_display.contains("Not Found") || err_debug.contains("Not Found") {
        return GitHubError::RepositoryNotFound {
            owner: owner.to_string(),
            repo: repo.to_string(),
        };
    }

    GitHubError::Request(Box::new(e))
}

/// GraphQL response envelope.
#[derive(Debug, Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl<T: DeserializeOwned> GraphQlResponse<T> {
    /// Unwrap the `data` member, turning GraphQL-level errors into [`GitHubError`].
    pub fn into_data(self, owner: &str, repo: &str) -> Result<T, GitHubError> {
        if let Some(error) = self.errors.first() {
            if error.kind.as_deref() == Some("NOT_FOUND") {
                return Err(GitHubError::RepositoryNotFound {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                });
            }
            if error.kind.as_deref() == Some("RATE_LIMITED") {
                return Err(GitHubError::RateLimited {
                    reset_time: "unknown".to_string(),
                });
            }
            return Err(GitHubError::UnexpectedResponse(error.message.clone()));
        }

        self.data
            .ok_or_else(|| GitHubError::UnexpectedResponse("response has no data".to_string()))
    }
}
