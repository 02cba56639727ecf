//! Error types for semtag modules using thiserror.

use thiserror::Error;

/// Errors from conventional commit parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommitError {
    #[error("Commit message is empty")]
    Empty,

    #[error("Commit header '{header}' is not a conventional commit: {reason}")]
    Malformed { header: String, reason: String },
}

/// Errors from version calculation.
#[derive(Error, Debug)]
pub enum VersionError {
    #[error("Failed to parse version '{0}': {1}")]
    Invalid(String, #[source] semver::Error),

    #[error("Invalid pre-release stage '{0}': {1}")]
    InvalidPreReleaseStage(String, #[source] semver::Error),

    #[error("Cannot bump {field} of version '{version}' past its maximum")]
    Overflow { version: String, field: &'static str },
}

/// Errors from GitHub API operations.
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error(
        "GitHub authentication failed: no valid auth found. Pass --token, set GITHUB_TOKEN, or run 'gh auth login'"
    )]
    AuthenticationFailed,

    #[error("GitHub request failed: {0}")]
    Request(#[source] Box<octocrab::Error>),

    #[error("Rate limited by GitHub API. Resets at: {reset_time}")]
    RateLimited { reset_time: String },

    #[error("Repository not found: {owner}/{repo}")]
    RepositoryNotFound { owner: String, repo: String },

    #[error("Couldn't find the latest tag. Make sure you have at least one tag created first!")]
    NoTags,

    #[error("Latest tag '{0}' is invalid (does not conform to semver)")]
    LatestTagInvalid(String),

    #[error("None of the {0} latest tags are valid semver")]
    NoValidTags(usize),

    #[error("Provided tag '{0}' could not be found")]
    TagNotFound(String),

    #[error("Provided tag '{0}' is invalid (does not conform to semver)")]
    TagInvalid(String),

    #[error("Unexpected GitHub response: {0}")]
    UnexpectedResponse(String),

    #[error("All retry attempts failed: {0}")]
    RetriesExhausted(#[source] Box<GitHubError>),
}

impl GitHubError {
    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, GitHubError::Request(_) | GitHubError::RateLimited { .. })
    }
}

/// Errors from input validation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid change type '{0}' (expected major, minor, patch or none)")]
    InvalidSeverity(String),

    #[error("Invalid no-version-bump behavior '{0}' (expected error, warn, current or silent)")]
    InvalidNoBumpBehavior(String),

    #[error("Invalid repository '{0}' (expected owner/repo)")]
    InvalidRepository(String),
}

/// Errors from the release pipeline.
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error("Couldn't find any commits between {head} and {base}")]
    NoCommits { base: String, head: String },

    #[error("No commit resulted in a version bump since last release!")]
    NoVersionBump,
}

/// Errors from writing step outputs.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write output file {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
