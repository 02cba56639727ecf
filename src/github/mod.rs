//! GitHub API operations using octocrab.

pub mod auth;
pub mod commits;
pub mod request;
pub mod retry;
pub mod source;
pub mod tags;

pub use auth::get_github_token;
pub use commits::{RemoteCommit, fetch_commits_between};
pub use source::{GitHubSource, ReleaseSource, parse_repository};
pub use tags::{TagInfo, fetch_latest_tag, fetch_tag};
