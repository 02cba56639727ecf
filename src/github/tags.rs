//! Tag lookup over the GitHub GraphQL API.

use octocrab::Octocrab;
use semver::Version;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::error::GitHubError;
use crate::github::request::{GraphQlResponse, map_request_error};
use crate::github::retry::retry_with_backoff;

/// Number of recent tags inspected when looking for the latest release.
pub const LATEST_TAGS_WINDOW: usize = 10;

const LATEST_TAGS_QUERY: &str = r#"
query lastTags($owner: String!, $repo: String!, $first: Int!) {
  repository(owner: $owner, name: $repo) {
    refs(first: $first, refPrefix: "refs/tags/", orderBy: { field: TAG_COMMIT_DATE, direction: DESC }) {
      nodes {
        name
        target {
          oid
        }
      }
    }
  }
}
"#;

const SINGLE_TAG_QUERY: &str = r#"
query singleTag($owner: String!, $repo: String!, $tag: String!) {
  repository(owner: $owner, name: $repo) {
    ref(qualifiedName: $tag) {
      name
      target {
        oid
      }
    }
  }
}
"#;

/// A release tag whose name (minus the configured prefix) is a semver version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    /// Full tag name, including any prefix.
    pub name: String,
    /// Tag name with the prefix removed, e.g. `v1.2.3`.
    pub version_name: String,
    pub version: Version,
    pub oid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LatestTagsData {
    repository: Option<TagsRepository>,
}

#[derive(Debug, Deserialize)]
struct TagsRepository {
    refs: RefConnection,
}

#[derive(Debug, Deserialize)]
struct RefConnection {
    #[serde(default)]
    nodes: Vec<RefNode>,
}

#[derive(Debug, Deserialize)]
struct SingleTagData {
    repository: Option<SingleTagRepository>,
}

#[derive(Debug, Deserialize)]
struct SingleTagRepository {
    #[serde(rename = "ref")]
    tag_ref: Option<RefNode>,
}

#[derive(Debug, Deserialize)]
struct RefNode {
    name: String,
    target: Option<RefTarget>,
}

#[derive(Debug, Deserialize)]
struct RefTarget {
    oid: String,
}

/// Extract a semver version from a tag name.
/// Handles "v1.2.3", "=1.2.3" and "1.2.3" formats.
pub fn get_version_from_tag(tag_name: &str) -> Option<Version> {
    let trimmed = tag_name.trim();
    let version_str = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('='))
        .unwrap_or(trimmed);
    Version::parse(version_str).ok()
}

/// Remove `prefix` from the start of `name`, if present.
pub fn strip_tag_prefix<'a>(name: &'a str, prefix: &str) -> &'a str {
    if prefix.is_empty() {
        return name;
    }
    name.strip_prefix(prefix).unwrap_or(name)
}

fn to_tag_info(node: &RefNode, prefix: &str) -> Option<TagInfo> {
    let version_name = strip_tag_prefix(&node.name, prefix);
    let version = get_version_from_tag(version_name)?;
    Some(TagInfo {
        name: node.name.clone(),
        version_name: version_name.to_string(),
        version,
        oid: node.target.as_ref().map(|t| t.oid.clone()),
    })
}

/// Pick the release tag out of the most recent tags, newest first.
///
/// With `skip_invalid_tags` unset, the newest tag must itself be a valid
/// version; otherwise the first valid one wins.
fn select_latest(
    nodes: &[RefNode],
    prefix: &str,
    skip_invalid_tags: bool,
) -> Result<TagInfo, GitHubError> {
    let Some(newest) = nodes.first() else {
        return Err(GitHubError::NoTags);
    };

    if !skip_invalid_tags {
        return to_tag_info(newest, prefix)
            .ok_or_else(|| GitHubError::LatestTagInvalid(newest.name.clone()));
    }

    nodes
        .iter()
        .find_map(|node| {
            let tag = to_tag_info(node, prefix);
            if tag.is_none() {
                debug!(tag = %node.name, "Skipping tag that is not valid semver");
            }
            tag
        })
        .ok_or(GitHubError::NoValidTags(nodes.len()))
}

/// Find the latest release tag of a repository.
pub async fn fetch_latest_tag(
    octocrab: &Octocrab,
    owner: &str,
    repo: &str,
    prefix: &str,
    skip_invalid_tags: bool,
) -> Result<TagInfo, GitHubError> {
    let payload = json!({
        "query": LATEST_TAGS_QUERY,
        "variables": { "owner": owner, "repo": repo, "first": LATEST_TAGS_WINDOW },
    });

    let response = retry_with_backoff(
        || async {
            octocrab
                .graphql::<GraphQlResponse<LatestTagsData>>(&payload)
                .await
                .map_err(|e| map_request_error(e, owner, repo))
        },
        GitHubError::is_transient,
        |e| GitHubError::RetriesExhausted(Box::new(e)),
    )
    .await?;

    let repository = response
        .into_data(owner, repo)?
        .repository
        .ok_or_else(|| GitHubError::RepositoryNotFound {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })?;

    let tag = select_latest(&repository.refs.nodes, prefix, skip_invalid_tags)?;
    info!("Comparing against latest tag: {}", tag.name);
    Ok(tag)
}

/// Look up a specific tag; `tag` is given without `prefix`.
pub async fn fetch_tag(
    octocrab: &Octocrab,
    owner: &str,
    repo: &str,
    prefix: &str,
    tag: &str,
) -> Result<TagInfo, GitHubError> {
    let qualified = format!("refs/tags/{prefix}{tag}");
    let payload = json!({
        "query": SINGLE_TAG_QUERY,
        "variables": { "owner": owner, "repo": repo, "tag": qualified },
    });

    let response = retry_with_backoff(
        || async {
            octocrab
                .graphql::<GraphQlResponse<SingleTagData>>(&payload)
                .await
                .map_err(|e| map_request_error(e, owner, repo))
        },
        GitHubError::is_transient,
        |e| GitHubError::RetriesExhausted(Box::new(e)),
    )
    .await?;

    let node = response
        .into_data(owner, repo)?
        .repository
        .and_then(|r| r.tag_ref)
        .ok_or_else(|| GitHubError::TagNotFound(format!("{prefix}{tag}")))?;

    let info = to_tag_info(&node, prefix).ok_or_else(|| GitHubError::TagInvalid(node.name.clone()))?;
    info!("Comparing against provided tag: {}", info.name);
    Ok(info)
}
