//! Mapping of commits to version bump severities.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::commit::parser::parse;
use crate::error::CommitError;
use crate::version::Severity;

/// Which commit types trigger which bump.
///
/// The lists are not required to be disjoint. A type listed in several
/// buckets resolves to the most severe one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BumpTypeConfig {
    pub major: BTreeSet<String>,
    pub minor: BTreeSet<String>,
    pub patch: BTreeSet<String>,
    /// Treat every otherwise unclassified type as a patch.
    pub patch_all: bool,
}

impl BumpTypeConfig {
    /// Build a config from comma separated type lists, e.g. `"feat, feature"`.
    pub fn from_lists(major: &str, minor: &str, patch: &str, patch_all: bool) -> Self {
        Self {
            major: split_list(major),
            minor: split_list(minor),
            patch: split_list(patch),
            patch_all,
        }
    }
}

fn split_list(list: &str) -> BTreeSet<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Classify a single commit message.
///
/// Returns [`Severity::None`] for well-formed commits that do not warrant a
/// bump, and an error for messages that are not conventional commits.
pub fn classify(config: &BumpTypeConfig, message: &str) -> Result<Severity, CommitError> {
    classify_commit(config, message, "unknown")
}

/// Same as [`classify`], tagging log lines with the commit sha.
pub fn classify_commit(
    config: &BumpTypeConfig,
    message: &str,
    sha: &str,
) -> Result<Severity, CommitError> {
    let commit = parse(message)?;
    debug!(sha, ?commit, "Parsed commit");

    let commit_type = commit.commit_type.as_str();

    if commit.is_breaking() {
        info!("[MAJOR] Commit {sha} has a BREAKING CHANGE mention, causing a major version bump.");
        return Ok(Severity::Major);
    }
    if config.major.contains(commit_type) {
        info!("[MAJOR] Commit {sha} of type {commit_type} will cause a major version bump.");
        return Ok(Severity::Major);
    }
    if config.minor.contains(commit_type) {
        info!("[MINOR] Commit {sha} of type {commit_type} will cause a minor version bump.");
        return Ok(Severity::Minor);
    }
    if config.patch_all || config.patch.contains(commit_type) {
        info!("[PATCH] Commit {sha} of type {commit_type} will cause a patch version bump.");
        return Ok(Severity::Patch);
    }

    info!("[SKIP] Commit {sha} of type {commit_type} will not cause any version bump.");
    Ok(Severity::None)
}
