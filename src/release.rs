//! Release pipeline: base tag -> commits -> bump -> next version.

use std::fmt;
use std::str::FromStr;

use semver::Version;
use tracing::{debug, info, warn};

use crate::commit::{BumpTypeConfig, classify_commit};
use crate::error::{ConfigError, ReleaseError};
use crate::github::{ReleaseSource, RemoteCommit, TagInfo};
use crate::version::{PreReleaseStage, Severity, aggregate, clean_version, next_version};

const UNKNOWN_SHA: &str = "unknown";
const SQUASH_SHA: &str = "squashMergeCommitMessage";

/// What to do when no commit warrants a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoVersionBumpBehavior {
    /// Fail the run.
    #[default]
    Error,
    /// Log a warning and succeed without a next version.
    Warn,
    /// Report the current version as the next one.
    Current,
    /// Succeed quietly without a next version.
    Silent,
}

impl FromStr for NoVersionBumpBehavior {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" | "" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "current" => Ok(Self::Current),
            "silent" => Ok(Self::Silent),
            _ => Err(ConfigError::InvalidNoBumpBehavior(s.to_string())),
        }
    }
}

impl fmt::Display for NoVersionBumpBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Current => "current",
            Self::Silent => "silent",
        };
        f.write_str(s)
    }
}

/// Validated settings for one run.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub bump_types: BumpTypeConfig,
    /// Head of the compared range.
    pub branch: String,
    /// Tag name prefix, e.g. `api-` for `api-v1.2.3`.
    pub prefix: String,
    /// Compare against this tag (without prefix) instead of the latest one.
    pub from_tag: Option<String>,
    pub skip_invalid_tags: bool,
    /// Classify only this message instead of the fetched commits.
    pub squash_merge_commit_message: Option<String>,
    /// Extra commit messages appended to the fetched ones.
    pub additional_commits: Vec<String>,
    pub pre_release_stage: PreReleaseStage,
    pub minimum_change: Severity,
    pub no_version_bump_behavior: NoVersionBumpBehavior,
}

/// Result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Tag the commits were compared against.
    pub current: TagInfo,
    /// Aggregated bump; `None` when no commit warranted a release.
    pub bump: Option<Severity>,
    /// Next version; `None` for the `warn` and `silent` no-bump behaviors.
    pub next: Option<Version>,
}

/// Run the release pipeline against `source`.
pub async fn run<S>(source: &S, settings: &Settings) -> Result<Release, ReleaseError>
where
    S: ReleaseSource + ?Sized,
{
    let current = base_tag(source, settings).await?;
    run_from(source, settings, current).await
}

/// Resolve the tag to compare against: `from_tag` if set, else the latest one.
pub async fn base_tag<S>(source: &S, settings: &Settings) -> Result<TagInfo, ReleaseError>
where
    S: ReleaseSource + ?Sized,
{
    let prefix = settings.prefix.as_str();

    let current = match settings.from_tag.as_deref() {
        Some(tag) => source.tag(prefix, tag).await?,
        None => source.latest_tag(prefix, settings.skip_invalid_tags).await?,
    };
    info!("Latest tag is {}", current.name);
    Ok(current)
}

/// Run the rest of the pipeline from an already resolved base tag.
pub async fn run_from<S>(
    source: &S,
    settings: &Settings,
    current: TagInfo,
) -> Result<Release, ReleaseError>
where
    S: ReleaseSource + ?Sized,
{
    let prefix = settings.prefix.as_str();

    let commits = collect_commits(source, settings, &current).await?;
    let bump = determine_bump(&settings.bump_types, &commits);

    let Some(bump) = bump.filter(|severity| *severity != Severity::None) else {
        return no_bump(settings.no_version_bump_behavior, current);
    };

    info!("Bump type is {}", bump);
    info!("Pre-release stage is {}", settings.pre_release_stage);

    let next = next_version(
        &current.version_name,
        bump,
        &settings.pre_release_stage,
        settings.minimum_change,
    )?;

    info!("Current version is {}", current.name);
    info!("Next version is {}v{}", prefix, next);

    Ok(Release {
        current,
        bump: Some(bump),
        next: Some(next),
    })
}

/// Gather the commits to classify.
async fn collect_commits<S>(
    source: &S,
    settings: &Settings,
    current: &TagInfo,
) -> Result<Vec<RemoteCommit>, ReleaseError>
where
    S: ReleaseSource + ?Sized,
{
    if let Some(message) = settings.squash_merge_commit_message.as_deref() {
        debug!("Using squash merge commit message instead of the commit range");
        return Ok(vec![RemoteCommit {
            sha: SQUASH_SHA.to_string(),
            message: message.to_string(),
        }]);
    }

    let mut commits = source.commits_between(&current.name, &settings.branch).await?;
    debug!("Parsed additional commits as {:?}", settings.additional_commits);
    commits.extend(settings.additional_commits.iter().map(|message| RemoteCommit {
        sha: UNKNOWN_SHA.to_string(),
        message: message.clone(),
    }));

    if commits.is_empty() {
        return Err(ReleaseError::NoCommits {
            base: current.name.clone(),
            head: settings.branch.clone(),
        });
    }

    info!("Found {} commits between {} and {}.", commits.len(), settings.branch, current.name);
    Ok(commits)
}

/// Classify every commit and reduce to a single bump.
///
/// Commits that are not conventional commits are skipped with a warning.
pub fn determine_bump(config: &BumpTypeConfig, commits: &[RemoteCommit]) -> Option<Severity> {
    let severities = commits.iter().map(|commit| {
        debug!("Parsing commit {} ({})", commit.sha, commit.message);
        match classify_commit(config, &commit.message, &commit.sha) {
            Ok(severity) => Some(severity),
            Err(e) => {
                warn!(
                    "[INVALID] Skipping commit {} ({}) as it doesn't follow conventional commit format.",
                    commit.sha, commit.message
                );
                debug!(sha = %commit.sha, error = %e, "Commit parse failure");
                None
            }
        }
    });

    aggregate(severities, config.patch_all)
}

fn no_bump(behavior: NoVersionBumpBehavior, current: TagInfo) -> Result<Release, ReleaseError> {
    let next = match behavior {
        NoVersionBumpBehavior::Current => {
            info!(
                "No commit resulted in a version bump since last release! Exiting with current as next version..."
            );
            Some(clean_version(&current.version_name)?)
        }
        NoVersionBumpBehavior::Silent => {
            info!("No commit resulted in a version bump since last release! Exiting silently...");
            None
        }
        NoVersionBumpBehavior::Warn => {
            warn!("No commit resulted in a version bump since last release!");
            None
        }
        NoVersionBumpBehavior::Error => return Err(ReleaseError::NoVersionBump),
    };

    Ok(Release {
        current,
        bump: None,
        next,
    })
}
