//! Action inputs, from CLI flags or the `INPUT_*` variables GitHub Actions sets.

use clap::Parser;

use crate::commit::BumpTypeConfig;
use crate::error::ConfigError;
use crate::github::parse_repository;
use crate::release::{NoVersionBumpBehavior, Settings};
use crate::version::{PreReleaseStage, Severity};

/// Compute the next semantic version from conventional commits.
#[derive(Parser, Debug, Clone)]
#[command(name = "semtag")]
#[command(about = "Compute the next semantic version from conventional commits since the latest tag")]
#[command(version)]
pub struct Inputs {
    /// GitHub token (falls back to GITHUB_TOKEN, GH_TOKEN, then `gh auth token`)
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository as owner/repo
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: String,

    /// Branch (or any ref) to compare the latest tag against
    #[arg(long, env = "INPUT_BRANCH", default_value = "main")]
    pub branch: String,

    /// Comma separated commit types that trigger a major bump
    #[arg(long, env = "INPUT_MAJORLIST", default_value = "")]
    pub major_list: String,

    /// Comma separated commit types that trigger a minor bump
    #[arg(long, env = "INPUT_MINORLIST", default_value = "feat, feature")]
    pub minor_list: String,

    /// Comma separated commit types that trigger a patch bump
    #[arg(long, env = "INPUT_PATCHLIST", default_value = "fix, bugfix, perf, refactor, test, tests")]
    pub patch_list: String,

    /// Treat every other commit type as a patch
    #[arg(long, env = "INPUT_PATCHALL")]
    pub patch_all: bool,

    /// Look past tags that are not valid semver among the latest ones
    #[arg(long, env = "INPUT_SKIPINVALIDTAGS")]
    pub skip_invalid_tags: bool,

    /// What to do when no commit warrants a bump: error, warn, current or silent
    #[arg(long, env = "INPUT_NOVERSIONBUMPBEHAVIOR", default_value = "error")]
    pub no_version_bump_behavior: String,

    /// Classify only this message instead of the commit range
    #[arg(long, env = "INPUT_SQUASHMERGECOMMITMESSAGE")]
    pub squash_merge_commit_message: Option<String>,

    /// Pre-release stage, e.g. alpha, or none for stable releases
    #[arg(long, env = "INPUT_PRERELEASESTAGE", default_value = "none")]
    pub pre_release_stage: String,

    /// Tag prefix, e.g. `api-` for tags like `api-v1.2.3`
    #[arg(long, env = "INPUT_PREFIX", default_value = "")]
    pub prefix: String,

    /// Extra commit messages, one per line
    #[arg(long, env = "INPUT_ADDITIONALCOMMITS", default_value = "")]
    pub additional_commits: String,

    /// Compare against this tag (without prefix) instead of the latest one
    #[arg(long, env = "INPUT_FROMTAG")]
    pub from_tag: Option<String>,

    /// Smallest change that bumps the core version: major, minor, patch or none
    #[arg(long, env = "INPUT_MINIMUMCHANGE", default_value = "none")]
    pub minimum_change: String,

    /// GitHub API root
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub github_api_url: String,
}

impl Inputs {
    /// Owner and repository name.
    pub fn owner_repo(&self) -> Result<(String, String), ConfigError> {
        parse_repository(&self.repository)
    }

    /// Validate the raw inputs into pipeline settings.
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        Ok(Settings {
            bump_types: BumpTypeConfig::from_lists(
                &self.major_list,
                &self.minor_list,
                &self.patch_list,
                self.patch_all,
            ),
            branch: self.branch.trim().to_string(),
            prefix: self.prefix.trim().to_string(),
            from_tag: non_empty(self.from_tag.as_deref()),
            skip_invalid_tags: self.skip_invalid_tags,
            squash_merge_commit_message: non_empty(self.squash_merge_commit_message.as_deref()),
            additional_commits: split_lines(&self.additional_commits),
            pre_release_stage: self
                .pre_release_stage
                .parse::<PreReleaseStage>()
                .unwrap_or_default(),
            minimum_change: self.minimum_change.parse::<Severity>()?,
            no_version_bump_behavior: self.no_version_bump_behavior.parse::<NoVersionBumpBehavior>()?,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

fn split_lines(value: &str) -> Vec<String> {
    value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const INPUT_VARS: [&str; 16] = [
        "INPUT_TOKEN",
        "GITHUB_REPOSITORY",
        "INPUT_BRANCH",
        "INPUT_MAJORLIST",
        "INPUT_MINORLIST",
        "INPUT_PATCHLIST",
        "INPUT_PATCHALL",
        "INPUT_SKIPINVALIDTAGS",
        "INPUT_NOVERSIONBUMPBEHAVIOR",
        "INPUT_SQUASHMERGECOMMITMESSAGE",
        "INPUT_PRERELEASESTAGE",
        "INPUT_PREFIX",
        "INPUT_ADDITIONALCOMMITS",
        "INPUT_FROMTAG",
        "INPUT_MINIMUMCHANGE",
        "GITHUB_API_URL",
    ];

    /// Run `f` with all input variables unset except `vars`.
    fn with_inputs<R>(vars: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
        let mut all: Vec<(&str, Option<&str>)> = INPUT_VARS
            .iter()
            .filter(|name| !vars.iter().any(|(set, _)| set == *name))
            .map(|name| (*name, None))
            .collect();
        all.extend(vars.iter().map(|(name, value)| (*name, Some(*value))));
        temp_env::with_vars(all, f)
    }

    #[test]
    #[serial]
    fn test_defaults() {
        with_inputs(&[], || {
            let inputs = Inputs::try_parse_from(["semtag", "--repository", "owner/repo"]).unwrap();
            let settings = inputs.settings().unwrap();

            assert_eq!(settings.branch, "main");
            assert!(settings.bump_types.major.is_empty());
            assert!(settings.bump_types.minor.contains("feature"));
            assert!(settings.bump_types.patch.contains("tests"));
            assert!(!settings.bump_types.patch_all);
            assert_eq!(settings.pre_release_stage, PreReleaseStage::None);
            assert_eq!(settings.minimum_change, Severity::None);
            assert_eq!(settings.no_version_bump_behavior, NoVersionBumpBehavior::Error);
            assert_eq!(settings.from_tag, None);
            assert!(settings.additional_commits.is_empty());
            assert_eq!(inputs.github_api_url, "https://api.github.com");
        });
    }

    #[test]
    #[serial]
    fn test_action_env_inputs() {
        with_inputs(
            &[
                ("GITHUB_REPOSITORY", "acme/widgets"),
                ("INPUT_BRANCH", "develop"),
                ("INPUT_MAJORLIST", "breaking"),
                ("INPUT_PATCHALL", "true"),
                ("INPUT_PRERELEASESTAGE", "beta"),
                ("INPUT_MINIMUMCHANGE", "minor"),
                ("INPUT_NOVERSIONBUMPBEHAVIOR", "current"),
                ("INPUT_ADDITIONALCOMMITS", "feat: one\n\n  fix: two  \n"),
                ("INPUT_PREFIX", "web-"),
            ],
            || {
                let inputs = Inputs::try_parse_from(["semtag"]).unwrap();
                let settings = inputs.settings().unwrap();

                assert_eq!(inputs.owner_repo().unwrap(), ("acme".to_string(), "widgets".to_string()));
                assert_eq!(settings.branch, "develop");
                assert!(settings.bump_types.major.contains("breaking"));
                assert!(settings.bump_types.patch_all);
                assert_eq!(settings.pre_release_stage, PreReleaseStage::Stage("beta".to_string()));
                assert_eq!(settings.minimum_change, Severity::Minor);
                assert_eq!(settings.no_version_bump_behavior, NoVersionBumpBehavior::Current);
                assert_eq!(settings.additional_commits, vec!["feat: one", "fix: two"]);
                assert_eq!(settings.prefix, "web-");
            },
        );
    }

    #[test]
    #[serial]
    fn test_patch_all_false_from_env() {
        with_inputs(&[("INPUT_PATCHALL", "false")], || {
            let inputs = Inputs::try_parse_from(["semtag", "--repository", "o/r"]).unwrap();
            assert!(!inputs.patch_all);
        });
    }

    #[test]
    #[serial]
    fn test_blank_optional_inputs_are_absent() {
        with_inputs(&[], || {
            let inputs = Inputs::try_parse_from([
                "semtag",
                "--repository",
                "o/r",
                "--from-tag",
                "  ",
                "--squash-merge-commit-message",
                "",
            ])
            .unwrap();
            let settings = inputs.settings().unwrap();
            assert_eq!(settings.from_tag, None);
            assert_eq!(settings.squash_merge_commit_message, None);
        });
    }

    #[test]
    #[serial]
    fn test_invalid_minimum_change() {
        with_inputs(&[], || {
            let inputs = Inputs::try_parse_from([
                "semtag",
                "--repository",
                "o/r",
                "--minimum-change",
                "huge",
            ])
            .unwrap();
            assert_eq!(
                inputs.settings().unwrap_err(),
                ConfigError::InvalidSeverity("huge".to_string())
            );
        });
    }

    #[test]
    #[serial]
    fn test_missing_repository_is_a_parse_error() {
        with_inputs(&[], || {
            assert!(Inputs::try_parse_from(["semtag"]).is_err());
        });
    }
}
