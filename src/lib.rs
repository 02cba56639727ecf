//! semtag - Compute the next semantic version from conventional commits.
//!
//! # Overview
//!
//! semtag finds the latest release tag of a GitHub repository, classifies
//! every commit since then by its conventional commit type, and derives the
//! next version from the most severe change, honoring pre-release stages and
//! a minimum-change floor.

pub mod commit;
pub mod config;
pub mod error;
pub mod github;
pub mod output;
pub mod release;
pub mod version;

// Re-export commonly used types
pub use commit::{BumpTypeConfig, ConventionalCommit, classify};
pub use config::Inputs;
pub use error::{CommitError, ConfigError, GitHubError, OutputError, ReleaseError, VersionError};
pub use github::{GitHubSource, ReleaseSource, TagInfo};
pub use output::Outputs;
pub use release::{NoVersionBumpBehavior, Release, Settings};
pub use version::{PreReleaseStage, Severity, aggregate, next_version};
