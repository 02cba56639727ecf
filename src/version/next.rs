//! Next-version arithmetic with pre-release stages and a minimum-change floor.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use semver::{BuildMetadata, Prerelease, Version};

use crate::error::VersionError;
use crate::version::bump::Severity;

/// Pre-release stage requested for the next version.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PreReleaseStage {
    /// Produce stable releases.
    #[default]
    None,
    /// Produce `X.Y.Z-<stage>.N` builds.
    Stage(String),
}

impl PreReleaseStage {
    pub fn is_none(&self) -> bool {
        matches!(self, PreReleaseStage::None)
    }
}

impl FromStr for PreReleaseStage {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "none" {
            Ok(PreReleaseStage::None)
        } else {
            Ok(PreReleaseStage::Stage(s.to_string()))
        }
    }
}

impl fmt::Display for PreReleaseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreReleaseStage::None => f.write_str("none"),
            PreReleaseStage::Stage(stage) => f.write_str(stage),
        }
    }
}

/// Parse a version string leniently, the way tags are usually written.
///
/// Leading whitespace and any non-digit prefix (`v`, `=`, ...) are dropped,
/// as is build metadata.
pub fn clean_version(raw: &str) -> Result<Version, VersionError> {
    let trimmed = raw.trim().trim_start_matches(|c: char| !c.is_ascii_digit());
    let mut version =
        Version::parse(trimmed).map_err(|e| VersionError::Invalid(raw.to_string(), e))?;
    version.build = BuildMetadata::EMPTY;
    Ok(version)
}

/// Compute the version that follows `current`.
///
/// When `bump` is strictly more severe than `minimum_change`, the core
/// version is incremented (as a stable release, or as the first build of
/// `stage`). Otherwise the core stays put: a stable stage strips any
/// pre-release suffix, a named stage advances the pre-release build.
pub fn next_version(
    current: &str,
    bump: Severity,
    stage: &PreReleaseStage,
    minimum_change: Severity,
) -> Result<Version, VersionError> {
    let version = clean_version(current)?;

    if bump.exceeds(minimum_change) {
        return match stage {
            PreReleaseStage::None => increment(&version, bump),
            PreReleaseStage::Stage(name) => pre_increment(&version, bump, name),
        };
    }

    match stage {
        PreReleaseStage::None => Ok(strip_prerelease(&version)),
        PreReleaseStage::Stage(name) => next_prerelease(&version, name),
    }
}

/// Stable increment.
///
/// A pre-release that is already the target of the requested bump is
/// promoted instead of incremented again: `2.0.0-rc.1` + major = `2.0.0`.
pub fn increment(version: &Version, bump: Severity) -> Result<Version, VersionError> {
    let mut next = strip_prerelease(version);
    let is_pre = !version.pre.is_empty();

    match bump {
        Severity::Major => {
            if version.minor != 0 || version.patch != 0 || !is_pre {
                next.major = bump_field(version, version.major, "major")?;
            }
            next.minor = 0;
            next.patch = 0;
        }
        Severity::Minor => {
            if version.patch != 0 || !is_pre {
                next.minor = bump_field(version, version.minor, "minor")?;
            }
            next.patch = 0;
        }
        Severity::Patch => {
            if !is_pre {
                next.patch = bump_field(version, version.patch, "patch")?;
            }
        }
        Severity::None => {}
    }

    Ok(next)
}

/// Core increment followed by the first build of `stage` (`X.Y.Z-stage.0`).
pub fn pre_increment(version: &Version, bump: Severity, stage: &str) -> Result<Version, VersionError> {
    let mut next = strip_prerelease(version);

    match bump {
        Severity::Major => {
            next.major = bump_field(version, version.major, "major")?;
            next.minor = 0;
            next.patch = 0;
        }
        Severity::Minor => {
            next.minor = bump_field(version, version.minor, "minor")?;
            next.patch = 0;
        }
        Severity::Patch => next.patch = bump_field(version, version.patch, "patch")?,
        Severity::None => {}
    }

    next.pre = prerelease(stage, &format!("{stage}.0"))?;
    Ok(next)
}

/// Advance the pre-release build of an unchanged core version.
///
/// `1.0.0` becomes `1.0.0-alpha.0`, `1.0.0-alpha.3` becomes `1.0.0-alpha.4`,
/// and switching stages (`1.0.0-alpha.3` with `beta`) restarts at `beta.0`.
pub fn next_prerelease(version: &Version, stage: &str) -> Result<Version, VersionError> {
    let mut next = version.clone();
    next.build = BuildMetadata::EMPTY;

    let mut identifiers: Vec<String> = version
        .pre
        .as_str()
        .split('.')
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();

    let same_stage = identifiers.first().is_some_and(|first| first == stage)
        && identifiers.get(1).is_some_and(|second| is_numeric(second));

    if !same_stage {
        next.pre = prerelease(stage, &format!("{stage}.0"))?;
        return Ok(next);
    }

    match identifiers.iter().rposition(|id| is_numeric(id)) {
        Some(idx) => identifiers[idx] = increment_numeric(&identifiers[idx]),
        None => identifiers.push("0".to_string()),
    }

    next.pre = prerelease(stage, &identifiers.join("."))?;
    Ok(next)
}

/// Drop the pre-release suffix and build metadata.
pub fn strip_prerelease(version: &Version) -> Version {
    Version::new(version.major, version.minor, version.patch)
}

fn prerelease(stage: &str, text: &str) -> Result<Prerelease, VersionError> {
    Prerelease::new(text).map_err(|e| VersionError::InvalidPreReleaseStage(stage.to_string(), e))
}

fn bump_field(version: &Version, value: u64, field: &'static str) -> Result<u64, VersionError> {
    value.checked_add(1).ok_or_else(|| VersionError::Overflow {
        version: version.to_string(),
        field,
    })
}

/// Add one to a numeric identifier of any length, e.g. `"199"` -> `"200"`.
///
/// Numeric pre-release identifiers are not bounded by `u64`.
fn increment_numeric(id: &str) -> String {
    let mut digits: Vec<u8> = id.bytes().collect();
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return String::from_utf8_lossy(&digits).into_owned();
        }
    }
    format!("1{}", String::from_utf8_lossy(&digits))
}

fn is_numeric(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_digit())
}
