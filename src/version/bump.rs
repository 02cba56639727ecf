//! Bump severities and their aggregation across a batch of commits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Severity of a version bump, ordered so that `Major` is the greatest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    None,
    Patch,
    Minor,
    Major,
}

impl Severity {
    /// Numeric rank where a lower number is more severe (major=0 .. none=3).
    pub fn rank(self) -> u8 {
        match self {
            Severity::Major => 0,
            Severity::Minor => 1,
            Severity::Patch => 2,
            Severity::None => 3,
        }
    }

    /// Whether `self` is strictly more severe than `other`.
    pub fn exceeds(self, other: Severity) -> bool {
        self.rank() < other.rank()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Major => "major",
            Severity::Minor => "minor",
            Severity::Patch => "patch",
            Severity::None => "none",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "major" => Ok(Severity::Major),
            "minor" => Ok(Severity::Minor),
            "patch" => Ok(Severity::Patch),
            "none" | "" => Ok(Severity::None),
            _ => Err(ConfigError::InvalidSeverity(s.to_string())),
        }
    }
}

/// Reduce per-commit severities to the highest one.
///
/// `None` entries (commits that could not be classified) never outweigh a
/// real severity. With `patch_all` the result is at least [`Severity::Patch`],
/// even for an empty batch. Without it, a batch with no entries at all
/// yields `None`.
pub fn aggregate<I>(severities: I, patch_all: bool) -> Option<Severity>
where
    I: IntoIterator<Item = Option<Severity>>,
{
    let seed = if patch_all { Some(Severity::Patch) } else { None };
    severities.into_iter().fold(seed, |acc, cur| acc.max(cur))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Option<Severity>; 5] = [
        None,
        Some(Severity::None),
        Some(Severity::Patch),
        Some(Severity::Minor),
        Some(Severity::Major),
    ];

    #[test]
    fn test_rank_order() {
        assert!(Severity::Major.exceeds(Severity::Minor));
        assert!(Severity::Minor.exceeds(Severity::Patch));
        assert!(Severity::Patch.exceeds(Severity::None));
        assert!(!Severity::Major.exceeds(Severity::Major));
        assert!(!Severity::None.exceeds(Severity::None));
    }

    #[test]
    fn test_ord_matches_rank() {
        assert!(Severity::Major > Severity::Minor);
        assert!(Severity::Minor > Severity::Patch);
        assert!(Severity::Patch > Severity::None);
    }

    #[test]
    fn test_parse_severity() {
        assert_eq!("major".parse::<Severity>(), Ok(Severity::Major));
        assert_eq!("Minor".parse::<Severity>(), Ok(Severity::Minor));
        assert_eq!(" patch ".parse::<Severity>(), Ok(Severity::Patch));
        assert_eq!("none".parse::<Severity>(), Ok(Severity::None));
        assert_eq!("".parse::<Severity>(), Ok(Severity::None));
        assert!("huge".parse::<Severity>().is_err());
    }

    #[test]
    fn test_highest_severity_wins() {
        let bump = aggregate(
            [Some(Severity::Patch), None, Some(Severity::Major), Some(Severity::Minor), None],
            false,
        );
        assert_eq!(bump, Some(Severity::Major));
    }

    #[test]
    fn test_empty_batch_is_absent() {
        assert_eq!(aggregate(Vec::new(), false), None);
        assert_eq!(aggregate([None, None], false), None);
    }

    #[test]
    fn test_none_severity_is_kept_over_absent() {
        assert_eq!(aggregate([None, Some(Severity::None)], false), Some(Severity::None));
    }

    #[test]
    fn test_patch_all_sets_patch_floor() {
        assert_eq!(aggregate(Vec::new(), true), Some(Severity::Patch));
        assert_eq!(aggregate([None, Some(Severity::None)], true), Some(Severity::Patch));
        assert_eq!(aggregate([Some(Severity::Minor)], true), Some(Severity::Minor));
    }

    #[test]
    fn test_aggregate_is_commutative() {
        for a in ALL {
            for b in ALL {
                assert_eq!(aggregate([a, b], false), aggregate([b, a], false));
                assert_eq!(aggregate([a, b], true), aggregate([b, a], true));
            }
        }
    }
}
