//! GitHub Actions step outputs and exported variables.

use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use semver::Version;

use crate::error::OutputError;
use crate::github::TagInfo;
use crate::release::Release;

const GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";
const GITHUB_ENV: &str = "GITHUB_ENV";

/// Values reported for a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outputs {
    /// Tag compared against, with prefix.
    pub current: Option<String>,
    pub next: Option<NextVersion>,
    pub bump: Option<String>,
}

/// The next version in the formats consumers expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextVersion {
    /// `{prefix}v1.2.3`
    pub next: String,
    /// `{prefix}1.2.3`
    pub next_strict: String,
    /// `{prefix}v1`
    pub next_major: String,
    /// `{prefix}1`
    pub next_major_strict: String,
}

impl NextVersion {
    pub fn new(prefix: &str, version: &Version) -> Self {
        Self {
            next: format!("{prefix}v{version}"),
            next_strict: format!("{prefix}{version}"),
            next_major: format!("{prefix}v{}", version.major),
            next_major_strict: format!("{prefix}{}", version.major),
        }
    }
}

impl Outputs {
    pub fn from_release(release: &Release, prefix: &str) -> Self {
        Self {
            next: release.next.as_ref().map(|v| NextVersion::new(prefix, v)),
            bump: release.bump.map(|b| b.to_string()),
            ..Self::from_tag(&release.current, prefix)
        }
    }

    /// Only the `current` values, known as soon as the base tag is resolved.
    pub fn from_tag(current: &TagInfo, prefix: &str) -> Self {
        Self {
            current: Some(format!("{prefix}{}", current.version_name)),
            next: None,
            bump: None,
        }
    }

    /// Drop `current`, for when it has already been written.
    pub fn without_current(self) -> Self {
        Self {
            current: None,
            ..self
        }
    }

    /// Step outputs as `(name, value)` pairs.
    pub fn step_outputs(&self) -> Vec<(&'static str, String)> {
        let mut outputs = Vec::new();
        if let Some(current) = &self.current {
            outputs.push(("current", current.clone()));
        }
        if let Some(bump) = &self.bump {
            outputs.push(("versionType", bump.clone()));
        }
        if let Some(next) = &self.next {
            outputs.push(("next", next.next.clone()));
            outputs.push(("nextStrict", next.next_strict.clone()));
            outputs.push(("nextMajor", next.next_major.clone()));
            outputs.push(("nextMajorStrict", next.next_major_strict.clone()));
        }
        outputs
    }

    /// Variables exported to later steps of the job.
    pub fn exported_variables(&self) -> Vec<(&'static str, String)> {
        let mut vars = Vec::new();
        if let Some(current) = &self.current {
            vars.push(("current", current.clone()));
        }
        if let Some(next) = &self.next {
            vars.push(("next", next.next.clone()));
            vars.push(("nextStrict", next.next_strict.clone()));
        }
        vars
    }

    /// Write to the files named by `GITHUB_OUTPUT` and `GITHUB_ENV`.
    ///
    /// Outside of GitHub Actions the step outputs are printed to stdout.
    pub fn write_github(&self) -> Result<(), OutputError> {
        let output_file = env::var_os(GITHUB_OUTPUT).filter(|p| !p.is_empty());
        let env_file = env::var_os(GITHUB_ENV).filter(|p| !p.is_empty());

        match &output_file {
            Some(path) => append_pairs(Path::new(path), &self.step_outputs())?,
            None => {
                for (name, value) in self.step_outputs() {
                    println!("{name}={value}");
                }
            }
        }

        if let Some(path) = &env_file {
            append_pairs(Path::new(path), &self.exported_variables())?;
        }

        Ok(())
    }
}

/// Append `name=value` lines to `path`, creating it if needed.
pub fn append_pairs(path: &Path, pairs: &[(&str, String)]) -> Result<(), OutputError> {
    let wrap = |source| OutputError::WriteFailed {
        path: path.display().to_string(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(wrap)?;

    let mut content = String::new();
    for (name, value) in pairs {
        content.push_str(&format!("{name}={value}\n"));
    }

    file.write_all(content.as_bytes()).map_err(wrap)
}
