//! GitHub token discovery.
//!
//! Lookup order:
//! 1. Token passed explicitly (the `token` action input)
//! 2. GITHUB_TOKEN env var
//! 3. GH_TOKEN env var
//! 4. `gh auth token` (gh CLI)

use std::env;
use std::process::Command;

use tracing::debug;

use crate::error::GitHubError;

/// Get a GitHub token, preferring an explicitly supplied one.
pub fn get_github_token(explicit: Option<&str>) -> Result<String, GitHubError> {
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }

    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Ok(token) = env::var(var)
            && !token.trim().is_empty()
        {
            debug!(source = var, "Using GitHub token from environment");
            return Ok(token.trim().to_string());
        }
    }

    if let Some(token) = get_token_from_gh_cli() {
        debug!("Using GitHub token from gh CLI");
        return Ok(token);
    }

    Err(GitHubError::AuthenticationFailed)
}

/// Try to get a token from the gh CLI.
fn get_token_from_gh_cli() -> Option<String> {
    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;

    if output.status.success() {
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !token.is_empty() {
            return Some(token);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_explicit_token_wins() {
        temp_env::with_var("GITHUB_TOKEN", Some("env-token"), || {
            assert_eq!(get_github_token(Some(" input-token ")).unwrap(), "input-token");
        });
    }

    #[test]
    #[serial]
    fn test_blank_explicit_token_falls_back_to_env() {
        temp_env::with_vars([("GITHUB_TOKEN", Some("env-token")), ("GH_TOKEN", None)], || {
            assert_eq!(get_github_token(Some("  ")).unwrap(), "env-token");
        });
    }

    #[test]
    #[serial]
    fn test_gh_token_used_when_github_token_empty() {
        temp_env::with_vars([("GITHUB_TOKEN", Some("")), ("GH_TOKEN", Some("gh-token"))], || {
            assert_eq!(get_github_token(None).unwrap(), "gh-token");
        });
    }
}
