//! semtag - CLI entry point.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use semtag::github::{GitHubSource, get_github_token};
use semtag::{Inputs, Outputs, release};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let inputs = Inputs::parse();

    match run(&inputs).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            // Surface the failure as a workflow annotation
            println!("::error::{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(inputs: &Inputs) -> Result<()> {
    let settings = inputs.settings().context("Invalid inputs")?;
    let (owner, repo) = inputs.owner_repo().context("Invalid repository")?;

    let token = get_github_token(inputs.token.as_deref())
        .context("GitHub authentication required to read tags and commits")?;
    let source = GitHubSource::from_token(&token, &inputs.github_api_url, &owner, &repo)
        .context("Failed to create GitHub client")?;

    let current = release::base_tag(&source, &settings)
        .await
        .context("Failed to bump version")?;

    // `current` is reported even if the rest of the run fails
    Outputs::from_tag(&current, &settings.prefix)
        .write_github()
        .context("Failed to write step outputs")?;

    let release = release::run_from(&source, &settings, current)
        .await
        .context("Failed to bump version")?;

    Outputs::from_release(&release, &settings.prefix)
        .without_current()
        .write_github()
        .context("Failed to write step outputs")?;

    Ok(())
}
