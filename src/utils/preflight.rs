//! Preflight validation checks for early failure detection
//!
//! Startup parameters are validated before any request reaches the issue
//! tracker, so a misconfigured run fails fast with a message naming the
//! offending parameter.

use anyhow::{anyhow, Result};

use crate::config::{LabelBinding, LabelParams};
use crate::github::RepoSlug;
use crate::utils::settings::Settings;

/// Environment variables consulted for the API token, in order.
///
/// `INPUT_REPO-TOKEN` is how the Actions runner exports a `repo-token` input.
pub const TOKEN_ENV_VARS: [&str; 4] = [
    "GITHUB_TOKEN",
    "GH_TOKEN",
    "INPUT_REPO-TOKEN",
    "INPUT_REPO_TOKEN",
];

/// Validate every label-role parameter is present and non-empty
pub fn check_label_parameters(params: &LabelParams, settings: &Settings) -> Result<LabelBinding> {
    Ok(params.resolve(settings)?)
}

/// Validate a GitHub token is available
///
/// An explicit `--token` wins; otherwise the environment and then the
/// settings file are consulted.
pub fn check_github_token(token: Option<&str>, settings: &Settings) -> Result<String> {
    token
        .filter(|token| !token.trim().is_empty())
        .map(str::to_string)
        .or_else(|| settings.get_env_vars(&TOKEN_ENV_VARS))
        .ok_or_else(|| {
            anyhow!(
                "GitHub token not found.\n\
                 Pass --token or set one of these environment variables:\n\
                 - GITHUB_TOKEN\n\
                 - GH_TOKEN\n\
                 - INPUT_REPO-TOKEN (the repo-token action input)"
            )
        })
}

/// Validate the target repository is known
pub fn check_repository(repo: Option<&str>, settings: &Settings) -> Result<RepoSlug> {
    let repo = repo
        .map(str::to_string)
        .or_else(|| settings.get_env_var("GITHUB_REPOSITORY"))
        .ok_or_else(|| {
            anyhow!(
                "Target repository not specified.\n\
                 Pass --repo owner/name or set GITHUB_REPOSITORY."
            )
        })?;

    Ok(repo.parse()?)
}
