//! Run command — one triage sweep against a GitHub repository.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;

use crate::config::{ConfigResolver, LabelParams, DEFAULT_CONFIG_STEM};
use crate::github::{GitHubClient, DEFAULT_API_URL};
use crate::triage::{RetryPolicy, SweepOptions, Triage, DEFAULT_CONCURRENCY};
use crate::utils::{check_github_token, check_label_parameters, check_repository, Settings};

/// Run command options.
#[derive(Parser)]
pub struct RunCommand {
    /// Repository to triage (defaults to GITHUB_REPOSITORY).
    #[arg(long, value_name = "OWNER/NAME")]
    pub repo: Option<String>,

    /// GitHub token (defaults to GITHUB_TOKEN, GH_TOKEN or the repo-token action input).
    #[arg(long)]
    pub token: Option<String>,

    /// Revision the configuration file is read from (defaults to GITHUB_SHA).
    #[arg(long = "ref", value_name = "REF")]
    pub git_ref: Option<String>,

    /// GitHub API base URL (defaults to GITHUB_API_URL or the public API).
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Configuration file path without its extension.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_STEM)]
    pub config_stem: String,

    /// Maximum number of concurrent label requests.
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Attempts per label request before giving up on an issue.
    #[arg(long, default_value_t = 3)]
    pub max_attempts: u32,

    /// Classifies and reports without applying labels.
    #[arg(long)]
    pub dry_run: bool,

    /// Label names for each role.
    #[command(flatten)]
    pub labels: LabelParams,
}

impl RunCommand {
    /// Executes the run command.
    pub async fn execute(self) -> Result<()> {
        let settings = Settings::load().context("Failed to load settings")?;

        // Preflight: every startup parameter before any request
        let binding = check_label_parameters(&self.labels, &settings)?;
        let token = check_github_token(self.token.as_deref(), &settings)?;
        let repo = check_repository(self.repo.as_deref(), &settings)?;
        println!("✓ Startup parameters verified");

        let api_url = self
            .api_url
            .or_else(|| settings.get_env_var("GITHUB_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let git_ref = self.git_ref.or_else(|| settings.get_env_var("GITHUB_SHA"));

        let client = GitHubClient::new(&api_url, token, repo)
            .context("Failed to create GitHub client")?
            .with_ref(git_ref);

        println!("🔍 Triaging accessibility issues in {}", client.repo());

        let options = SweepOptions {
            concurrency: self.concurrency,
            retry: RetryPolicy {
                max_attempts: self.max_attempts,
                ..RetryPolicy::default()
            },
            dry_run: self.dry_run,
        };
        let triage = Triage::new(ConfigResolver::new(&self.config_stem), binding, options);

        let report = triage.run(&client, Utc::now()).await?;
        println!("{}", report.render());

        if !report.failed.is_empty() {
            let issues: Vec<String> = report
                .failed_issues()
                .iter()
                .map(|issue| format!("#{issue}"))
                .collect();
            bail!(
                "Failed to label {} issue(s): {}",
                issues.len(),
                issues.join(", ")
            );
        }

        Ok(())
    }
}
